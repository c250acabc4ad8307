//! The RFC 959 abort (`ABOR`) command.

use async_trait::async_trait;
use std::io;

use super::CommandHandler;
use crate::server::{reply::ReplyCode, Session};

/// Discards any negotiated-but-unconsumed data channel. Transfers
/// themselves are serialized with commands, so there is never one running
/// while ABOR is read.
#[derive(Debug)]
pub struct Abor;

#[async_trait]
impl CommandHandler for Abor {
    async fn execute(&self, sess: &mut Session, _param: &str) -> io::Result<()> {
        sess.data_conn = None;
        sess.write_message(ReplyCode::ClosingDataConnection, "ABOR command successful").await;
        Ok(())
    }
}
