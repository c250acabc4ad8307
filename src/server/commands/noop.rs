//! The RFC 959 no-op (`NOOP`) command.

use async_trait::async_trait;
use std::io;

use super::CommandHandler;
use crate::server::{reply::ReplyCode, Session};

/// Does nothing, successfully.
#[derive(Debug)]
pub struct Noop;

#[async_trait]
impl CommandHandler for Noop {
    async fn execute(&self, sess: &mut Session, _param: &str) -> io::Result<()> {
        sess.write_message(ReplyCode::CommandOkay, "OK").await;
        Ok(())
    }

    fn requires_auth(&self) -> bool {
        false
    }
}
