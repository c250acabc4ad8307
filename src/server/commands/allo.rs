//! The RFC 959 allocate (`ALLO`) command.

use async_trait::async_trait;
use std::io;

use super::CommandHandler;
use crate::server::{reply::ReplyCode, Session};

/// Storage is never preallocated; the command is acknowledged and ignored.
#[derive(Debug)]
pub struct Allo;

#[async_trait]
impl CommandHandler for Allo {
    async fn execute(&self, sess: &mut Session, _param: &str) -> io::Result<()> {
        sess.write_message(ReplyCode::CommandOkayNotImplemented, "Obsolete").await;
        Ok(())
    }
}
