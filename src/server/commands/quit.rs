//! The RFC 959 logout (`QUIT`) command.

use async_trait::async_trait;
use std::io;

use super::CommandHandler;
use crate::server::{reply::ReplyCode, Session};

/// Says goodbye and marks the session closed; the control loop exits after
/// this reply.
#[derive(Debug)]
pub struct Quit;

#[async_trait]
impl CommandHandler for Quit {
    async fn execute(&self, sess: &mut Session, _param: &str) -> io::Result<()> {
        sess.write_message(ReplyCode::ClosingControlConnection, "Goodbye").await;
        sess.closed = true;
        Ok(())
    }

    fn requires_auth(&self) -> bool {
        false
    }
}
