//! The RFC 959 transfer mode (`MODE`) command.

use async_trait::async_trait;
use std::io;

use super::CommandHandler;
use crate::server::{reply::ReplyCode, Session};

/// Only stream mode is supported.
#[derive(Debug)]
pub struct Mode;

#[async_trait]
impl CommandHandler for Mode {
    async fn execute(&self, sess: &mut Session, param: &str) -> io::Result<()> {
        if param.eq_ignore_ascii_case("S") {
            sess.write_message(ReplyCode::CommandOkay, "OK").await;
        } else {
            sess.write_message(ReplyCode::CommandNotImplementedForParameter, "MODE is an obsolete command").await;
        }
        Ok(())
    }

    fn requires_param(&self) -> bool {
        true
    }
}
