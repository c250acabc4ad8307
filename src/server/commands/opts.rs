//! The RFC 2389 options (`OPTS`) command.

use async_trait::async_trait;
use std::io;

use super::CommandHandler;
use crate::server::{reply::ReplyCode, Session};

/// Only `OPTS UTF8 ON` is understood; path handling is UTF-8 throughout
/// anyway, so the switch is an acknowledgement.
#[derive(Debug)]
pub struct Opts;

#[async_trait]
impl CommandHandler for Opts {
    async fn execute(&self, sess: &mut Session, param: &str) -> io::Result<()> {
        if param.eq_ignore_ascii_case("UTF8 ON") {
            sess.write_message(ReplyCode::CommandOkay, "UTF8 mode enabled").await;
        } else {
            sess.write_message(ReplyCode::FileError, "Unknown parameter").await;
        }
        Ok(())
    }

    fn requires_param(&self) -> bool {
        true
    }

    fn requires_auth(&self) -> bool {
        false
    }
}
