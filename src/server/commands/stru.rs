//! The RFC 959 file structure (`STRU`) command.

use async_trait::async_trait;
use std::io;

use super::CommandHandler;
use crate::server::{reply::ReplyCode, Session};

/// Only file structure is supported.
#[derive(Debug)]
pub struct Stru;

#[async_trait]
impl CommandHandler for Stru {
    async fn execute(&self, sess: &mut Session, param: &str) -> io::Result<()> {
        if param.eq_ignore_ascii_case("F") {
            sess.write_message(ReplyCode::CommandOkay, "OK").await;
        } else {
            sess.write_message(ReplyCode::CommandNotImplementedForParameter, "STRU is an obsolete command").await;
        }
        Ok(())
    }

    fn requires_param(&self) -> bool {
        true
    }
}
