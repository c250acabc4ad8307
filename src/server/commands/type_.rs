//! The RFC 959 representation type (`TYPE`) command.

use async_trait::async_trait;
use std::io;

use super::CommandHandler;
use crate::server::{reply::ReplyCode, Session};

/// Accepts ASCII and image types. Data is moved verbatim either way;
/// EBCDIC and local byte are rejected.
#[derive(Debug)]
pub struct Type;

#[async_trait]
impl CommandHandler for Type {
    async fn execute(&self, sess: &mut Session, param: &str) -> io::Result<()> {
        match param.split_whitespace().next().map(str::to_ascii_uppercase).as_deref() {
            Some("A") => sess.write_message(ReplyCode::CommandOkay, "Type set to ASCII").await,
            Some("I") => sess.write_message(ReplyCode::CommandOkay, "Type set to binary").await,
            _ => {
                sess.write_message(ReplyCode::CommandNotImplementedForParameter, "Type not supported").await;
            }
        }
        Ok(())
    }

    fn requires_param(&self) -> bool {
        true
    }
}
