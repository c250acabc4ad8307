//! The RFC 3659 restart (`REST`) command.

use async_trait::async_trait;
use std::io;

use super::CommandHandler;
use crate::server::{reply::ReplyCode, Session};

/// Records the byte offset the next RETR or STOR starts from.
#[derive(Debug)]
pub struct Rest;

#[async_trait]
impl CommandHandler for Rest {
    async fn execute(&self, sess: &mut Session, param: &str) -> io::Result<()> {
        match param.parse::<i64>() {
            Ok(offset) if offset >= 0 => {
                sess.last_file_pos = offset;
                sess.write_message(ReplyCode::FileActionPending, &format!("Start transfer from {}", offset)).await;
            }
            _ => {
                sess.write_message(ReplyCode::ParameterSyntaxError, "REST requires a non-negative numeric parameter")
                    .await;
            }
        }
        Ok(())
    }

    fn is_extension(&self) -> bool {
        true
    }

    fn requires_param(&self) -> bool {
        true
    }
}
