//! The RFC 959 rename-to (`RNTO`) command.

use async_trait::async_trait;
use std::io;

use super::CommandHandler;
use crate::server::{reply::ReplyCode, Session};

/// Completes the rename begun by RNFR. Without a pending source the
/// command is out of sequence.
#[derive(Debug)]
pub struct Rnto;

#[async_trait]
impl CommandHandler for Rnto {
    async fn execute(&self, sess: &mut Session, param: &str) -> io::Result<()> {
        let from = std::mem::take(&mut sess.rename_from);
        if from.is_empty() {
            sess.write_message(ReplyCode::BadCommandSequence, "Bad sequence of commands: use RNFR first").await;
            return Ok(());
        }

        let to = sess.build_path(param);
        let ctx = sess.context("RNTO", param);
        let driver = sess.server().driver.clone();
        match driver.rename(&ctx, &from, &to).await {
            Ok(()) => {
                sess.write_message(ReplyCode::FileActionOkay, "File renamed").await;
            }
            Err(_) => {
                sess.write_message(ReplyCode::FileError, &format!("Rename of {} to {} failed", from, to)).await;
            }
        }
        Ok(())
    }

    fn requires_param(&self) -> bool {
        true
    }
}
