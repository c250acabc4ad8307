//! The RFC 959 remove directory (`RMD`/`XRMD`) command.

use async_trait::async_trait;
use std::io;

use super::CommandHandler;
use crate::notifier::Notifier;
use crate::server::{reply::ReplyCode, Session};

/// Removes a directory through the driver, bracketed by the directory
/// deletion hooks.
#[derive(Debug)]
pub struct Rmd;

#[async_trait]
impl CommandHandler for Rmd {
    async fn execute(&self, sess: &mut Session, param: &str) -> io::Result<()> {
        let path = sess.build_path(param);
        let ctx = sess.context("RMD", param);
        let notifiers = sess.server().notifiers.clone();
        let driver = sess.server().driver.clone();

        notifiers.before_delete_dir(&ctx, &path).await;
        match driver.delete_dir(&ctx, &path).await {
            Ok(()) => {
                notifiers.after_dir_deleted(&ctx, &path, None).await;
                sess.write_message(ReplyCode::FileActionOkay, "Directory deleted").await;
            }
            Err(err) => {
                notifiers.after_dir_deleted(&ctx, &path, Some(&err)).await;
                sess.write_message(ReplyCode::FileError, &format!("Directory delete of {} failed", path)).await;
            }
        }
        Ok(())
    }

    fn requires_param(&self) -> bool {
        true
    }
}
