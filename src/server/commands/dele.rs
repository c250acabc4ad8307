//! The RFC 959 delete file (`DELE`) command.

use async_trait::async_trait;
use std::io;

use super::CommandHandler;
use crate::notifier::Notifier;
use crate::server::{reply::ReplyCode, Session};

/// Deletes a file through the driver, bracketed by the file deletion
/// hooks.
#[derive(Debug)]
pub struct Dele;

#[async_trait]
impl CommandHandler for Dele {
    async fn execute(&self, sess: &mut Session, param: &str) -> io::Result<()> {
        let path = sess.build_path(param);
        let ctx = sess.context("DELE", param);
        let notifiers = sess.server().notifiers.clone();
        let driver = sess.server().driver.clone();

        notifiers.before_delete_file(&ctx, &path).await;
        match driver.delete_file(&ctx, &path).await {
            Ok(()) => {
                notifiers.after_file_deleted(&ctx, &path, None).await;
                sess.write_message(ReplyCode::FileActionOkay, "File deleted").await;
            }
            Err(err) => {
                notifiers.after_file_deleted(&ctx, &path, Some(&err)).await;
                sess.write_message(ReplyCode::FileError, &format!("File delete of {} failed", path)).await;
            }
        }
        Ok(())
    }

    fn requires_param(&self) -> bool {
        true
    }
}
