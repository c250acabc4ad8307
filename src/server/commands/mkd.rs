//! The RFC 959 make directory (`MKD`/`XMKD`) command.

use async_trait::async_trait;
use std::io;

use super::CommandHandler;
use crate::notifier::Notifier;
use crate::server::{reply::ReplyCode, Session};

/// Creates a directory through the driver, bracketed by the directory
/// creation hooks.
#[derive(Debug)]
pub struct Mkd;

#[async_trait]
impl CommandHandler for Mkd {
    async fn execute(&self, sess: &mut Session, param: &str) -> io::Result<()> {
        let path = sess.build_path(param);
        let ctx = sess.context("MKD", param);
        let notifiers = sess.server().notifiers.clone();
        let driver = sess.server().driver.clone();

        notifiers.before_create_dir(&ctx, &path).await;
        match driver.make_dir(&ctx, &path).await {
            Ok(()) => {
                notifiers.after_dir_created(&ctx, &path, None).await;
                sess.write_message(ReplyCode::DirCreated, "Directory created").await;
            }
            Err(err) => {
                notifiers.after_dir_created(&ctx, &path, Some(&err)).await;
                sess.write_message(ReplyCode::FileError, &format!("Create directory {} failed", path)).await;
            }
        }
        Ok(())
    }

    fn requires_param(&self) -> bool {
        true
    }
}
