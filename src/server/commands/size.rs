//! The RFC 3659 file size (`SIZE`) command.

use async_trait::async_trait;
use std::io;

use super::CommandHandler;
use crate::server::{reply::ReplyCode, Session};

/// Reports the size of a file in bytes.
#[derive(Debug)]
pub struct Size;

#[async_trait]
impl CommandHandler for Size {
    async fn execute(&self, sess: &mut Session, param: &str) -> io::Result<()> {
        let path = sess.build_path(param);
        let ctx = sess.context("SIZE", param);
        let driver = sess.server().driver.clone();
        match driver.stat(&ctx, &path).await {
            Ok(info) if !info.is_dir() => {
                sess.write_message(ReplyCode::FileStatus, &info.size().to_string()).await;
            }
            Ok(_) => {
                sess.write_message(ReplyCode::FileError, &format!("{} is a directory", path)).await;
            }
            Err(_) => {
                sess.write_message(ReplyCode::FileError, "Could not get file size").await;
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
