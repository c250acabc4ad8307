//! The RFC 3659 modification time (`MDTM`) command.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::io;

use super::CommandHandler;
use crate::server::{reply::ReplyCode, Session};

/// Reports the last modification time of an entry as `YYYYMMDDHHMMSS` in
/// UTC.
#[derive(Debug)]
pub struct Mdtm;

#[async_trait]
impl CommandHandler for Mdtm {
    async fn execute(&self, sess: &mut Session, param: &str) -> io::Result<()> {
        let path = sess.build_path(param);
        let ctx = sess.context("MDTM", param);
        let driver = sess.server().driver.clone();
        match driver.stat(&ctx, &path).await {
            Ok(info) => {
                let modified: DateTime<Utc> = info.modified().into();
                sess.write_message(ReplyCode::FileStatus, &modified.format("%Y%m%d%H%M%S").to_string()).await;
            }
            Err(_) => {
                sess.write_message(ReplyCode::FileError, "Could not get file modification time").await;
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
