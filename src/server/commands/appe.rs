//! The RFC 959 append (`APPE`) command.

use async_trait::async_trait;
use std::io;

use super::{stor::receive_file, CommandHandler};
use crate::server::Session;

/// Like STOR, but writes at the end of an existing file. A missing target
/// degrades to a plain store.
#[derive(Debug)]
pub struct Appe;

#[async_trait]
impl CommandHandler for Appe {
    async fn execute(&self, sess: &mut Session, param: &str) -> io::Result<()> {
        let path = sess.build_path(param);
        let ctx = sess.context("APPE", param);
        let driver = sess.server().driver.clone();
        let offset = match driver.stat(&ctx, &path).await {
            Ok(info) if !info.is_dir() => info.size() as i64,
            _ => -1,
        };
        receive_file(sess, "APPE", param, path, offset, "Data transfer starting".to_string()).await
    }

    fn requires_param(&self) -> bool {
        true
    }
}
