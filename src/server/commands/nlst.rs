//! The RFC 959 name list (`NLST`) command.

use async_trait::async_trait;
use std::io;

use super::{list::send_listing, CommandHandler};
use crate::server::{reply::ReplyCode, Session};

/// Sends the bare entry names of a directory over the data channel.
#[derive(Debug)]
pub struct Nlst;

#[async_trait]
impl CommandHandler for Nlst {
    async fn execute(&self, sess: &mut Session, param: &str) -> io::Result<()> {
        let path = sess.build_path(param);
        let ctx = sess.context("NLST", param);
        let driver = sess.server().driver.clone();

        let mut names: Vec<String> = Vec::new();
        let listed = driver
            .list_dir(&ctx, &path, &mut |info| {
                names.push(info.name().to_string());
                Ok(())
            })
            .await;
        if listed.is_err() {
            sess.write_message(ReplyCode::FileError, &format!("Could not list {}", path)).await;
            return Ok(());
        }

        send_listing(sess, names, "Opening ASCII mode data connection for file list").await
    }
}
