//! The RFC 959 list (`LIST`) command.

use async_trait::async_trait;
use std::io;
use tokio::io::AsyncWriteExt;

use super::CommandHandler;
use crate::driver::format_list_line;
use crate::server::{path::join_path, reply::ReplyCode, Session};

/// Sends a long-form directory listing over the data channel. Ownership
/// and mode columns come from the permission provider.
#[derive(Debug)]
pub struct List;

#[async_trait]
impl CommandHandler for List {
    async fn execute(&self, sess: &mut Session, param: &str) -> io::Result<()> {
        let path = sess.build_path(param);
        let ctx = sess.context("LIST", param);
        let driver = sess.server().driver.clone();
        let perm = sess.server().perm.clone();

        // Collect the listing before the data channel opens so driver
        // failures surface as a clean 550.
        let mut lines: Vec<String> = Vec::new();
        let listed = driver
            .list_dir(&ctx, &path, &mut |info| {
                let entry_path = join_path(&path, info.name());
                let owner = perm.get_owner(&entry_path).unwrap_or_default();
                let group = perm.get_group(&entry_path).unwrap_or_default();
                let mode = perm.get_mode(&entry_path).unwrap_or(0o755);
                lines.push(format_list_line(info, &owner, &group, mode));
                Ok(())
            })
            .await;
        if listed.is_err() {
            sess.write_message(ReplyCode::FileError, &format!("Could not list {}", path)).await;
            return Ok(());
        }

        send_listing(sess, lines, "Opening ASCII mode data connection for file list").await
    }
}

// Shared by LIST, NLST and MLSD: push the collected lines through the data
// channel and close it.
pub(super) async fn send_listing(sess: &mut Session, lines: Vec<String>, opening: &str) -> io::Result<()> {
    let Some(mut socket) = sess.require_data_conn().await else {
        return Ok(());
    };
    sess.write_message(ReplyCode::FileStatusOkay, opening).await;

    let payload: String = lines.iter().map(|line| format!("{}\r\n", line)).collect();
    let sent = payload.len();
    match socket.write_all(payload.as_bytes()).await {
        Ok(()) => {
            let _ = socket.shutdown().await;
            sess.write_message(ReplyCode::ClosingDataConnection, &format!("Closing data connection, sent {} bytes", sent))
                .await;
        }
        Err(_) => {
            sess.write_message(ReplyCode::ConnectionClosed, "Connection closed; transfer aborted").await;
        }
    }
    Ok(())
}
