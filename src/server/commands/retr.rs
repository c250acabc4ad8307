//! The RFC 959 retrieve (`RETR`) command.

use async_trait::async_trait;
use std::io;
use tokio::io::AsyncWriteExt;

use super::CommandHandler;
use crate::notifier::Notifier;
use crate::server::{reply::ReplyCode, Session};

/// Sends a file to the client over the data channel, honouring a pending
/// REST offset.
#[derive(Debug)]
pub struct Retr;

#[async_trait]
impl CommandHandler for Retr {
    async fn execute(&self, sess: &mut Session, param: &str) -> io::Result<()> {
        let path = sess.build_path(param);
        let ctx = sess.context("RETR", param);
        let notifiers = sess.server().notifiers.clone();
        let driver = sess.server().driver.clone();
        let offset = sess.take_file_pos().max(0);

        notifiers.before_download_file(&ctx, &path).await;

        let (remaining, mut stream) = match driver.get_file(&ctx, &path, offset).await {
            Ok(opened) => opened,
            Err(err) => {
                notifiers.after_file_downloaded(&ctx, &path, 0, Some(&err)).await;
                sess.write_message(ReplyCode::FileError, &format!("Could not open {} for reading", path)).await;
                return Ok(());
            }
        };

        let Some(mut socket) = sess.require_data_conn().await else {
            return Ok(());
        };
        sess.write_message(ReplyCode::FileStatusOkay, &format!("Data transfer starting {} bytes", remaining))
            .await;

        match tokio::io::copy(&mut stream, &mut socket).await {
            Ok(sent) => {
                let _ = socket.shutdown().await;
                notifiers.after_file_downloaded(&ctx, &path, sent as i64, None).await;
                sess.write_message(ReplyCode::ClosingDataConnection, &format!("Closing data connection, sent {} bytes", sent))
                    .await;
            }
            Err(err) => {
                notifiers.after_file_downloaded(&ctx, &path, 0, Some(&err)).await;
                sess.write_message(ReplyCode::ConnectionClosed, "Connection closed; transfer aborted").await;
            }
        }
        Ok(())
    }

    fn requires_param(&self) -> bool {
        true
    }
}
