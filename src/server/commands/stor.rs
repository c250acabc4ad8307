//! The RFC 959 store (`STOR`) command.

use async_trait::async_trait;
use std::io;

use super::CommandHandler;
use crate::notifier::Notifier;
use crate::server::{
    datachan::is_connection_error,
    reply::ReplyCode,
    Session,
};

/// Receives a file from the client over the data channel. A pending REST
/// offset makes the driver write from that position; without one the file
/// is truncated first.
#[derive(Debug)]
pub struct Stor;

#[async_trait]
impl CommandHandler for Stor {
    async fn execute(&self, sess: &mut Session, param: &str) -> io::Result<()> {
        let path = sess.build_path(param);
        let offset = sess.take_file_pos();
        receive_file(sess, "STOR", param, path, offset, "Data transfer starting".to_string()).await
    }

    fn requires_param(&self) -> bool {
        true
    }
}

// Shared receive path for STOR, APPE and STOU; they differ only in target
// path and write offset.
pub(super) async fn receive_file(sess: &mut Session, cmd: &str, param: &str, path: String, offset: i64, opening: String) -> io::Result<()> {
    let ctx = sess.context(cmd, param);
    let notifiers = sess.server().notifiers.clone();
    let driver = sess.server().driver.clone();

    notifiers.before_put_file(&ctx, &path).await;

    let Some(mut socket) = sess.require_data_conn().await else {
        return Ok(());
    };
    sess.write_message(ReplyCode::FileStatusOkay, &opening).await;

    match driver.put_file(&ctx, &path, &mut socket, offset).await {
        Ok(received) => {
            notifiers.after_file_put(&ctx, &path, received, None).await;
            sess.write_message(ReplyCode::ClosingDataConnection, &format!("OK, received {} bytes", received)).await;
        }
        Err(err) => {
            let aborted = is_connection_error(&err);
            notifiers.after_file_put(&ctx, &path, 0, Some(&err)).await;
            if aborted {
                sess.write_message(ReplyCode::ConnectionClosed, "Connection closed; transfer aborted").await;
            } else {
                sess.write_message(ReplyCode::FileError, &format!("Error during transfer: {}", err)).await;
            }
        }
    }
    Ok(())
}
