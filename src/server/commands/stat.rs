//! The RFC 959 status (`STAT`) command.

use async_trait::async_trait;
use std::io;

use super::CommandHandler;
use crate::driver::format_list_line;
use crate::server::{reply::ReplyCode, Session};

/// Without a parameter, reports the server status over the control
/// channel. With a parameter, reports the named entry the way LIST would.
#[derive(Debug)]
pub struct Stat;

#[async_trait]
impl CommandHandler for Stat {
    async fn execute(&self, sess: &mut Session, param: &str) -> io::Result<()> {
        if param.is_empty() {
            let body = format!(
                "{} FTP server status:\n Version {}\n Logged in as {}\n",
                sess.server().opts.name,
                crate::VERSION,
                sess.login_user(),
            );
            sess.write_multiline(ReplyCode::SystemStatus, &body).await;
            return Ok(());
        }

        let path = sess.build_path(param);
        let ctx = sess.context("STAT", param);
        let driver = sess.server().driver.clone();
        let perm = sess.server().perm.clone();
        match driver.stat(&ctx, &path).await {
            Ok(info) => {
                let owner = perm.get_owner(&path).unwrap_or_default();
                let group = perm.get_group(&path).unwrap_or_default();
                let mode = perm.get_mode(&path).unwrap_or(0o755);
                let body = format!("Status of {}:\n {}\n", path, format_list_line(info.as_ref(), &owner, &group, mode));
                sess.write_multiline(ReplyCode::SystemStatus, &body).await;
            }
            Err(_) => {
                sess.write_message(ReplyCode::FileError, &format!("Could not get status of {}", path)).await;
            }
        }
        Ok(())
    }
}
