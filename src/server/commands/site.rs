//! The RFC 959 site parameters (`SITE`) command.

use async_trait::async_trait;
use std::io;

use super::CommandHandler;
use crate::server::{reply::ReplyCode, Session};

/// Dispatches SITE subcommands. Only `SITE CHMOD <octal> <path>` does
/// anything, through the permission provider.
#[derive(Debug)]
pub struct Site;

#[async_trait]
impl CommandHandler for Site {
    async fn execute(&self, sess: &mut Session, param: &str) -> io::Result<()> {
        let (sub, rest) = match param.split_once(' ') {
            Some((sub, rest)) => (sub, rest.trim()),
            None => (param, ""),
        };

        if !sub.eq_ignore_ascii_case("CHMOD") {
            sess.write_message(ReplyCode::CommandOkayNotImplemented, "Command not implemented").await;
            return Ok(());
        }

        let Some((mode_str, target)) = rest.split_once(' ') else {
            sess.write_message(ReplyCode::ParameterSyntaxError, "SITE CHMOD requires a mode and a path").await;
            return Ok(());
        };
        let Ok(mode) = u32::from_str_radix(mode_str, 8) else {
            sess.write_message(ReplyCode::ParameterSyntaxError, "SITE CHMOD mode must be octal").await;
            return Ok(());
        };

        let path = sess.build_path(target.trim());
        let perm = sess.server().perm.clone();
        match perm.ch_mode(&path, mode) {
            Ok(()) => sess.write_message(ReplyCode::CommandOkay, "OK").await,
            Err(_) => {
                sess.write_message(ReplyCode::FileError, &format!("CHMOD of {} failed", path)).await;
            }
        }
        Ok(())
    }

    fn requires_param(&self) -> bool {
        true
    }
}
