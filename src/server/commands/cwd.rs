//! The RFC 959 change working directory (`CWD`/`XCWD`) command.

use async_trait::async_trait;
use std::io;

use super::CommandHandler;
use crate::notifier::Notifier;
use crate::server::{reply::ReplyCode, Session};

/// Changes the working directory after verifying the target is a
/// directory the driver knows about.
#[derive(Debug)]
pub struct Cwd;

#[async_trait]
impl CommandHandler for Cwd {
    async fn execute(&self, sess: &mut Session, param: &str) -> io::Result<()> {
        let path = sess.build_path(param);
        change_dir(sess, "CWD", param, path).await
    }

    fn requires_param(&self) -> bool {
        true
    }
}

// Shared by CWD and CDUP: verify, switch, notify, reply.
pub(super) async fn change_dir(sess: &mut Session, cmd: &str, param: &str, path: String) -> io::Result<()> {
    let ctx = sess.context(cmd, param);
    let notifiers = sess.server().notifiers.clone();
    let driver = sess.server().driver.clone();
    let old_dir = sess.cur_dir().to_string();

    notifiers.before_change_cur_dir(&ctx, &old_dir, &path).await;

    let checked = match driver.stat(&ctx, &path).await {
        Ok(info) if info.is_dir() => Ok(()),
        Ok(_) => Err(io::Error::new(io::ErrorKind::InvalidInput, format!("not a directory: {}", path))),
        Err(err) => Err(err),
    };

    match checked {
        Ok(()) => {
            sess.cur_dir = path.clone();
            notifiers.after_cur_dir_changed(&ctx, &old_dir, &path, None).await;
            sess.write_message(ReplyCode::FileActionOkay, &format!("Directory changed to {}", path)).await;
        }
        Err(err) => {
            notifiers.after_cur_dir_changed(&ctx, &old_dir, &path, Some(&err)).await;
            sess.write_message(ReplyCode::FileError, &format!("Directory change to {} failed", path)).await;
        }
    }
    Ok(())
}
