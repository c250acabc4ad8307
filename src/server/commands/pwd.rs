//! The RFC 959 print working directory (`PWD`/`XPWD`) command.

use async_trait::async_trait;
use std::io;

use super::CommandHandler;
use crate::server::{reply::ReplyCode, Session};

/// Reports the session's current working directory.
#[derive(Debug)]
pub struct Pwd;

#[async_trait]
impl CommandHandler for Pwd {
    async fn execute(&self, sess: &mut Session, _param: &str) -> io::Result<()> {
        let message = format!("\"{}\" is the current directory", sess.cur_dir());
        sess.write_message(ReplyCode::DirCreated, &message).await;
        Ok(())
    }
}
