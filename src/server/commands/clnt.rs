//! The client name (`CLNT`) extension command.

use async_trait::async_trait;
use std::io;

use super::CommandHandler;
use crate::server::{reply::ReplyCode, Session};

/// Records the client software string announced by the client.
#[derive(Debug)]
pub struct Clnt;

#[async_trait]
impl CommandHandler for Clnt {
    async fn execute(&self, sess: &mut Session, param: &str) -> io::Result<()> {
        sess.client_soft = param.to_string();
        sess.write_message(ReplyCode::CommandOkay, "OK").await;
        Ok(())
    }

    fn is_extension(&self) -> bool {
        true
    }

    fn requires_param(&self) -> bool {
        true
    }

    fn requires_auth(&self) -> bool {
        false
    }
}
