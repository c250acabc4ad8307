//! The RFC 959 user name (`USER`) command.

use async_trait::async_trait;
use std::io;

use super::CommandHandler;
use crate::server::{reply::ReplyCode, Session};

/// Records the requested user name; authentication happens on PASS.
#[derive(Debug)]
pub struct User;

#[async_trait]
impl CommandHandler for User {
    async fn execute(&self, sess: &mut Session, param: &str) -> io::Result<()> {
        sess.req_user = param.to_string();
        sess.write_message(ReplyCode::NeedPassword, "User name ok, password required").await;
        Ok(())
    }

    fn requires_param(&self) -> bool {
        true
    }

    fn requires_auth(&self) -> bool {
        false
    }
}
