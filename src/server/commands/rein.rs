//! The RFC 959 reinitialize (`REIN`) command.

use async_trait::async_trait;
use std::io;

use super::CommandHandler;
use crate::server::{reply::ReplyCode, Session};

/// Drops the authentication state and returns the session to the state it
/// had right after the greeting.
#[derive(Debug)]
pub struct Rein;

#[async_trait]
impl CommandHandler for Rein {
    async fn execute(&self, sess: &mut Session, _param: &str) -> io::Result<()> {
        sess.user.clear();
        sess.req_user.clear();
        sess.rename_from.clear();
        sess.last_file_pos = -1;
        sess.data_conn = None;
        sess.write_message(ReplyCode::ServiceReady, "Service ready for new user").await;
        Ok(())
    }

    fn requires_auth(&self) -> bool {
        false
    }
}
