//! The RFC 959 rename-from (`RNFR`) command.

use async_trait::async_trait;
use std::io;

use super::CommandHandler;
use crate::server::{reply::ReplyCode, Session};

/// Stores the rename source; the following RNTO consumes it.
#[derive(Debug)]
pub struct Rnfr;

#[async_trait]
impl CommandHandler for Rnfr {
    async fn execute(&self, sess: &mut Session, param: &str) -> io::Result<()> {
        sess.rename_from = sess.build_path(param);
        sess.write_message(ReplyCode::FileActionPending, "Requested file action pending further information")
            .await;
        Ok(())
    }

    fn requires_param(&self) -> bool {
        true
    }
}
