//! The RFC 959 system type (`SYST`) command.

use async_trait::async_trait;
use std::io;

use super::CommandHandler;
use crate::server::{reply::ReplyCode, Session};

/// Reports the canonical unix system type; clients key their listing
/// parsers off this.
#[derive(Debug)]
pub struct Syst;

#[async_trait]
impl CommandHandler for Syst {
    async fn execute(&self, sess: &mut Session, _param: &str) -> io::Result<()> {
        sess.write_message(ReplyCode::SystemType, "UNIX Type: L8").await;
        Ok(())
    }
}
