//! The RFC 2228 protection buffer size (`PBSZ`) command.

use async_trait::async_trait;
use std::io;

use super::CommandHandler;
use crate::server::{reply::ReplyCode, Session};

/// TLS needs no protection buffer, so the only accepted size is 0. PBSZ
/// must precede PROT.
#[derive(Debug)]
pub struct Pbsz;

#[async_trait]
impl CommandHandler for Pbsz {
    async fn execute(&self, sess: &mut Session, param: &str) -> io::Result<()> {
        if !sess.is_tls() {
            sess.write_message(ReplyCode::BadCommandSequence, "PBSZ not allowed on insecure control connection")
                .await;
        } else if param == "0" {
            sess.pbsz_done = true;
            sess.write_message(ReplyCode::CommandOkay, "OK").await;
        } else {
            sess.write_message(ReplyCode::ParameterSyntaxError, "PBSZ must be 0").await;
        }
        Ok(())
    }

    fn requires_param(&self) -> bool {
        true
    }

    fn requires_auth(&self) -> bool {
        false
    }
}
