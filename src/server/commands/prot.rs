//! The RFC 2228 data channel protection level (`PROT`) command.

use async_trait::async_trait;
use std::io;

use super::CommandHandler;
use crate::server::{reply::ReplyCode, Session};

/// Switches the data channel between clear and private. Private requires a
/// TLS control channel and a preceding PBSZ.
#[derive(Debug)]
pub struct Prot;

#[async_trait]
impl CommandHandler for Prot {
    async fn execute(&self, sess: &mut Session, param: &str) -> io::Result<()> {
        if !sess.pbsz_done {
            sess.write_message(ReplyCode::BadCommandSequence, "PBSZ must precede PROT").await;
            return Ok(());
        }
        match param.to_ascii_uppercase().as_str() {
            "P" if sess.is_tls() => {
                sess.prot_private = true;
                sess.write_message(ReplyCode::CommandOkay, "OK").await;
            }
            "P" => {
                sess.write_message(ReplyCode::PolicyRequiresTls, "TLS required for PROT P").await;
            }
            "C" => {
                sess.prot_private = false;
                sess.write_message(ReplyCode::CommandOkay, "OK").await;
            }
            _ => {
                sess.write_message(ReplyCode::PolicyRequiresTls, "Only P or C protection level is supported").await;
            }
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
