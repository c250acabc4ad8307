//! The RFC 4217 security mechanism (`AUTH`) command.

use async_trait::async_trait;
use std::io;

use super::CommandHandler;
use crate::server::{reply::ReplyCode, Session};

/// Upgrades the plaintext control channel to TLS. The `234` reply must be
/// flushed before the handshake starts or clients deadlock waiting for it.
#[derive(Debug)]
pub struct Auth;

#[async_trait]
impl CommandHandler for Auth {
    async fn execute(&self, sess: &mut Session, param: &str) -> io::Result<()> {
        let mechanism = param.to_ascii_uppercase();
        if mechanism != "TLS" && mechanism != "SSL" {
            sess.write_message(ReplyCode::CommandNotImplementedForParameter, "Unsupported AUTH command").await;
            return Ok(());
        }
        if sess.server().tls_acceptor().is_none() {
            sess.write_message(ReplyCode::PolicyRequiresTls, "TLS not available").await;
            return Ok(());
        }
        if sess.is_tls() {
            sess.write_message(ReplyCode::BadCommandSequence, "Already using TLS").await;
            return Ok(());
        }

        sess.write_message(ReplyCode::AuthOkayNoDataNeeded, "AUTH command OK").await;
        if let Err(err) = sess.upgrade_to_tls().await {
            sess.log(&format!("TLS handshake failed: {}", err));
            sess.closed = true;
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
