//! The RFC 2389 feature negotiation (`FEAT`) command.

use async_trait::async_trait;
use std::io;

use super::CommandHandler;
use crate::server::{reply::ReplyCode, Session};

/// Replies with the feature list precomputed at server construction from
/// the registry's extension entries.
#[derive(Debug)]
pub struct Feat;

#[async_trait]
impl CommandHandler for Feat {
    async fn execute(&self, sess: &mut Session, _param: &str) -> io::Result<()> {
        let feats = sess.server().feats.clone();
        sess.write_multiline(ReplyCode::SystemStatus, &feats).await;
        Ok(())
    }

    fn requires_auth(&self) -> bool {
        false
    }
}
