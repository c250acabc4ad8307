//! The RFC 959 change to parent directory (`CDUP`/`XCUP`) command.

use async_trait::async_trait;
use std::io;

use super::{cwd::change_dir, CommandHandler};
use crate::server::Session;

/// Moves the working directory one level up, stopping at the root.
#[derive(Debug)]
pub struct Cdup;

#[async_trait]
impl CommandHandler for Cdup {
    async fn execute(&self, sess: &mut Session, _param: &str) -> io::Result<()> {
        let path = sess.build_path("..");
        change_dir(sess, "CDUP", "", path).await
    }
}
