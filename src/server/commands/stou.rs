//! The RFC 959 store unique (`STOU`) command.

use async_trait::async_trait;
use std::io;

use super::{stor::receive_file, CommandHandler};
use crate::server::Session;

/// Stores under a server-chosen name that cannot collide: the unix time
/// joined with a random hex suffix. The name is announced in the opening
/// 150 reply.
#[derive(Debug)]
pub struct Stou;

fn unique_name() -> String {
    format!("{}.{:08x}", chrono::Utc::now().timestamp(), rand::random::<u32>())
}

#[async_trait]
impl CommandHandler for Stou {
    async fn execute(&self, sess: &mut Session, _param: &str) -> io::Result<()> {
        let name = unique_name();
        let path = sess.build_path(&name);
        receive_file(sess, "STOU", "", path, -1, format!("FILE: {}", name)).await
    }
}
