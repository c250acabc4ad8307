//! The RFC 2428 extended passive mode (`EPSV`) command.

use async_trait::async_trait;
use std::io;

use super::CommandHandler;
use crate::server::{
    datachan::{bind_passive, parse_port_range, DataChannel},
    reply::ReplyCode,
    Session,
};

/// Like PASV, but the reply carries only the port, which works for IPv6
/// control connections too.
#[derive(Debug)]
pub struct Epsv;

#[async_trait]
impl CommandHandler for Epsv {
    async fn execute(&self, sess: &mut Session, _param: &str) -> io::Result<()> {
        let range = parse_port_range(&sess.server().opts.passive_ports);
        let listener = match bind_passive(sess.local_addr().ip(), range).await {
            Ok(listener) => listener,
            Err(_) => {
                sess.write_message(ReplyCode::CantOpenDataConnection, "Can't open data connection").await;
                return Ok(());
            }
        };
        let port = match listener.local_addr() {
            Ok(addr) => addr.port(),
            Err(_) => {
                sess.write_message(ReplyCode::CantOpenDataConnection, "Can't open data connection").await;
                return Ok(());
            }
        };

        sess.set_data_channel(DataChannel::Passive(listener));
        sess.write_message(ReplyCode::EnteringExtendedPassiveMode, &format!("Entering Extended Passive Mode (|||{}|)", port))
            .await;
        Ok(())
    }

    fn is_extension(&self) -> bool {
        true
    }
}
