//! The RFC 959 passive mode (`PASV`) command.

use async_trait::async_trait;
use std::{io, net::Ipv4Addr};

use super::CommandHandler;
use crate::server::{
    datachan::{bind_passive, parse_port_range, DataChannel},
    reply::ReplyCode,
    Session,
};

/// Binds a listener for the client to dial and advertises it in the
/// classic `(h1,h2,h3,h4,p1,p2)` form. The connection is accepted when a
/// transfer command consumes the slot.
#[derive(Debug)]
pub struct Pasv;

#[async_trait]
impl CommandHandler for Pasv {
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

        // PASV can only carry an IPv4 address.
        let advertised = sess.passive_listen_ip();
        let Ok(ip) = advertised.parse::<Ipv4Addr>() else {
            sess.write_message(ReplyCode::CantOpenDataConnection, "Data connection unavailable").await;
            return Ok(());
        };

        sess.set_data_channel(DataChannel::Passive(listener));
        let octets = ip.octets();
        let message = format!(
            "Entering Passive Mode ({},{},{},{},{},{})",
            octets[0],
            octets[1],
            octets[2],
            octets[3],
            port >> 8,
            port & 0xff,
        );
        sess.write_message(ReplyCode::EnteringPassiveMode, &message).await;
        Ok(())
    }
}
