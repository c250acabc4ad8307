//! The RFC 959 active mode (`PORT`) command.

use async_trait::async_trait;
use std::{io, net::Ipv4Addr};
use tokio::net::TcpStream;

use super::CommandHandler;
use crate::server::{datachan::DataChannel, reply::ReplyCode, Session};

/// Dials back to the client-announced address and parks the connection in
/// the session's data channel slot.
#[derive(Debug)]
pub struct Port;

// The parameter is six comma separated byte values: four address octets
// followed by the port split into high and low byte.
fn parse_port_param(param: &str) -> Option<(Ipv4Addr, u16)> {
    let mut numbers = [0u8; 6];
    let mut count = 0;
    for part in param.split(',') {
        if count == 6 {
            return None;
        }
        numbers[count] = part.trim().parse().ok()?;
        count += 1;
    }
    if count != 6 {
        return None;
    }
    let ip = Ipv4Addr::new(numbers[0], numbers[1], numbers[2], numbers[3]);
    let port = u16::from(numbers[4]) << 8 | u16::from(numbers[5]);
    Some((ip, port))
}

#[async_trait]
impl CommandHandler for Port {
    async fn execute(&self, sess: &mut Session, param: &str) -> io::Result<()> {
        let Some((ip, port)) = parse_port_param(param) else {
            sess.write_message(ReplyCode::ParameterSyntaxError, "Invalid PORT parameter").await;
            return Ok(());
        };

        match tokio::time::timeout(sess.remaining_time(), TcpStream::connect((ip, port))).await {
            Ok(Ok(stream)) => {
                sess.set_data_channel(DataChannel::Active(stream));
                sess.write_message(ReplyCode::CommandOkay, &format!("Connection established ({})", port)).await;
            }
            Ok(Err(_)) | Err(_) => {
                sess.write_message(ReplyCode::CantOpenDataConnection, "Can't open data connection").await;
            }
        }
        Ok(())
    }

    fn requires_param(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_the_classic_tuple() {
        assert_eq!(parse_port_param("127,0,0,1,7,208"), Some((Ipv4Addr::new(127, 0, 0, 1), 2000)));
        assert_eq!(parse_port_param("10,0,0,2,0,21"), Some((Ipv4Addr::new(10, 0, 0, 2), 21)));
    }

    #[test]
    fn rejects_malformed_tuples() {
        assert_eq!(parse_port_param(""), None);
        assert_eq!(parse_port_param("127,0,0,1,7"), None);
        assert_eq!(parse_port_param("127,0,0,1,7,208,9"), None);
        assert_eq!(parse_port_param("127,0,0,1,7,999"), None);
        assert_eq!(parse_port_param("a,b,c,d,e,f"), None);
    }
}
