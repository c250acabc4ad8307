//! The RFC 2428 extended active mode (`EPRT`) command.

use async_trait::async_trait;
use std::{io, net::IpAddr};
use tokio::net::TcpStream;

use super::CommandHandler;
use crate::server::{datachan::DataChannel, reply::ReplyCode, Session};

/// Extended PORT: `|proto|addr|port|` with protocol 1 for IPv4 and 2 for
/// IPv6.
#[derive(Debug)]
pub struct Eprt;

enum ParseOutcome {
    Parsed(IpAddr, u16),
    BadProtocol,
    Malformed,
}

fn parse_eprt_param(param: &str) -> ParseOutcome {
    let param = param.trim();
    let Some(delim) = param.chars().next() else {
        return ParseOutcome::Malformed;
    };
    let fields: Vec<&str> = param.split(delim).collect();
    // Splitting "|2|::1|2121|" yields empty fields at both ends.
    if fields.len() != 5 {
        return ParseOutcome::Malformed;
    }
    let (proto, addr, port) = (fields[1], fields[2], fields[3]);
    let Ok(port) = port.parse::<u16>() else {
        return ParseOutcome::Malformed;
    };
    let ip: IpAddr = match (proto, addr.parse()) {
        ("1", Ok(ip @ IpAddr::V4(_))) | ("2", Ok(ip @ IpAddr::V6(_))) => ip,
        ("1", _) | ("2", _) => return ParseOutcome::Malformed,
        _ => return ParseOutcome::BadProtocol,
    };
    ParseOutcome::Parsed(ip, port)
}

#[async_trait]
impl CommandHandler for Eprt {
    async fn execute(&self, sess: &mut Session, param: &str) -> io::Result<()> {
        let (ip, port) = match parse_eprt_param(param) {
            ParseOutcome::Parsed(ip, port) => (ip, port),
            ParseOutcome::BadProtocol => {
                sess.write_message(ReplyCode::UnsupportedNetworkProtocol, "Network protocol not supported, use (1,2)")
                    .await;
                return Ok(());
            }
            ParseOutcome::Malformed => {
                sess.write_message(ReplyCode::ParameterSyntaxError, "Invalid EPRT parameter").await;
                return Ok(());
            }
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

    fn is_extension(&self) -> bool {
        true
    }

    fn requires_param(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_v4_and_v6_forms() {
        match parse_eprt_param("|1|132.235.1.2|6275|") {
            ParseOutcome::Parsed(ip, port) => {
                assert_eq!(ip, "132.235.1.2".parse::<IpAddr>().unwrap());
                assert_eq!(port, 6275);
            }
            _ => panic!("expected a parsed v4 address"),
        }
        match parse_eprt_param("|2|::1|2121|") {
            ParseOutcome::Parsed(ip, port) => {
                assert_eq!(ip, "::1".parse::<IpAddr>().unwrap());
                assert_eq!(port, 2121);
            }
            _ => panic!("expected a parsed v6 address"),
        }
    }

    #[test]
    fn rejects_unknown_protocols_and_garbage() {
        assert!(matches!(parse_eprt_param("|3|1.2.3.4|80|"), ParseOutcome::BadProtocol));
        assert!(matches!(parse_eprt_param("|1|::1|80|"), ParseOutcome::Malformed));
        assert!(matches!(parse_eprt_param("|1|1.2.3.4|"), ParseOutcome::Malformed));
        assert!(matches!(parse_eprt_param(""), ParseOutcome::Malformed));
    }
}
