//! Setup options for [`Server::new`](crate::Server::new).

use std::{collections::HashMap, fmt, sync::Arc, time::Duration};

use super::{commands::CommandHandler, datachan::BoxStream};
use crate::{auth::Authenticator, driver::Driver, logger::Logger, perm::Perm};

pub(crate) const DEFAULT_NAME: &str = "ftpkit";
pub(crate) const DEFAULT_HOSTNAME: &str = "::";
pub(crate) const DEFAULT_PORT: u16 = 2121;
pub(crate) const DEFAULT_WELCOME_MESSAGE: &str = "Welcome to the ftpkit FTP server";
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Wraps the raw control connection before the session starts using it,
/// for example to install proxy-protocol parsing.
pub type ConnCallback = Box<dyn Fn(BoxStream) -> BoxStream + Send + Sync>;

/// Parameters for [`Server::new`](crate::Server::new).
///
/// `driver` and `perm` are required; everything else has a default, so
/// construction usually looks like
/// `Options { driver: Some(...), perm: Some(...), ..Options::default() }`.
pub struct Options {
    /// The file system backing the server. Required.
    pub driver: Option<Arc<dyn Driver>>,
    /// Validates USER/PASS logins. Without one, every login is rejected.
    pub auth: Option<Arc<dyn Authenticator>>,
    /// Supplies ownership and mode information for listings. Required.
    pub perm: Option<Arc<dyn Perm>>,
    /// Receives per-session protocol logs. Defaults to [`crate::logger::StdLogger`].
    pub logger: Option<Arc<dyn Logger>>,
    /// The supported command set. Defaults to
    /// [`default_commands`](crate::server::default_commands), and may be
    /// given explicitly to override or extend individual verbs.
    pub commands: Option<HashMap<String, Arc<dyn CommandHandler>>>,
    /// The server name reported by STAT.
    pub name: String,
    /// The host name to listen on. Defaults to `::`, meaning all
    /// addresses over IPv4 and IPv6.
    pub hostname: String,
    /// The public IP advertised in PASV replies. When empty, the control
    /// socket's local address is advertised.
    pub public_ip: String,
    /// Passive port range in `"min-max"` form, both bounds inclusive.
    /// Empty means the OS chooses.
    pub passive_ports: String,
    /// Path of the PEM certificate chain, required when `tls` is set.
    pub cert_file: String,
    /// Path of the PEM private key, required when `tls` is set.
    pub key_file: String,
    /// The greeting sent in the 220 reply on connect.
    pub welcome_message: String,
    /// The port to listen on. Defaults to 2121.
    pub port: u16,
    /// Data channel rate limit in bytes per second per session; 0 means
    /// unlimited.
    pub rate_limit: i64,
    /// Bounds the total length of a session. Defaults to 60 seconds; zero
    /// means no deadline.
    pub timeout: Duration,
    /// Enables TLS.
    pub tls: bool,
    /// With `tls`, listen in cleartext and negotiate TLS per session via
    /// AUTH TLS (RFC 4217). Without it, the listener itself is TLS
    /// (implicit FTPS).
    pub explicit_ftps: bool,
    /// Refuse every command on a plaintext control channel except
    /// `AUTH TLS`.
    pub force_tls: bool,
    /// Wraps each accepted control connection before use.
    pub conn_callback: Option<ConnCallback>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            driver: None,
            auth: None,
            perm: None,
            logger: None,
            commands: None,
            name: DEFAULT_NAME.to_string(),
            hostname: DEFAULT_HOSTNAME.to_string(),
            public_ip: String::new(),
            passive_ports: String::new(),
            cert_file: String::new(),
            key_file: String::new(),
            welcome_message: DEFAULT_WELCOME_MESSAGE.to_string(),
            port: DEFAULT_PORT,
            rate_limit: 0,
            timeout: DEFAULT_TIMEOUT,
            tls: false,
            explicit_ftps: false,
            force_tls: false,
            conn_callback: None,
        }
    }
}

impl Options {
    // Fills in defaults for fields explicitly set to their zero value.
    pub(crate) fn normalize(&mut self) {
        if self.name.is_empty() {
            self.name = DEFAULT_NAME.to_string();
        }
        if self.hostname.is_empty() {
            self.hostname = DEFAULT_HOSTNAME.to_string();
        }
        if self.welcome_message.is_empty() {
            self.welcome_message = DEFAULT_WELCOME_MESSAGE.to_string();
        }
        if self.port == 0 {
            self.port = DEFAULT_PORT;
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("name", &self.name)
            .field("hostname", &self.hostname)
            .field("public_ip", &self.public_ip)
            .field("passive_ports", &self.passive_ports)
            .field("port", &self.port)
            .field("rate_limit", &self.rate_limit)
            .field("timeout", &self.timeout)
            .field("tls", &self.tls)
            .field("explicit_ftps", &self.explicit_ftps)
            .field("force_tls", &self.force_tls)
            .finish_non_exhaustive()
    }
}
