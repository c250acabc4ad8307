//! The FTP server: listener setup, session spawning and graceful
//! shutdown.

pub mod commands;
pub mod datachan;
mod error;
mod options;
pub(crate) mod path;
mod ratelimit;
pub mod reply;
mod session;
mod shutdown;
mod tls;

pub use self::{
    commands::{default_commands, CommandHandler, Registry},
    datachan::{AsyncStream, BoxStream, DataSocket},
    error::ServerError,
    options::{ConnCallback, Options},
    reply::ReplyCode,
    session::Session,
    tls::ConfigError,
};

use std::sync::{Arc, OnceLock};
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;

use crate::{
    auth::Authenticator,
    driver::Driver,
    logger::{Logger, StdLogger},
    notifier::{Notifier, NotifierList},
    perm::Perm,
};

/// The root of an FTP application: owns the configuration and spawns one
/// session task per accepted control connection.
///
/// Always construct through [`Server::new`]; wrap in an [`Arc`] to serve.
pub struct Server {
    pub(crate) opts: Options,
    pub(crate) driver: Arc<dyn Driver>,
    pub(crate) auth: Option<Arc<dyn Authenticator>>,
    pub(crate) perm: Arc<dyn Perm>,
    pub(crate) logger: Arc<dyn Logger>,
    pub(crate) commands: Registry,
    pub(crate) notifiers: NotifierList,
    pub(crate) feats: String,
    tls_config: OnceLock<Arc<rustls::ServerConfig>>,
    shutdown_topic: shutdown::Topic,
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("driver", &self.driver)
            .field("auth", &self.auth)
            .field("perm", &self.perm)
            .field("logger", &self.logger)
            .field("commands", &self.commands)
            .field("notifiers", &self.notifiers)
            .field("feats", &self.feats)
            .field("tls_config", &self.tls_config.get().is_some())
            .field("shutdown_topic", &self.shutdown_topic)
            .finish()
    }
}

impl Server {
    /// Validates the options and builds a server. The `driver` and `perm`
    /// options are required; missing ones are a configuration error.
    pub fn new(mut opts: Options) -> Result<Server, ServerError> {
        opts.normalize();

        let driver = opts.driver.clone().ok_or_else(|| ServerError::Config("no driver implementation".to_string()))?;
        let perm = opts.perm.clone().ok_or_else(|| ServerError::Config("no perm implementation".to_string()))?;
        let auth = opts.auth.clone();
        let logger: Arc<dyn Logger> = match opts.logger.clone() {
            Some(logger) => logger,
            None => Arc::new(StdLogger),
        };
        let commands = Registry::new(opts.commands.take().unwrap_or_else(default_commands));
        let feats = precompute_feats(&commands, opts.tls);

        Ok(Server {
            opts,
            driver,
            auth,
            perm,
            logger,
            commands,
            notifiers: NotifierList::default(),
            feats,
            tls_config: OnceLock::new(),
            shutdown_topic: shutdown::Topic::new(),
        })
    }

    /// Registers an observer of session lifecycle events. Must happen
    /// before serving starts.
    pub fn register_notifier(&mut self, notifier: Arc<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    /// The command registry, for runtime inspection or replacement of
    /// handlers.
    pub fn commands(&self) -> &Registry {
        &self.commands
    }

    /// Binds the configured address and serves until shutdown.
    pub async fn listen_and_serve(self: Arc<Self>) -> Result<(), ServerError> {
        let listener = TcpListener::bind((self.opts.hostname.as_str(), self.opts.port)).await?;
        self.logger.print("", &format!("{} listening on {}", self.opts.name, self.opts.port));
        self.serve(listener).await
    }

    /// Accepts connections on the given listener and handles each in a new
    /// task. Returns [`ServerError::Closed`] after [`Server::shutdown`].
    pub async fn serve(self: Arc<Self>, listener: TcpListener) -> Result<(), ServerError> {
        if self.opts.tls && self.tls_config.get().is_none() {
            let config = tls::new_config(&self.opts.cert_file, &self.opts.key_file)?;
            let _ = self.tls_config.set(config);
        }

        let mut shutdown_listener = self.shutdown_topic.subscribe();
        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    let (stream, _) = accepted?;
                    let server = Arc::clone(&self);
                    let logger = Arc::clone(&self.logger);
                    tokio::spawn(async move {
                        match Session::open(server, stream).await {
                            Ok(session) => session.serve().await,
                            Err(err) => logger.print("", &format!("Could not set up session: {}", err)),
                        }
                    });
                }
                _ = shutdown_listener.listen() => {
                    return Err(ServerError::Closed);
                }
            }
        }
    }

    /// Gracefully stops the server: the listener closes, already connected
    /// sessions keep draining under their own deadline.
    pub fn shutdown(&self) {
        self.shutdown_topic.notify();
    }

    pub(crate) fn tls_acceptor(&self) -> Option<TlsAcceptor> {
        self.tls_config.get().map(|config| TlsAcceptor::from(Arc::clone(config)))
    }
}

// The FEAT body is fixed for the lifetime of the server: UTF8, the sorted
// extension tokens, and the TLS trio when TLS is enabled.
fn precompute_feats(commands: &Registry, tls: bool) -> String {
    let mut feats = String::from("Extensions supported:\n UTF8\n");
    for token in commands.extensions() {
        feats.push(' ');
        feats.push_str(&token);
        feats.push('\n');
    }
    if tls {
        feats.push_str(" AUTH TLS\n PBSZ\n PROT\n");
    }
    feats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth::SimpleAuth, driver::Memory, perm::SimplePerm};
    use pretty_assertions::assert_eq;

    fn base_options() -> Options {
        Options {
            driver: Some(Arc::new(Memory::new())),
            auth: Some(Arc::new(SimpleAuth::new("admin", "admin"))),
            perm: Some(Arc::new(SimplePerm::new("test", "test"))),
            ..Options::default()
        }
    }

    #[test]
    fn new_rejects_missing_perm() {
        let opts = Options {
            perm: None,
            ..base_options()
        };
        let err = Server::new(opts).unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn new_rejects_missing_driver() {
        let opts = Options {
            driver: None,
            ..base_options()
        };
        assert!(Server::new(opts).is_err());
    }

    #[test]
    fn feat_body_lists_extensions() {
        let server = Server::new(base_options()).unwrap();
        assert_eq!(
            server.feats,
            "Extensions supported:\n UTF8\n CLNT\n EPRT\n EPSV\n MDTM\n MLSD\n MLST\n REST\n SIZE\n",
        );
    }

    #[test]
    fn feat_body_advertises_tls_when_enabled() {
        let opts = Options {
            tls: true,
            explicit_ftps: true,
            ..base_options()
        };
        let server = Server::new(opts).unwrap();
        assert!(server.feats.ends_with(" AUTH TLS\n PBSZ\n PROT\n"));
    }

    #[test]
    fn options_get_defaults_normalized() {
        let opts = Options {
            name: String::new(),
            port: 0,
            welcome_message: String::new(),
            ..base_options()
        };
        let server = Server::new(opts).unwrap();
        assert_eq!(server.opts.name, "ftpkit");
        assert_eq!(server.opts.port, 2121);
        assert_eq!(server.opts.welcome_message, "Welcome to the ftpkit FTP server");
    }
}
