//! The error type returned by [`Server`](crate::Server) entry points.

use thiserror::Error;

/// Error returned by [`Server::new`](crate::Server::new) and the serving
/// entry points.
#[derive(Error, Debug)]
pub enum ServerError {
    /// A shutdown was requested; the accept loop returns this.
    #[error("ftp: server closed")]
    Closed,
    /// The server was constructed with invalid options.
    #[error("configuration error: {0}")]
    Config(String),
    /// The TLS certificate or key could not be loaded.
    #[error(transparent)]
    Tls(#[from] super::tls::ConfigError),
    /// Binding or accepting on the control listener failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
