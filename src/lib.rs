#![deny(missing_docs)]
//! An embeddable FTP(S) server library for Rust
//!
//! ftpkit implements the FTP protocol state machine (RFC 959) together with
//! the TLS upgrade (RFC 2228/4217), FEAT (RFC 2389), extended passive/active
//! modes (RFC 2428) and SIZE/MDTM/REST (RFC 3659). The engine is pluggable
//! along three axes: a [`Driver`](driver::Driver) provides the file system,
//! an [`Authenticator`](auth::Authenticator) checks credentials and a
//! [`Perm`](perm::Perm) supplies ownership and mode information for
//! listings. Host applications can observe the protocol through
//! [`Notifier`](notifier::Notifier) hooks and extend or replace individual
//! commands at runtime through the command [`Registry`](server::Registry).
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use ftpkit::auth::SimpleAuth;
//! use ftpkit::driver::Memory;
//! use ftpkit::perm::SimplePerm;
//! use ftpkit::{Options, Server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let opts = Options {
//!         driver: Some(Arc::new(Memory::new())),
//!         auth: Some(Arc::new(SimpleAuth::new("admin", "admin"))),
//!         perm: Some(Arc::new(SimplePerm::new("ftp", "ftp"))),
//!         port: 2121,
//!         ..Options::default()
//!     };
//!     let server = Arc::new(Server::new(opts).unwrap());
//!     server.listen_and_serve().await.unwrap();
//! }
//! ```

pub mod auth;
pub mod context;
pub mod driver;
pub mod logger;
pub mod notifier;
pub mod perm;
pub mod server;

pub use crate::{
    context::Context,
    server::{Options, Server, ServerError, Session},
};

pub(crate) const VERSION: &str = env!("CARGO_PKG_VERSION");
