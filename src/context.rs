//! The per-command view handed to drivers, authenticators and notifiers.

use std::{
    any::Any,
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
};

/// A string-keyed scratchpad shared by all commands of one session.
///
/// The engine never reads it; it exists so notifiers and drivers can thread
/// auxiliary state through a session.
pub type SessionData = Arc<Mutex<HashMap<String, Box<dyn Any + Send + Sync>>>>;

/// Context describes the command a [`Driver`](crate::driver::Driver),
/// [`Authenticator`](crate::auth::Authenticator) or
/// [`Notifier`](crate::notifier::Notifier) is being invoked for.
#[derive(Clone)]
pub struct Context {
    /// The id of the session the command arrived on.
    pub session_id: String,
    /// The authenticated user, empty until a PASS command succeeded.
    pub user: String,
    /// The address of the connected client.
    pub remote_addr: SocketAddr,
    /// The command token, upper-cased.
    pub cmd: String,
    /// The raw parameter of the command, possibly empty.
    pub param: String,
    /// Scratchpad shared between all commands of the session.
    pub data: SessionData,
}

#[cfg(test)]
pub(crate) fn test_context(cmd: &str, param: &str) -> Context {
    Context {
        session_id: "0123456789abcdef0123".to_string(),
        user: "admin".to_string(),
        remote_addr: "127.0.0.1:50000".parse().unwrap(),
        cmd: cmd.to_string(),
        param: param.to_string(),
        data: SessionData::default(),
    }
}
