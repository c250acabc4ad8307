//! The per-session logging facade.

use std::fmt::Debug;

/// Receives one line per protocol event, keyed by session id.
///
/// Implementations must be safe to call from many sessions concurrently.
pub trait Logger: Send + Sync + Debug {
    /// Logs a free-form message for the session.
    fn print(&self, session_id: &str, message: &str);
    /// Logs a command received from the client.
    fn print_command(&self, session_id: &str, command: &str, params: &str);
    /// Logs a reply sent to the client.
    fn print_response(&self, session_id: &str, code: u32, message: &str);
}

/// Logs through the `log` crate macros at info level.
#[derive(Debug, Default)]
pub struct StdLogger;

impl Logger for StdLogger {
    fn print(&self, session_id: &str, message: &str) {
        log::info!("{} {}", session_id, message);
    }

    fn print_command(&self, session_id: &str, command: &str, params: &str) {
        // Never log credentials.
        if command.eq_ignore_ascii_case("PASS") {
            log::info!("{} > PASS ****", session_id);
        } else {
            log::info!("{} > {} {}", session_id, command, params);
        }
    }

    fn print_response(&self, session_id: &str, code: u32, message: &str) {
        log::info!("{} < {} {}", session_id, code, message);
    }
}

/// Swallows everything. Useful in tests and for embedders that observe the
/// protocol through [`Notifier`](crate::notifier::Notifier) hooks instead.
#[derive(Debug, Default)]
pub struct DiscardLogger;

impl Logger for DiscardLogger {
    fn print(&self, _session_id: &str, _message: &str) {}

    fn print_command(&self, _session_id: &str, _command: &str, _params: &str) {}

    fn print_response(&self, _session_id: &str, _code: u32, _message: &str) {}
}
