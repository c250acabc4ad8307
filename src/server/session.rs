//! Per-connection session handling: the control loop, dispatch gates and
//! the TLS upgrade.

use std::{io, mem, net::SocketAddr, sync::Arc, time::Duration};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufStream},
    net::TcpStream,
    time::Instant,
};

use super::{
    datachan::{BoxStream, DataChannel, DataSocket},
    ratelimit::Limiter,
    reply::{self, ReplyCode},
    Server,
};
use crate::context::{Context, SessionData};
use crate::notifier::Notifier;

/// One FTP session, created per accepted control connection.
///
/// Command handlers receive `&mut Session` and talk to the client through
/// [`write_message`](Session::write_message) and the data channel slot.
pub struct Session {
    pub(crate) id: String,
    server: Arc<Server>,
    control: BufStream<BoxStream>,
    local_addr: SocketAddr,
    remote_addr: SocketAddr,
    pub(crate) cur_dir: String,
    pub(crate) req_user: String,
    pub(crate) user: String,
    pub(crate) rename_from: String,
    pub(crate) pre_command: String,
    pub(crate) client_soft: String,
    pub(crate) last_file_pos: i64,
    pub(crate) closed: bool,
    pub(crate) tls: bool,
    pub(crate) pbsz_done: bool,
    pub(crate) prot_private: bool,
    pub(crate) data_conn: Option<DataChannel>,
    data: SessionData,
    limiter: Limiter,
    deadline: Option<Instant>,
}

// When a session has no deadline of its own, data-channel waits still get a
// generous bound.
const FALLBACK_DATA_TIMEOUT: Duration = Duration::from_secs(5 * 60);

fn new_session_id() -> String {
    let bytes: [u8; 10] = rand::random();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

impl Session {
    pub(crate) async fn open(server: Arc<Server>, stream: TcpStream) -> io::Result<Session> {
        let local_addr = stream.local_addr()?;
        let remote_addr = stream.peer_addr()?;

        let mut control: BoxStream = Box::new(stream);
        if let Some(callback) = &server.opts.conn_callback {
            control = callback(control);
        }

        // Implicit FTPS: the whole listener is TLS, so the handshake runs
        // before the first reply.
        let mut tls = false;
        if server.opts.tls && !server.opts.explicit_ftps {
            let acceptor = server
                .tls_acceptor()
                .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "TLS enabled but no configuration loaded"))?;
            control = Box::new(acceptor.accept(control).await?);
            tls = true;
        }

        let timeout = server.opts.timeout;
        let limiter = Limiter::new(server.opts.rate_limit);
        Ok(Session {
            id: new_session_id(),
            control: BufStream::new(control),
            local_addr,
            remote_addr,
            cur_dir: "/".to_string(),
            req_user: String::new(),
            user: String::new(),
            rename_from: String::new(),
            pre_command: String::new(),
            client_soft: String::new(),
            last_file_pos: -1,
            closed: false,
            tls,
            pbsz_done: false,
            prot_private: false,
            data_conn: None,
            data: SessionData::default(),
            limiter,
            deadline: (!timeout.is_zero()).then(|| Instant::now() + timeout),
            server,
        })
    }

    /// The session id, 20 hex characters.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The address of the connected client.
    pub fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }

    /// The server-side address of the control connection.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// The authenticated user name, empty until PASS succeeded.
    pub fn login_user(&self) -> &str {
        &self.user
    }

    /// Tells if a user has logged in.
    pub fn is_login(&self) -> bool {
        !self.user.is_empty()
    }

    /// The session's current working directory, always absolute.
    pub fn cur_dir(&self) -> &str {
        &self.cur_dir
    }

    /// Tells if the control channel is TLS protected.
    pub fn is_tls(&self) -> bool {
        self.tls
    }

    /// The client software name announced via CLNT, if any.
    pub fn client_software(&self) -> &str {
        &self.client_soft
    }

    /// The previous successfully dispatched command token.
    pub fn previous_command(&self) -> &str {
        &self.pre_command
    }

    /// The scratchpad shared between all commands of this session.
    pub fn data(&self) -> SessionData {
        self.data.clone()
    }

    /// The server this session belongs to.
    pub fn server(&self) -> &Arc<Server> {
        &self.server
    }

    /// Builds the per-command view handed to drivers and notifiers.
    pub fn context(&self, cmd: &str, param: &str) -> Context {
        Context {
            session_id: self.id.clone(),
            user: self.user.clone(),
            remote_addr: self.remote_addr,
            cmd: cmd.to_string(),
            param: param.to_string(),
            data: self.data.clone(),
        }
    }

    /// Maps a client supplied path or file name onto the session's sandbox.
    pub fn build_path(&self, filename: &str) -> String {
        super::path::build_path(&self.cur_dir, filename)
    }

    /// Sends a single-line reply. Write errors are swallowed: if the client
    /// is gone the next read terminates the session anyway.
    pub async fn write_message(&mut self, code: ReplyCode, message: &str) {
        self.server.logger.print_response(&self.id, code.code(), message);
        let line = reply::format_single(code, message);
        self.send_raw(line.as_bytes()).await;
    }

    /// Sends a multi-line reply in the `NNN-body NNN END` shape.
    pub async fn write_multiline(&mut self, code: ReplyCode, body: &str) {
        self.server.logger.print_response(&self.id, code.code(), body);
        let text = reply::format_multiline(code, body);
        self.send_raw(text.as_bytes()).await;
    }

    async fn send_raw(&mut self, bytes: &[u8]) {
        if let Err(err) = self.control.write_all(bytes).await {
            self.log(&format!("Write error: {}", err));
            return;
        }
        if let Err(err) = self.control.flush().await {
            self.log(&format!("Flush error: {}", err));
        }
    }

    pub(crate) fn log(&self, message: &str) {
        self.server.logger.print(&self.id, message);
    }

    /// Consumes the pending REST offset. `-1` means no restart is pending.
    pub(crate) fn take_file_pos(&mut self) -> i64 {
        mem::replace(&mut self.last_file_pos, -1)
    }

    /// Parks a freshly negotiated data channel. Any channel left over from
    /// an earlier negotiation is dropped, which closes it.
    pub(crate) fn set_data_channel(&mut self, chan: DataChannel) {
        self.data_conn = Some(chan);
    }

    /// How long data-channel operations may still take under the session
    /// deadline.
    pub(crate) fn remaining_time(&self) -> Duration {
        match self.deadline {
            Some(deadline) => deadline.saturating_duration_since(Instant::now()),
            None => FALLBACK_DATA_TIMEOUT,
        }
    }

    /// The IP advertised in PASV/EPSV replies: the configured public IP if
    /// set, the control socket's local IP otherwise.
    pub(crate) fn passive_listen_ip(&self) -> String {
        let listen_ip = if self.server.opts.public_ip.is_empty() {
            self.local_addr.ip().to_string()
        } else {
            self.server.opts.public_ip.clone()
        };
        if listen_ip == "::1" {
            return listen_ip;
        }
        match listen_ip.rfind(':') {
            Some(idx) if idx > 0 => listen_ip[..idx].to_string(),
            _ => listen_ip,
        }
    }

    /// Takes the one-shot data channel slot and turns it into a connected,
    /// rate limited endpoint: accepts the pending passive connection or
    /// unpacks the already dialed active one, then wraps it in TLS when
    /// PROT P is active. Replies `425` and returns `None` when no channel
    /// was negotiated or establishing it fails.
    pub(crate) async fn require_data_conn(&mut self) -> Option<DataSocket> {
        match self.open_data_conn().await {
            Ok(Some(socket)) => Some(socket),
            Ok(None) => {
                self.write_message(ReplyCode::CantOpenDataConnection, "Can't open data connection").await;
                None
            }
            Err(err) => {
                self.log(&format!("Failed to open data connection: {}", err));
                self.write_message(ReplyCode::CantOpenDataConnection, "Can't open data connection").await;
                None
            }
        }
    }

    async fn open_data_conn(&mut self) -> io::Result<Option<DataSocket>> {
        let chan = match self.data_conn.take() {
            None => return Ok(None),
            Some(chan) => chan,
        };

        let stream = match chan {
            DataChannel::Active(stream) => stream,
            DataChannel::Passive(listener) => {
                let (stream, _) = tokio::time::timeout(self.remaining_time(), listener.accept())
                    .await
                    .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "timed out waiting for the data connection"))??;
                stream
            }
        };

        let local_addr = stream.local_addr()?;
        let remote_addr = stream.peer_addr()?;
        let stream: BoxStream = if self.tls && self.prot_private {
            match self.server.tls_acceptor() {
                Some(acceptor) => Box::new(acceptor.accept(stream).await?),
                None => return Err(io::Error::new(io::ErrorKind::InvalidInput, "PROT P active without TLS configuration")),
            }
        } else {
            Box::new(stream)
        };

        Ok(Some(DataSocket::new(stream, local_addr, remote_addr, self.limiter.clone())))
    }

    /// Wraps the already-open control socket in a TLS server handshake.
    /// The buffered reader and writer are replaced atomically with respect
    /// to the control loop; credentials offered over plaintext do not
    /// survive the upgrade.
    pub(crate) async fn upgrade_to_tls(&mut self) -> io::Result<()> {
        let acceptor = self
            .server
            .tls_acceptor()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "TLS not configured"))?;

        self.log("Upgrading connection to TLS");
        // A detached pipe stands in while the handshake owns the real
        // stream; on failure the session reads EOF from it and terminates.
        let (placeholder, _guard) = tokio::io::duplex(1);
        let placeholder: BoxStream = Box::new(placeholder);
        let buffered = mem::replace(&mut self.control, BufStream::new(placeholder));
        let stream = buffered.into_inner();

        let tls_stream: BoxStream = Box::new(acceptor.accept(stream).await?);
        self.control = BufStream::new(tls_stream);
        self.tls = true;
        self.req_user.clear();
        self.user.clear();
        Ok(())
    }

    /// Runs the control loop until the client quits, the connection drops
    /// or the session deadline passes.
    pub(crate) async fn serve(mut self) {
        self.log("Connection Established");
        let welcome = self.server.opts.welcome_message.clone();
        self.write_message(ReplyCode::ServiceReady, &welcome).await;

        loop {
            let mut line = String::new();
            let deadline = self.deadline;
            let read = tokio::select! {
                read = self.control.read_line(&mut line) => Some(read),
                _ = wait_for(deadline) => None,
            };

            match read {
                None => {
                    self.log("Session deadline reached, closing control connection");
                    break;
                }
                Some(Ok(0)) => break,
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    self.log(&format!("Read error: {}", err));
                    break;
                }
            }

            let notifiers = self.server.notifiers.clone();
            notifiers.before_command(&self.context("", ""), &line).await;

            // A failing handler must not take the whole session down; the
            // error is logged and the loop keeps reading.
            if let Err(err) = self.receive_line(&line).await {
                self.log(&format!("Handler error: {}", err));
            }

            if self.closed {
                break;
            }
        }

        self.log("Connection Terminated");
        self.close().await;
    }

    /// Accepts a single line and coordinates the appropriate response.
    async fn receive_line(&mut self, line: &str) -> io::Result<()> {
        let (cmd, param) = parse_line(line);
        if cmd.is_empty() {
            self.write_message(ReplyCode::CommandSyntaxError, "Command not found").await;
            return Ok(());
        }
        let token = cmd.to_ascii_uppercase();
        self.server.logger.print_command(&self.id, cmd, param);

        let handler = match self.server.commands.get(&token) {
            Some(handler) => handler,
            None => {
                self.write_message(ReplyCode::CommandSyntaxError, "Command not found").await;
                return Ok(());
            }
        };

        if handler.requires_param() && param.is_empty() {
            self.write_message(ReplyCode::BadFileName, "action aborted, required param missing").await;
        } else if self.server.opts.force_tls && !self.tls && !(token == "AUTH" && param == "TLS") {
            self.write_message(ReplyCode::PolicyRequiresTls, "Request denied for policy reasons. AUTH TLS required.")
                .await;
        } else if handler.requires_auth() && self.user.is_empty() {
            self.write_message(ReplyCode::NotLoggedIn, "not logged in").await;
        } else {
            handler.execute(self, param).await?;
            self.pre_command = token;
        }
        Ok(())
    }

    /// Closes the session: the data channel slot is emptied and the control
    /// socket shut down. Safe to call more than once.
    pub(crate) async fn close(&mut self) {
        self.closed = true;
        self.req_user.clear();
        self.user.clear();
        self.data_conn = None;
        let _ = self.control.shutdown().await;
    }
}

async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

// Splits a raw control line into the command token and its parameter. The
// parameter may itself contain spaces.
fn parse_line(line: &str) -> (&str, &str) {
    let line = line.trim_end_matches(|c| c == '\r' || c == '\n');
    match line.split_once(' ') {
        Some((cmd, param)) => (cmd, param),
        None => (line, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn splits_on_the_first_space_only() {
        assert_eq!(parse_line("USER admin\r\n"), ("USER", "admin"));
        assert_eq!(parse_line("STOR a file with spaces.txt\r\n"), ("STOR", "a file with spaces.txt"));
        assert_eq!(parse_line("QUIT\r\n"), ("QUIT", ""));
        assert_eq!(parse_line("NOOP"), ("NOOP", ""));
        assert_eq!(parse_line("\r\n"), ("", ""));
    }

    #[test]
    fn session_ids_are_twenty_hex_chars() {
        let id = new_session_id();
        assert_eq!(id.len(), 20);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, new_session_id());
    }
}
