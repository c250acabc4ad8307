#![allow(dead_code)]

use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use ftpkit::auth::SimpleAuth;
use ftpkit::driver::Memory;
use ftpkit::logger::DiscardLogger;
use ftpkit::notifier::Notifier;
use ftpkit::perm::SimplePerm;
use ftpkit::{Options, Server, ServerError};

/// Options for a loopback test server with the in-memory driver and
/// admin/admin credentials.
pub fn test_options(port: u16) -> Options {
    Options {
        driver: Some(Arc::new(Memory::new())),
        auth: Some(Arc::new(SimpleAuth::new("admin", "admin"))),
        perm: Some(Arc::new(SimplePerm::new("test", "test"))),
        logger: Some(Arc::new(DiscardLogger)),
        hostname: "127.0.0.1".to_string(),
        port,
        ..Options::default()
    }
}

pub struct TestServer {
    pub server: Arc<Server>,
    handle: Option<JoinHandle<Result<(), ServerError>>>,
}

pub fn start_server(opts: Options) -> TestServer {
    start_server_with_notifiers(opts, Vec::new())
}

pub fn start_server_with_notifiers(opts: Options, notifiers: Vec<Arc<dyn Notifier>>) -> TestServer {
    let mut server = Server::new(opts).expect("server options should be valid");
    for notifier in notifiers {
        server.register_notifier(notifier);
    }
    let server = Arc::new(server);
    let serving = Arc::clone(&server);
    let handle = std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_multi_thread().enable_all().build().unwrap();
        rt.block_on(serving.listen_and_serve())
    });
    TestServer {
        server,
        handle: Some(handle),
    }
}

impl TestServer {
    /// Requests shutdown and returns what the serve loop returned.
    pub fn stop(mut self) -> Result<(), ServerError> {
        self.server.shutdown();
        self.handle.take().unwrap().join().unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.server.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// A scripted control-channel client that speaks raw FTP lines, so tests
/// can assert exact wire bytes.
pub struct FtpClient {
    stream: TcpStream,
    reader: BufReader<TcpStream>,
}

impl FtpClient {
    /// Connects, retrying until the server thread is listening, and
    /// consumes the 220 greeting.
    pub fn connect(port: u16) -> FtpClient {
        let addr = format!("127.0.0.1:{}", port);
        let mut last_err = None;
        for _ in 0..200 {
            match TcpStream::connect(&addr) {
                Ok(stream) => {
                    stream.set_read_timeout(Some(Duration::from_secs(10))).unwrap();
                    let reader = BufReader::new(stream.try_clone().unwrap());
                    let mut client = FtpClient { stream, reader };
                    let greeting = client.read_line();
                    assert!(greeting.starts_with("220 "), "unexpected greeting: {:?}", greeting);
                    return client;
                }
                Err(err) => {
                    last_err = Some(err);
                    std::thread::sleep(Duration::from_millis(25));
                }
            }
        }
        panic!("could not connect to {}: {:?}", addr, last_err);
    }

    pub fn read_line(&mut self) -> String {
        let mut line = String::new();
        self.reader.read_line(&mut line).unwrap();
        line
    }

    pub fn send(&mut self, line: &str) {
        self.stream.write_all(format!("{}\r\n", line).as_bytes()).unwrap();
    }

    /// Sends a command and returns its single-line reply, CRLF included.
    pub fn cmd(&mut self, line: &str) -> String {
        self.send(line);
        self.read_line()
    }

    /// Sends a command and collects a multi-line reply up to and including
    /// the `NNN END` terminator line.
    pub fn cmd_multiline(&mut self, line: &str) -> String {
        self.send(line);
        let mut text = String::new();
        loop {
            let line = self.read_line();
            let terminal = !line.starts_with(' ') && line.trim_end().ends_with(" END");
            text.push_str(&line);
            if terminal {
                return text;
            }
        }
    }

    pub fn login(&mut self) {
        assert_eq!(self.cmd("USER admin"), "331 User name ok, password required\r\n");
        assert_eq!(self.cmd("PASS admin"), "230 Password ok, continue\r\n");
    }

    /// Negotiates passive mode and dials the advertised port, returning
    /// the data connection.
    pub fn pasv(&mut self) -> TcpStream {
        let reply = self.cmd("PASV");
        assert!(reply.starts_with("227 Entering Passive Mode ("), "unexpected PASV reply: {:?}", reply);
        let open = reply.find('(').unwrap();
        let close = reply.rfind(')').unwrap();
        let numbers: Vec<u16> = reply[open + 1..close].split(',').map(|n| n.trim().parse().unwrap()).collect();
        assert_eq!(numbers.len(), 6, "unexpected PASV tuple: {:?}", reply);
        let port = numbers[4] * 256 + numbers[5];
        let data = TcpStream::connect(("127.0.0.1", port)).unwrap();
        data.set_read_timeout(Some(Duration::from_secs(10))).unwrap();
        data
    }

    /// Stores `content` under `name` through a fresh passive connection
    /// and returns the closing transfer reply.
    pub fn stor(&mut self, name: &str, content: &[u8]) -> String {
        let mut data = self.pasv();
        let opening = self.cmd(&format!("STOR {}", name));
        assert!(opening.starts_with("150 "), "unexpected STOR reply: {:?}", opening);
        data.write_all(content).unwrap();
        data.shutdown(std::net::Shutdown::Write).unwrap();
        let closing = self.read_line();
        drop(data);
        closing
    }

    /// Retrieves `name` through a fresh passive connection, returning the
    /// payload and the closing transfer reply.
    pub fn retr(&mut self, name: &str) -> (Vec<u8>, String) {
        use std::io::Read;
        let mut data = self.pasv();
        let opening = self.cmd(&format!("RETR {}", name));
        assert!(opening.starts_with("150 "), "unexpected RETR reply: {:?}", opening);
        let mut payload = Vec::new();
        data.read_to_end(&mut payload).unwrap();
        let closing = self.read_line();
        (payload, closing)
    }

    /// Runs a listing command through a fresh passive connection and
    /// returns the listing text.
    pub fn listing(&mut self, command: &str) -> String {
        use std::io::Read;
        let mut data = self.pasv();
        let opening = self.cmd(command);
        assert!(opening.starts_with("150 "), "unexpected {} reply: {:?}", command, opening);
        let mut text = String::new();
        data.read_to_string(&mut text).unwrap();
        let closing = self.read_line();
        assert!(closing.starts_with("226 "), "unexpected listing close: {:?}", closing);
        text
    }
}
