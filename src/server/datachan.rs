//! The FTP *data* channel: the ephemeral byte-stream endpoint negotiated
//! by PORT/EPRT/PASV/EPSV and consumed by exactly one transfer command.

use rand::Rng;
use std::{
    future::Future,
    io,
    net::{IpAddr, SocketAddr},
    pin::Pin,
    task::{Context, Poll},
};
use tokio::{
    io::{AsyncRead, AsyncWrite, ReadBuf},
    net::{TcpListener, TcpStream},
    time::Sleep,
};

use super::ratelimit::Limiter;

/// Byte streams the engine can treat uniformly: plain TCP or TLS.
pub trait AsyncStream: AsyncRead + AsyncWrite + Send + Unpin {}

impl<T: AsyncRead + AsyncWrite + Send + Unpin> AsyncStream for T {}

/// A boxed [`AsyncStream`].
pub type BoxStream = Box<dyn AsyncStream>;

/// The session's one-shot data channel slot between negotiation and
/// transfer.
///
/// Passive negotiation leaves a bound listener behind; the connection is
/// accepted when the transfer command consumes the slot. Active negotiation
/// dials immediately and parks the connected socket.
#[derive(Debug)]
pub(crate) enum DataChannel {
    Passive(TcpListener),
    Active(TcpStream),
}

const BIND_RETRIES: u8 = 10;

/// Binds the passive listener on the server's outward IP. Without a
/// configured range the OS picks the port; otherwise a uniformly random
/// port from the inclusive range is tried a bounded number of times.
pub(crate) async fn bind_passive(ip: IpAddr, range: Option<(u16, u16)>) -> io::Result<TcpListener> {
    let (min, max) = match range {
        None => return TcpListener::bind((ip, 0)).await,
        Some(bounds) => bounds,
    };

    let mut last_err = io::Error::new(io::ErrorKind::AddrInUse, "no free port in the passive range");
    for _ in 0..BIND_RETRIES {
        let port = if min == max { min } else { rand::thread_rng().gen_range(min..=max) };
        match TcpListener::bind((ip, port)).await {
            Ok(listener) => return Ok(listener),
            Err(err) => last_err = err,
        }
    }
    Err(last_err)
}

/// The connected data-channel endpoint handed to transfer commands.
///
/// Reads and writes are shaped by the session's rate limiter in both
/// directions. The endpoint is consumed by a single transfer and closed
/// afterwards.
pub struct DataSocket {
    stream: Throttled<BoxStream>,
    local_addr: SocketAddr,
    remote_addr: SocketAddr,
}

impl DataSocket {
    pub(crate) fn new(stream: BoxStream, local_addr: SocketAddr, remote_addr: SocketAddr, limiter: Limiter) -> DataSocket {
        DataSocket {
            stream: Throttled::new(stream, limiter),
            local_addr,
            remote_addr,
        }
    }

    /// The server-side address of the data connection.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// The client-side address of the data connection.
    pub fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }
}

impl AsyncRead for DataSocket {
    fn poll_read(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().stream).poll_read(cx, buf)
    }
}

impl AsyncWrite for DataSocket {
    fn poll_write(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &[u8]) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.get_mut().stream).poll_write(cx, buf)
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().stream).poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().stream).poll_shutdown(cx)
    }
}

// Applies the token bucket to an inner stream. Transfers are paced after the
// fact: a chunk is moved, the bucket is charged, and the overdraft dictates
// how long the next poll sleeps.
struct Throttled<S> {
    inner: S,
    limiter: Limiter,
    pause: Option<Pin<Box<Sleep>>>,
}

impl<S> Throttled<S> {
    fn new(inner: S, limiter: Limiter) -> Throttled<S> {
        Throttled {
            inner,
            limiter,
            pause: None,
        }
    }

    fn poll_pause(&mut self, cx: &mut Context<'_>) -> Poll<()> {
        if let Some(pause) = self.pause.as_mut() {
            match pause.as_mut().poll(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(()) => self.pause = None,
            }
        }
        Poll::Ready(())
    }

    fn charge(&mut self, n: usize) {
        if let Some(delay) = self.limiter.charge(n) {
            self.pause = Some(Box::pin(tokio::time::sleep(delay)));
        }
    }
}

impl<S: AsyncRead + Unpin> AsyncRead for Throttled<S> {
    fn poll_read(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        if this.poll_pause(cx).is_pending() {
            return Poll::Pending;
        }
        let before = buf.filled().len();
        match Pin::new(&mut this.inner).poll_read(cx, buf) {
            Poll::Ready(Ok(())) => {
                let n = buf.filled().len() - before;
                this.charge(n);
                Poll::Ready(Ok(()))
            }
            other => other,
        }
    }
}

impl<S: AsyncWrite + Unpin> AsyncWrite for Throttled<S> {
    fn poll_write(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &[u8]) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        if this.poll_pause(cx).is_pending() {
            return Poll::Pending;
        }
        match Pin::new(&mut this.inner).poll_write(cx, buf) {
            Poll::Ready(Ok(n)) => {
                this.charge(n);
                Poll::Ready(Ok(n))
            }
            other => other,
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_shutdown(cx)
    }
}

/// Tells if an error looks like the data connection went away, as opposed
/// to the driver failing.
pub(crate) fn is_connection_error(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::BrokenPipe
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::UnexpectedEof
            | io::ErrorKind::TimedOut
    )
}

/// Parses a `"min-max"` passive port range. `min == max` pins the single
/// port. Returns `None` for an empty or malformed range, in which case the
/// OS picks a port.
pub(crate) fn parse_port_range(range: &str) -> Option<(u16, u16)> {
    let (min, max) = range.split_once('-')?;
    let min: u16 = min.trim().parse().ok()?;
    let max: u16 = max.trim().parse().ok()?;
    if min > max {
        return None;
    }
    Some((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[test]
    fn port_range_parsing() {
        assert_eq!(parse_port_range("30000-31000"), Some((30000, 31000)));
        assert_eq!(parse_port_range(" 2121 - 2121 "), Some((2121, 2121)));
        assert_eq!(parse_port_range(""), None);
        assert_eq!(parse_port_range("9000"), None);
        assert_eq!(parse_port_range("broken-range"), None);
        assert_eq!(parse_port_range("31000-30000"), None);
    }

    #[tokio::test]
    async fn single_port_range_binds_that_port() {
        // Let the OS pick a port once so we know a free one, then pin it.
        let probe = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let port = probe.local_addr().unwrap().port();
        drop(probe);

        let listener = bind_passive("127.0.0.1".parse().unwrap(), Some((port, port))).await.unwrap();
        assert_eq!(listener.local_addr().unwrap().port(), port);
    }

    #[tokio::test]
    async fn throttled_stream_passes_bytes_through() {
        let (client, server) = tokio::io::duplex(64);
        let mut throttled = Throttled::new(server, Limiter::new(0));
        let mut client = client;

        client.write_all(b"ping").await.unwrap();
        let mut buf = [0u8; 4];
        throttled.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"ping");

        throttled.write_all(b"pong").await.unwrap();
        let mut buf = [0u8; 4];
        client.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"pong");
    }
}
