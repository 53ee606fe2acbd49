use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tokio::net::TcpStream;
use tracing::{debug, info};

use crate::http::parser::{has_line_end, parse_request_line, MAX_REQUEST_BYTES};
use crate::http::request::RawRequest;
use crate::http::static_files::{Reply, StaticFiles};
use crate::http::writer::half_close;

/// One accepted client connection, owned by exactly one handler task.
pub struct Connection<S = TcpStream> {
    stream: S,
    peer: SocketAddr,
    files: Arc<StaticFiles>,
    linger: Duration,
    buffer: BytesMut,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(RawRequest),
    Writing(Reply),
    Closing,
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, peer: SocketAddr, files: Arc<StaticFiles>, linger: Duration) -> Self {
        Self {
            stream,
            peer,
            files,
            linger,
            buffer: BytesMut::with_capacity(MAX_REQUEST_BYTES),
            state: ConnectionState::Reading,
        }
    }

    /// Handles exactly one request, then closes.
    ///
    /// Request-level problems become error pages; only socket I/O failures are
    /// returned as errors.
    pub async fn run(mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    let req = self.read_request().await?;
                    self.state = ConnectionState::Processing(req);
                }

                ConnectionState::Processing(req) => {
                    let reply = self.classify(&req);
                    self.state = ConnectionState::Writing(reply);
                }

                ConnectionState::Writing(reply) => {
                    let status = self.files.send(&mut self.stream, &reply).await?;
                    info!(peer = %self.peer, status = status.as_u16(), reply = ?reply, "Response sent");
                    self.state = ConnectionState::Closing;
                }

                ConnectionState::Closing => {
                    // The response is already out; a peer that reset early is not an error.
                    if let Err(e) = half_close(&mut self.stream, self.linger).await {
                        debug!(peer = %self.peer, error = %e, "Half-close failed");
                    }
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        // Dropping `self` closes the socket.
        Ok(())
    }

    /// Reads until the request line is complete, the buffer bound is hit, or the
    /// client stops sending. The rest of the request is left unread.
    pub async fn read_request(&mut self) -> anyhow::Result<RawRequest> {
        while !has_line_end(&self.buffer) && self.buffer.len() < MAX_REQUEST_BYTES {
            let n = self.stream.read_buf(&mut self.buffer).await?;

            if n == 0 {
                debug!(peer = %self.peer, received = self.buffer.len(), "Client stopped sending before end of line");
                break;
            }
        }

        self.buffer.truncate(MAX_REQUEST_BYTES);
        Ok(parse_request_line(&self.buffer))
    }

    fn classify(&self, req: &RawRequest) -> Reply {
        if !req.is_get() {
            debug!(peer = %self.peer, method = %req.method, "Rejecting method");
            return Reply::BadMethod;
        }

        let reply = self.files.reply_for(&req.target);
        if reply == Reply::Forbidden {
            info!(peer = %self.peer, target = %req.target, "Traversal attempt refused");
        }
        reply
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use tokio::io::{AsyncWriteExt, DuplexStream, ReadBuf};

    use crate::config::StaticFilesConfig;

    /// Duplex stream whose write shutdown fails, as on a socket the peer already reset.
    struct BrokenShutdown(DuplexStream);

    impl AsyncRead for BrokenShutdown {
        fn poll_read(
            mut self: Pin<&mut Self>,
            cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            Pin::new(&mut self.0).poll_read(cx, buf)
        }
    }

    impl AsyncWrite for BrokenShutdown {
        fn poll_write(
            mut self: Pin<&mut Self>,
            cx: &mut Context<'_>,
            buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            Pin::new(&mut self.0).poll_write(cx, buf)
        }

        fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Pin::new(&mut self.0).poll_flush(cx)
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Err(io::ErrorKind::NotConnected.into()))
        }
    }

    fn files_under(root: &str) -> Arc<StaticFiles> {
        Arc::new(StaticFiles::new(StaticFilesConfig {
            root: root.into(),
            ..StaticFilesConfig::default()
        }))
    }

    #[tokio::test]
    async fn failed_half_close_after_response_is_not_an_error() {
        let (server, mut client) = tokio::io::duplex(64 * 1024);
        let peer: SocketAddr = "127.0.0.1:40000".parse().unwrap();
        let conn = Connection::new(
            BrokenShutdown(server),
            peer,
            files_under("/nonexistent/docserve/root"),
            Duration::ZERO,
        );

        client.write_all(b"GET /logo.png HTTP/1.1\r\n\r\n").await.unwrap();
        conn.run().await.unwrap();

        let mut raw = Vec::new();
        client.read_to_end(&mut raw).await.unwrap();
        assert_eq!(raw, b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n".to_vec());
    }

    #[tokio::test]
    async fn request_line_is_read_across_writes() {
        let (server, mut client) = tokio::io::duplex(1024);
        let peer: SocketAddr = "127.0.0.1:40001".parse().unwrap();
        let mut conn = Connection::new(server, peer, files_under("/srv/www"), Duration::ZERO);

        client.write_all(b"GET /a").await.unwrap();
        let reader = tokio::spawn(async move {
            let req = conn.read_request().await.unwrap();
            (req, conn)
        });
        tokio::task::yield_now().await;
        client.write_all(b"bout.txt HTTP/1.0\r\n").await.unwrap();

        let (req, _conn) = reader.await.unwrap();
        assert_eq!(req, RawRequest::new("GET", "/about.txt", "HTTP/1.0"));
    }
}
