use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::http::response::ResponseHead;

const HTTP_VERSION: &str = "HTTP/1.1";

/// Default size of each body chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

fn serialize_head(head: &ResponseHead) -> Vec<u8> {
    let mut buf = Vec::new();

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        head.status.as_u16(),
        head.status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    // Headers
    for (k, v) in &head.headers {
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(v.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    buf
}

/// Writes one response onto a stream: head first, then the body in chunks.
pub struct ResponseWriter<'a, W> {
    stream: &'a mut W,
    chunk_size: usize,
}

impl<'a, W> ResponseWriter<'a, W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(stream: &'a mut W, chunk_size: usize) -> Self {
        Self {
            stream,
            chunk_size: chunk_size.max(1),
        }
    }

    pub async fn write_head(&mut self, head: &ResponseHead) -> anyhow::Result<()> {
        self.stream.write_all(&serialize_head(head)).await?;
        Ok(())
    }

    /// Copies `body` to the stream chunk by chunk, in order. Returns the body bytes sent.
    pub async fn stream_body<R>(&mut self, body: &mut R) -> anyhow::Result<u64>
    where
        R: AsyncRead + Unpin,
    {
        let mut chunk = vec![0u8; self.chunk_size];
        let mut sent = 0u64;

        loop {
            let n = body.read(&mut chunk).await?;
            if n == 0 {
                break;
            }

            self.stream.write_all(&chunk[..n]).await?;
            sent += n as u64;
        }

        self.stream.flush().await?;
        Ok(sent)
    }
}

/// Shuts down the write side, waits `linger`, and leaves the final close to the caller
/// dropping the stream.
///
/// The pause gives the peer time to drain before the socket is closed. Some clients
/// abort their read when the connection closes with data still in flight.
pub async fn half_close<W>(stream: &mut W, linger: Duration) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    stream.shutdown().await?;
    tokio::time::sleep(linger).await;
    Ok(())
}
