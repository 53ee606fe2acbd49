//! Serving files from the document root.
//!
//! Every reply goes through the same stat → open → head → body sequence. Error
//! replies are named documents under the root, sent with their own status. When an
//! error document is itself missing, a bare status line is sent; error documents are
//! never looked up through another error document.

use tokio::fs::{self, File};
use tokio::io::AsyncWrite;
use tracing::debug;

use crate::config::StaticFilesConfig;
use crate::http::mime;
use crate::http::path::{self, Resolution, ResolvedPath};
use crate::http::response::{ErrorPage, ResponseHead, ResponseOutcome, StatusCode};
use crate::http::writer::ResponseWriter;

/// What a connection asks to have sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// A requested file
    File(ResolvedPath),
    /// Method other than GET; answered with the bad-request page
    BadMethod,
    /// Traversal attempt; answered with the access-denied page
    Forbidden,
}

/// Result of looking a path up on disk.
enum Lookup {
    Found(File),
    Directory,
    Missing,
}

/// Read-only view of the document root, shared by all connections.
#[derive(Debug, Clone)]
pub struct StaticFiles {
    cfg: StaticFilesConfig,
}

impl StaticFiles {
    pub fn new(cfg: StaticFilesConfig) -> Self {
        Self { cfg }
    }

    /// Maps a request target to a reply, turning traversal attempts into
    /// `Reply::Forbidden`.
    pub fn reply_for(&self, target: &str) -> Reply {
        match path::resolve(&self.cfg.root, target, &self.cfg.index) {
            Resolution::Path(p) => Reply::File(p),
            Resolution::Forbidden => Reply::Forbidden,
        }
    }

    /// Stats and opens `path`. Missing files, directories and unreadable files are
    /// all `NotFound`.
    pub async fn open(&self, path: &ResolvedPath) -> ResponseOutcome {
        match lookup(path).await {
            Lookup::Found(file) => ResponseOutcome::Success {
                content_type: mime::content_type(&path.to_str_lossy()),
                file,
            },
            Lookup::Directory | Lookup::Missing => ResponseOutcome::NotFound,
        }
    }

    /// Writes the full response for `reply` and returns the status sent.
    ///
    /// The stream is left open; closing it is the caller's job.
    pub async fn send<W>(&self, out: &mut W, reply: &Reply) -> anyhow::Result<StatusCode>
    where
        W: AsyncWrite + Unpin,
    {
        let outcome = match reply {
            Reply::File(path) => match lookup(path).await {
                Lookup::Found(file) => ResponseOutcome::Success {
                    content_type: mime::content_type(&path.to_str_lossy()),
                    file,
                },
                Lookup::Directory => ResponseOutcome::NotFound,
                // Images, scripts and the like get no HTML body.
                Lookup::Missing if !mime::is_html(&path.to_str_lossy()) => {
                    return self.send_bare(out, StatusCode::NotFound).await;
                }
                Lookup::Missing => ResponseOutcome::NotFound,
            },
            Reply::BadMethod => ResponseOutcome::BadMethod,
            Reply::Forbidden => ResponseOutcome::Forbidden,
        };

        match outcome {
            ResponseOutcome::Success { content_type, mut file } => {
                let mut writer = ResponseWriter::new(out, self.cfg.chunk_size);
                writer
                    .write_head(&ResponseHead::document(StatusCode::Ok, content_type))
                    .await?;
                writer.stream_body(&mut file).await?;
                Ok(StatusCode::Ok)
            }
            ResponseOutcome::NotFound => self.send_error_page(out, ErrorPage::NotFound).await,
            ResponseOutcome::BadMethod => self.send_error_page(out, ErrorPage::BadRequest).await,
            ResponseOutcome::Forbidden => self.send_error_page(out, ErrorPage::AccessDenied).await,
        }
    }

    async fn send_error_page<W>(&self, out: &mut W, page: ErrorPage) -> anyhow::Result<StatusCode>
    where
        W: AsyncWrite + Unpin,
    {
        let path = ResolvedPath::document(&self.cfg.root, self.cfg.error_page(page));
        let status = page.status();

        match self.open(&path).await {
            ResponseOutcome::Success { content_type, mut file } => {
                let mut writer = ResponseWriter::new(out, self.cfg.chunk_size);
                writer
                    .write_head(&ResponseHead::document(status, content_type))
                    .await?;
                writer.stream_body(&mut file).await?;
                Ok(status)
            }
            _ => {
                debug!(page = ?page, path = %path, "Error page unavailable, sending bare status");
                self.send_bare(out, status).await
            }
        }
    }

    async fn send_bare<W>(&self, out: &mut W, status: StatusCode) -> anyhow::Result<StatusCode>
    where
        W: AsyncWrite + Unpin,
    {
        let mut writer = ResponseWriter::new(out, self.cfg.chunk_size);
        writer.write_head(&ResponseHead::bare(status)).await?;
        Ok(status)
    }
}

async fn lookup(path: &ResolvedPath) -> Lookup {
    match fs::metadata(path.as_path()).await {
        Ok(meta) if meta.is_dir() => {
            debug!(path = %path, "Path is a directory");
            return Lookup::Directory;
        }
        Ok(_) => {}
        Err(e) => {
            debug!(path = %path, error = %e, "Stat failed");
            return Lookup::Missing;
        }
    }

    match File::open(path.as_path()).await {
        Ok(file) => Lookup::Found(file),
        Err(e) => {
            debug!(path = %path, error = %e, "Open failed");
            Lookup::Missing
        }
    }
}
