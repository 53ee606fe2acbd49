//! Shared helpers: throwaway document roots and a raw HTTP client.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use docserve::config::{Config, ServerConfig, StaticFilesConfig};
use docserve::server::{Server, Shutdown};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;

pub const INDEX_HTML: &[u8] = b"<html><body><h1>Home</h1></body></html>\n";
pub const NOT_FOUND_HTML: &[u8] = b"<html><body><h1>404 - Page not found</h1></body></html>\n";
pub const BAD_REQUEST_HTML: &[u8] = b"<html><body><h1>400 - Bad request</h1></body></html>\n";
pub const ACCESS_DENIED_HTML: &[u8] = b"<html><body><h1>403 - Access denied</h1></body></html>\n";

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// A document root under the system temp dir, removed on drop.
pub struct DocRoot {
    path: PathBuf,
}

impl DocRoot {
    pub fn empty(name: &str) -> Self {
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!(
            "docserve-{}-{}-{}",
            name,
            std::process::id(),
            id
        ));
        let _ = std::fs::remove_dir_all(&path);
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    /// Root with an index page and all three error pages.
    pub fn site(name: &str) -> Self {
        let root = Self::empty(name);
        root.write("index.html", INDEX_HTML);
        root.write("page-not-found.html", NOT_FOUND_HTML);
        root.write("bad-request.html", BAD_REQUEST_HTML);
        root.write("access-denied.html", ACCESS_DENIED_HTML);
        root
    }

    pub fn write(&self, relative: &str, contents: &[u8]) {
        let path = self.path.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, contents).unwrap();
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> Config {
        Config {
            server: ServerConfig {
                listen_addr: "127.0.0.1:0".to_string(),
                ..ServerConfig::default()
            },
            static_files: StaticFilesConfig {
                root: self.path.clone(),
                ..StaticFilesConfig::default()
            },
        }
    }
}

impl Drop for DocRoot {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

pub struct Running {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<anyhow::Result<()>>,
}

pub fn start(root: &DocRoot) -> Running {
    let shutdown = Shutdown::new();
    let server = Server::bind(&root.config(), shutdown.clone()).unwrap();
    let addr = server.local_addr().unwrap();
    let handle = tokio::spawn(server.run());
    Running {
        addr,
        shutdown,
        handle,
    }
}

/// Sends `raw` in one write and reads until the server closes.
pub async fn send_raw(addr: SocketAddr, raw: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw).await.unwrap();
    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    response
}

pub async fn get(addr: SocketAddr, target: &str) -> Response {
    let raw = format!("GET {} HTTP/1.1\r\nHost: localhost\r\n\r\n", target);
    Response::parse(&send_raw(addr, raw.as_bytes()).await)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status_line: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn parse(bytes: &[u8]) -> Self {
        let end = bytes
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .expect("response has no header terminator");
        let head = std::str::from_utf8(&bytes[..end]).unwrap();
        let mut lines = head.split("\r\n");
        let status_line = lines.next().unwrap().to_string();
        let headers = lines
            .map(|line| {
                let (k, v) = line.split_once(": ").unwrap();
                (k.to_string(), v.to_string())
            })
            .collect();

        Self {
            status_line,
            headers,
            body: bytes[end + 4..].to_vec(),
        }
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}
