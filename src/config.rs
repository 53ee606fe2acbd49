//! Server settings.
//!
//! Everything has a compiled-in default. A YAML file named by `DOCSERVE_CONFIG` may
//! replace any of them, and `LISTEN` / `WEB_ROOT` override the two values most often
//! changed by hand.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use crate::http::response::ErrorPage;
use crate::http::writer::DEFAULT_CHUNK_SIZE;

pub const CONFIG_ENV: &str = "DOCSERVE_CONFIG";
pub const LISTEN_ENV: &str = "LISTEN";
pub const WEB_ROOT_ENV: &str = "WEB_ROOT";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub static_files: StaticFilesConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind, e.g. "0.0.0.0:8080"
    pub listen_addr: String,
    /// Pending-connection queue handed to listen(2)
    pub backlog: u32,
    /// Pause between the write half-close and the final close, in milliseconds
    pub linger_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Document root
    pub root: PathBuf,
    /// Served for a request to "/"
    pub index: String,
    pub not_found_page: String,
    pub bad_request_page: String,
    pub access_denied_page: String,
    /// Bytes read from disk per body write
    pub chunk_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            backlog: 128,
            linger_ms: 1,
        }
    }
}

impl ServerConfig {
    pub fn linger(&self) -> Duration {
        Duration::from_millis(self.linger_ms)
    }
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./web"),
            index: "index.html".to_string(),
            not_found_page: "page-not-found.html".to_string(),
            bad_request_page: "bad-request.html".to_string(),
            access_denied_page: "access-denied.html".to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl StaticFilesConfig {
    /// File name of an error document under the root.
    pub fn error_page(&self, page: ErrorPage) -> &str {
        match page {
            ErrorPage::NotFound => &self.not_found_page,
            ErrorPage::BadRequest => &self.bad_request_page,
            ErrorPage::AccessDenied => &self.access_denied_page,
        }
    }
}

impl Config {
    /// Defaults, then the optional YAML file, then environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        let cfg = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        Ok(cfg.with_overrides(|key| std::env::var(key).ok()))
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&text)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_yaml_str(text: &str) -> anyhow::Result<Self> {
        // An empty document deserializes to unit, not to an empty mapping.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Applies `LISTEN` and `WEB_ROOT` as returned by `lookup`.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(addr) = lookup(LISTEN_ENV) {
            self.server.listen_addr = addr;
        }
        if let Some(root) = lookup(WEB_ROOT_ENV) {
            self.static_files.root = PathBuf::from(root);
        }
        self
    }
}
