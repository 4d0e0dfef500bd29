//! Process-wide configuration.
//!
//! The server runs from compiled-in defaults. [`Config::from_yaml`] exists so
//! an embedding program can supply the same fields without touching the
//! environment.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_BUFFER_SIZE: usize = 1024;
pub const DEFAULT_ROOT: &str = "www";
pub const DEFAULT_INDEX_FILE: &str = "index.html";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub static_files: StaticFilesConfig,
}

/// Listener settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind (default "127.0.0.1")
    pub host: String,

    /// Port to bind (default 8080)
    pub port: u16,

    /// Upper bound on bytes read for a single request (default 1024)
    pub buffer_size: usize,

    /// Optional bound on how long a client may take to send its request.
    /// `None` waits forever.
    pub read_timeout_secs: Option<u64>,
}

/// Document root settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Directory every served file must live under (default "www")
    pub root: PathBuf,

    /// File served for directory targets (default "index.html")
    pub index_file: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            buffer_size: DEFAULT_BUFFER_SIZE,
            read_timeout_secs: None,
        }
    }
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
            index_file: DEFAULT_INDEX_FILE.to_string(),
        }
    }
}

impl ServerConfig {
    /// `host:port`, suitable for binding.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Config {
    /// Returns the compiled-in configuration.
    pub fn load() -> Self {
        Self::default()
    }

    /// Parses a YAML document; omitted fields keep their defaults.
    pub fn from_yaml(source: &str) -> Result<Self> {
        let cfg: Config = serde_yaml::from_str(source).context("Invalid configuration YAML")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            bail!("Invalid host: host cannot be empty");
        }

        if self.server.port == 0 {
            bail!("Invalid port: port must be between 1 and 65535");
        }

        if self.server.buffer_size == 0 {
            bail!("Invalid buffer_size: must be greater than 0");
        }

        if self.server.read_timeout_secs == Some(0) {
            bail!("Invalid read_timeout_secs: must be greater than 0");
        }

        let index = &self.static_files.index_file;
        if index.is_empty() {
            bail!("Invalid index_file: cannot be empty");
        }
        if index.contains('/') || index.contains('\\') {
            bail!("Invalid index_file: {} must be a bare file name", index);
        }

        Ok(())
    }
}
