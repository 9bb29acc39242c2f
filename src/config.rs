//! Server configuration, loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! server on `localhost:8000` serving `./public`.
//!
//! ```toml
//! host = "0.0.0.0"
//! port = 8080
//! root = "/srv/www"
//! index_file = "index.html"
//! read_timeout_secs = 30
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::http::ReadLimits;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory static content is served from.
    pub root: PathBuf,
    /// File served for URIs ending in `/`; an empty name disables the rewrite.
    pub index_file: String,
    /// Seconds a client gets to send its whole request head.
    pub read_timeout_secs: Option<u64>,
    pub max_line_len: usize,
    pub max_head_bytes: usize,
    pub max_lines: usize,
    /// Default `tracing` filter, used when `RUST_LOG` is not set.
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let limits = ReadLimits::default();
        Self {
            host: "localhost".to_owned(),
            port: 8000,
            root: PathBuf::from("public"),
            index_file: "index.html".to_owned(),
            read_timeout_secs: None,
            max_line_len: limits.max_line_len,
            max_head_bytes: limits.max_head_bytes,
            max_lines: limits.max_lines,
            log_level: "info".to_owned(),
        }
    }
}

impl ServerConfig {
    /// Loads and validates configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ServerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_line_len == 0 || self.max_head_bytes == 0 || self.max_lines == 0 {
            return Err(ConfigError::Invalid("read limits must be non-zero".to_owned()));
        }
        if self.max_line_len > self.max_head_bytes {
            return Err(ConfigError::Invalid(format!(
                "max_line_len ({}) exceeds max_head_bytes ({})",
                self.max_line_len, self.max_head_bytes
            )));
        }
        if self.read_timeout_secs == Some(0) {
            return Err(ConfigError::Invalid("read_timeout_secs must be positive".to_owned()));
        }
        if self.index_file.contains('/') {
            return Err(ConfigError::Invalid(
                "index_file must be a plain file name".to_owned(),
            ));
        }
        Ok(())
    }

    /// `host:port` string suitable for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Index file name, if the index rewrite is enabled.
    pub fn index_file(&self) -> Option<&str> {
        Some(self.index_file.as_str()).filter(|name| !name.is_empty())
    }

    pub fn read_limits(&self) -> ReadLimits {
        ReadLimits {
            max_line_len: self.max_line_len,
            max_head_bytes: self.max_head_bytes,
            max_lines: self.max_lines,
        }
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_secs.map(Duration::from_secs)
    }
}
