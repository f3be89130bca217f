//! Server configuration.
//!
//! Configuration is read from a YAML file and then patched with a few
//! environment variables. Every field has a default, so a missing or empty
//! file still yields a usable config.
//!
//! ```yaml
//! server:
//!   listen_addr: "127.0.0.1:10000"
//!   backlog: 1
//!   max_request_bytes: 8192
//!   read_timeout_secs: 30
//! static_files:
//!   root: "webroot"
//! ```

use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "CONFIG";
/// Environment variable overriding `server.listen_addr`.
pub const LISTEN_ENV: &str = "LISTEN";
/// Environment variable overriding `static_files.root`.
pub const WEBROOT_ENV: &str = "WEBROOT";

const DEFAULT_CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub static_files: StaticFilesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Pending-connection queue length passed to `listen(2)`.
    #[serde(default = "default_backlog")]
    pub backlog: u32,

    /// Upper bound on bytes buffered while waiting for the header terminator.
    #[serde(default = "default_max_request_bytes")]
    pub max_request_bytes: usize,

    /// Per-read timeout. `None` waits forever.
    #[serde(default)]
    pub read_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StaticFilesConfig {
    #[serde(default = "default_root")]
    pub root: PathBuf,
}

fn default_listen_addr() -> String {
    "127.0.0.1:10000".to_string()
}

fn default_backlog() -> u32 {
    1
}

fn default_max_request_bytes() -> usize {
    8192
}

fn default_root() -> PathBuf {
    PathBuf::from("webroot")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            backlog: default_backlog(),
            max_request_bytes: default_max_request_bytes(),
            read_timeout_secs: None,
        }
    }
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self { root: default_root() }
    }
}

impl Config {
    /// Loads the config file named by `CONFIG` (or `config.yaml`) and applies
    /// environment overrides.
    ///
    /// A missing `config.yaml` is not an error; a missing file that was named
    /// explicitly through `CONFIG` is.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(&path)?,
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(DEFAULT_CONFIG_FILE)?
            }
            Err(_) => Self::default(),
        };

        cfg.apply_overrides(|key| std::env::var(key).ok());
        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        Self::from_yaml_str(&raw)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_yaml_str(raw: &str) -> anyhow::Result<Self> {
        // serde_yaml rejects an empty document for a struct
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Applies `LISTEN` and `WEBROOT` overrides using `lookup` to read
    /// variables.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup(LISTEN_ENV) {
            self.server.listen_addr = addr;
        }
        if let Some(root) = lookup(WEBROOT_ENV) {
            self.static_files.root = PathBuf::from(root);
        }
    }
}
