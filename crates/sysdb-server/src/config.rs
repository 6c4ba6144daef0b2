//! Server configuration (ambient stack, SPEC_FULL.md "Configuration"): a
//! small TOML file mirroring the shape of the teacher's `FluffConfig` —
//! `from_file` for an explicit path, `default` otherwise.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tcp_listen: Option<SocketAddr>,
    #[serde(default)]
    pub unix_socket: Option<PathBuf>,
    #[serde(default)]
    pub log_level: Option<String>,
    /// Overrides the compile-time crate version in `SERVER_VERSION`
    /// replies; `None` uses `env!("CARGO_PKG_VERSION")`.
    #[serde(default)]
    pub server_version: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tcp_listen: Some("127.0.0.1:9543".parse().unwrap()),
            unix_socket: None,
            log_level: None,
            server_version: None,
        }
    }
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Config> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn version_string(&self) -> String {
        let version = self
            .server_version
            .as_deref()
            .unwrap_or(env!("CARGO_PKG_VERSION"));
        format!("sysdb {version}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_listens_on_loopback() {
        let cfg = Config::default();
        assert!(cfg.tcp_listen.is_some());
        assert!(cfg.unix_socket.is_none());
    }

    #[test]
    fn version_string_falls_back_to_crate_version() {
        let cfg = Config::default();
        assert_eq!(cfg.version_string(), format!("sysdb {}", env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn from_file_parses_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sysdbd.toml");
        std::fs::write(&path, "unix_socket = \"/tmp/sysdbd.sock\"\n").unwrap();
        let cfg = Config::from_file(&path).unwrap();
        assert_eq!(cfg.unix_socket, Some(PathBuf::from("/tmp/sysdbd.sock")));
        // fields absent from the file keep their serde(default) values.
        assert!(cfg.tcp_listen.is_none());
    }

    #[test]
    fn from_file_missing_path_is_an_error() {
        assert!(Config::from_file("/nonexistent/sysdbd.toml").is_err());
    }
}
