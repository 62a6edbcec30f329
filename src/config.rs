use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::Error;

/// Service settings, loaded from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub keys: KeyConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// JSON Lines file the sealed conversion records are appended to.
    #[serde(default = "default_records_path")]
    pub records_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeyConfig {
    /// Raw 32-byte symmetric master key.
    #[serde(default = "default_master_key_path")]
    pub master_key_path: PathBuf,
    /// X25519 secret key, wrapped under the master key.
    #[serde(default = "default_secret_key_path")]
    pub secret_key_path: PathBuf,
    /// Raw X25519 public key.
    #[serde(default = "default_public_key_path")]
    pub public_key_path: PathBuf,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_records_path() -> PathBuf {
    PathBuf::from("measurements.jsonl")
}

fn default_master_key_path() -> PathBuf {
    PathBuf::from("master.key")
}

fn default_secret_key_path() -> PathBuf {
    PathBuf::from("record_secret.key")
}

fn default_public_key_path() -> PathBuf {
    PathBuf::from("record_public.key")
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            records_path: default_records_path(),
        }
    }
}

impl Default for KeyConfig {
    fn default() -> Self {
        KeyConfig {
            master_key_path: default_master_key_path(),
            secret_key_path: default_secret_key_path(),
            public_key_path: default_public_key_path(),
        }
    }
}

impl Settings {
    /// Parses settings from a TOML string. Every field has a default, so a
    /// partial (or empty) document is legal.
    pub fn from_toml(content: &str) -> Result<Self, Error> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// The compiled-in defaults.
    pub fn load_default() -> Result<Self, Error> {
        Self::from_toml(include_str!("../pack-tally.toml"))
    }

    /// Loads settings from a specific file path.
    pub fn load_from_file(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_toml(&content)
    }

    /// Loads settings with overrides:
    /// 1. an explicit `path`, when given;
    /// 2. otherwise `./pack-tally.toml`, when present;
    /// 3. otherwise the compiled-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }
        let local = Path::new("pack-tally.toml");
        if local.exists() {
            return Self::load_from_file(local);
        }
        Self::load_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiled_in_defaults_parse() {
        let settings = Settings::load_default().unwrap();
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.storage.records_path, default_records_path());
    }

    #[test]
    fn empty_document_falls_back_to_defaults() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.keys.master_key_path, default_master_key_path());
    }

    #[test]
    fn partial_document_overrides_only_named_fields() {
        let settings = Settings::from_toml(
            r#"
[server]
port = 9000

[storage]
records_path = "/var/lib/pack-tally/records.jsonl"
"#,
        )
        .unwrap();
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(
            settings.storage.records_path,
            PathBuf::from("/var/lib/pack-tally/records.jsonl")
        );
        assert_eq!(settings.keys.secret_key_path, default_secret_key_path());
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        assert!(matches!(
            Settings::from_toml("[server\nport ="),
            Err(Error::Config(_))
        ));
    }
}
