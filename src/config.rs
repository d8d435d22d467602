use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;

use anyhow::{ensure, Context};
use serde::Deserialize;

use crate::ids::IdPolicy;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub base_url: String,
    #[serde(default = "default_bind")]
    pub bind: IpAddr,
    pub port: u16,
    pub limits: Limits,
    #[serde(default)]
    pub ids: IdPolicy,
    pub storage: Storage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
    pub kind: StorageKind,
    #[cfg(feature = "sqlite")]
    pub sql: Option<SqlStorage>,
    pub purge_interval_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[cfg(feature = "sqlite")]
pub struct SqlStorage {
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Memory,
    #[cfg(feature = "sqlite")]
    Sql,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Limits {
    pub max_upload_size: usize,
}

fn default_bind() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

impl Config {
    /// Read and validate a config file.
    pub async fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(text).context("failed to deserialize config")?;

        ensure!(config.ids.length > 0, "ids.length must be at least 1");
        ensure!(config.ids.max_retries > 0, "ids.max_retries must be at least 1");
        ensure!(
            config.storage.purge_interval_secs != Some(0),
            "storage.purge_interval_secs must be at least 1"
        );

        Ok(config)
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        base_url = "https://pb.example.com/"
        port = 8080

        [limits]
        max_upload_size = 1048576

        [storage]
        kind = "memory"
    "#;

    #[test]
    fn defaults_fill_in_id_policy_and_bind() {
        let config = Config::parse(MINIMAL).unwrap();
        assert_eq!(config.ids.length, 4);
        assert_eq!(config.ids.max_retries, 10);
        assert_eq!(config.bind, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(config.storage.kind, StorageKind::Memory);
        assert_eq!(config.storage.purge_interval_secs, None);
    }

    #[test]
    fn base_url_drops_trailing_slash() {
        let config = Config::parse(MINIMAL).unwrap();
        assert_eq!(config.base_url(), "https://pb.example.com");
    }

    #[test]
    fn zero_length_ids_are_rejected() {
        let text = format!("{MINIMAL}\n[ids]\nlength = 0\nmax_retries = 3\n");
        assert!(Config::parse(&text).is_err());
    }

    #[test]
    fn zero_purge_interval_is_rejected() {
        let text = MINIMAL.replace(
            "kind = \"memory\"",
            "kind = \"memory\"\npurge_interval_secs = 0",
        );
        assert!(Config::parse(&text).is_err());
    }

    #[test]
    fn zero_retries_are_rejected() {
        let text = format!("{MINIMAL}\n[ids]\nlength = 6\nmax_retries = 0\n");
        assert!(Config::parse(&text).is_err());
    }
}
