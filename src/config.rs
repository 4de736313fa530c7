use std::{path::{Path, PathBuf}, time::Duration};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::session::CachePolicy;

/// Runtime configuration, usually read from a TOML file.
///
/// ```toml
/// enriched_dataset = "enriched_subdistricts"
///
/// [warehouse]
/// project = "dev-ind-geo-01"
/// boundary_dataset = "geoprocessed"
///
/// [cache]
/// ttl_secs = 3600
///
/// [source]
/// data_dir = "data"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub enriched_dataset: EnrichedDataset,
    pub warehouse: WarehouseConfig,
    pub cache: CacheConfig,
    pub source: SourceConfig,
}

/// Dataset id of the per-subdistrict enriched table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnrichedDataset(pub String);

impl Default for EnrichedDataset {
    fn default() -> Self { Self("enriched_subdistricts".into()) }
}

/// Where server-side queries point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarehouseConfig {
    pub project: String,
    /// Dataset holding the level boundary tables.
    pub boundary_dataset: String,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            project: "dev-ind-geo-01".into(),
            boundary_dataset: "geoprocessed".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Seconds before a cached dataset is refetched; absent means never.
    pub ttl_secs: Option<u64>,
}

impl CacheConfig {
    pub fn policy(&self) -> CachePolicy {
        match self.ttl_secs {
            Some(secs) => CachePolicy::Ttl(Duration::from_secs(secs)),
            None => CachePolicy::Forever,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Directory of `<dataset>.csv` files.
    pub data_dir: Option<PathBuf>,
    /// Base URL serving `<dataset>.csv` files.
    pub base_url: Option<String>,
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }
}
