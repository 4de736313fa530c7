//! Providers of the tabular inputs: the enriched dataset and the level
//! boundary tables, each addressed by a dataset id.

#[cfg(feature = "download")]
mod http;

#[cfg(feature = "download")]
pub use http::HttpSource;

use std::{collections::HashMap, path::PathBuf, sync::Arc};

use anyhow::{anyhow, Context, Result};
use polars::frame::DataFrame;

use crate::io::csv::{read_csv, read_csv_bytes};

/// Read-only access to datasets by id, e.g. "subdistricts" or
/// "enriched_subdistricts". Datasets are CSV; failures propagate unchanged
/// and are never retried here.
pub trait DataSource {
    /// Raw CSV bytes of `dataset`.
    fn get(&self, dataset: &str) -> Result<Arc<[u8]>>;

    /// Human-readable location, for logs.
    fn describe(&self) -> String;

    /// `dataset` parsed into a frame with every column as text.
    fn fetch(&self, dataset: &str) -> Result<DataFrame> {
        let bytes = self.get(dataset)?;
        read_csv_bytes(&bytes)
            .with_context(|| format!("dataset {dataset:?} from {} is not valid CSV", self.describe()))
    }
}

impl DataSource for Box<dyn DataSource> {
    fn get(&self, dataset: &str) -> Result<Arc<[u8]>> { (**self).get(dataset) }

    fn describe(&self) -> String { (**self).describe() }

    fn fetch(&self, dataset: &str) -> Result<DataFrame> { (**self).fetch(dataset) }
}

/// Directory of `<dataset>.csv` files.
pub struct DiskSource {
    root: PathBuf,
}

impl DiskSource {
    pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

    fn full(&self, dataset: &str) -> PathBuf { self.root.join(format!("{dataset}.csv")) }
}

impl DataSource for DiskSource {
    fn get(&self, dataset: &str) -> Result<Arc<[u8]>> {
        let path = self.full(dataset);
        let bytes = std::fs::read(&path)
            .with_context(|| format!("Failed to read dataset {dataset:?} at {}", path.display()))?;
        Ok(Arc::from(bytes))
    }

    fn describe(&self) -> String { self.root.display().to_string() }

    /// Parsed straight from the file so errors name the path.
    fn fetch(&self, dataset: &str) -> Result<DataFrame> {
        read_csv(&self.full(dataset))
            .with_context(|| format!("Failed to load dataset {dataset:?}"))
    }
}

/// Simple in-memory source.
/// Keys are dataset ids, values CSV bytes.
#[derive(Default, Clone)]
pub struct MemSource {
    pub(crate) files: HashMap<String, Arc<[u8]>>,
}

impl MemSource {
    pub fn new(files: HashMap<String, Arc<[u8]>>) -> Self { Self { files } }

    pub fn insert(&mut self, dataset: &str, csv: impl AsRef<[u8]>) {
        self.files.insert(dataset.to_string(), Arc::from(csv.as_ref()));
    }

    pub fn with(mut self, dataset: &str, csv: impl AsRef<[u8]>) -> Self {
        self.insert(dataset, csv);
        self
    }
}

impl DataSource for MemSource {
    fn get(&self, dataset: &str) -> Result<Arc<[u8]>> {
        self.files.get(dataset).cloned()
            .ok_or_else(|| anyhow!("missing dataset: {dataset}"))
    }

    fn describe(&self) -> String { "memory".into() }
}
