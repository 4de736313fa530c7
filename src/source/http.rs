use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use log::debug;
use reqwest::{blocking::Client, redirect::Policy};

use super::DataSource;

/// Datasets served as `<base_url>/<dataset>.csv`.
pub struct HttpSource {
    base_url: String,
    client: Client,
}

impl HttpSource {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("geotally/", env!("CARGO_PKG_VERSION")))
            .redirect(Policy::limited(10))
            .timeout(Duration::from_secs(60))
            .build()
            .context("build HTTP client")?;
        Ok(Self::with_client(base_url, client))
    }

    pub fn with_client(base_url: &str, client: Client) -> Self {
        Self { base_url: base_url.trim_end_matches('/').to_string(), client }
    }

    fn url(&self, dataset: &str) -> String { format!("{}/{dataset}.csv", self.base_url) }
}

impl DataSource for HttpSource {
    fn get(&self, dataset: &str) -> Result<Arc<[u8]>> {
        let url = self.url(dataset);
        debug!("[source] GET {url}");

        let resp = self.client.get(&url)
            .send()
            .with_context(|| format!("GET {url}"))?
            .error_for_status()
            .with_context(|| format!("GET {url} returned error status"))?;
        let bytes = resp.bytes().with_context(|| format!("read body of {url}"))?;
        Ok(Arc::from(bytes.as_ref()))
    }

    fn describe(&self) -> String { self.base_url.clone() }
}
