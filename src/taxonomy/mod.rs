//! Category taxonomy: wire format, flattening, and the lookup services that
//! provide it.

mod loader;

pub use loader::{CategoryOptions, LoadState, TaxonomyTask};

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::errors::FormError;

/// One top-level group of the taxonomy response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyGroup {
    #[serde(rename = "DirectorySubcategories")]
    pub subcategories: Vec<TaxonomySubcategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxonomySubcategory {
    pub subcategory: String,
}

impl TaxonomyGroup {
    #[cfg(test)]
    pub(crate) fn of<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            subcategories: names
                .into_iter()
                .map(|name| TaxonomySubcategory {
                    subcategory: name.into(),
                })
                .collect(),
        }
    }
}

/// Flattens group → subcategory names, dropping repeats but keeping the
/// order in which names first appear.
pub fn flatten_taxonomy(groups: &[TaxonomyGroup]) -> Vec<String> {
    let mut seen = HashSet::new();
    groups
        .iter()
        .flat_map(|group| group.subcategories.iter())
        .filter(|entry| seen.insert(entry.subcategory.as_str()))
        .map(|entry| entry.subcategory.clone())
        .collect()
}

pub fn parse_taxonomy(body: &str) -> Result<Vec<TaxonomyGroup>, FormError> {
    Ok(serde_json::from_str(body)?)
}

/// Lookup service that provides the category taxonomy.
#[async_trait]
pub trait CategorySource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<TaxonomyGroup>, FormError>;

    /// Human-readable origin used in logs.
    fn describe(&self) -> String;
}

/// Fetches the taxonomy with a single `GET`.
pub struct HttpCategorySource {
    url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpCategorySource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.categories_url.clone())
            .with_timeout(Duration::from_secs(config.request_timeout_secs))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl CategorySource for HttpCategorySource {
    async fn fetch(&self) -> Result<Vec<TaxonomyGroup>, FormError> {
        debug!(url = %self.url, "requesting category taxonomy");
        let response = self
            .client
            .get(&self.url)
            .header("Accept", "application/json")
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FormError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        parse_taxonomy(&body)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Serves a fixed taxonomy; used offline and in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticCategorySource {
    groups: Vec<TaxonomyGroup>,
}

impl StaticCategorySource {
    pub fn new(groups: Vec<TaxonomyGroup>) -> Self {
        Self { groups }
    }
}

#[async_trait]
impl CategorySource for StaticCategorySource {
    async fn fetch(&self) -> Result<Vec<TaxonomyGroup>, FormError> {
        Ok(self.groups.clone())
    }

    fn describe(&self) -> String {
        "static taxonomy".to_string()
    }
}
