//! Package registry clients.
//!
//! [`RegistryClient`] is the lookup seam: [`PyPiClient`] talks to the live
//! PyPI JSON API, tests plug in a canned implementation. Lookup failures
//! return `None` rather than an error so one unreachable package never
//! aborts a whole enrichment run.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

/// Default pause between live registry requests.
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 100;
/// Default network timeout for a single registry call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Metadata returned by a registry for one package.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistryMetadata {
    /// The `info` object of the PyPI JSON document.
    #[serde(default)]
    pub info: PackageInfo,
}

/// The author/maintainer/URL subset of registry metadata.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageInfo {
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub author_email: Option<String>,
    #[serde(default)]
    pub maintainer: Option<String>,
    #[serde(default)]
    pub maintainer_email: Option<String>,
    #[serde(default)]
    pub home_page: Option<String>,
    #[serde(default)]
    pub project_urls: Option<HashMap<String, serde_json::Value>>,
}

/// Registry lookup interface.
pub trait RegistryClient: Send + Sync {
    /// Fetch metadata for a package name, `None` when unavailable.
    fn get_package(
        &mut self,
        name: &str,
    ) -> impl std::future::Future<Output = Option<RegistryMetadata>> + Send;
}

/// PyPI JSON API client with in-memory caching.
///
/// A fixed delay is inserted before every live request so bulk enrichment
/// does not hammer the registry. Cache hits skip the delay.
pub struct PyPiClient {
    http: reqwest::Client,
    cache: HashMap<String, Option<RegistryMetadata>>,
    request_delay: Duration,
}

impl PyPiClient {
    /// Create a client with the given inter-request delay and timeout.
    pub fn new(request_delay_ms: u64, timeout_secs: u64) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            http,
            cache: HashMap::new(),
            request_delay: Duration::from_millis(request_delay_ms),
        }
    }
}

impl Default for PyPiClient {
    fn default() -> Self {
        Self::new(DEFAULT_REQUEST_DELAY_MS, DEFAULT_TIMEOUT_SECS)
    }
}

impl RegistryClient for PyPiClient {
    async fn get_package(&mut self, name: &str) -> Option<RegistryMetadata> {
        if let Some(cached) = self.cache.get(name) {
            return cached.clone();
        }

        // Conservative sanitation before URL composition
        if !is_safe_package_name(name) {
            debug!(name, "skipping PyPI lookup due to suspicious name");
            self.cache.insert(name.to_owned(), None);
            return None;
        }

        tokio::time::sleep(self.request_delay).await;

        let url = format!("https://pypi.org/pypi/{name}/json");
        let result = fetch_metadata(&self.http, &url).await;

        if result.is_none() {
            debug!(name, "PyPI lookup yielded no metadata");
        }

        self.cache.insert(name.to_owned(), result.clone());
        result
    }
}

async fn fetch_metadata(http: &reqwest::Client, url: &str) -> Option<RegistryMetadata> {
    let response = match http.get(url).send().await {
        Ok(r) => r,
        Err(e) => {
            debug!(url, error = %e, "registry request failed");
            return None;
        }
    };

    if !response.status().is_success() {
        debug!(url, status = %response.status(), "registry returned non-success");
        return None;
    }

    match response.json::<RegistryMetadata>().await {
        Ok(meta) => Some(meta),
        Err(e) => {
            debug!(url, error = %e, "registry response was not usable JSON");
            None
        }
    }
}

/// Package names safe for URL composition: `[A-Za-z0-9._-]` only.
pub fn is_safe_package_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-')
}
