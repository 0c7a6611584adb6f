//! Telemetry Catalog Client
//!
//! HTTP client for fetching the agent telemetry reference document and
//! parsing its metric tables into a lookup catalog. The catalog supplies
//! the known-name set used for query validation plus per-metric unit and
//! type metadata used for formatting.

use std::collections::BTreeMap;

use reqwest::Client;
use thiserror::Error;

/// Fetches and parses the telemetry reference document
pub struct CatalogClient {
    client: Client,
    config: CatalogConfig,
}

/// Configuration for the catalog client
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// URL of the telemetry reference document (markdown with metric tables)
    pub url: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: "https://raw.githubusercontent.com/hashicorp/consul/main/website/content/docs/agent/telemetry.mdx"
                .to_string(),
            request_timeout_ms: 5000,
        }
    }
}

impl CatalogClient {
    /// Create a new catalog client with the given configuration
    pub fn new(config: CatalogConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Get the current configuration
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Fetch and parse the telemetry catalog
    pub async fn fetch(&self) -> Result<TelemetryCatalog, CatalogError> {
        let response = self
            .client
            .get(&self.config.url)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CatalogError::Timeout
                } else if e.is_connect() {
                    CatalogError::Unavailable
                } else {
                    CatalogError::Request(e)
                }
            })?;

        if !response.status().is_success() {
            return Err(CatalogError::HttpStatus {
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await.map_err(CatalogError::Request)?;
        let entries = parse_catalog_tables(&body);
        if entries.is_empty() {
            // A reformatted reference page parses to nothing; surface that
            // instead of silently disabling validation.
            return Err(CatalogError::Parse(
                "no metric tables found in telemetry document".to_string(),
            ));
        }

        tracing::debug!("Fetched telemetry catalog with {} entries", entries.len());
        Ok(TelemetryCatalog::from_entries(entries))
    }
}

/// One (name, unit, type) row from the telemetry reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    pub unit: String,
    pub metric_type: String,
}

/// Read-only lookup of known metric names and their unit/type metadata
#[derive(Debug, Default, Clone)]
pub struct TelemetryCatalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl TelemetryCatalog {
    /// Build a catalog from parsed entries
    ///
    /// Also the seam for tests: fakes construct a catalog directly instead
    /// of fetching.
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|entry| (entry.name.clone(), entry))
            .collect();
        Self { entries }
    }

    /// Look up the catalog row for an exact metric name
    pub fn lookup(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.get(name)
    }

    /// Check whether a metric name is known to the catalog
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of catalogued metrics
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entries were parsed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate all known metric names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|name| name.as_str())
    }
}

// ============================================
// Markdown table parsing
// ============================================

/// Extract metric rows from the reference document's pipe tables
///
/// Rows look like:
///
/// ```text
/// | `consul.raft.apply` | Number of Raft transactions | raft txns / interval | counter |
/// ```
///
/// Only rows whose first cell is a backticked metric name are kept, which
/// skips header and separator rows without special-casing them.
fn parse_catalog_tables(document: &str) -> Vec<CatalogEntry> {
    let mut entries = Vec::new();

    for line in document.lines() {
        let line = line.trim();
        if !line.starts_with('|') {
            continue;
        }

        let cells: Vec<&str> = line
            .trim_matches('|')
            .split('|')
            .map(|cell| cell.trim())
            .collect();
        if cells.len() < 4 {
            continue;
        }

        let name = match backticked(cells[0]) {
            Some(name) if !name.is_empty() => name,
            _ => continue,
        };

        entries.push(CatalogEntry {
            name: name.to_string(),
            unit: cells[2].to_string(),
            metric_type: cells[3].to_string(),
        });
    }

    entries
}

/// Strip a surrounding backtick pair, or `None` if the cell has none
fn backticked(cell: &str) -> Option<&str> {
    cell.strip_prefix('`')?.strip_suffix('`')
}

// ============================================
// Errors
// ============================================

/// Errors that can occur while fetching the telemetry catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Telemetry document unavailable")]
    Unavailable,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Telemetry document returned status {status}")]
    HttpStatus { status: u16 },

    #[error("Request timeout")]
    Timeout,

    #[error("Catalog parse error: {0}")]
    Parse(String),
}
