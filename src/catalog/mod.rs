//! Telemetry catalog integration
//!
//! - **client**: HTTP fetch of the telemetry reference document and the
//!   markdown table parser that turns it into a name → (unit, type) lookup
//!
//! The catalog is optional everywhere it is consumed. A fetch failure
//! degrades queries to placeholder units and skipped validation, it never
//! blocks them.

pub mod client;

pub use client::{CatalogClient, CatalogConfig, CatalogEntry, CatalogError, TelemetryCatalog};
