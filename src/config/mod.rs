//! Configuration module for listing collection
//!
//! This module provides the `HarvestConfig` struct, its type-safe builder,
//! and the site selector set that tells the engine where records, menus and
//! pagination controls live.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod methods;
pub mod selectors;
pub mod types;

// Re-exports for public API
pub use builder::{HarvestConfigBuilder, WithBaseUrl, WithOutputDir};
pub use selectors::SiteSelectors;
pub use types::{HarvestConfig, ListingMode, OutputFormat};
