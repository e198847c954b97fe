//! Shared types, error model, configuration, and markup helpers for PartCatalog.
//!
//! This crate is the foundation depended on by all other PartCatalog crates.
//! It provides:
//! - [`PartCatalogError`]: the unified error type
//! - Domain types ([`PartRecord`], [`CategoryLink`], [`InstallationInstructions`])
//! - Configuration ([`AppConfig`], [`ScrapeConfig`], [`ExportConfig`], config loading)
//! - [`markup`]: document-order navigation over parsed pages

pub mod config;
pub mod error;
pub mod markup;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CatalogConfig, ExportConfig, HttpConfig, OutputConfig, ScrapeConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from,
};
pub use error::{PartCatalogError, Result};
pub use types::{
    CategoryLink, INSTRUCTIONS_NOT_AVAILABLE, InstallationInstructions, NO_COMPATIBILITY_INFO,
    NO_INSTRUCTIONS, OutputFormat, PartRecord,
};
