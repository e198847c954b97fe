//! Core pipeline orchestration for PartCatalog.
//!
//! Ties together category discovery, listing walks, and export into the
//! end-to-end `scrape` workflow.

pub mod pipeline;

pub use partcatalog_crawler::{ProgressReporter, SilentProgress};
pub use pipeline::{RunResult, ScrapeResult, run, run_with, scrape_catalog};
