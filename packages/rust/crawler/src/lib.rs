//! Catalog page fetching and part extraction.
//!
//! This crate provides:
//! - [`fetch`]: the [`Fetcher`] transport trait and its HTTP implementation
//! - [`fields`]: the declarative field table applied to each listing entry
//! - [`detail`]: detail subpage resolution
//! - [`listing`]: the category listing walker that assembles records
//! - [`selectors`]: every CSS selector the extractors rely on

pub mod detail;
pub mod fetch;
pub mod fields;
pub mod listing;
pub mod progress;
pub mod selectors;

pub use detail::{Detail, DetailResult, parse_detail, resolve_detail};
pub use fetch::{Fetcher, HttpFetcher, resolve_link};
pub use fields::{
    EntryError, EntryFields, ExtractedFields, FIELD_TABLE, Field, FieldSpec, FieldValue,
};
pub use listing::{ListingEntry, WalkOptions, assemble_record, parse_listing, walk_listing};
pub use progress::{ProgressReporter, SilentProgress};
