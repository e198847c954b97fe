//! Core domain types for extracted catalog records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PartCatalogError;

/// Installation text used when no instruction source was found.
pub const NO_INSTRUCTIONS: &str = "Has no instructions";

/// Installation text used when the detail subpage could not be fetched.
pub const INSTRUCTIONS_NOT_AVAILABLE: &str = "Instructions not available";

/// Compatibility entry used when the cross-reference section has no rows.
pub const NO_COMPATIBILITY_INFO: &str = "No information on model compatibility";

// ---------------------------------------------------------------------------
// CategoryLink
// ---------------------------------------------------------------------------

/// A category link discovered on the catalog root page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryLink {
    /// Raw `href` attribute (usually a site-relative path).
    pub href: String,
    /// Visible link text.
    pub display_text: String,
}

// ---------------------------------------------------------------------------
// InstallationInstructions
// ---------------------------------------------------------------------------

/// Where a part's installation instructions came from.
///
/// Serialized as a plain string: the video URL, the instruction text, or one
/// of the two sentinels.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InstallationInstructions {
    /// Canonical video URL.
    Video(String),
    /// Plain instruction text.
    Text(String),
    /// The detail subpage was unreachable.
    NotAvailable,
    /// Nothing was found.
    #[default]
    NoInstructions,
}

impl InstallationInstructions {
    /// Instructions built from scraped text.
    ///
    /// Text that spells a sentinel or a canonical watch URL takes that
    /// variant, so the value reads back from its string form unchanged.
    pub fn text(value: impl Into<String>) -> Self {
        Self::from(value.into())
    }

    /// String form written to every output format.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Video(url) => url,
            Self::Text(text) => text,
            Self::NotAvailable => INSTRUCTIONS_NOT_AVAILABLE,
            Self::NoInstructions => NO_INSTRUCTIONS,
        }
    }
}

impl fmt::Display for InstallationInstructions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `https://www.youtube.com/watch?v=<id>` or `https://youtube.com/watch?v=<id>`
/// with a non-empty id of URL-safe characters and nothing after it.
fn is_canonical_watch_url(value: &str) -> bool {
    ["https://www.youtube.com/watch?v=", "https://youtube.com/watch?v="]
        .iter()
        .filter_map(|prefix| value.strip_prefix(prefix))
        .any(|id| {
            !id.is_empty()
                && id
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        })
}

/// Classifies a string by content: the two sentinels and canonical watch
/// URLs map to their variants, anything else is `Text`. A `Text` built
/// directly around one of those strings therefore reads back as the other
/// variant; build scraped text with [`InstallationInstructions::text`].
impl From<String> for InstallationInstructions {
    fn from(value: String) -> Self {
        match value.as_str() {
            NO_INSTRUCTIONS => Self::NoInstructions,
            INSTRUCTIONS_NOT_AVAILABLE => Self::NotAvailable,
            v if is_canonical_watch_url(v) => Self::Video(value),
            _ => Self::Text(value),
        }
    }
}

impl From<InstallationInstructions> for String {
    fn from(value: InstallationInstructions) -> Self {
        match value {
            InstallationInstructions::Video(s) | InstallationInstructions::Text(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// PartRecord
// ---------------------------------------------------------------------------

/// One replacement part, merged from its listing entry and detail subpage.
///
/// Every field always carries a value; "unknown" is expressed as zero, an
/// empty list, or a sentinel string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartRecord {
    pub name: String,
    /// Price in dollars, never negative.
    pub price: f64,
    pub in_stock: bool,
    /// Star rating in `[0.0, 5.0]`.
    pub rating: f64,
    pub review_count: u32,
    pub part_select_number: String,
    pub manufacturer_part_number: String,
    pub item_description: String,
    pub fixes_these_symptoms: Vec<String>,
    pub replaces_these_parts: Vec<String>,
    pub installation_instructions: InstallationInstructions,
    pub is_compatible_with: Vec<String>,
}

// ---------------------------------------------------------------------------
// OutputFormat
// ---------------------------------------------------------------------------

/// A serialization target for exported records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Csv,
}

impl OutputFormat {
    /// File extension (without the dot).
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }

    /// Parse a comma-separated list such as `json,csv`, keeping first-seen order.
    pub fn parse_list(s: &str) -> Result<Vec<Self>, PartCatalogError> {
        let mut formats = Vec::new();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let format: Self = part.parse()?;
            if !formats.contains(&format) {
                formats.push(format);
            }
        }
        if formats.is_empty() {
            return Err(PartCatalogError::validation("no output formats given"));
        }
        Ok(formats)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = PartCatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(PartCatalogError::validation(format!(
                "unknown output format '{other}': expected 'json' or 'csv'"
            ))),
        }
    }
}
