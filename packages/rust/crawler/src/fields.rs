//! Field extraction for listing entries.
//!
//! Each field is one row in [`FIELD_TABLE`]: a locator that pulls raw text
//! out of the entry node, a transform that turns it into a typed value, and
//! an optional default. [`extract_field`] applies one row; adding a field
//! is a new row, not new control flow.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use scraper::ElementRef;

use partcatalog_shared::markup::{
    next_sibling_element, next_text_sibling, select_first, text_of,
};

use crate::selectors::listing;

static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// Highest star rating; the overlay width is a percentage of it.
const MAX_RATING: f64 = 5.0;

// ---------------------------------------------------------------------------
// Field model
// ---------------------------------------------------------------------------

/// A field pulled from a listing entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Price,
    InStock,
    Rating,
    ReviewCount,
    PartSelectNumber,
    ManufacturerPartNumber,
    ItemDescription,
}

impl Field {
    /// Name used in log output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Price => "price",
            Self::InStock => "in_stock",
            Self::Rating => "rating",
            Self::ReviewCount => "review_count",
            Self::PartSelectNumber => "part_select_number",
            Self::ManufacturerPartNumber => "manufacturer_part_number",
            Self::ItemDescription => "item_description",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Decimal(f64),
    Count(u32),
    Flag(bool),
}

/// One row of the extraction table.
pub struct FieldSpec {
    pub field: Field,
    /// Pulls the raw value out of the entry node, if present.
    pub locate: fn(ElementRef<'_>) -> Option<String>,
    /// Turns the raw value into a typed one; `None` means malformed.
    pub transform: fn(&str) -> Option<FieldValue>,
    /// Used when the locator misses or the transform rejects. `None` marks
    /// the field as required.
    pub default: Option<FieldValue>,
}

/// Every listing field, in record order.
pub static FIELD_TABLE: [FieldSpec; 8] = [
    FieldSpec {
        field: Field::Name,
        locate: locate_name,
        transform: non_empty_text,
        default: None,
    },
    FieldSpec {
        field: Field::Price,
        locate: locate_price,
        transform: parse_price,
        default: Some(FieldValue::Decimal(0.0)),
    },
    FieldSpec {
        field: Field::InStock,
        locate: locate_stock,
        transform: parse_in_stock,
        default: Some(FieldValue::Flag(false)),
    },
    FieldSpec {
        field: Field::Rating,
        locate: locate_rating,
        transform: parse_rating,
        default: Some(FieldValue::Decimal(0.0)),
    },
    FieldSpec {
        field: Field::ReviewCount,
        locate: locate_review_count,
        transform: parse_review_count,
        default: Some(FieldValue::Count(0)),
    },
    FieldSpec {
        field: Field::PartSelectNumber,
        locate: locate_part_select_number,
        transform: non_empty_text,
        default: None,
    },
    FieldSpec {
        field: Field::ManufacturerPartNumber,
        locate: locate_manufacturer_number,
        transform: non_empty_text,
        default: None,
    },
    FieldSpec {
        field: Field::ItemDescription,
        locate: locate_description,
        transform: any_text,
        default: Some(FieldValue::Text(String::new())),
    },
];

/// Apply one table row to an entry node.
pub fn extract_field(spec: &FieldSpec, entry: ElementRef<'_>) -> Option<FieldValue> {
    (spec.locate)(entry)
        .and_then(|raw| (spec.transform)(&raw))
        .or_else(|| spec.default.clone())
}

// ---------------------------------------------------------------------------
// Extracted fields
// ---------------------------------------------------------------------------

/// A required field could not be extracted from an entry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntryError {
    #[error("required field `{0}` is missing")]
    MissingField(Field),
}

/// Raw results of running the whole table over one entry.
#[derive(Debug, Clone, Default)]
pub struct ExtractedFields {
    values: HashMap<Field, FieldValue>,
}

impl ExtractedFields {
    /// Run every row of [`FIELD_TABLE`] over `entry`.
    pub fn extract(entry: ElementRef<'_>) -> Self {
        let values = FIELD_TABLE
            .iter()
            .filter_map(|spec| extract_field(spec, entry).map(|v| (spec.field, v)))
            .collect();
        Self { values }
    }

    fn text(&self, field: Field) -> Result<String, EntryError> {
        match self.values.get(&field) {
            Some(FieldValue::Text(s)) => Ok(s.clone()),
            _ => Err(EntryError::MissingField(field)),
        }
    }

    fn decimal(&self, field: Field) -> Result<f64, EntryError> {
        match self.values.get(&field) {
            Some(FieldValue::Decimal(v)) => Ok(*v),
            _ => Err(EntryError::MissingField(field)),
        }
    }

    fn count(&self, field: Field) -> Result<u32, EntryError> {
        match self.values.get(&field) {
            Some(FieldValue::Count(v)) => Ok(*v),
            _ => Err(EntryError::MissingField(field)),
        }
    }

    fn flag(&self, field: Field) -> Result<bool, EntryError> {
        match self.values.get(&field) {
            Some(FieldValue::Flag(v)) => Ok(*v),
            _ => Err(EntryError::MissingField(field)),
        }
    }
}

/// The listing-level part of a record, with every field resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryFields {
    pub name: String,
    pub price: f64,
    pub in_stock: bool,
    pub rating: f64,
    pub review_count: u32,
    pub part_select_number: String,
    pub manufacturer_part_number: String,
    pub item_description: String,
}

impl TryFrom<ExtractedFields> for EntryFields {
    type Error = EntryError;

    fn try_from(fields: ExtractedFields) -> Result<Self, Self::Error> {
        Ok(Self {
            name: fields.text(Field::Name)?,
            price: fields.decimal(Field::Price)?,
            in_stock: fields.flag(Field::InStock)?,
            rating: fields.decimal(Field::Rating)?,
            review_count: fields.count(Field::ReviewCount)?,
            part_select_number: fields.text(Field::PartSelectNumber)?,
            manufacturer_part_number: fields.text(Field::ManufacturerPartNumber)?,
            item_description: fields.text(Field::ItemDescription)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Locators
// ---------------------------------------------------------------------------

fn locate_name(entry: ElementRef<'_>) -> Option<String> {
    select_first(entry, &listing::NAME).map(text_of)
}

fn locate_price(entry: ElementRef<'_>) -> Option<String> {
    select_first(entry, &listing::PRICE).map(text_of)
}

fn locate_stock(entry: ElementRef<'_>) -> Option<String> {
    let stock = select_first(entry, &listing::STOCK)?;
    next_sibling_element(stock, &listing::SPAN).map(text_of)
}

fn locate_rating(entry: ElementRef<'_>) -> Option<String> {
    select_first(entry, &listing::RATING)
        .and_then(|el| el.value().attr("style"))
        .map(str::to_string)
}

fn locate_review_count(entry: ElementRef<'_>) -> Option<String> {
    select_first(entry, &listing::REVIEW_COUNT).map(text_of)
}

fn locate_part_select_number(entry: ElementRef<'_>) -> Option<String> {
    select_first(entry, &listing::PART_SELECT_NUMBER).map(text_of)
}

fn locate_manufacturer_number(entry: ElementRef<'_>) -> Option<String> {
    let block = select_first(entry, &listing::MANUFACTURER_NUMBER_DIV)?;
    select_first(block, &listing::STRONG).map(text_of)
}

fn locate_description(entry: ElementRef<'_>) -> Option<String> {
    select_first(entry, &listing::MANUFACTURER_NUMBER_DIV).and_then(next_text_sibling)
}

// ---------------------------------------------------------------------------
// Transforms
// ---------------------------------------------------------------------------

fn non_empty_text(raw: &str) -> Option<FieldValue> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| FieldValue::Text(trimmed.to_string()))
}

fn any_text(raw: &str) -> Option<FieldValue> {
    Some(FieldValue::Text(raw.trim().to_string()))
}

/// `"$12.50 "` → `12.5`. Negative or unparseable prices are rejected.
fn parse_price(raw: &str) -> Option<FieldValue> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(FieldValue::Decimal)
}

fn parse_in_stock(raw: &str) -> Option<FieldValue> {
    Some(FieldValue::Flag(raw.contains("In Stock")))
}

/// `"width:80%"` → `4.0`, clamped to `[0, 5]`.
fn parse_rating(raw: &str) -> Option<FieldValue> {
    let numeric: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    numeric
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|percent| FieldValue::Decimal((percent / 20.0).clamp(0.0, MAX_RATING)))
}

/// `"(123 reviews)"` → `123`.
fn parse_review_count(raw: &str) -> Option<FieldValue> {
    let stripped = raw.replace(['(', ')'], "");
    DIGITS
        .find(&stripped)
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .map(FieldValue::Count)
}
