//! Category listing walker.
//!
//! Enumerates listing entries on a category page, extracts their fields,
//! resolves detail subpages, and assembles one [`PartRecord`] per entry in
//! document order.

use futures::stream::{self, StreamExt};
use scraper::{ElementRef, Html};
use tracing::{debug, info, instrument, warn};
use url::Url;

use partcatalog_shared::PartRecord;
use partcatalog_shared::markup::{select_first, text_of};

use crate::detail::{Detail, resolve_detail};
use crate::fetch::{Fetcher, resolve_link};
use crate::fields::{EntryError, EntryFields, ExtractedFields};
use crate::progress::ProgressReporter;
use crate::selectors::listing;

/// Options for walking one category page.
#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// Maximum detail subpages in flight at once (1 = sequential).
    pub detail_concurrency: usize,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            detail_concurrency: 1,
        }
    }
}

/// Everything the listing page says about one part.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingEntry {
    pub fields: EntryFields,
    /// `href` of the "see more" link into the detail subpage.
    pub detail_href: Option<String>,
    /// Fallback installation text shown on the listing itself.
    pub alternative_instructions: Option<String>,
}

impl ListingEntry {
    /// Extract one entry node. Fails only when a required field is missing.
    pub fn from_node(entry: ElementRef<'_>) -> Result<Self, EntryError> {
        let fields = EntryFields::try_from(ExtractedFields::extract(entry))?;

        let detail_href = select_first(entry, &listing::SEE_MORE)
            .and_then(|a| a.value().attr("href"))
            .map(str::trim)
            .filter(|href| !href.is_empty())
            .map(str::to_string);

        let alternative_instructions = select_first(entry, &listing::ALTERNATIVE_INSTRUCTIONS)
            .map(text_of)
            .filter(|t| !t.is_empty());

        Ok(Self {
            fields,
            detail_href,
            alternative_instructions,
        })
    }
}

/// Parse every well-formed entry on a category page, in document order.
///
/// Entries missing a required field are dropped with a warning.
pub fn parse_listing(markup: &str) -> Vec<ListingEntry> {
    let doc = Html::parse_document(markup);
    let mut entries = Vec::new();

    for (index, node) in doc.select(&listing::ENTRY).enumerate() {
        match ListingEntry::from_node(node) {
            Ok(entry) => entries.push(entry),
            Err(e) => warn!(index, error = %e, "dropping malformed listing entry"),
        }
    }

    debug!(entries = entries.len(), "parsed listing page");
    entries
}

/// Walk a category page: extract entries, resolve their detail subpages,
/// and return the assembled records in document order.
#[instrument(skip_all, fields(base = %base))]
pub async fn walk_listing<F: Fetcher>(
    fetcher: &F,
    base: &Url,
    markup: &str,
    opts: &WalkOptions,
    progress: &dyn ProgressReporter,
) -> Vec<PartRecord> {
    let entries = parse_listing(markup);

    // `buffered` yields in input order, so records keep document order even
    // when several subpages are in flight.
    let details: Vec<Option<Detail>> = stream::iter(entries.iter())
        .map(|entry| async move {
            let href = entry.detail_href.as_deref()?;
            let alternative = entry.alternative_instructions.as_deref();
            Some(fetch_detail(fetcher, base, href, alternative, progress).await)
        })
        .buffered(opts.detail_concurrency.max(1))
        .collect()
        .await;

    let records: Vec<PartRecord> = entries
        .into_iter()
        .zip(details)
        .map(|(entry, detail)| assemble_record(entry, detail))
        .collect();

    info!(records = records.len(), "listing walk complete");
    records
}

async fn fetch_detail<F: Fetcher>(
    fetcher: &F,
    base: &Url,
    href: &str,
    alternative_instructions: Option<&str>,
    progress: &dyn ProgressReporter,
) -> Detail {
    let url = match resolve_link(base, href) {
        Ok(url) => url,
        Err(e) => {
            warn!(href, error = %e, "skipping detail link");
            return Detail::Unavailable {
                reason: e.to_string(),
            };
        }
    };

    info!(%url, "searching detail page");
    progress.page_visited(url.as_str());
    resolve_detail(fetcher, &url, alternative_instructions).await
}

/// Merge a listing entry with its (optional) detail outcome.
pub fn assemble_record(entry: ListingEntry, detail: Option<Detail>) -> PartRecord {
    let detail = detail.map(Detail::into_result).unwrap_or_default();
    let fields = entry.fields;

    PartRecord {
        name: fields.name,
        price: fields.price,
        in_stock: fields.in_stock,
        rating: fields.rating,
        review_count: fields.review_count,
        part_select_number: fields.part_select_number,
        manufacturer_part_number: fields.manufacturer_part_number,
        item_description: fields.item_description,
        fixes_these_symptoms: detail.symptoms,
        replaces_these_parts: detail.replaces,
        installation_instructions: detail.installation,
        is_compatible_with: detail.compatible_models,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::SilentProgress;
    use partcatalog_shared::{
        InstallationInstructions, NO_COMPATIBILITY_INFO, PartCatalogError, Result,
    };
    use std::collections::HashMap;
    use std::sync::Mutex;

    fn load_fixture(name: &str) -> String {
        let path = format!("{}/../../../fixtures/html/{name}", env!("CARGO_MANIFEST_DIR"));
        std::fs::read_to_string(&path).unwrap_or_else(|_| panic!("missing fixture: {path}"))
    }

    /// In-memory fetcher that records the order of requests.
    struct MapFetcher {
        pages: HashMap<String, String>,
        requested: Mutex<Vec<String>>,
    }

    impl MapFetcher {
        fn new(pages: &[(&str, String)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(url, body)| (url.to_string(), body.clone()))
                    .collect(),
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    impl Fetcher for MapFetcher {
        async fn fetch(&self, url: &Url) -> Result<String> {
            self.requested.lock().unwrap().push(url.to_string());
            self.pages
                .get(url.as_str())
                .cloned()
                .ok_or_else(|| PartCatalogError::Network(format!("{url}: HTTP 404 Not Found")))
        }
    }

    fn base() -> Url {
        Url::parse("https://www.partselect.com").unwrap()
    }

    fn fixture_fetcher() -> MapFetcher {
        MapFetcher::new(&[
            (
                "https://www.partselect.com/PS11750057-Whirlpool-WPW10195417.htm",
                load_fixture("detail_video.html"),
            ),
            (
                "https://www.partselect.com/PS3406971-Whirlpool-W10348269.htm",
                load_fixture("detail_thumbnail.html"),
            ),
        ])
    }

    #[test]
    fn parse_listing_drops_entries_without_identifiers() {
        let entries = parse_listing(&load_fixture("category_listing.html"));
        let names: Vec<&str> = entries.iter().map(|e| e.fields.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Upper Dishrack Wheel",
                "Dishwasher Drain Pump",
                "Silverware Basket",
                "Door Gasket",
            ]
        );
    }

    #[test]
    fn parse_listing_captures_links_and_fallback_text() {
        let entries = parse_listing(&load_fixture("category_listing.html"));

        assert_eq!(
            entries[0].detail_href.as_deref(),
            Some("/PS11750057-Whirlpool-WPW10195417.htm")
        );
        assert!(entries[0].alternative_instructions.is_none());
        assert_eq!(
            entries[1].alternative_instructions.as_deref(),
            Some("Disconnect power and water before removing the pump.")
        );
        assert!(entries[2].detail_href.is_none());
    }

    #[test]
    fn stock_flag_stays_within_its_entry() {
        let markup = r#"<html><body>
            <div class="nf__part mb-3">
                <a class="nf__part__detail__title">Rack Roller</a>
                <div class="nf__part__left-col__basic-info__stock"><span>In Stock</span></div>
                <div class="nf__part__detail__part-number"><strong>PS1</strong></div>
                <div class="nf__part__detail__part-number mb-2"><strong>MP1</strong></div>
            </div>
            <div class="nf__part mb-3">
                <a class="nf__part__detail__title">Spray Arm</a>
                <div class="nf__part__left-col__basic-info__stock"></div>
                <span>In Stock</span>
                <div class="nf__part__detail__part-number"><strong>PS2</strong></div>
                <div class="nf__part__detail__part-number mb-2"><strong>MP2</strong></div>
            </div>
        </body></html>"#;

        let entries = parse_listing(markup);
        assert_eq!(entries.len(), 2);
        assert!(!entries[0].fields.in_stock);
        assert!(entries[1].fields.in_stock);
    }

    #[tokio::test]
    async fn walk_merges_detail_fields_in_document_order() {
        let fetcher = fixture_fetcher();
        let records = walk_listing(
            &fetcher,
            &base(),
            &load_fixture("category_listing.html"),
            &WalkOptions::default(),
            &SilentProgress,
        )
        .await;

        assert_eq!(records.len(), 4);

        let wheel = &records[0];
        assert_eq!(wheel.price, 12.5);
        assert_eq!(wheel.rating, 4.0);
        assert_eq!(wheel.review_count, 123);
        assert!(wheel.in_stock);
        assert_eq!(
            wheel.installation_instructions,
            InstallationInstructions::Video("https://www.youtube.com/watch?v=abc123".into())
        );
        assert_eq!(wheel.is_compatible_with, vec!["KDFE104DSS0", "WDT750SAHZ0"]);

        let pump = &records[1];
        assert_eq!(pump.is_compatible_with, vec![NO_COMPATIBILITY_INFO]);
        assert_eq!(pump.fixes_these_symptoms, vec!["Not draining"]);

        // No "see more" link: defaults only, no request made.
        let basket = &records[2];
        assert_eq!(basket.installation_instructions, InstallationInstructions::NoInstructions);
        assert!(basket.is_compatible_with.is_empty());
        assert_eq!(basket.price, 0.0);
        assert!(!basket.in_stock);

        // Detail link that 404s.
        let gasket = &records[3];
        assert_eq!(gasket.installation_instructions, InstallationInstructions::NotAvailable);
        assert!(gasket.fixes_these_symptoms.is_empty());
        assert!(gasket.is_compatible_with.is_empty());

        let requested = fetcher.requested.lock().unwrap().clone();
        assert_eq!(requested.len(), 3);
        assert!(requested[0].ends_with("PS11750057-Whirlpool-WPW10195417.htm"));
    }

    #[tokio::test]
    async fn concurrent_walk_matches_sequential_walk() {
        let markup = load_fixture("category_listing.html");

        let sequential = walk_listing(
            &fixture_fetcher(),
            &base(),
            &markup,
            &WalkOptions::default(),
            &SilentProgress,
        )
        .await;
        let concurrent = walk_listing(
            &fixture_fetcher(),
            &base(),
            &markup,
            &WalkOptions {
                detail_concurrency: 4,
            },
            &SilentProgress,
        )
        .await;

        assert_eq!(sequential, concurrent);
    }

    #[tokio::test]
    async fn off_origin_detail_link_is_unavailable() {
        let markup = r#"<html><body>
            <div class="nf__part mb-3">
                <a class="nf__part__detail__title">Float Switch</a>
                <div class="nf__part__detail__part-number"><strong>PS9</strong></div>
                <div class="nf__part__detail__part-number mb-2"><strong>MP9</strong></div>
                <div class="nf__part__detail__symptoms">
                    <a class="underline" href="https://elsewhere.example.com/PS9.htm">See more</a>
                </div>
            </div>
        </body></html>"#;
        let fetcher = MapFetcher::new(&[]);
        let records =
            walk_listing(&fetcher, &base(), markup, &WalkOptions::default(), &SilentProgress)
                .await;

        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].installation_instructions,
            InstallationInstructions::NotAvailable
        );
        assert!(fetcher.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_listing_yields_no_records() {
        let fetcher = MapFetcher::new(&[]);
        let records = walk_listing(
            &fetcher,
            &base(),
            "<html><body><p>No parts</p></body></html>",
            &WalkOptions::default(),
            &SilentProgress,
        )
        .await;
        assert!(records.is_empty());
    }
}
