//! Category discovery on the catalog root page.
//!
//! The root page groups categories under a "shop by part type" heading
//! followed by a list of links. That landmark is the only entry point into
//! the catalog: if it is missing, nothing else can be scraped, so its
//! absence is a fatal [`PartCatalogError::StructureNotFound`].

use std::sync::LazyLock;

use scraper::{Html, Selector};
use tracing::{debug, info, instrument};

use partcatalog_shared::markup::{find_next, text_of};
use partcatalog_shared::{CategoryLink, PartCatalogError, Result};

/// Heading that precedes the category list.
const CATEGORY_HEADING: &str = "h2#ShopByPartType";

static HEADING: LazyLock<Selector> = LazyLock::new(|| Selector::parse(CATEGORY_HEADING).unwrap());
static LIST: LazyLock<Selector> = LazyLock::new(|| Selector::parse("ul").unwrap());
static LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());

/// Enumerate category links on the catalog root page, in document order.
///
/// Locates the category heading, then the nearest list after it, and
/// returns every link inside that list. Links without an `href` are skipped.
#[instrument(skip_all)]
pub fn discover_categories(root_markup: &str) -> Result<Vec<CategoryLink>> {
    let doc = Html::parse_document(root_markup);

    let heading = doc
        .select(&HEADING)
        .next()
        .ok_or_else(|| PartCatalogError::structure_not_found(CATEGORY_HEADING))?;

    let list = find_next(heading, &LIST).ok_or_else(|| {
        PartCatalogError::structure_not_found(format!("ul after {CATEGORY_HEADING}"))
    })?;

    let links: Vec<CategoryLink> = list
        .select(&LINK)
        .filter_map(|a| {
            let href = a.value().attr("href")?.trim();
            if href.is_empty() {
                debug!("skipping category link without href");
                return None;
            }
            Some(CategoryLink {
                href: href.to_string(),
                display_text: text_of(a),
            })
        })
        .collect();

    info!(categories = links.len(), "categories discovered");
    Ok(links)
}
