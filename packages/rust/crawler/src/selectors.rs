//! CSS selectors for catalog listing and detail pages.
//!
//! Every markup assumption about the catalog site lives here. When the site
//! changes shape, update the selector, then the matching fixture under
//! `fixtures/html/`.

use std::sync::LazyLock;

use scraper::Selector;

fn parse(css: &str) -> Selector {
    Selector::parse(css).unwrap()
}

/// Selectors for one listing entry on a category page.
pub mod listing {
    use super::*;

    /// One part's summary block.
    pub static ENTRY: LazyLock<Selector> = LazyLock::new(|| parse("div.nf__part.mb-3"));

    /// Part title link.
    pub static NAME: LazyLock<Selector> =
        LazyLock::new(|| parse("a.nf__part__detail__title"));

    /// Price block, e.g. `$12.50`.
    pub static PRICE: LazyLock<Selector> = LazyLock::new(|| parse("div.mt-sm-2.price"));

    /// Stock indicator container; the availability text is in the next span.
    pub static STOCK: LazyLock<Selector> =
        LazyLock::new(|| parse("div.nf__part__left-col__basic-info__stock"));

    /// Any span.
    pub static SPAN: LazyLock<Selector> = LazyLock::new(|| parse("span"));

    /// Star overlay whose `style` carries `width:<N>%`.
    pub static RATING: LazyLock<Selector> = LazyLock::new(|| parse("div.rating__stars__upper"));

    /// Review count, e.g. `(42)`.
    pub static REVIEW_COUNT: LazyLock<Selector> = LazyLock::new(|| parse("span.rating__count"));

    /// PartSelect number block (the first part-number div).
    pub static PART_SELECT_NUMBER: LazyLock<Selector> =
        LazyLock::new(|| parse("div.nf__part__detail__part-number:not(.mb-2) strong"));

    /// Manufacturer part number block.
    pub static MANUFACTURER_NUMBER_DIV: LazyLock<Selector> =
        LazyLock::new(|| parse("div.nf__part__detail__part-number.mb-2"));

    /// Bold identifier inside a part-number block.
    pub static STRONG: LazyLock<Selector> = LazyLock::new(|| parse("strong"));

    /// "See more" link into the detail subpage.
    pub static SEE_MORE: LazyLock<Selector> =
        LazyLock::new(|| parse("div.nf__part__detail__symptoms a.underline[href]"));

    /// Fallback installation text carried on the listing entry.
    pub static ALTERNATIVE_INSTRUCTIONS: LazyLock<Selector> =
        LazyLock::new(|| parse("div.alternative-instructions-class"));
}

/// Selectors for a part's detail subpage.
pub mod detail {
    use super::*;

    /// Troubleshooting landmark.
    pub static TROUBLESHOOTING: LazyLock<Selector> = LazyLock::new(|| parse("div#Troubleshooting"));

    /// Content wrapper following the troubleshooting landmark.
    pub static PD_WRAP: LazyLock<Selector> = LazyLock::new(|| parse("div.pd__wrap"));

    /// Bold section labels inside the wrapper.
    pub static LABEL: LazyLock<Selector> = LazyLock::new(|| parse("div.bold.mb-1"));

    /// Any div.
    pub static DIV: LazyLock<Selector> = LazyLock::new(|| parse("div"));

    /// Embedded video player carrying the video id.
    pub static VIDEO_EMBED: LazyLock<Selector> =
        LazyLock::new(|| parse("div.yt-video[data-yt-init]"));

    /// Video thumbnail image.
    pub static VIDEO_THUMB: LazyLock<Selector> =
        LazyLock::new(|| parse("img.yt-video__thumb.loaded"));

    /// Spans without a class attribute.
    pub static PLAIN_SPAN: LazyLock<Selector> = LazyLock::new(|| parse("span:not([class])"));

    /// Compatibility landmark.
    pub static MODEL_CROSS_REFERENCE: LazyLock<Selector> =
        LazyLock::new(|| parse("div#ModelCrossReference"));

    /// Compatibility table rows.
    pub static ROW: LazyLock<Selector> = LazyLock::new(|| parse("div.row"));

    /// Model link inside a compatibility row.
    pub static MODEL_LINK: LazyLock<Selector> =
        LazyLock::new(|| parse("a.col-6.col-md-3.col-lg-2"));
}
