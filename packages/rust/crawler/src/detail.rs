//! Detail subpage resolution.
//!
//! A listing entry may link to a detail subpage carrying symptoms,
//! cross-referenced part numbers, installation instructions, and the list of
//! compatible models. Fetch failures never propagate: they become
//! [`Detail::Unavailable`] so one bad subpage cannot abort a category.

use scraper::{ElementRef, Html};
use tracing::{debug, instrument, warn};
use url::Url;

use partcatalog_shared::InstallationInstructions;
use partcatalog_shared::NO_COMPATIBILITY_INFO;
use partcatalog_shared::markup::{find_next, next_sibling_element, next_text_sibling, text_of};

use crate::fetch::Fetcher;
use crate::selectors::detail;

/// Label preceding the pipe-delimited symptom list.
const SYMPTOMS_LABEL: &str = "This part fixes the following symptoms:";

/// Marker contained in the label preceding the cross-reference list.
const REPLACES_MARKER: &str = "Part#";

/// Separator between symptoms.
const SYMPTOM_DELIMITER: &str = " | ";

const VIDEO_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";
const THUMB_VIDEO_URL_PREFIX: &str = "https://youtube.com/watch?v=";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Data extracted from a successfully fetched detail subpage.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DetailResult {
    pub symptoms: Vec<String>,
    pub replaces: Vec<String>,
    pub installation: InstallationInstructions,
    pub compatible_models: Vec<String>,
}

/// Outcome of resolving one detail subpage.
#[derive(Debug, Clone, PartialEq)]
pub enum Detail {
    Resolved(DetailResult),
    Unavailable { reason: String },
}

impl Detail {
    /// Collapse into the fields merged onto a record.
    ///
    /// An unavailable subpage contributes empty lists and the
    /// "not available" installation sentinel.
    pub fn into_result(self) -> DetailResult {
        match self {
            Self::Resolved(result) => result,
            Self::Unavailable { .. } => DetailResult {
                installation: InstallationInstructions::NotAvailable,
                ..DetailResult::default()
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Fetch and parse one detail subpage.
///
/// `alternative_instructions` is the fallback text carried on the listing
/// entry, used when the subpage shows a thumbnail without a usable video id.
#[instrument(skip_all, fields(url = %url))]
pub async fn resolve_detail<F: Fetcher>(
    fetcher: &F,
    url: &Url,
    alternative_instructions: Option<&str>,
) -> Detail {
    match fetcher.fetch(url).await {
        Ok(markup) => Detail::Resolved(parse_detail(&markup, alternative_instructions)),
        Err(e) => {
            warn!(%url, error = %e, "detail subpage unavailable");
            Detail::Unavailable {
                reason: e.to_string(),
            }
        }
    }
}

/// Extract every detail field from subpage markup.
pub fn parse_detail(markup: &str, alternative_instructions: Option<&str>) -> DetailResult {
    let doc = Html::parse_document(markup);
    let root = doc.root_element();

    let (symptoms, replaces) = match troubleshooting_wrap(root) {
        Some(wrap) => (extract_symptoms(wrap), extract_replaces(wrap)),
        None => (Vec::new(), Vec::new()),
    };

    let result = DetailResult {
        symptoms,
        replaces,
        installation: extract_installation(root, alternative_instructions),
        compatible_models: extract_compatibility(root),
    };

    debug!(
        symptoms = result.symptoms.len(),
        replaces = result.replaces.len(),
        models = result.compatible_models.len(),
        installation = %result.installation,
        "parsed detail subpage"
    );

    result
}

/// The content wrapper that follows the troubleshooting landmark.
fn troubleshooting_wrap(root: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let landmark = root.select(&detail::TROUBLESHOOTING).next()?;
    find_next(landmark, &detail::PD_WRAP)
}

fn extract_symptoms(wrap: ElementRef<'_>) -> Vec<String> {
    let Some(label) = wrap
        .select(&detail::LABEL)
        .find(|el| text_of(*el) == SYMPTOMS_LABEL)
    else {
        return Vec::new();
    };

    next_text_sibling(label)
        .map(|text| {
            text.split(SYMPTOM_DELIMITER)
                .map(|s| s.trim().replace('\u{2019}', "'"))
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

fn extract_replaces(wrap: ElementRef<'_>) -> Vec<String> {
    let Some(label) = wrap
        .select(&detail::LABEL)
        .find(|el| text_of(*el).contains(REPLACES_MARKER))
    else {
        return Vec::new();
    };

    next_sibling_element(label, &detail::DIV)
        .map(|value| {
            text_of(value)
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Resolve installation instructions; the first source that matches wins:
/// embedded video id, thumbnail video id, plain spans in the thumbnail,
/// the entry's alternative text.
fn extract_installation(
    root: ElementRef<'_>,
    alternative_instructions: Option<&str>,
) -> InstallationInstructions {
    if let Some(id) = root
        .select(&detail::VIDEO_EMBED)
        .find_map(|el| el.value().attr("data-yt-init"))
        .map(str::trim)
        .filter(|id| !id.is_empty())
    {
        return InstallationInstructions::Video(format!("{VIDEO_URL_PREFIX}{id}"));
    }

    let Some(thumb) = root.select(&detail::VIDEO_THUMB).next() else {
        return InstallationInstructions::NoInstructions;
    };

    if let Some(id) = thumb.value().attr("data-src").and_then(video_id_from_thumb) {
        return InstallationInstructions::Video(format!("{THUMB_VIDEO_URL_PREFIX}{id}"));
    }

    let spans: Vec<String> = thumb
        .select(&detail::PLAIN_SPAN)
        .map(text_of)
        .filter(|t| !t.is_empty())
        .collect();
    if !spans.is_empty() {
        return InstallationInstructions::text(spans.join(" "));
    }

    match alternative_instructions.map(str::trim).filter(|t| !t.is_empty()) {
        Some(text) => InstallationInstructions::text(text),
        None => InstallationInstructions::NoInstructions,
    }
}

/// Thumbnail sources look like `https://img.youtube.com/vi/<id>/hqdefault.jpg`;
/// the id is the second-to-last path segment.
fn video_id_from_thumb(src: &str) -> Option<&str> {
    let mut segments = src.rsplit('/');
    segments.next()?;
    segments.next().filter(|id| !id.is_empty())
}

/// Models from the compatibility table.
///
/// Landmark absent: empty. Landmark present without model rows: the single
/// "no information" sentinel.
fn extract_compatibility(root: ElementRef<'_>) -> Vec<String> {
    if root.select(&detail::MODEL_CROSS_REFERENCE).next().is_none() {
        return Vec::new();
    }

    let models: Vec<String> = root
        .select(&detail::ROW)
        .filter_map(|row| row.select(&detail::MODEL_LINK).next())
        .map(text_of)
        .filter(|m| !m.is_empty())
        .collect();

    if models.is_empty() {
        vec![NO_COMPATIBILITY_INFO.to_string()]
    } else {
        models
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use partcatalog_shared::{PartCatalogError, Result};
    use std::collections::HashMap;

    fn load_fixture(name: &str) -> String {
        let path = format!("{}/../../../fixtures/html/{name}", env!("CARGO_MANIFEST_DIR"));
        std::fs::read_to_string(&path).unwrap_or_else(|_| panic!("missing fixture: {path}"))
    }

    struct MapFetcher(HashMap<String, String>);

    impl Fetcher for MapFetcher {
        async fn fetch(&self, url: &Url) -> Result<String> {
            self.0
                .get(url.as_str())
                .cloned()
                .ok_or_else(|| PartCatalogError::Network(format!("{url}: HTTP 404 Not Found")))
        }
    }

    #[test]
    fn video_embed_detail() {
        let result = parse_detail(&load_fixture("detail_video.html"), None);

        assert_eq!(
            result.symptoms,
            vec!["Door won't close", "Noisy", "Leaking"]
        );
        assert_eq!(result.replaces, vec!["AP6013451", "8268869", "W10195417"]);
        assert_eq!(
            result.installation,
            InstallationInstructions::Video("https://www.youtube.com/watch?v=abc123".into())
        );
        assert_eq!(result.compatible_models, vec!["KDFE104DSS0", "WDT750SAHZ0"]);
    }

    #[test]
    fn thumbnail_detail_without_compatibility_rows() {
        let result = parse_detail(&load_fixture("detail_thumbnail.html"), None);

        assert_eq!(
            result.installation,
            InstallationInstructions::Video("https://youtube.com/watch?v=xyz789".into())
        );
        assert_eq!(result.compatible_models, vec![NO_COMPATIBILITY_INFO]);
        assert_eq!(result.symptoms, vec!["Not draining"]);
        assert!(result.replaces.is_empty());
    }

    #[test]
    fn bare_detail_has_no_data() {
        let result = parse_detail(&load_fixture("detail_bare.html"), None);

        assert!(result.symptoms.is_empty());
        assert!(result.replaces.is_empty());
        assert_eq!(result.installation, InstallationInstructions::NoInstructions);
        assert!(result.compatible_models.is_empty());
    }

    #[test]
    fn thumbnail_without_id_uses_alternative_text() {
        let markup = r#"<html><body>
            <img class="yt-video__thumb loaded" alt="Installation video">
        </body></html>"#;
        let result = parse_detail(markup, Some("  Unplug the unit, then remove the rack.  "));
        assert_eq!(
            result.installation,
            InstallationInstructions::Text("Unplug the unit, then remove the rack.".into())
        );

        let without_alt = parse_detail(markup, None);
        assert_eq!(without_alt.installation, InstallationInstructions::NoInstructions);
    }

    #[test]
    fn embed_takes_precedence_over_thumbnail() {
        let markup = r#"<html><body>
            <div class="yt-video" data-yt-init="first"></div>
            <img class="yt-video__thumb loaded" data-src="https://img.youtube.com/vi/second/hq.jpg">
        </body></html>"#;
        let result = parse_detail(markup, None);
        assert_eq!(
            result.installation,
            InstallationInstructions::Video("https://www.youtube.com/watch?v=first".into())
        );
    }

    #[test]
    fn symptoms_require_troubleshooting_landmark() {
        let markup = r#"<html><body><div class="pd__wrap">
            <div class="bold mb-1">This part fixes the following symptoms:</div>
            Leaking
        </div></body></html>"#;
        assert!(parse_detail(markup, None).symptoms.is_empty());
    }

    #[test]
    fn thumb_id_parsing() {
        assert_eq!(
            video_id_from_thumb("https://img.youtube.com/vi/xyz789/hqdefault.jpg"),
            Some("xyz789")
        );
        assert_eq!(video_id_from_thumb("hqdefault.jpg"), None);
        assert_eq!(video_id_from_thumb("/hqdefault.jpg"), None);
    }

    #[test]
    fn unavailable_detail_collapses_to_sentinel() {
        let result = Detail::Unavailable {
            reason: "timeout".into(),
        }
        .into_result();
        assert_eq!(result.installation, InstallationInstructions::NotAvailable);
        assert!(result.symptoms.is_empty());
        assert!(result.replaces.is_empty());
        assert!(result.compatible_models.is_empty());
    }

    #[tokio::test]
    async fn resolve_detail_degrades_on_fetch_failure() {
        let fetcher = MapFetcher(HashMap::new());
        let url = Url::parse("https://www.partselect.com/PS404.htm").unwrap();
        let detail = resolve_detail(&fetcher, &url, None).await;
        assert!(matches!(detail, Detail::Unavailable { ref reason } if reason.contains("404")));
    }

    #[tokio::test]
    async fn resolve_detail_parses_fetched_markup() {
        let url = Url::parse("https://www.partselect.com/PS11750057.htm").unwrap();
        let fetcher = MapFetcher(HashMap::from([(
            url.to_string(),
            load_fixture("detail_video.html"),
        )]));
        let detail = resolve_detail(&fetcher, &url, None).await;
        let Detail::Resolved(result) = detail else {
            panic!("expected resolved detail");
        };
        assert_eq!(result.compatible_models.len(), 2);
    }
}
