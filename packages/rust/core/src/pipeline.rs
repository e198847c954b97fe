//! End-to-end `scrape` pipeline: root page → categories → listings → export.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{info, instrument, warn};

use partcatalog_crawler::{
    Fetcher, HttpFetcher, ProgressReporter, WalkOptions, resolve_link, walk_listing,
};
use partcatalog_shared::{ExportConfig, PartRecord, Result, ScrapeConfig};

/// Records collected from one catalog walk.
#[derive(Debug)]
pub struct ScrapeResult {
    /// Every record, grouped by category in discovery order.
    pub records: Vec<PartRecord>,
    /// Number of categories walked.
    pub categories: usize,
    /// Categories skipped because their link was unusable.
    pub skipped_categories: usize,
}

/// Result of a full `scrape` run.
#[derive(Debug)]
pub struct RunResult {
    pub record_count: usize,
    pub categories: usize,
    /// Files written, in format order.
    pub files: Vec<PathBuf>,
    pub elapsed: Duration,
}

/// Walk the whole catalog and collect records.
///
/// A failure to fetch the root page or any category page aborts the walk.
/// Detail page failures never do.
#[instrument(skip_all, fields(base = %config.base_url, root = %config.root_path))]
pub async fn scrape_catalog<F: Fetcher>(
    fetcher: &F,
    config: &ScrapeConfig,
    progress: &dyn ProgressReporter,
) -> Result<ScrapeResult> {
    progress.phase("Discovering categories");
    let root_url = config.root_url()?;
    info!(url = %root_url, "searching catalog root");
    progress.page_visited(root_url.as_str());
    let root_markup = fetcher.fetch(&root_url).await?;
    let categories = partcatalog_discovery::discover_categories(&root_markup)?;

    let opts = WalkOptions {
        detail_concurrency: config.detail_concurrency.max(1),
    };
    let total = categories.len();
    let mut records = Vec::new();
    let mut walked = 0;
    let mut skipped = 0;

    for (i, category) in categories.iter().enumerate() {
        let url = match resolve_link(&config.base_url, &category.href) {
            Ok(url) => url,
            Err(e) => {
                warn!(href = %category.href, error = %e, "skipping category");
                skipped += 1;
                continue;
            }
        };

        progress.phase(&format!("[{}/{total}] {}", i + 1, category.display_text));
        info!(%url, "searching category page");
        progress.page_visited(url.as_str());

        let markup = fetcher.fetch(&url).await?;
        let category_records = walk_listing(fetcher, &url, &markup, &opts, progress).await;

        info!(
            category = %category.display_text,
            records = category_records.len(),
            "category complete"
        );
        records.extend(category_records);
        walked += 1;
    }

    Ok(ScrapeResult {
        records,
        categories: walked,
        skipped_categories: skipped,
    })
}

/// Run the full `scrape` pipeline over HTTP.
pub async fn run(
    scrape: &ScrapeConfig,
    export: &ExportConfig,
    progress: &dyn ProgressReporter,
) -> Result<RunResult> {
    let fetcher = HttpFetcher::new(scrape)?;
    run_with(&fetcher, scrape, export, progress).await
}

/// Run the full `scrape` pipeline with a caller-supplied fetcher.
///
/// Nothing is written unless the walk completes.
#[instrument(skip_all, fields(out = %export.dir.display(), name = %export.name))]
pub async fn run_with<F: Fetcher>(
    fetcher: &F,
    scrape: &ScrapeConfig,
    export: &ExportConfig,
    progress: &dyn ProgressReporter,
) -> Result<RunResult> {
    let start = Instant::now();
    info!("starting scrape pipeline");

    let result = scrape_catalog(fetcher, scrape, progress).await?;

    progress.phase("Writing output files");
    let files = partcatalog_export::export(&result.records, export)?;

    let run = RunResult {
        record_count: result.records.len(),
        categories: result.categories,
        files,
        elapsed: start.elapsed(),
    };

    progress.done(run.record_count);

    info!(
        records = run.record_count,
        categories = run.categories,
        skipped_categories = result.skipped_categories,
        elapsed_ms = run.elapsed.as_millis(),
        "scrape pipeline complete"
    );

    Ok(run)
}
