//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use partcatalog_core::ProgressReporter;
use partcatalog_export::CombineConfig;
use partcatalog_shared::{
    AppConfig, ExportConfig, OutputFormat, ScrapeConfig, init_config, load_config,
    load_config_from,
};
use tracing::info;
use url::Url;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// PartCatalog: scrape appliance-parts catalogs into CSV and JSON.
#[derive(Parser)]
#[command(
    name = "partcatalog",
    version,
    about = "Scrape an appliance-parts catalog into CSV and JSON records.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.partcatalog/partcatalog.toml.
    #[arg(long, env = "PARTCATALOG_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Walk the catalog and write every part record.
    Scrape(ScrapeArgs),

    /// Concatenate previously written outputs into one file per format.
    Combine {
        /// Input file stems, in order (e.g. dish_parts fridge_parts).
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Output file stem.
        #[arg(long)]
        out: String,

        /// Directory holding the inputs and receiving the output.
        #[arg(long, default_value = ".")]
        dir: PathBuf,

        /// Formats to combine (comma-separated). Defaults to json,csv.
        #[arg(long)]
        emit: Option<String>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Overrides for one scrape run. Unset flags fall back to the config file.
#[derive(clap::Args, Debug, Default)]
pub(crate) struct ScrapeArgs {
    /// Catalog origin (e.g. https://www.partselect.com).
    #[arg(long)]
    pub base_url: Option<String>,

    /// Path of the category index page on the catalog origin.
    #[arg(long)]
    pub root: Option<String>,

    /// Output directory.
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Output file stem.
    #[arg(long)]
    pub name: Option<String>,

    /// Formats to write (comma-separated): json, csv.
    #[arg(long)]
    pub emit: Option<String>,

    /// Detail pages fetched concurrently per category.
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Per-request timeout in seconds.
    #[arg(long)]
    pub timeout: Option<u64>,
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "partcatalog=info",
        1 => "partcatalog=debug",
        _ => "partcatalog=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config;
    match cli.command {
        Command::Scrape(args) => cmd_scrape(config_path.as_deref(), &args).await,
        Command::Combine {
            inputs,
            out,
            dir,
            emit,
        } => cmd_combine(inputs, out, dir, emit.as_deref()),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(config_path.as_deref()),
        },
    }
}

fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    Ok(config)
}

/// Merge the config file with command-line overrides.
fn scrape_settings(config: &AppConfig, args: &ScrapeArgs) -> Result<(ScrapeConfig, ExportConfig)> {
    let mut scrape = ScrapeConfig::try_from(config)?;
    let mut export = ExportConfig::from(config);

    if let Some(base_url) = &args.base_url {
        scrape.base_url =
            Url::parse(base_url).map_err(|e| eyre!("invalid base URL '{base_url}': {e}"))?;
    }
    if let Some(root) = &args.root {
        scrape.root_path = root.clone();
    }
    if let Some(n) = args.concurrency {
        scrape.detail_concurrency = n.max(1);
    }
    if let Some(secs) = args.timeout {
        scrape.timeout = Duration::from_secs(secs);
    }

    if let Some(dir) = &args.out_dir {
        export.dir = dir.clone();
    }
    if let Some(name) = &args.name {
        export.name = name.clone();
    }
    if let Some(emit) = &args.emit {
        export.formats = OutputFormat::parse_list(emit)?;
    }

    Ok((scrape, export))
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_scrape(config_path: Option<&Path>, args: &ScrapeArgs) -> Result<()> {
    let config = resolve_config(config_path)?;
    let (scrape, export) = scrape_settings(&config, args)?;

    info!(
        base_url = %scrape.base_url,
        root = %scrape.root_path,
        concurrency = scrape.detail_concurrency,
        "scraping catalog"
    );

    let reporter = CliProgress::new();
    let result = partcatalog_core::run(&scrape, &export, &reporter).await;
    if result.is_err() {
        reporter.spinner.finish_and_clear();
    }
    let result = result?;

    println!();
    println!("  Export complete!");
    println!("  Records:    {}", result.record_count);
    println!("  Categories: {}", result.categories);
    for file in &result.files {
        println!("  Wrote:      {}", file.display());
    }
    println!("  Time:       {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

fn cmd_combine(inputs: Vec<String>, out: String, dir: PathBuf, emit: Option<&str>) -> Result<()> {
    let formats = match emit {
        Some(emit) => OutputFormat::parse_list(emit)?,
        None => vec![OutputFormat::Json, OutputFormat::Csv],
    };

    info!(inputs = ?inputs, out = %out, "combining outputs");

    let outputs = partcatalog_export::combine(&CombineConfig {
        dir,
        inputs,
        output: out,
        formats,
    })?;

    for output in &outputs {
        println!("Combined {} rows into {}", output.rows, output.path.display());
    }
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = resolve_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn page_visited(&self, url: &str) {
        self.spinner.set_message(format!("Fetching {url}"));
    }

    fn done(&self, _records: usize) {
        self.spinner.finish_and_clear();
    }
}
