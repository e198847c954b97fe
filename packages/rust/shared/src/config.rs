//! Application configuration for PartCatalog.
//!
//! User config lives at `~/.partcatalog/partcatalog.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{PartCatalogError, Result};
use crate::types::OutputFormat;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "partcatalog.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".partcatalog";

// ---------------------------------------------------------------------------
// Config structs (matching partcatalog.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Catalog location.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// HTTP transport settings.
    #[serde(default)]
    pub http: HttpConfig,

    /// Output file settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// `[catalog]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Origin every discovered relative path is joined onto.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the catalog root page (the category index).
    #[serde(default = "default_root_path")]
    pub root_path: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            root_path: default_root_path(),
        }
    }
}

fn default_base_url() -> String {
    "https://www.partselect.com".into()
}
fn default_root_path() -> String {
    "/Dishwasher-Parts.htm".into()
}

/// `[http]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Fixed delay before every request, in ms.
    #[serde(default)]
    pub rate_limit_ms: u64,

    /// Maximum detail subpages fetched at once within a category.
    #[serde(default = "default_detail_concurrency")]
    pub detail_concurrency: usize,

    /// Override for the User-Agent header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            rate_limit_ms: 0,
            detail_concurrency: default_detail_concurrency(),
            user_agent: None,
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}
fn default_detail_concurrency() -> usize {
    1
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory output files are written to.
    #[serde(default = "default_output_dir")]
    pub dir: String,

    /// File stem shared by every output format.
    #[serde(default = "default_output_name")]
    pub name: String,

    /// Formats to write.
    #[serde(default = "default_formats")]
    pub formats: Vec<OutputFormat>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            name: default_output_name(),
            formats: default_formats(),
        }
    }
}

fn default_output_dir() -> String {
    ".".into()
}
fn default_output_name() -> String {
    "parts".into()
}
fn default_formats() -> Vec<OutputFormat> {
    vec![OutputFormat::Json, OutputFormat::Csv]
}

// ---------------------------------------------------------------------------
// Runtime configs (merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime scrape configuration.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Origin for all catalog URLs.
    pub base_url: Url,
    /// Path of the root category index page.
    pub root_path: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Delay before each request.
    pub rate_limit: Duration,
    /// Maximum in-flight detail fetches per category (at least 1).
    pub detail_concurrency: usize,
    /// User-Agent override.
    pub user_agent: Option<String>,
}

impl ScrapeConfig {
    /// Absolute URL of the catalog root page.
    pub fn root_url(&self) -> Result<Url> {
        self.base_url.join(&self.root_path).map_err(|e| {
            PartCatalogError::config(format!("invalid root path '{}': {e}", self.root_path))
        })
    }
}

impl TryFrom<&AppConfig> for ScrapeConfig {
    type Error = PartCatalogError;

    fn try_from(config: &AppConfig) -> Result<Self> {
        let base_url = Url::parse(&config.catalog.base_url).map_err(|e| {
            PartCatalogError::config(format!(
                "invalid base_url '{}': {e}",
                config.catalog.base_url
            ))
        })?;

        Ok(Self {
            base_url,
            root_path: config.catalog.root_path.clone(),
            timeout: Duration::from_secs(config.http.timeout_secs),
            rate_limit: Duration::from_millis(config.http.rate_limit_ms),
            detail_concurrency: config.http.detail_concurrency.max(1),
            user_agent: config.http.user_agent.clone(),
        })
    }
}

/// Runtime export configuration.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Output directory.
    pub dir: PathBuf,
    /// Shared file stem.
    pub name: String,
    /// Formats to write, in order.
    pub formats: Vec<OutputFormat>,
}

impl ExportConfig {
    /// Full path of the output file for one format.
    pub fn path_for(&self, format: OutputFormat) -> PathBuf {
        self.dir.join(format!("{}.{}", self.name, format.extension()))
    }
}

impl From<&AppConfig> for ExportConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            dir: PathBuf::from(&config.output.dir),
            name: config.output.name.clone(),
            formats: config.output.formats.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.partcatalog/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| PartCatalogError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.partcatalog/partcatalog.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| PartCatalogError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        PartCatalogError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| PartCatalogError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| PartCatalogError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| PartCatalogError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("base_url"));
        assert!(toml_str.contains("Dishwasher-Parts.htm"));
        assert!(!toml_str.contains("user_agent"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.http.timeout_secs, 30);
        assert_eq!(parsed.http.detail_concurrency, 1);
        assert_eq!(
            parsed.output.formats,
            vec![OutputFormat::Json, OutputFormat::Csv]
        );
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[catalog]
root_path = "/Refrigerator-Parts.htm"

[output]
name = "fridge_parts"
formats = ["csv"]
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.catalog.base_url, "https://www.partselect.com");
        assert_eq!(config.catalog.root_path, "/Refrigerator-Parts.htm");
        assert_eq!(config.output.formats, vec![OutputFormat::Csv]);
        assert_eq!(config.output.dir, ".");
    }

    #[test]
    fn scrape_config_from_app_config() {
        let mut app = AppConfig::default();
        app.http.detail_concurrency = 0;
        let scrape = ScrapeConfig::try_from(&app).expect("valid defaults");
        assert_eq!(scrape.timeout, Duration::from_secs(30));
        assert_eq!(scrape.detail_concurrency, 1);
        assert_eq!(
            scrape.root_url().unwrap().as_str(),
            "https://www.partselect.com/Dishwasher-Parts.htm"
        );
    }

    #[test]
    fn invalid_base_url_is_config_error() {
        let mut app = AppConfig::default();
        app.catalog.base_url = "not a url".into();
        let err = ScrapeConfig::try_from(&app).unwrap_err();
        assert!(err.to_string().contains("invalid base_url"));
    }

    #[test]
    fn export_paths_use_shared_stem() {
        let mut app = AppConfig::default();
        app.output.dir = "/tmp/out".into();
        app.output.name = "dish_parts".into();
        let export = ExportConfig::from(&app);
        assert_eq!(
            export.path_for(OutputFormat::Csv),
            PathBuf::from("/tmp/out/dish_parts.csv")
        );
    }
}
