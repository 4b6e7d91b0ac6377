//! Application configuration.
//!
//! Configuration is loaded from a TOML file at:
//! 1. `$ATTACHSHELL_CONFIG` (environment variable)
//! 2. `~/.config/attachshell/config.toml` (Linux/macOS)
//!    `%APPDATA%\attachshell\config.toml` (Windows)
//! 3. Built-in defaults

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::cursor::{CursorLimits, Filters, DEFAULT_MAX_ATTEMPTS, WRAP_SENTINEL_THRESHOLD};
use crate::model::image::{ImageOrder, ImageQuery, SortDirection};
use crate::model::ordering::Ordering;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General behavior settings.
    pub general: GeneralConfig,
    /// Backend connection.
    pub server: ServerConfig,
    /// Attachment viewer defaults.
    pub viewer: ViewerConfig,
    /// Image grid defaults.
    pub grid: GridConfig,
    /// Performance tuning.
    pub performance: PerformanceConfig,
}

/// General behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Override cache directory for logs.
    pub cache_dir: Option<PathBuf>,
    /// Where `s` in the viewer saves attachments (default: the download dir).
    pub download_dir: Option<PathBuf>,
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the API; endpoints are resolved below it.
    pub base_url: String,
    /// Transport timeout per request, in seconds.
    pub timeout_secs: u64,
}

/// Attachment viewer defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Initial ordering: "random", "id-ascending", "size-ascending", "size-descending".
    pub ordering: Ordering,
    /// Minimum attachment size in bytes (0 = disabled).
    pub min_size: u64,
    /// Show PDF / MS-Word / octet-stream attachments.
    pub allow_octet_like: bool,
    /// Fetch attempts per navigation before giving up.
    pub max_attempts: u32,
    /// Offsets above this are treated as the "previous from start" sentinel.
    pub wrap_sentinel_threshold: u64,
    /// Min-size values the `f` key cycles through.
    pub min_size_presets: Vec<u64>,
}

/// Image grid defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Images per page.
    pub page_size: u32,
    /// Sort key: "date", "size", "id".
    pub order: ImageOrder,
    /// Sort direction: "asc" or "desc".
    pub direction: SortDirection,
    /// Include non-image attachments.
    pub all_types: bool,
}

/// Performance tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Number of downloaded attachment bodies kept in the LRU cache.
    pub content_cache_size: usize,
}

// ── Default implementations ─────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            download_dir: None,
            log_level: "warn".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            ordering: Ordering::Random,
            min_size: 0,
            allow_octet_like: true,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            wrap_sentinel_threshold: WRAP_SENTINEL_THRESHOLD,
            min_size_presets: vec![0, 10 * 1024, 100 * 1024, 1024 * 1024],
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            page_size: 50,
            order: ImageOrder::Date,
            direction: SortDirection::Desc,
            all_types: false,
        }
    }
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            content_cache_size: 16,
        }
    }
}

impl ViewerConfig {
    /// Filters the viewer starts with.
    pub fn filters(&self) -> Filters {
        Filters {
            min_size: self.min_size,
            allow_octet_like: self.allow_octet_like,
        }
    }

    /// Limits for the resolve loop.
    pub fn limits(&self) -> CursorLimits {
        CursorLimits {
            max_attempts: self.max_attempts.max(1),
            wrap_sentinel_threshold: self.wrap_sentinel_threshold,
        }
    }
}

impl GridConfig {
    /// Query the grid starts with.
    pub fn query(&self) -> ImageQuery {
        ImageQuery {
            page_size: self.page_size.max(1),
            order: self.order,
            direction: self.direction,
            all_types: self.all_types,
        }
    }
}

// ── Load / save ─────────────────────────────────────────────────

/// Load configuration, searching standard locations.
///
/// Returns the default configuration if no file is found or on parse error.
pub fn load_config() -> Config {
    if let Some(path) = config_file_path() {
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match toml::from_str::<Config>(&contents) {
                    Ok(cfg) => {
                        tracing::info!(path = %path.display(), "Loaded config");
                        return cfg;
                    }
                    Err(e) => {
                        tracing::warn!(
                            path = %path.display(),
                            error = %e,
                            "Failed to parse config, using defaults"
                        );
                    }
                },
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to read config file, using defaults"
                    );
                }
            }
        }
    }
    Config::default()
}

/// Save configuration to the standard location and return the path written.
pub fn save_config(config: &Config) -> anyhow::Result<PathBuf> {
    let path = config_file_path()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config file path"))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(&path, contents)?;
    tracing::info!(path = %path.display(), "Saved config");
    Ok(path)
}

/// Determine the config file path (checking env var first, then standard dirs).
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var("ATTACHSHELL_CONFIG") {
        return Some(PathBuf::from(env_path));
    }
    dirs::config_dir().map(|d| d.join("attachshell").join("config.toml"))
}

/// Return the cache directory for logs.
pub fn cache_dir(config: &Config) -> PathBuf {
    if let Some(ref dir) = config.general.cache_dir {
        return dir.clone();
    }
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("attachshell")
}

/// Return the log file path.
pub fn log_file_path(config: &Config) -> PathBuf {
    cache_dir(config).join("attachshell.log")
}

/// Directory the viewer saves attachments into.
pub fn download_dir(config: &Config) -> PathBuf {
    if let Some(ref dir) = config.general.download_dir {
        return dir.clone();
    }
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}
