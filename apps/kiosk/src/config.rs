//! # Kiosk Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     FASTR_TAX_RATE_BPS=1800                                            │
//! │     FASTR_CATALOG_URL=http://10.0.0.5:3000/product                     │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     path given as first CLI argument, or                               │
//! │     ~/.config/fastrkart/kiosk.toml (Linux)                             │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     10% tax, demo catalog, ../exports                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [store]
//! name = "Fastrkart"
//! currency_symbol = "₹"
//!
//! [tax]
//! rate_bps = 1000
//!
//! [catalog]
//! mode = "http"          # local | http
//! endpoint = "http://10.0.0.5:3000/product"
//! timeout_secs = 5
//! # products_file = "products.json"   (local mode; omit for the demo table)
//!
//! [reader]
//! device = "/dev/ttyACM0"
//! baud_rate = 9600
//! poll_interval_ms = 100
//!
//! [export]
//! directory = "../exports"
//! ```

use std::path::PathBuf;
use std::time::Duration;

use fastr_core::validation::validate_tax_rate_bps;
use fastr_core::{TaxRate, DEFAULT_TAX_RATE_BPS};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{KioskError, KioskResult};
use crate::reader::SUPPORTED_BAUD_RATES;

// =============================================================================
// Catalog Mode
// =============================================================================

/// Where product lookups go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogMode {
    /// In-memory table (demo products or a JSON file).
    #[default]
    Local,

    /// Remote product-query endpoint.
    Http,
}

impl std::fmt::Display for CatalogMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogMode::Local => write!(f, "local"),
            CatalogMode::Http => write!(f, "http"),
        }
    }
}

impl std::str::FromStr for CatalogMode {
    type Err = KioskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" | "memory" => Ok(CatalogMode::Local),
            "http" | "remote" => Ok(CatalogMode::Http),
            other => Err(KioskError::Config(format!(
                "Unknown catalog mode: '{}'. Valid options: local, http",
                other
            ))),
        }
    }
}

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Shown in the cart header.
    #[serde(default = "default_store_name")]
    pub name: String,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_store_name() -> String {
    "Fastrkart".to_string()
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            name: default_store_name(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxConfig {
    /// Tax rate in basis points (1000 = 10%).
    #[serde(default = "default_tax_rate_bps")]
    pub rate_bps: u32,
}

fn default_tax_rate_bps() -> u32 {
    DEFAULT_TAX_RATE_BPS
}

impl Default for TaxConfig {
    fn default() -> Self {
        TaxConfig {
            rate_bps: default_tax_rate_bps(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub mode: CatalogMode,

    /// Product-query URL (http mode).
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// JSON product list (local mode). Demo table when absent.
    #[serde(default)]
    pub products_file: Option<PathBuf>,
}

fn default_timeout_secs() -> u64 {
    5
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig {
            mode: CatalogMode::default(),
            endpoint: None,
            timeout_secs: default_timeout_secs(),
            products_file: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// RFID reader device node. No reader task when absent.
    #[serde(default)]
    pub device: Option<PathBuf>,

    /// Serial line speed, applied when the device is a terminal.
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    /// Delay between reads after the device goes quiet, and between reopen
    /// attempts (milliseconds).
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_baud_rate() -> u32 {
    9600
}

fn default_poll_interval_ms() -> u64 {
    100
}

impl Default for ReaderConfig {
    fn default() -> Self {
        ReaderConfig {
            device: None,
            baud_rate: default_baud_rate(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Receipt CSV directory, created on first checkout.
    #[serde(default = "default_export_dir")]
    pub directory: PathBuf,
}

fn default_export_dir() -> PathBuf {
    PathBuf::from("../exports")
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            directory: default_export_dir(),
        }
    }
}

// =============================================================================
// Main Kiosk Configuration
// =============================================================================

/// Complete kiosk configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KioskConfig {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub tax: TaxConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub reader: ReaderConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

impl KioskConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (explicit path, else the platform default)
    /// 3. Environment variables
    ///
    /// An explicit path that does not exist is an error; a missing default
    /// file just means defaults.
    pub fn load(config_path: Option<PathBuf>) -> KioskResult<Self> {
        Self::load_with(config_path, |key| std::env::var(key).ok())
    }

    /// [`KioskConfig::load`] with a custom environment lookup.
    pub fn load_with<F>(config_path: Option<PathBuf>, env: F) -> KioskResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(KioskError::Config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                Self::read_file(&path)?
            }
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::read_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_overrides(env);
        config.validate()?;

        Ok(config)
    }

    fn read_file(path: &std::path::Path) -> KioskResult<Self> {
        info!(?path, "Loading kiosk config from file");
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> KioskResult<()> {
        validate_tax_rate_bps(self.tax.rate_bps)?;

        if self.catalog.mode == CatalogMode::Http {
            match self.catalog.endpoint.as_deref() {
                Some(url) if url.starts_with("http://") || url.starts_with("https://") => {}
                Some(url) => {
                    return Err(KioskError::Config(format!(
                        "Catalog endpoint must start with http:// or https://, got: {}",
                        url
                    )));
                }
                None => {
                    return Err(KioskError::Config(
                        "catalog.endpoint is required in http mode".into(),
                    ));
                }
            }
        }

        if self.catalog.timeout_secs == 0 {
            return Err(KioskError::Config(
                "catalog.timeout_secs must be greater than 0".into(),
            ));
        }

        if self.reader.poll_interval_ms == 0 {
            return Err(KioskError::Config(
                "reader.poll_interval_ms must be greater than 0".into(),
            ));
        }

        if !SUPPORTED_BAUD_RATES.contains(&self.reader.baud_rate) {
            return Err(KioskError::Config(format!(
                "reader.baud_rate {} is not one of {:?}",
                self.reader.baud_rate, SUPPORTED_BAUD_RATES
            )));
        }

        Ok(())
    }

    /// Applies `FASTR_*` overrides read through `env`.
    fn apply_overrides<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bps) = env("FASTR_TAX_RATE_BPS") {
            match bps.trim().parse::<u32>() {
                Ok(bps) => {
                    debug!(bps, "Overriding tax rate from environment");
                    self.tax.rate_bps = bps;
                }
                Err(_) => warn!(value = %bps, "Ignoring non-numeric FASTR_TAX_RATE_BPS"),
            }
        }

        if let Some(url) = env("FASTR_CATALOG_URL") {
            debug!(url = %url, "Overriding catalog endpoint from environment");
            self.catalog.mode = CatalogMode::Http;
            self.catalog.endpoint = Some(url);
        }

        if let Some(device) = env("FASTR_READER_DEVICE") {
            self.reader.device = Some(PathBuf::from(device));
        }

        if let Some(dir) = env("FASTR_EXPORT_DIR") {
            self.export.directory = PathBuf::from(dir);
        }

        if let Some(name) = env("FASTR_STORE_NAME") {
            self.store.name = name;
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "fastrkart", "fastrkart")
            .map(|dirs| dirs.config_dir().join("kiosk.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax.rate_bps)
    }

    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_secs(self.catalog.timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.reader.poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_catalog_mode_parsing() {
        assert_eq!("local".parse::<CatalogMode>().unwrap(), CatalogMode::Local);
        assert_eq!("HTTP".parse::<CatalogMode>().unwrap(), CatalogMode::Http);
        assert!("ftp".parse::<CatalogMode>().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = KioskConfig::default();
        assert_eq!(config.tax.rate_bps, 1000);
        assert_eq!(config.store.currency_symbol, "₹");
        assert_eq!(config.catalog.mode, CatalogMode::Local);
        assert_eq!(config.reader.poll_interval_ms, 100);
        assert_eq!(config.reader.baud_rate, 9600);
        assert_eq!(config.export.directory, PathBuf::from("../exports"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_config(
            r#"
            [tax]
            rate_bps = 1800

            [reader]
            device = "/dev/ttyACM0"
            "#,
        );

        let config = KioskConfig::load_with(Some(file.path().to_path_buf()), no_env).unwrap();
        assert_eq!(config.tax_rate(), TaxRate::from_bps(1800));
        assert_eq!(config.reader.device, Some(PathBuf::from("/dev/ttyACM0")));
        assert_eq!(config.poll_interval(), Duration::from_millis(100));
        assert_eq!(config.store.name, "Fastrkart");
    }

    #[test]
    fn test_env_overrides_file() {
        let file = write_config(
            r#"
            [store]
            name = "Mall Kiosk"
            "#,
        );
        let env: HashMap<&str, &str> = [
            ("FASTR_TAX_RATE_BPS", "500"),
            ("FASTR_CATALOG_URL", "http://127.0.0.1:3000/product"),
            ("FASTR_EXPORT_DIR", "/var/lib/fastrkart"),
            ("FASTR_STORE_NAME", "Airport Kiosk"),
        ]
        .into_iter()
        .collect();

        let config = KioskConfig::load_with(Some(file.path().to_path_buf()), |key| {
            env.get(key).map(|v| v.to_string())
        })
        .unwrap();

        assert_eq!(config.tax.rate_bps, 500);
        assert_eq!(config.catalog.mode, CatalogMode::Http);
        assert_eq!(
            config.catalog.endpoint.as_deref(),
            Some("http://127.0.0.1:3000/product")
        );
        assert_eq!(config.export.directory, PathBuf::from("/var/lib/fastrkart"));
        assert_eq!(config.store.name, "Airport Kiosk");
    }

    #[test]
    fn test_bad_env_tax_rate_is_ignored() {
        let mut config = KioskConfig::default();
        config.apply_overrides(|key| (key == "FASTR_TAX_RATE_BPS").then(|| "ten".to_string()));
        assert_eq!(config.tax.rate_bps, DEFAULT_TAX_RATE_BPS);
    }

    #[test]
    fn test_validation() {
        let mut config = KioskConfig::default();

        config.tax.rate_bps = 10_001;
        assert!(config.validate().is_err());
        config.tax.rate_bps = 10_000;
        assert!(config.validate().is_ok());

        config.catalog.mode = CatalogMode::Http;
        assert!(config.validate().is_err());
        config.catalog.endpoint = Some("ws://catalog".into());
        assert!(config.validate().is_err());
        config.catalog.endpoint = Some("https://catalog.example/product".into());
        assert!(config.validate().is_ok());

        config.reader.baud_rate = 115_200;
        assert!(config.validate().is_ok());
        config.reader.baud_rate = 9601;
        assert!(config.validate().is_err());
        config.reader.baud_rate = 9600;

        config.reader.poll_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = KioskConfig::load_with(Some(dir.path().join("nope.toml")), no_env).unwrap_err();
        assert!(matches!(err, KioskError::Config(_)));
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let file = write_config("[tax\nrate_bps = ");
        let err = KioskConfig::load_with(Some(file.path().to_path_buf()), no_env).unwrap_err();
        assert!(matches!(err, KioskError::Config(_)));
    }
}
