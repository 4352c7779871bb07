use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::filter::FilterDefaults;
use crate::data::loader::{DataSources, RowPolicy};

/// Path of an explicit config file.
pub const CONFIG_ENV: &str = "BNB_INSIGHTS_CONFIG";
/// Overrides `data_dir` from the config file.
pub const DATA_DIR_ENV: &str = "BNB_INSIGHTS_DATA_DIR";
/// Looked up in the working directory when `BNB_INSIGHTS_CONFIG` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "bnb-insights.toml";

// ---------------------------------------------------------------------------
// Config file layout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub listings: PathBuf,
    pub calendar: PathBuf,
    pub neighbourhoods: PathBuf,
    pub boundaries: PathBuf,
    pub row_policy: RowPolicy,
    pub filters: FiltersConfig,
    pub charts: ChartsConfig,
    pub map: MapConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FiltersConfig {
    pub price_min: f64,
    pub price_max: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartsConfig {
    pub histogram_bins: usize,
}

/// Initial map centre.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapConfig {
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            listings: PathBuf::from("listings.csv.gz"),
            calendar: PathBuf::from("calendar.csv.gz"),
            neighbourhoods: PathBuf::from("neighbourhoods.csv"),
            boundaries: PathBuf::from("neighbourhoods.geojson"),
            row_policy: RowPolicy::default(),
            filters: FiltersConfig::default(),
            charts: ChartsConfig::default(),
            map: MapConfig::default(),
        }
    }
}

impl Default for FiltersConfig {
    fn default() -> Self {
        let d = FilterDefaults::default();
        Self {
            price_min: d.price_min,
            price_max: d.price_max,
        }
    }
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self { histogram_bins: 20 }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        // Downtown Boston.
        Self {
            latitude: 42.3601,
            longitude: -71.0589,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl AppConfig {
    /// Configuration from the environment: `BNB_INSIGHTS_CONFIG`, else
    /// `bnb-insights.toml` if present, else defaults; then
    /// `BNB_INSIGHTS_DATA_DIR` is applied.
    pub fn load() -> Result<Self> {
        Self::load_from(
            std::env::var_os(CONFIG_ENV).map(PathBuf::from),
            std::env::var_os(DATA_DIR_ENV),
        )
    }

    pub fn load_from(config_path: Option<PathBuf>, data_dir: Option<OsString>) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_file(&path)?,
            None => {
                let local = Path::new(DEFAULT_CONFIG_FILE);
                if local.is_file() {
                    Self::from_file(local)?
                } else {
                    log::debug!("No {DEFAULT_CONFIG_FILE} found, using defaults");
                    Self::default()
                }
            }
        };

        if let Some(dir) = data_dir {
            config.data_dir = PathBuf::from(dir);
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = Self::from_toml_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        log::info!("Using config {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        anyhow::ensure!(
            config.charts.histogram_bins > 0,
            "charts.histogram_bins must be at least 1"
        );
        Ok(config)
    }

    /// The four input paths, relative names resolved against `data_dir`.
    pub fn sources(&self) -> DataSources {
        self.sources_in(&self.data_dir)
    }

    /// The configured file names resolved against another folder.
    pub fn sources_in(&self, dir: &Path) -> DataSources {
        DataSources {
            listings: dir.join(&self.listings),
            calendar: dir.join(&self.calendar),
            neighbourhoods: dir.join(&self.neighbourhoods),
            boundaries: dir.join(&self.boundaries),
        }
    }

    pub fn filter_defaults(&self) -> FilterDefaults {
        FilterDefaults {
            price_min: self.filters.price_min,
            price_max: self.filters.price_max,
        }
    }
}
