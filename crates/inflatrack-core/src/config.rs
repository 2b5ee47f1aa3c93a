//! Application configuration
//!
//! Resolution order:
//! 1. An explicit path (`--config`), which must exist
//! 2. `~/.local/share/inflatrack/config.toml` (or the platform equivalent)
//! 3. The embedded default in `config/default.toml`
//!
//! Keys missing from a user file fall back to the defaults below.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::reference::CountryReference;

/// Embedded default config
const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub cache: CacheConfig,
    pub analysis: AnalysisConfig,
    pub reference: ReferenceConfig,
}

/// World Bank indicator source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub base_url: String,
    pub indicator: String,
    pub start_year: i32,
    pub end_year: i32,
    pub per_page: u32,
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.worldbank.org/v2".to_string(),
            indicator: "FP.CPI.TOTL.ZG".to_string(),
            start_year: 2010,
            end_year: 2024,
            per_page: 1000,
            timeout_secs: 10,
        }
    }
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_secs: 3600 }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.ttl_secs.min(i64::MAX as u64) as i64)
    }
}

/// Defaults for clustering, similarity and alerts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub clusters: usize,
    pub top_n: usize,
    pub seed: u64,
    pub n_init: usize,
    pub max_iter: usize,
    pub high_inflation_threshold: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            clusters: 4,
            top_n: 5,
            seed: 42,
            n_init: 10,
            max_iter: 300,
            high_inflation_threshold: 10.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    /// TOML country table replacing the built-in one
    pub path: Option<PathBuf>,
}

impl AppConfig {
    /// Resolve config using the order described in the module docs
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let content = match explicit {
            Some(path) => fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("Failed to read config {}: {}", path.display(), e))
            })?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => {
                    debug!(path = %path.display(), "Using config override");
                    fs::read_to_string(&path).map_err(|e| {
                        Error::Config(format!("Failed to read config: {}", e))
                    })?
                }
                None => DEFAULT_CONFIG.to_string(),
            },
        };
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.source.start_year > self.source.end_year {
            return Err(Error::Config(format!(
                "source.start_year {} is after source.end_year {}",
                self.source.start_year, self.source.end_year
            )));
        }
        if self.source.per_page == 0 {
            return Err(Error::Config("source.per_page must be positive".into()));
        }
        if self.analysis.n_init == 0 || self.analysis.max_iter == 0 {
            return Err(Error::Config(
                "analysis.n_init and analysis.max_iter must be positive".into(),
            ));
        }
        Ok(())
    }

    /// The configured reference table, or the built-in one
    pub fn country_reference(&self) -> Result<CountryReference> {
        match &self.reference.path {
            Some(path) => CountryReference::load(path),
            None => Ok(CountryReference::builtin()),
        }
    }
}

/// Default location of the user override file
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("inflatrack").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_default_matches_struct_defaults() {
        let parsed = AppConfig::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(parsed, AppConfig::default());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = AppConfig::parse("[analysis]\nclusters = 3\n").unwrap();
        assert_eq!(config.analysis.clusters, 3);
        assert_eq!(config.analysis.seed, 42);
        assert_eq!(config.cache.ttl_secs, 3600);
        assert_eq!(config.source.indicator, "FP.CPI.TOTL.ZG");
    }

    #[test]
    fn test_invalid_year_range_rejected() {
        let result = AppConfig::parse("[source]\nstart_year = 2024\nend_year = 2010\n");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_explicit_missing_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppConfig::load(Some(&dir.path().join("missing.toml")));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_explicit_path_and_reference_override() {
        let dir = tempfile::tempdir().unwrap();
        let countries = dir.path().join("countries.toml");
        fs::write(
            &countries,
            "[[country]]\nname = \"Freedonia\"\nlat = 1.0\nlon = 2.0\nregion = \"Imaginary\"\n",
        )
        .unwrap();

        let config_path = dir.path().join("config.toml");
        fs::write(
            &config_path,
            format!(
                "[cache]\nttl_secs = 60\n\n[reference]\npath = {:?}\n",
                countries.display().to_string()
            ),
        )
        .unwrap();

        let config = AppConfig::load(Some(&config_path)).unwrap();
        assert_eq!(config.cache.ttl(), chrono::Duration::seconds(60));
        let reference = config.country_reference().unwrap();
        assert_eq!(reference.len(), 1);
        assert!(reference.contains("Freedonia"));
    }

    #[test]
    fn test_builtin_reference_when_unset() {
        let reference = AppConfig::default().country_reference().unwrap();
        assert!(reference.contains("Germany"));
    }
}
