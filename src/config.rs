use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_CATALOG_URL: &str =
    "https://celestrak.org/NORAD/elements/gp.php?GROUP=stations&FORMAT=tle";
const DEFAULT_MAX_AGE: Duration = Duration::from_secs(2 * 60 * 60);
const APP_DIR: &str = "sat-doppler";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub observer: ObserverConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
    #[serde(default = "default_max_age", deserialize_with = "deserialize_duration")]
    pub max_age: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            cache_dir: default_cache_dir(),
            max_age: default_max_age(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ObserverConfig {
    #[serde(default)]
    pub altitude_m: f64,
}

fn default_url() -> String {
    DEFAULT_CATALOG_URL.to_string()
}

fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

fn default_max_age() -> Duration {
    DEFAULT_MAX_AGE
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(s.trim()).map_err(serde::de::Error::custom)
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(yaml: &str) -> Result<Self, ConfigError> {
        // An empty file deserializes to null, not to an empty mapping
        if yaml.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Explicit path if given, else the per-user config file if it exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            log::debug!("Loading config from {}", path.display());
            return Self::from_file(path);
        }

        match dirs::config_dir().map(|d| d.join(APP_DIR).join("config.yaml")) {
            Some(path) if path.is_file() => {
                log::debug!("Loading config from {}", path.display());
                Self::from_file(&path)
            }
            _ => Ok(Config::default()),
        }
    }
}
