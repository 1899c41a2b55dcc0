use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;
use thiserror::Error;

use crate::pointing::{Observer, DEFAULT_HEIGHT_KM, DEFAULT_MAX_RANGE_KM};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid station coordinates: {0}")]
    InvalidCoordinates(String),
    #[error("pointing.{0} must be non-negative, got {1}")]
    NegativeValue(&'static str, f64),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub station: StationConfig,
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub pointing: PointingConfig,
    #[serde(default)]
    pub api_keys: Vec<ApiKey>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct PointingConfig {
    #[serde(default = "default_max_range_km")]
    pub max_range_km: f64,
    #[serde(default = "default_height_km")]
    pub default_height_km: f64,
    pub feed_file: Option<PathBuf>,
}

impl PointingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("max_range_km", self.max_range_km),
            ("default_height_km", self.default_height_km),
        ] {
            if value.is_nan() || value < 0.0 {
                return Err(ConfigError::NegativeValue(name, value));
            }
        }
        Ok(())
    }
}

impl Default for PointingConfig {
    fn default() -> Self {
        Self {
            max_range_km: default_max_range_km(),
            default_height_km: default_height_km(),
            feed_file: None,
        }
    }
}

fn default_max_range_km() -> f64 {
    DEFAULT_MAX_RANGE_KM
}

fn default_height_km() -> f64 {
    DEFAULT_HEIGHT_KM
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiKey {
    pub key: String,
    pub name: String,
    pub permissions: HashSet<Permission>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StationConfig {
    pub name: Option<String>,
    pub coordinates: String,
    #[serde(default)]
    pub altitude_m: f64,
}

impl StationConfig {
    pub fn observer(&self) -> Result<Observer, ConfigError> {
        Observer::from_coordinates(&self.coordinates, Some(self.altitude_m))
            .filter(|o| o.location.is_valid())
            .ok_or_else(|| ConfigError::InvalidCoordinates(self.coordinates.clone()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ComputePointing,
    ReloadFeed,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ComputePointing => "compute_pointing",
            Permission::ReloadFeed => "reload_feed",
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)?;
        config.pointing.validate()?;
        Ok(config)
    }

    pub fn find_api_key(&self, key: &str) -> Option<&ApiKey> {
        self.api_keys.iter().find(|k| k.key == key)
    }
}
