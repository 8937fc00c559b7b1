//! Runtime configuration handed to the core by the shell at startup.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use zeroize::Zeroize;

use crate::capabilities::ValidatedUrl;
use crate::DEFAULT_API_BASE_URL;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("API key must not be empty")]
    EmptyApiKey,
    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("distance unit labels must not be empty")]
    EmptyUnitLabel,
}

/// Places API credential. Never printed, wiped from memory on drop.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let mut key = key.into();
        let trimmed = key.trim();
        if trimmed.is_empty() {
            key.zeroize();
            return Err(ConfigError::EmptyApiKey);
        }
        if trimmed.len() != key.len() {
            let owned = trimmed.to_string();
            key.zeroize();
            key = owned;
        }
        Ok(Self(key))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ApiKey {
    type Error = ConfigError;

    fn try_from(key: String) -> Result<Self, Self::Error> {
        Self::new(key)
    }
}

impl From<ApiKey> for String {
    fn from(mut key: ApiKey) -> Self {
        std::mem::take(&mut key.0)
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

impl Drop for ApiKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    base_url: ValidatedUrl,
    api_key: ApiKey,
}

impl ApiConfig {
    pub fn new(base_url: impl AsRef<str>, api_key: ApiKey) -> Result<Self, ConfigError> {
        let base_url = ValidatedUrl::new(base_url)
            .map_err(|e| ConfigError::InvalidBaseUrl(e.to_string()))?;
        Ok(Self { base_url, api_key })
    }

    /// Points at the public Foursquare endpoint.
    pub fn foursquare(api_key: ApiKey) -> Result<Self, ConfigError> {
        Self::new(DEFAULT_API_BASE_URL, api_key)
    }

    pub fn base_url(&self) -> &ValidatedUrl {
        &self.base_url
    }

    pub fn api_key(&self) -> &ApiKey {
        &self.api_key
    }
}

/// Locale-dependent pieces of distance formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceFormat {
    pub meter_unit: String,
    pub kilometer_unit: String,
    pub decimal_separator: char,
}

impl DistanceFormat {
    pub fn new(
        meter_unit: impl Into<String>,
        kilometer_unit: impl Into<String>,
        decimal_separator: char,
    ) -> Result<Self, ConfigError> {
        let meter_unit = meter_unit.into();
        let kilometer_unit = kilometer_unit.into();
        if meter_unit.trim().is_empty() || kilometer_unit.trim().is_empty() {
            return Err(ConfigError::EmptyUnitLabel);
        }
        Ok(Self {
            meter_unit,
            kilometer_unit,
            decimal_separator,
        })
    }
}

impl Default for DistanceFormat {
    fn default() -> Self {
        Self {
            meter_unit: "m".to_string(),
            kilometer_unit: "km".to_string(),
            decimal_separator: '.',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    #[serde(default)]
    pub distance_format: DistanceFormat,
}

impl AppConfig {
    pub fn new(api: ApiConfig) -> Self {
        Self {
            api,
            distance_format: DistanceFormat::default(),
        }
    }
}
