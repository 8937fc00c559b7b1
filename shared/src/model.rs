use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::config::{AppConfig, DistanceFormat};
use crate::view::{Alert, RadiusPrompt};
use crate::{DEFAULT_RADIUS_M, MAX_RADIUS_M, MIN_RADIUS_M};

// --- Coordinate ---

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateError {
    #[error("Latitude {0} is out of valid range [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("Longitude {0} is out of valid range [-180, 180]")]
    LongitudeOutOfRange(f64),
    #[error("Coordinate value is not finite (NaN or Infinity)")]
    NonFinite,
}

impl Coordinate {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Checks that the coordinate can be sent to the places API.
    pub fn validate(self) -> Result<Self, CoordinateError> {
        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return Err(CoordinateError::NonFinite);
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(CoordinateError::LatitudeOutOfRange(self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(CoordinateError::LongitudeOutOfRange(self.longitude));
        }
        Ok(self)
    }

    /// `"{lat},{lon}"` with four fractional digits, the `ll` query format.
    #[must_use]
    pub fn to_query_value(self) -> String {
        format!("{:.4},{:.4}", self.latitude, self.longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

// --- Search radius: validated, [MIN_RADIUS_M, MAX_RADIUS_M] ---

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchRadius(u32);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RadiusError {
    #[error("no radius entered")]
    Missing,
    #[error("radius '{0}' is not a whole number of meters")]
    NotANumber(String),
    #[error("radius {value} is outside [{min}, {max}]")]
    OutOfRange { value: u64, min: u32, max: u32 },
}

impl SearchRadius {
    pub fn new(meters: u32) -> Result<Self, RadiusError> {
        if (MIN_RADIUS_M..=MAX_RADIUS_M).contains(&meters) {
            Ok(Self(meters))
        } else {
            Err(RadiusError::OutOfRange {
                value: u64::from(meters),
                min: MIN_RADIUS_M,
                max: MAX_RADIUS_M,
            })
        }
    }

    /// Parses raw text from the radius dialog.
    pub fn parse(raw: Option<&str>) -> Result<Self, RadiusError> {
        let trimmed = raw.map(str::trim).unwrap_or_default();
        if trimmed.is_empty() {
            return Err(RadiusError::Missing);
        }
        let value: u64 = trimmed
            .parse()
            .map_err(|_| RadiusError::NotANumber(trimmed.to_string()))?;
        let meters = u32::try_from(value).map_err(|_| RadiusError::OutOfRange {
            value,
            min: MIN_RADIUS_M,
            max: MAX_RADIUS_M,
        })?;
        Self::new(meters)
    }

    #[must_use]
    pub const fn meters(self) -> u32 {
        self.0
    }
}

impl Default for SearchRadius {
    fn default() -> Self {
        Self(DEFAULT_RADIUS_M)
    }
}

impl fmt::Display for SearchRadius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} m", self.0)
    }
}

// --- Venue records, all fields optional: the remote schema is partially trusted ---

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub name: Option<String>,
    pub address: Option<String>,
    pub categories: Vec<Category>,
    pub distance_m: Option<u64>,
    pub coordinate: Option<Coordinate>,
}

/// Opaque continuation reference. Holds the absolute next-page URL taken from
/// the `Link` header and is re-issued verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageToken(String);

impl PageToken {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct VenuePage {
    pub venues: Vec<Venue>,
    pub next_page: Option<PageToken>,
}

// --- Discovery state machine ---

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    AwaitingLocation,
    AwaitingInitialPage,
    Ready,
    AwaitingNextPage,
}

impl Phase {
    /// True while a location or venue request is outstanding.
    #[must_use]
    pub const fn is_awaiting(self) -> bool {
        matches!(
            self,
            Self::AwaitingLocation | Self::AwaitingInitialPage | Self::AwaitingNextPage
        )
    }
}

/// Search state for one screen activation.
#[derive(Debug, Default)]
pub struct Model {
    pub phase: Phase,
    pub config: Option<AppConfig>,
    /// Taken from the last `Configure`; defaults until then.
    pub distance_format: DistanceFormat,
    pub radius: SearchRadius,
    pub current_location: Option<Coordinate>,
    pub venues: Vec<Venue>,
    pub next_page: Option<PageToken>,
    /// A refresh arrived while a fetch was in flight; the in-flight response
    /// is discarded and a new search starts when it lands.
    pub restart_pending: bool,
    pub show_empty_label: bool,
    pub alert: Option<Alert>,
    pub radius_prompt: Option<RadiusPrompt>,
}

impl Model {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.phase.is_awaiting()
    }

    pub fn set_alert(&mut self, alert: Alert) {
        self.alert = Some(alert);
    }

    pub fn clear_alert(&mut self) {
        self.alert = None;
    }

    /// Drops results and cursor ahead of a fresh search.
    pub fn reset_results(&mut self) {
        self.venues.clear();
        self.next_page = None;
        self.show_empty_label = false;
    }

    #[must_use]
    pub fn is_last_index(&self, index: usize) -> bool {
        self.venues.len().checked_sub(1) == Some(index)
    }
}
