//! Classification of every failure the user can see.
//!
//! Each [`ErrorKind`] has a stable numeric code for shell-side analytics plus
//! the title and message shown in the alert.

use serde::{Deserialize, Serialize};

use crate::capabilities::LocationError;
use crate::venue_api::RemoteError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    LocationFetchFailed,
    LocationServicesDisabled,
    LocationPermissionDenied,
    VenueFetchFailed,
    VenueConnectivity,
    VenueQueryInvalid,
    NoVenuesFound,
    VenueMapUnavailable,
    InvalidRadius,
}

impl ErrorKind {
    pub const fn code(self) -> u16 {
        match self {
            Self::LocationFetchFailed => 1001,
            Self::LocationServicesDisabled => 1002,
            Self::LocationPermissionDenied => 1003,
            Self::VenueFetchFailed => 2001,
            Self::VenueConnectivity => 2002,
            Self::VenueQueryInvalid => 2003,
            Self::NoVenuesFound => 2004,
            Self::VenueMapUnavailable => 3001,
            Self::InvalidRadius => 4001,
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::LocationFetchFailed => "Location fetch failed",
            Self::LocationServicesDisabled => "Device Location Services disabled",
            Self::LocationPermissionDenied => "App location permission denied",
            Self::VenueFetchFailed | Self::VenueConnectivity | Self::VenueQueryInvalid => {
                "Venue fetch error"
            }
            Self::NoVenuesFound => "No Venues found",
            Self::VenueMapUnavailable => "Venue Map Error",
            Self::InvalidRadius => "Invalid radius",
        }
    }

    pub const fn user_facing_message(self) -> &'static str {
        match self {
            Self::LocationFetchFailed => {
                "Please check location settings on your device and tap refresh button in VenueFinder"
            }
            Self::LocationServicesDisabled => {
                "Please enable Settings->Privacy->Location Services and tap refresh button in VenueFinder"
            }
            Self::LocationPermissionDenied => {
                "Please give the app location permission in Settings->Privacy->Location Services and tap refresh button in VenueFinder"
            }
            // fixed copy, spelling included
            Self::VenueFetchFailed => {
                "Venue fetch falied from server. Please tap on refresh after some time."
            }
            Self::VenueConnectivity => {
                "Unable to connect to server. Please troubleshoot your internet connection and tap on refresh."
            }
            Self::VenueQueryInvalid => "Something went wrong in the app. Please tap on refresh again.",
            Self::NoVenuesFound => {
                "No venues found for the given radius. Please refresh after increasing the radius."
            }
            Self::VenueMapUnavailable => {
                "Unable to open the current location since geolocation data is not available"
            }
            Self::InvalidRadius => RADIUS_HINT,
        }
    }
}

/// Shared by the radius prompt and the invalid-radius alert.
pub const RADIUS_HINT: &str = "Please enter a radius between 1 and 100000 meters.";

impl From<&LocationError> for ErrorKind {
    fn from(err: &LocationError) -> Self {
        match err {
            LocationError::AcquisitionFailed { .. } => Self::LocationFetchFailed,
            LocationError::AppPermissionDenied(_) => Self::LocationPermissionDenied,
            LocationError::DeviceLocationDisabled => Self::LocationServicesDisabled,
        }
    }
}

impl From<&RemoteError> for ErrorKind {
    fn from(err: &RemoteError) -> Self {
        match err {
            RemoteError::ServerError(_)
            | RemoteError::MalformedResponse
            | RemoteError::FetchFailed
            | RemoteError::DecodeFailed => Self::VenueFetchFailed,
            RemoteError::Transport(_) => Self::VenueConnectivity,
            RemoteError::InvalidQuery(_) => Self::VenueQueryInvalid,
        }
    }
}
