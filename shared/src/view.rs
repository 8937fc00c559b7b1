//! What the shell renders. Everything here is derived from the
//! [`Model`](crate::model::Model) on each `view` call.

use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, RADIUS_HINT};
use crate::summary::VenueSummary;

/// Shown beneath an empty list, independent of any alert.
pub const NO_VENUES_MESSAGE: &str =
    "No venues found. Please check your location settings, network, radius and tap on refresh.";

pub const RADIUS_PROMPT_TITLE: &str = "Enter a Radius";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub title: String,
    pub message: String,
    pub code: u16,
}

impl From<ErrorKind> for Alert {
    fn from(kind: ErrorKind) -> Self {
        Self {
            title: kind.title().to_string(),
            message: kind.user_facing_message().to_string(),
            code: kind.code(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadiusPrompt {
    pub title: String,
    pub message: String,
}

impl RadiusPrompt {
    pub fn enter() -> Self {
        Self {
            title: RADIUS_PROMPT_TITLE.to_string(),
            message: RADIUS_HINT.to_string(),
        }
    }

    /// Re-prompt after rejected input.
    pub fn invalid() -> Self {
        Self {
            title: ErrorKind::InvalidRadius.title().to_string(),
            message: ErrorKind::InvalidRadius.user_facing_message().to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewModel {
    pub is_loading: bool,
    pub venues: Vec<VenueSummary>,
    pub empty_message: Option<String>,
    pub alert: Option<Alert>,
    pub radius_prompt: Option<RadiusPrompt>,
    pub radius_m: u32,
    pub has_more: bool,
}
