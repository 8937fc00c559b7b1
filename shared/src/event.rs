use serde::{Deserialize, Serialize};

use crate::capabilities::{HttpResult, LocationResult};
use crate::config::AppConfig;

// --- Event enum: shell-facing variants first, capability responses boxed ---

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Event {
    Configure(Box<AppConfig>),

    // Screen lifecycle
    ScreenActivated,
    RefreshRequested,

    // Radius dialog
    RadiusSelectionTapped,
    RadiusEntered {
        raw: Option<String>,
    },
    RadiusPromptDismissed,

    // List
    VenueRowVisible {
        index: usize,
    },
    VenueSelected {
        index: usize,
    },
    AlertDismissed,

    // Capability responses, never sent by the shell
    #[serde(skip)]
    LocationResolved(LocationResult),
    #[serde(skip)]
    FirstPageFetched(Box<HttpResult>),
    #[serde(skip)]
    NextPageFetched(Box<HttpResult>),
}

impl Event {
    /// Stable name for log spans.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Configure(_) => "configure",
            Self::ScreenActivated => "screen_activated",
            Self::RefreshRequested => "refresh_requested",
            Self::RadiusSelectionTapped => "radius_selection_tapped",
            Self::RadiusEntered { .. } => "radius_entered",
            Self::RadiusPromptDismissed => "radius_prompt_dismissed",
            Self::VenueRowVisible { .. } => "venue_row_visible",
            Self::VenueSelected { .. } => "venue_selected",
            Self::AlertDismissed => "alert_dismissed",
            Self::LocationResolved(_) => "location_resolved",
            Self::FirstPageFetched(_) => "first_page_fetched",
            Self::NextPageFetched(_) => "next_page_fetched",
        }
    }
}
