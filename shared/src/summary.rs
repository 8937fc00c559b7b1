//! Row content for a single venue.

use serde::{Deserialize, Serialize};

use crate::config::DistanceFormat;
use crate::model::{Coordinate, Venue};
use crate::KILOMETER_THRESHOLD_M;

/// Label used for the map pin when a venue has no name.
pub const FALLBACK_MAP_LABEL: &str = "Venue";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum VenueAction {
    OpenInMaps { coordinate: Coordinate, label: String },
    LocationUnavailable,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VenueSummary {
    pub display_name: String,
    pub address: String,
    pub category_line: String,
    pub activation: VenueAction,
}

/// Short distance text: metres up to [`KILOMETER_THRESHOLD_M`], kilometres
/// with at most one fraction digit beyond it.
///
/// ```
/// use shared::config::DistanceFormat;
/// use shared::summary::format_distance;
///
/// let format = DistanceFormat::default();
/// assert_eq!(format_distance(44, &format), "44m");
/// assert_eq!(format_distance(1_050, &format), "1km");
/// assert_eq!(format_distance(1_150, &format), "1.2km");
/// assert_eq!(format_distance(2_000, &format), "2km");
/// ```
pub fn format_distance(meters: u64, format: &DistanceFormat) -> String {
    if meters <= KILOMETER_THRESHOLD_M {
        return format!("{meters}{}", format.meter_unit);
    }
    // tenths of a kilometre, ties to the even tenth
    let (mut tenths, rest) = (meters / 100, meters % 100);
    if rest > 50 || (rest == 50 && tenths % 2 == 1) {
        tenths += 1;
    }
    let (whole, frac) = (tenths / 10, tenths % 10);
    if frac == 0 {
        format!("{whole}{}", format.kilometer_unit)
    } else {
        format!(
            "{whole}{}{frac}{}",
            format.decimal_separator, format.kilometer_unit
        )
    }
}

pub fn summarize(venue: &Venue, format: &DistanceFormat) -> VenueSummary {
    let name = venue.name.as_deref().unwrap_or_default();
    let display_name = match (venue.name.as_deref(), venue.distance_m) {
        (Some(name), Some(distance)) => format!("{name} ({})", format_distance(distance, format)),
        _ => name.to_string(),
    };

    let category_line = venue
        .categories
        .iter()
        .filter_map(|c| c.name.as_deref())
        .collect::<Vec<_>>()
        .join(", ");

    let activation = match venue.coordinate {
        Some(coordinate) => VenueAction::OpenInMaps {
            coordinate,
            label: venue
                .name
                .clone()
                .unwrap_or_else(|| FALLBACK_MAP_LABEL.to_string()),
        },
        None => VenueAction::LocationUnavailable,
    };

    VenueSummary {
        display_name,
        address: venue.address.clone().unwrap_or_default(),
        category_line,
        activation,
    }
}
