#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

pub mod app;
pub mod capabilities;
pub mod config;
pub mod error;
pub mod event;
pub mod model;
pub mod summary;
pub mod venue_api;
pub mod view;

use std::time::Duration;

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use crux_core::{render::Render, App as CruxApp};
pub use event::Event;
pub use model::Model;
pub use view::ViewModel;

pub const DEFAULT_API_BASE_URL: &str = "https://api.foursquare.com";
pub const DEFAULT_RADIUS_M: u32 = 100_000;
pub const MIN_RADIUS_M: u32 = 1;
pub const MAX_RADIUS_M: u32 = 100_000;
pub const VENUE_PAGE_SIZE: u32 = 50;
pub const VENUE_FETCH_TIMEOUT: Duration = Duration::from_secs(30);
/// Distances strictly above this are shown in kilometres.
pub const KILOMETER_THRESHOLD_M: u64 = 100;
