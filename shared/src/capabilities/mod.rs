mod http;
mod location;
mod map_opener;

pub use self::http::{
    Http, HttpError, HttpHeaders, HttpMethod, HttpOperation, HttpRequest, HttpResponse,
    HttpResult, ValidatedUrl, DEFAULT_TIMEOUT_MS,
};
pub use self::location::{
    Accuracy, AuthorizationStatus, Location, LocationError, LocationOperation, LocationResult,
    LocationUpdate,
};
pub use self::map_opener::{MapOpener, MapOpenerOperation};

pub use crux_core::render::Render;

use crate::app::App;
use crate::event::Event;

/// Effects the core can ask the shell to perform.
#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub render: Render<Event>,
    pub http: Http<Event>,
    pub location: Location<Event>,
    pub map_opener: MapOpener<Event>,
}
