use crate::capabilities::{Accuracy, Capabilities, HttpResult, LocationResult};
use crate::error::ErrorKind;
use crate::event::Event;
use crate::model::{Coordinate, Model, Phase, SearchRadius};
use crate::summary::{summarize, VenueAction};
use crate::venue_api::{self, RemoteError};
use crate::view::{RadiusPrompt, ViewModel, NO_VENUES_MESSAGE};
use crate::VENUE_PAGE_SIZE;

#[derive(Default)]
pub struct App;

impl App {
    /// Starts a fresh search. Never issues a second outbound request while
    /// one is pending.
    fn refresh(model: &mut Model, caps: &Capabilities) {
        model.reset_results();
        match model.phase {
            Phase::AwaitingLocation => {
                tracing::debug!("refresh joins pending location request");
            }
            Phase::AwaitingInitialPage | Phase::AwaitingNextPage => {
                tracing::info!(phase = ?model.phase, "refresh deferred until in-flight fetch lands");
                model.restart_pending = true;
            }
            Phase::Idle | Phase::Ready => Self::request_location(model, caps),
        }
    }

    fn request_location(model: &mut Model, caps: &Capabilities) {
        model.phase = Phase::AwaitingLocation;
        caps.location
            .current_position(Accuracy::Best, Event::LocationResolved);
    }

    /// A refresh arrived while the response in hand was in flight: drop the
    /// response and start over.
    fn take_restart(model: &mut Model, caps: &Capabilities) -> bool {
        if !model.restart_pending {
            return false;
        }
        tracing::info!("discarding response superseded by refresh");
        model.restart_pending = false;
        model.reset_results();
        Self::request_location(model, caps);
        true
    }

    fn on_location(result: LocationResult, model: &mut Model, caps: &Capabilities) {
        if model.phase != Phase::AwaitingLocation {
            tracing::warn!(phase = ?model.phase, "location result without pending request");
            return;
        }

        match result {
            Ok(center) => {
                tracing::debug!(%center, "location acquired");
                model.current_location = Some(center);
                Self::search(center, model, caps);
            }
            Err(err) => {
                tracing::warn!(error = %err, "location unavailable");
                Self::fail_search(ErrorKind::from(&err), model);
            }
        }
    }

    fn search(center: Coordinate, model: &mut Model, caps: &Capabilities) {
        let request = model
            .config
            .as_ref()
            .ok_or_else(|| RemoteError::InvalidQuery("API is not configured".to_string()))
            .and_then(|config| {
                venue_api::search_request(&config.api, center, model.radius, VENUE_PAGE_SIZE)
            });

        match request {
            Ok(request) => {
                tracing::info!(
                    request_id = request.request_id(),
                    radius_m = model.radius.meters(),
                    limit = VENUE_PAGE_SIZE,
                    "searching venues"
                );
                model.phase = Phase::AwaitingInitialPage;
                caps.http
                    .send(request, |result| Event::FirstPageFetched(Box::new(result)));
            }
            Err(err) => {
                tracing::error!(error = %err, "venue search not sent");
                Self::fail_search(ErrorKind::from(&err), model);
            }
        }
    }

    fn fail_search(kind: ErrorKind, model: &mut Model) {
        model.venues.clear();
        model.next_page = None;
        model.show_empty_label = true;
        model.set_alert(kind.into());
        model.phase = Phase::Ready;
    }

    fn on_first_page(result: HttpResult, model: &mut Model, caps: &Capabilities) {
        if model.phase != Phase::AwaitingInitialPage {
            tracing::warn!(phase = ?model.phase, "first page without pending search");
            return;
        }
        if Self::take_restart(model, caps) {
            return;
        }

        match venue_api::parse_page(result) {
            Ok(page) => {
                tracing::info!(
                    count = page.venues.len(),
                    has_more = page.next_page.is_some(),
                    "venues loaded"
                );
                model.venues = page.venues;
                model.next_page = page.next_page;
                model.phase = Phase::Ready;
                model.show_empty_label = model.venues.is_empty();
                if model.venues.is_empty() {
                    model.set_alert(ErrorKind::NoVenuesFound.into());
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "venue search failed");
                Self::fail_search(ErrorKind::from(&err), model);
            }
        }
    }

    fn fetch_more_if_needed(index: usize, model: &mut Model, caps: &Capabilities) {
        if model.phase != Phase::Ready || !model.is_last_index(index) {
            return;
        }
        let Some(token) = model.next_page.as_ref() else {
            return;
        };
        let Some(config) = model.config.as_ref() else {
            tracing::warn!("cannot page without configuration");
            return;
        };

        match venue_api::continuation_request(&config.api, token) {
            Ok(request) => {
                tracing::debug!(request_id = request.request_id(), index, "fetching next page");
                model.phase = Phase::AwaitingNextPage;
                caps.http
                    .send(request, |result| Event::NextPageFetched(Box::new(result)));
            }
            Err(err) => {
                tracing::warn!(error = %err, "dropping unusable continuation");
                model.next_page = None;
            }
        }
    }

    fn on_next_page(result: HttpResult, model: &mut Model, caps: &Capabilities) {
        if model.phase != Phase::AwaitingNextPage {
            tracing::warn!(phase = ?model.phase, "next page without pending request");
            return;
        }
        if Self::take_restart(model, caps) {
            return;
        }
        model.phase = Phase::Ready;

        match venue_api::parse_page(result) {
            Ok(page) => {
                model.venues.extend(page.venues);
                model.next_page = page.next_page;
                tracing::debug!(
                    total = model.venues.len(),
                    has_more = model.next_page.is_some(),
                    "page appended"
                );
            }
            // cursor stays, so scrolling to the end again retries
            Err(err) => tracing::warn!(error = %err, "next page failed"),
        }
    }

    fn set_radius(raw: Option<&str>, model: &mut Model, caps: &Capabilities) {
        match SearchRadius::parse(raw) {
            Ok(radius) => {
                tracing::info!(radius_m = radius.meters(), "radius changed");
                model.radius = radius;
                model.radius_prompt = None;
                Self::refresh(model, caps);
            }
            Err(err) => {
                tracing::debug!(error = %err, "radius rejected");
                model.radius_prompt = Some(RadiusPrompt::invalid());
            }
        }
    }

    fn open_venue(index: usize, model: &mut Model, caps: &Capabilities) {
        let Some(venue) = model.venues.get(index) else {
            tracing::warn!(index, count = model.venues.len(), "selected row out of range");
            return;
        };

        match summarize(venue, &model.distance_format).activation {
            VenueAction::OpenInMaps { coordinate, label } => caps.map_opener.open(coordinate, label),
            VenueAction::LocationUnavailable => {
                model.set_alert(ErrorKind::VenueMapUnavailable.into());
            }
        }
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        let span = tracing::debug_span!("update", event = event.name(), phase = ?model.phase);
        let _entered = span.enter();

        match event {
            Event::Configure(config) => {
                tracing::info!(host = config.api.base_url().host(), "api configured");
                model.distance_format = config.distance_format.clone();
                model.config = Some(*config);
            }
            Event::ScreenActivated | Event::RefreshRequested => Self::refresh(model, caps),
            Event::RadiusSelectionTapped => model.radius_prompt = Some(RadiusPrompt::enter()),
            Event::RadiusEntered { raw } => Self::set_radius(raw.as_deref(), model, caps),
            Event::RadiusPromptDismissed => model.radius_prompt = None,
            Event::VenueRowVisible { index } => Self::fetch_more_if_needed(index, model, caps),
            Event::VenueSelected { index } => Self::open_venue(index, model, caps),
            Event::AlertDismissed => model.clear_alert(),
            Event::LocationResolved(result) => Self::on_location(result, model, caps),
            Event::FirstPageFetched(result) => Self::on_first_page(*result, model, caps),
            Event::NextPageFetched(result) => Self::on_next_page(*result, model, caps),
        }

        caps.render.render();
    }

    fn view(&self, model: &Model) -> ViewModel {
        let format = &model.distance_format;
        ViewModel {
            is_loading: model.is_loading(),
            venues: model.venues.iter().map(|v| summarize(v, format)).collect(),
            empty_message: model
                .show_empty_label
                .then(|| NO_VENUES_MESSAGE.to_string()),
            alert: model.alert.clone(),
            radius_prompt: model.radius_prompt.clone(),
            radius_m: model.radius.meters(),
            has_more: model.next_page.is_some(),
        }
    }
}
