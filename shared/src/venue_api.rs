//! Places API client: request building, response decoding and failure
//! classification for venue searches.
//!
//! Nothing here performs I/O. Requests are handed to the shell through the
//! HTTP capability and the shell's [`HttpResult`] comes back to
//! [`parse_page`].

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::capabilities::{HttpError, HttpMethod, HttpRequest, HttpResult, ValidatedUrl};
use crate::config::ApiConfig;
use crate::model::{Category, Coordinate, PageToken, SearchRadius, Venue, VenuePage};
use crate::VENUE_FETCH_TIMEOUT;

pub const SEARCH_PATH: [&str; 3] = ["v3", "places", "search"];
pub const SORT_BY_DISTANCE: &str = "DISTANCE";
pub const LINK_HEADER: &str = "Link";

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum RemoteError {
    #[error("server responded with status {0}")]
    ServerError(u16),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("response was not a valid HTTP response")]
    MalformedResponse,

    #[error("response carried no body")]
    FetchFailed,

    #[error("response body could not be decoded")]
    DecodeFailed,

    #[error("request could not be built: {0}")]
    InvalidQuery(String),
}

impl From<HttpError> for RemoteError {
    fn from(err: HttpError) -> Self {
        match err {
            e if e.is_transport() => Self::Transport(e.to_string()),
            HttpError::InvalidResponse { .. } => Self::MalformedResponse,
            e => Self::InvalidQuery(e.to_string()),
        }
    }
}

/// First page of venues around `center`, nearest first.
pub fn search_request(
    api: &ApiConfig,
    center: Coordinate,
    radius: SearchRadius,
    limit: u32,
) -> Result<HttpRequest, RemoteError> {
    let center = center
        .validate()
        .map_err(|e| RemoteError::InvalidQuery(e.to_string()))?;
    if limit == 0 {
        return Err(RemoteError::InvalidQuery("page size must be positive".to_string()));
    }

    let mut url = Url::parse(api.base_url().as_str())
        .map_err(|e| RemoteError::InvalidQuery(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| RemoteError::InvalidQuery("base URL cannot carry a path".to_string()))?
        .pop_if_empty()
        .extend(SEARCH_PATH);
    url.query_pairs_mut()
        .clear()
        .append_pair("limit", &limit.to_string())
        .append_pair("ll", &center.to_query_value())
        .append_pair("radius", &radius.meters().to_string())
        .append_pair("sort", SORT_BY_DISTANCE);

    let url = ValidatedUrl::from_url(&url)?;
    authorized(api, HttpRequest::new(HttpMethod::Get, url))
}

/// Follow-up page. The token is re-issued verbatim, but only against the
/// configured API host so the credential never leaves it.
pub fn continuation_request(api: &ApiConfig, token: &PageToken) -> Result<HttpRequest, RemoteError> {
    let url = ValidatedUrl::new(token.as_str())?;
    if url.host() != api.base_url().host() || url.scheme() != api.base_url().scheme() {
        return Err(RemoteError::InvalidQuery(format!(
            "continuation points at foreign origin {}://{}",
            url.scheme(),
            url.host()
        )));
    }
    authorized(api, HttpRequest::new(HttpMethod::Get, url))
}

fn authorized(api: &ApiConfig, request: HttpRequest) -> Result<HttpRequest, RemoteError> {
    Ok(request
        .with_header("Accept", "application/json")?
        .with_header("Authorization", api.api_key().expose())?
        .with_timeout(VENUE_FETCH_TIMEOUT)?)
}

/// Interprets the shell's answer to a search or continuation request.
pub fn parse_page(result: HttpResult) -> Result<VenuePage, RemoteError> {
    let response = result.map_err(|e| {
        tracing::debug!(request_id = e.request_id(), error = %e, "venue request failed in shell");
        RemoteError::from(e)
    })?;
    if !response.is_success() {
        return Err(RemoteError::ServerError(response.status()));
    }
    if response.body().is_empty() {
        return Err(RemoteError::FetchFailed);
    }

    let envelope: Envelope = serde_json::from_slice(response.body()).map_err(|e| {
        tracing::debug!(request_id = response.request_id(), error = %e, "undecodable venue response");
        RemoteError::DecodeFailed
    })?;

    let venues = envelope
        .results
        .into_iter()
        .filter(serde_json::Value::is_object)
        .filter_map(|entry| serde_json::from_value::<RawVenue>(entry).ok())
        .map(Venue::from)
        .collect();

    Ok(VenuePage {
        venues,
        next_page: extract_next_page(response.header(LINK_HEADER)),
    })
}

/// Takes the target of the first entry of a `Link` header,
/// `<https://…>; rel="next"`.
pub fn extract_next_page(link: Option<&str>) -> Option<PageToken> {
    let first = link?.split(';').next()?.trim();
    let target = first.strip_prefix('<')?.strip_suffix('>')?;
    let url = Url::parse(target).ok()?;
    matches!(url.scheme(), "http" | "https").then(|| PageToken::new(target))
}

// --- Wire format ---

#[derive(Deserialize)]
struct Envelope {
    results: Vec<serde_json::Value>,
}

/// A field that decodes to `None` on absence *or* type mismatch, so one bad
/// field never costs the whole record.
#[derive(Debug)]
struct Lenient<T>(Option<T>);

impl<T> Default for Lenient<T> {
    fn default() -> Self {
        Self(None)
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Lenient<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Self(serde_json::from_value(value).ok()))
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawVenue {
    name: Lenient<String>,
    location: Lenient<RawLocation>,
    categories: Lenient<Vec<Lenient<RawCategory>>>,
    distance: Lenient<u64>,
    geocodes: Lenient<RawGeocodes>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawLocation {
    formatted_address: Lenient<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawCategory {
    name: Lenient<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawGeocodes {
    main: Lenient<RawPoint>,
}

#[derive(Deserialize)]
struct RawPoint {
    latitude: f64,
    longitude: f64,
}

impl From<RawVenue> for Venue {
    fn from(raw: RawVenue) -> Self {
        Self {
            name: raw.name.0,
            address: raw.location.0.and_then(|l| l.formatted_address.0),
            categories: raw
                .categories
                .0
                .unwrap_or_default()
                .into_iter()
                .filter_map(|c| c.0)
                .map(|c| Category { name: c.name.0 })
                .collect(),
            distance_m: raw.distance.0,
            coordinate: raw
                .geocodes
                .0
                .and_then(|g| g.main.0)
                .map(|p| Coordinate::new(p.latitude, p.longitude)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::{HttpHeaders, HttpResponse};
    use crate::config::ApiKey;
    use assert_matches::assert_matches;
    use proptest::prelude::*;

    fn api() -> ApiConfig {
        ApiConfig::foursquare(ApiKey::new("fsq-test-key").expect("key")).expect("config")
    }

    fn ok_response(body: &str, link: Option<&str>) -> HttpResult {
        let headers = link
            .map(|l| vec![("link".to_string(), l.to_string())])
            .unwrap_or_default();
        Ok(HttpResponse::new(
            200,
            HttpHeaders::from(headers),
            body.as_bytes().to_vec(),
            "req",
        ))
    }

    #[test]
    fn search_request_carries_query_headers_and_timeout() {
        let request = search_request(
            &api(),
            Coordinate::new(1.1, 2.2),
            SearchRadius::default(),
            50,
        )
        .expect("request");

        assert_eq!(request.url().host(), "api.foursquare.com");
        assert_eq!(request.url().path(), "/v3/places/search");
        assert_eq!(
            request.url().query_pairs(),
            vec![
                ("limit".to_string(), "50".to_string()),
                ("ll".to_string(), "1.1000,2.2000".to_string()),
                ("radius".to_string(), "100000".to_string()),
                ("sort".to_string(), "DISTANCE".to_string()),
            ]
        );
        assert_eq!(request.headers().get("Accept"), Some("application/json"));
        assert_eq!(request.headers().get("Authorization"), Some("fsq-test-key"));
        assert_eq!(request.timeout_ms(), 30_000);
    }

    #[test]
    fn search_request_keeps_base_path_prefix() {
        let api = ApiConfig::new("https://proxy.example.com/places-api/", ApiKey::new("k").expect("key"))
            .expect("config");
        let request = search_request(&api, Coordinate::new(0.0, 0.0), SearchRadius::default(), 10)
            .expect("request");
        assert_eq!(request.url().path(), "/places-api/v3/places/search");
    }

    #[test]
    fn search_request_rejects_invalid_center() {
        assert_matches!(
            search_request(&api(), Coordinate::new(f64::NAN, 0.0), SearchRadius::default(), 50),
            Err(RemoteError::InvalidQuery(_))
        );
    }

    #[test]
    fn continuation_reuses_url_and_headers() {
        let token = PageToken::new("https://api.foursquare.com/v3/places/search?cursor=abc&limit=50");
        let request = continuation_request(&api(), &token).expect("request");
        assert_eq!(request.url().as_str(), token.as_str());
        assert_eq!(request.headers().get("authorization"), Some("fsq-test-key"));
        assert_eq!(request.timeout_ms(), 30_000);
    }

    #[test]
    fn continuation_to_foreign_host_is_refused() {
        let token = PageToken::new("https://evil.example.com/v3/places/search?cursor=abc");
        assert_matches!(
            continuation_request(&api(), &token),
            Err(RemoteError::InvalidQuery(_))
        );
        let downgraded = PageToken::new("http://api.foursquare.com/v3/places/search?cursor=abc");
        assert_matches!(
            continuation_request(&api(), &downgraded),
            Err(RemoteError::InvalidQuery(_))
        );
    }

    #[test]
    fn link_header_extraction() {
        assert_eq!(
            extract_next_page(Some(
                "<https://api.foursquare.com/v3/places/search?cursor=c1>; rel=\"next\""
            )),
            Some(PageToken::new("https://api.foursquare.com/v3/places/search?cursor=c1"))
        );
        assert_eq!(
            extract_next_page(Some("  <https://a.example/x> ")),
            Some(PageToken::new("https://a.example/x"))
        );
        assert_eq!(extract_next_page(None), None);
        assert_eq!(extract_next_page(Some("")), None);
        assert_eq!(extract_next_page(Some("https://a.example/x; rel=\"next\"")), None);
        assert_eq!(extract_next_page(Some("<not a url>; rel=\"next\"")), None);
        assert_eq!(extract_next_page(Some("<ftp://a.example/x>")), None);
    }

    #[test]
    fn parse_page_decodes_full_record() {
        let body = r#"{"results":[{
            "name":"Venue1",
            "location":{"formatted_address":"1 Main St"},
            "categories":[{"name":"Cafe"},{"name":"Bakery"}],
            "distance":44,
            "geocodes":{"main":{"latitude":1.1,"longitude":2.2}}
        }]}"#;
        let page = parse_page(ok_response(body, None)).expect("page");
        assert_eq!(
            page.venues,
            vec![Venue {
                name: Some("Venue1".into()),
                address: Some("1 Main St".into()),
                categories: vec![
                    Category { name: Some("Cafe".into()) },
                    Category { name: Some("Bakery".into()) },
                ],
                distance_m: Some(44),
                coordinate: Some(Coordinate::new(1.1, 2.2)),
            }]
        );
        assert_eq!(page.next_page, None);
    }

    #[test]
    fn parse_page_tolerates_bad_fields_individually() {
        let body = r#"{"results":[
            {"name":7,"distance":"far","categories":[{"name":"Park"},"junk",{"name":null}],
             "geocodes":{"main":{"latitude":"x","longitude":2.0}}},
            {},
            "not a venue",
            [1,2]
        ]}"#;
        let page = parse_page(ok_response(body, Some("<https://api.foursquare.com/next>"))).expect("page");
        assert_eq!(page.venues.len(), 2);
        let first = &page.venues[0];
        assert_eq!(first.name, None);
        assert_eq!(first.distance_m, None);
        assert_eq!(first.coordinate, None);
        assert_eq!(
            first.categories,
            vec![Category { name: Some("Park".into()) }, Category { name: None }]
        );
        assert_eq!(page.venues[1], Venue::default());
        assert_eq!(page.next_page, Some(PageToken::new("https://api.foursquare.com/next")));
    }

    #[test]
    fn parse_page_failure_classification() {
        assert_matches!(
            parse_page(Ok(HttpResponse::new(401, HttpHeaders::new(), b"{}".to_vec(), "r"))),
            Err(RemoteError::ServerError(401))
        );
        assert_matches!(parse_page(ok_response("", None)), Err(RemoteError::FetchFailed));
        assert_matches!(parse_page(ok_response("{}", None)), Err(RemoteError::DecodeFailed));
        assert_matches!(
            parse_page(ok_response(r#"{"results":{}}"#, None)),
            Err(RemoteError::DecodeFailed)
        );
        assert_matches!(parse_page(ok_response("<html>", None)), Err(RemoteError::DecodeFailed));
        assert_matches!(
            parse_page(Err(HttpError::Timeout { timeout_ms: 30_000, request_id: "r".into() })),
            Err(RemoteError::Transport(_))
        );
        assert_matches!(
            parse_page(Err(HttpError::InvalidResponse {
                reason: "not http".into(),
                request_id: "r".into()
            })),
            Err(RemoteError::MalformedResponse)
        );
    }

    #[test]
    fn empty_results_is_an_empty_page() {
        let page = parse_page(ok_response(r#"{"results":[]}"#, None)).expect("page");
        assert!(page.venues.is_empty());
    }

    proptest! {
        #[test]
        fn link_extraction_roundtrips_any_query(cursor in "[A-Za-z0-9]{1,40}") {
            let target = format!("https://api.foursquare.com/v3/places/search?cursor={cursor}");
            let header = format!("<{target}>; rel=\"next\"");
            prop_assert_eq!(extract_next_page(Some(&header)), Some(PageToken::new(target)));
        }

        #[test]
        fn link_without_brackets_is_ignored(text in "[^<>]{0,40}") {
            prop_assert_eq!(extract_next_page(Some(&text)), None);
        }
    }
}
