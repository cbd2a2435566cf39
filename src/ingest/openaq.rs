/// OpenAQ v2 API client: URL construction + JSON response parsing.
///
/// Handles the two endpoints the aggregation pipeline consumes:
///   https://api.openaq.org/v2/locations   — paginated monitoring locations
///   https://api.openaq.org/v2/parameters  — the parameter catalog
///
/// See `fixtures.rs` for annotated examples of the response structures.

use crate::model::{AqError, LocationQuery};
use serde::{Deserialize, Deserializer};

// ---------------------------------------------------------------------------
// Serde structures for OpenAQ JSON deserialization
// ---------------------------------------------------------------------------

/// One page of the `/v2/locations` response: pagination metadata plus the
/// locations on that page. Consumed and discarded immediately after the
/// pipeline reduces it.
#[derive(Debug, Clone, Deserialize)]
pub struct LocationsPage {
    pub meta: PageMeta,
    pub results: Vec<LocationRecord>,
}

/// Pagination metadata echoed by the server. The pipeline treats the
/// echoed `page` as authoritative for its termination check, not its own
/// request counter.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageMeta {
    pub page: u32,
    pub limit: u32,
    pub found: u64,
}

/// One monitoring location: its coordinates and the latest measure per
/// reported parameter.
#[derive(Debug, Clone, Deserialize)]
pub struct LocationRecord {
    pub parameters: Vec<LatestMeasure>,
    pub coordinates: Coordinates,
}

/// A location's coordinates, kept as decimal-degree strings.
///
/// OpenAQ serves these as JSON numbers; the tolerant deserializer below
/// accepts either form so the original text survives into the output rows
/// without a float round-trip of our own.
#[derive(Debug, Clone, Deserialize)]
pub struct Coordinates {
    #[serde(deserialize_with = "deserialize_degree_string")]
    pub latitude: String,
    #[serde(deserialize_with = "deserialize_degree_string")]
    pub longitude: String,
}

/// The latest reading a location reports for one parameter.
#[derive(Debug, Clone, Deserialize)]
pub struct LatestMeasure {
    pub parameter: String,
    #[serde(rename = "lastValue")]
    pub last_value: f64,
}

/// Envelope of the `/v2/parameters` response.
#[derive(Debug, Clone, Deserialize)]
struct ParametersResponse {
    results: Vec<AqParameter>,
}

/// One parameter catalog entry. `displayName` is absent or null for a few
/// niche parameters, so it stays optional here and resolves to an empty
/// string downstream.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AqParameter {
    pub name: String,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "preferredUnit", default)]
    pub preferred_unit: Option<String>,
}

/// Accepts a JSON string or number and yields its text form.
fn deserialize_degree_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct DegreeVisitor;

    impl<'de> Visitor<'de> for DegreeVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a decimal-degree string or number")
        }

        fn visit_str<E>(self, value: &str) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_f64<E>(self, value: f64) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(format!("{}", value))
        }

        fn visit_i64<E>(self, value: i64) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(DegreeVisitor)
}

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

/// Default OpenAQ API base URL. Overridable via configuration, mainly so
/// tests can point the client at a local server.
pub const OPENAQ_BASE_URL: &str = "https://api.openaq.org/v2";

/// Builds a `/v2/locations` URL for one page of the given query.
///
/// Country mode filters by ISO 3166-1 country code; coordinate mode sends
/// a `latitude,longitude` pair with a radius in meters. Both carry the
/// parameter filter, even though the pipeline re-filters the results
/// (the upstream filter is not exact).
pub fn build_locations_url(base_url: &str, query: &LocationQuery, limit: u32, page: u32) -> String {
    match query {
        LocationQuery::Country {
            parameter,
            country_code,
        } => format!(
            "{}/locations?limit={}&page={}&parameter={}&country={}",
            base_url,
            limit,
            page,
            urlencoding::encode(parameter),
            urlencoding::encode(country_code),
        ),
        LocationQuery::Coordinates {
            parameter,
            latitude,
            longitude,
            radius_meters,
        } => format!(
            "{}/locations?limit={}&page={}&parameter={}&coordinates={},{}&radius={}",
            base_url,
            limit,
            page,
            urlencoding::encode(parameter),
            urlencoding::encode(latitude),
            urlencoding::encode(longitude),
            radius_meters,
        ),
    }
}

/// Builds the `/v2/parameters` URL. The catalog endpoint is not paginated.
pub fn build_parameters_url(base_url: &str) -> String {
    format!("{}/parameters", base_url)
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Parses a `/v2/locations` JSON response body into one `LocationsPage`.
///
/// # Errors
/// `AqError::Parse` — malformed or unexpected JSON structure.
pub fn parse_locations_response(json: &str) -> Result<LocationsPage, AqError> {
    serde_json::from_str(json)
        .map_err(|e| AqError::Parse(format!("locations deserialization failed: {}", e)))
}

/// Parses a `/v2/parameters` JSON response body into the flat parameter
/// catalog.
///
/// # Errors
/// `AqError::Parse` — malformed or unexpected JSON structure.
pub fn parse_parameters_response(json: &str) -> Result<Vec<AqParameter>, AqError> {
    let response: ParametersResponse = serde_json::from_str(json)
        .map_err(|e| AqError::Parse(format!("parameters deserialization failed: {}", e)))?;
    Ok(response.results)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
