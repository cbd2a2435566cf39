/// Core data types for the air quality heatmap service.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no I/O — only types, their serde mappings, and the error
/// taxonomy.

use serde::Serialize;
use std::fmt;

// ---------------------------------------------------------------------------
// Query types
// ---------------------------------------------------------------------------

/// One aggregation request, built once per invocation and never mutated.
///
/// Exactly one of the two selection modes applies: a whole country, or a
/// circle around a coordinate. The air quality parameter (e.g. "pm25",
/// "no2") is common to both.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    /// All monitoring locations in an ISO 3166-1 country.
    Country {
        parameter: String,
        country_code: String,
    },
    /// All monitoring locations within `radius_meters` of a coordinate.
    /// Latitude and longitude are decimal-degree strings, already validated
    /// by the caller (see `validate`).
    Coordinates {
        parameter: String,
        latitude: String,
        longitude: String,
        radius_meters: u32,
    },
}

impl LocationQuery {
    /// The requested air quality parameter, whichever selection mode is used.
    pub fn parameter(&self) -> &str {
        match self {
            LocationQuery::Country { parameter, .. } => parameter,
            LocationQuery::Coordinates { parameter, .. } => parameter,
        }
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One heatmap data point: a monitoring location's coordinates and its
/// latest reading for the requested parameter.
///
/// Latitude and longitude are kept as the decimal-degree strings the
/// upstream API returned, preserving the source formatting instead of
/// round-tripping through floats.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRow {
    pub latitude: String,
    pub longitude: String,
    pub value: f64,
}

/// The assembled aggregation result, serialized as-is for the heatmap
/// frontend.
///
/// `min` is pinned at 0: the renderer anchors its gradient floor there and
/// the actual minimum is not computed. `max` is `None` when no location
/// reported the requested parameter; it serializes as JSON `null` rather
/// than a smallest-representable-number sentinel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapResponse {
    pub min: f64,
    pub max: Option<f64>,
    pub parameter: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(rename = "dataSet")]
    pub data_set: Vec<OutputRow>,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when fetching or aggregating OpenAQ data.
#[derive(Debug, Clone, PartialEq)]
pub enum AqError {
    /// The requested parameter is not in the OpenAQ parameter catalog.
    /// Client-facing and non-retryable.
    InvalidParameter,
    /// A request input failed validation (blank parameter, malformed
    /// coordinate, out-of-range radius).
    InvalidInput(String),
    /// Non-2xx HTTP response from the OpenAQ API, after retries.
    HttpStatus(u16),
    /// The transport could not complete a call (connect, timeout, body
    /// read), after retries.
    Transport(String),
    /// The response body could not be deserialized.
    Parse(String),
    /// Page metadata that can never satisfy the pagination termination
    /// arithmetic (`page * limit >= found`), e.g. a zero limit or a
    /// non-advancing echoed page number.
    DegeneratePagination { page: u32, limit: u32, found: u64 },
}

impl fmt::Display for AqError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AqError::InvalidParameter => write!(f, "Invalid air quality parameter"),
            AqError::InvalidInput(msg) => write!(f, "{}", msg),
            AqError::HttpStatus(code) => write!(f, "HTTP error: {}", code),
            AqError::Transport(msg) => write!(f, "Transport error: {}", msg),
            AqError::Parse(msg) => write!(f, "Parse error: {}", msg),
            AqError::DegeneratePagination { page, limit, found } => write!(
                f,
                "Degenerate pagination metadata: page={} limit={} found={}",
                page, limit, found
            ),
        }
    }
}

impl std::error::Error for AqError {}
