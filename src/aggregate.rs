/// The aggregation pipeline: drives the paginated locations API to
/// exhaustion and reduces the results into heatmap rows.
///
/// Per request the pipeline:
/// 1. validates the requested parameter against the parameter catalog
///    (once, before any page is fetched),
/// 2. loops fetch page → reduce locations to rows → accumulate the running
///    maximum, until the echoed page metadata says every match was seen,
/// 3. resolves the parameter's display name from the catalog,
/// 4. assembles the `HeatmapResponse`.
///
/// Everything here is synchronous and per-request; the only suspension
/// points are the outbound calls through `LocationSource`. A failure
/// anywhere discards all rows accumulated so far — no partial results.

use crate::ingest::openaq::{AqParameter, LocationsPage};
use crate::model::{AqError, HeatmapResponse, LocationQuery, OutputRow};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Fetcher boundary
// ---------------------------------------------------------------------------

/// The external fetcher capability the pipeline consumes.
///
/// `client::OpenAqClient` is the production implementation; tests script
/// the pipeline with canned pages instead. Retry and backoff live behind
/// this boundary — by the time an `Err` reaches the pipeline, retries are
/// exhausted and the failure is final.
pub trait LocationSource {
    /// Fetches one page of monitoring locations for the query.
    fn fetch_locations(&self, query: &LocationQuery, page: u32) -> Result<LocationsPage, AqError>;

    /// Fetches the full parameter catalog. Returns a shared immutable
    /// snapshot so an implementation may cache it across requests.
    fn fetch_parameter_catalog(&self) -> Result<Arc<Vec<AqParameter>>, AqError>;
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Aggregates the latest readings of `parameter` for every monitoring
/// location in a country.
pub fn aggregate_by_country(
    source: &impl LocationSource,
    parameter: &str,
    country_code: &str,
) -> Result<HeatmapResponse, AqError> {
    run(
        source,
        &LocationQuery::Country {
            parameter: parameter.to_string(),
            country_code: country_code.to_string(),
        },
    )
}

/// Aggregates the latest readings of `parameter` for every monitoring
/// location within `radius_meters` of a coordinate.
pub fn aggregate_by_coordinates(
    source: &impl LocationSource,
    parameter: &str,
    latitude: &str,
    longitude: &str,
    radius_meters: u32,
) -> Result<HeatmapResponse, AqError> {
    run(
        source,
        &LocationQuery::Coordinates {
            parameter: parameter.to_string(),
            latitude: latitude.to_string(),
            longitude: longitude.to_string(),
            radius_meters,
        },
    )
}

// ---------------------------------------------------------------------------
// Pipeline stages
// ---------------------------------------------------------------------------

fn run(source: &impl LocationSource, query: &LocationQuery) -> Result<HeatmapResponse, AqError> {
    if !is_valid_parameter(source, query.parameter())? {
        return Err(AqError::InvalidParameter);
    }

    let (rows, max_value) = collect_rows(source, query)?;
    let display_name = resolve_display_name(source, query.parameter())?;

    // min stays pinned at 0 for the heatmap gradient floor; the actual
    // minimum of the rows is not computed.
    Ok(HeatmapResponse {
        min: 0.0,
        max: max_value,
        parameter: query.parameter().to_string(),
        display_name,
        data_set: rows,
    })
}

/// Exact-name membership check against the parameter catalog.
///
/// A catalog fetch failure is a transport failure, not a validation
/// failure, and propagates untouched.
fn is_valid_parameter(source: &impl LocationSource, parameter: &str) -> Result<bool, AqError> {
    let catalog = source.fetch_parameter_catalog()?;
    Ok(catalog.iter().any(|entry| entry.name == parameter))
}

/// Drives the locations API across all pages and reduces each page into
/// output rows, tracking the running maximum.
///
/// Per location the measure list is scanned in order and the FIRST entry
/// whose parameter name exactly equals the requested one wins; the scan
/// then stops, so a location contributes at most one row even when it
/// reports the parameter twice. The upstream parameter filter is known to
/// be leaky, which is why the re-filter happens here at all.
///
/// Termination: the server-echoed page number is authoritative, and the
/// loop stops once `page * limit >= found`. Metadata that can never clear
/// that threshold (zero limit, a non-advancing echoed page) fails with
/// `DegeneratePagination` instead of spinning.
fn collect_rows(
    source: &impl LocationSource,
    query: &LocationQuery,
) -> Result<(Vec<OutputRow>, Option<f64>), AqError> {
    let mut rows: Vec<OutputRow> = Vec::new();
    let mut max_value: Option<f64> = None;
    let mut page: u32 = 0;
    let mut last_echoed_page: u32 = 0;

    loop {
        page += 1;
        let fetched = source.fetch_locations(query, page)?;
        let meta = fetched.meta;
        // The echoed page replaces our own counter for the loop condition.
        page = meta.page;

        for location in &fetched.results {
            for measure in &location.parameters {
                if measure.parameter == query.parameter() {
                    max_value = Some(match max_value {
                        Some(current) => current.max(measure.last_value),
                        None => measure.last_value,
                    });
                    rows.push(OutputRow {
                        latitude: location.coordinates.latitude.clone(),
                        longitude: location.coordinates.longitude.clone(),
                        value: measure.last_value,
                    });
                    break;
                }
            }
        }

        if u64::from(meta.page).saturating_mul(u64::from(meta.limit)) >= meta.found {
            break;
        }
        if meta.limit == 0 || meta.page <= last_echoed_page {
            return Err(AqError::DegeneratePagination {
                page: meta.page,
                limit: meta.limit,
                found: meta.found,
            });
        }
        last_echoed_page = meta.page;
    }

    Ok((rows, max_value))
}

/// Looks the validated parameter up in the catalog (a second, independent
/// fetch) and returns its display name.
///
/// A missing entry should not happen for an already-validated parameter,
/// but resolves to an empty string rather than failing the whole request.
fn resolve_display_name(source: &impl LocationSource, parameter: &str) -> Result<String, AqError> {
    let catalog = source.fetch_parameter_catalog()?;
    Ok(catalog
        .iter()
        .find(|entry| entry.name == parameter)
        .and_then(|entry| entry.display_name.clone())
        .unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
