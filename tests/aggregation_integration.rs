/// Integration tests for the aggregation pipeline
///
/// These tests drive the full pipeline — catalog validation, pagination,
/// per-location reduction, display-name resolution, assembly — against a
/// scripted fetcher that serves real OpenAQ-shaped JSON through the
/// production parser. No network access involved.
///
/// Run with: cargo test --test aggregation_integration

use aqmap_service::aggregate::{aggregate_by_country, aggregate_by_coordinates, LocationSource};
use aqmap_service::ingest::openaq::{
    parse_locations_response, parse_parameters_response, AqParameter, LocationsPage,
};
use aqmap_service::model::{AqError, LocationQuery};
use std::cell::{Cell, RefCell};
use std::sync::Arc;

// Catalog payload shared by all scenarios (pm25 + o3 known, xyz absent).
const CATALOG_JSON: &str = r#"{
  "meta": { "name": "openaq-api", "page": 1, "limit": 100, "found": 2 },
  "results": [
    { "id": 2, "name": "pm25", "displayName": "PM2.5",
      "description": "Particulate matter less than 2.5 micrometers in diameter",
      "preferredUnit": "µg/m³" },
    { "id": 3, "name": "o3", "displayName": "O₃",
      "description": "Ozone", "preferredUnit": "ppm" }
  ]
}"#;

/// Serves pre-rendered JSON pages in order, through the production parser,
/// and counts fetches.
struct JsonScriptedSource {
    catalog: Arc<Vec<AqParameter>>,
    pages: RefCell<Vec<Result<&'static str, AqError>>>,
    location_fetches: Cell<u32>,
    requested_pages: RefCell<Vec<u32>>,
    last_query: RefCell<Option<LocationQuery>>,
}

impl JsonScriptedSource {
    fn new(pages: Vec<Result<&'static str, AqError>>) -> Self {
        JsonScriptedSource {
            catalog: Arc::new(parse_parameters_response(CATALOG_JSON).unwrap()),
            pages: RefCell::new(pages),
            location_fetches: Cell::new(0),
            requested_pages: RefCell::new(Vec::new()),
            last_query: RefCell::new(None),
        }
    }
}

impl LocationSource for JsonScriptedSource {
    fn fetch_locations(&self, query: &LocationQuery, page: u32) -> Result<LocationsPage, AqError> {
        self.location_fetches.set(self.location_fetches.get() + 1);
        self.requested_pages.borrow_mut().push(page);
        *self.last_query.borrow_mut() = Some(query.clone());

        let mut pages = self.pages.borrow_mut();
        assert!(!pages.is_empty(), "pipeline fetched more pages than scripted");
        pages.remove(0).and_then(|json| parse_locations_response(json))
    }

    fn fetch_parameter_catalog(&self) -> Result<Arc<Vec<AqParameter>>, AqError> {
        Ok(Arc::clone(&self.catalog))
    }
}

const SINGLE_PAGE_MX: &str = r#"{
  "meta": { "name": "openaq-api", "page": 1, "limit": 100, "found": 1 },
  "results": [
    {
      "coordinates": { "latitude": "19.4", "longitude": "-99.1" },
      "parameters": [
        { "parameter": "pm25", "lastValue": 12.5, "unit": "µg/m³" }
      ]
    }
  ]
}"#;

const PAGE_1_OF_3: &str = r#"{
  "meta": { "name": "openaq-api", "page": 1, "limit": 100, "found": 250 },
  "results": [
    { "coordinates": { "latitude": "19.40", "longitude": "-99.10" },
      "parameters": [ { "parameter": "pm25", "lastValue": 10.0 } ] },
    { "coordinates": { "latitude": "19.41", "longitude": "-99.11" },
      "parameters": [ { "parameter": "o3", "lastValue": 0.05 } ] }
  ]
}"#;

const PAGE_2_OF_3: &str = r#"{
  "meta": { "name": "openaq-api", "page": 2, "limit": 100, "found": 250 },
  "results": [
    { "coordinates": { "latitude": "19.42", "longitude": "-99.12" },
      "parameters": [
        { "parameter": "pm25", "lastValue": 44.0 },
        { "parameter": "pm25", "lastValue": 99.0 }
      ] }
  ]
}"#;

const PAGE_3_OF_3: &str = r#"{
  "meta": { "name": "openaq-api", "page": 3, "limit": 100, "found": 250 },
  "results": [
    { "coordinates": { "latitude": "19.43", "longitude": "-99.13" },
      "parameters": [ { "parameter": "pm25", "lastValue": 21.5 } ] }
  ]
}"#;

const DEGENERATE_PAGE: &str = r#"{
  "meta": { "name": "openaq-api", "page": 1, "limit": 0, "found": 42 },
  "results": []
}"#;

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn test_pm25_mexico_single_page_scenario() {
    let source = JsonScriptedSource::new(vec![Ok(SINGLE_PAGE_MX)]);

    let result = aggregate_by_country(&source, "pm25", "mx").unwrap();

    assert_eq!(result.min, 0.0);
    assert_eq!(result.max, Some(12.5));
    assert_eq!(result.parameter, "pm25");
    assert_eq!(result.display_name, "PM2.5");
    assert_eq!(result.data_set.len(), 1);
    assert_eq!(result.data_set[0].latitude, "19.4");
    assert_eq!(result.data_set[0].longitude, "-99.1");
    assert_eq!(result.data_set[0].value, 12.5);

    // The frontend contract, verbatim.
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "min": 0.0,
            "max": 12.5,
            "parameter": "pm25",
            "displayName": "PM2.5",
            "dataSet": [
                { "latitude": "19.4", "longitude": "-99.1", "value": 12.5 }
            ]
        })
    );
}

#[test]
fn test_three_page_run_aggregates_all_pages() {
    let source =
        JsonScriptedSource::new(vec![Ok(PAGE_1_OF_3), Ok(PAGE_2_OF_3), Ok(PAGE_3_OF_3)]);

    let result = aggregate_by_country(&source, "pm25", "mx").unwrap();

    assert_eq!(source.location_fetches.get(), 3, "found=250 at limit=100 is exactly 3 fetches");
    assert_eq!(*source.requested_pages.borrow(), vec![1, 2, 3]);

    // Page 1 contributes one row (the o3-only location is skipped), page 2
    // one row (first pm25 entry wins), page 3 one row.
    assert_eq!(result.data_set.len(), 3);
    assert_eq!(result.data_set[1].value, 44.0, "first match wins over the duplicate");
    assert_eq!(result.max, Some(44.0));
}

#[test]
fn test_unknown_parameter_rejected_before_fetching() {
    let source = JsonScriptedSource::new(vec![]);

    let err = aggregate_by_country(&source, "xyz", "mx").unwrap_err();

    assert_eq!(err, AqError::InvalidParameter);
    assert_eq!(err.to_string(), "Invalid air quality parameter");
    assert_eq!(source.location_fetches.get(), 0, "no location fetch may precede validation");
}

#[test]
fn test_repeating_a_query_is_byte_identical() {
    // Idempotence against an unchanged upstream: two runs, same bytes.
    let first = {
        let source = JsonScriptedSource::new(vec![Ok(PAGE_1_OF_3), Ok(PAGE_2_OF_3), Ok(PAGE_3_OF_3)]);
        serde_json::to_string(&aggregate_by_country(&source, "pm25", "mx").unwrap()).unwrap()
    };
    let second = {
        let source = JsonScriptedSource::new(vec![Ok(PAGE_1_OF_3), Ok(PAGE_2_OF_3), Ok(PAGE_3_OF_3)]);
        serde_json::to_string(&aggregate_by_country(&source, "pm25", "mx").unwrap()).unwrap()
    };
    assert_eq!(first, second);
}

#[test]
fn test_failure_on_second_page_returns_no_partial_result() {
    let source = JsonScriptedSource::new(vec![Ok(PAGE_1_OF_3), Err(AqError::HttpStatus(502))]);

    let result = aggregate_by_country(&source, "pm25", "mx");

    assert_eq!(result, Err(AqError::HttpStatus(502)), "rows from page 1 must be discarded");
}

#[test]
fn test_degenerate_pagination_metadata_is_fatal() {
    let source = JsonScriptedSource::new(vec![Ok(DEGENERATE_PAGE)]);

    let result = aggregate_by_country(&source, "pm25", "mx");

    assert_eq!(
        result,
        Err(AqError::DegeneratePagination {
            page: 1,
            limit: 0,
            found: 42
        })
    );
    assert_eq!(source.location_fetches.get(), 1, "the loop must not spin on a zero limit");
}

#[test]
fn test_coordinate_query_carries_all_selector_fields() {
    let source = JsonScriptedSource::new(vec![Ok(SINGLE_PAGE_MX)]);

    aggregate_by_coordinates(&source, "pm25", "19.43", "-99.13", 10_000).unwrap();

    let query = source.last_query.borrow().clone().unwrap();
    assert_eq!(
        query,
        LocationQuery::Coordinates {
            parameter: "pm25".to_string(),
            latitude: "19.43".to_string(),
            longitude: "-99.13".to_string(),
            radius_meters: 10_000,
        }
    );
}

#[test]
fn test_empty_country_yields_empty_data_set_and_absent_max() {
    const EMPTY_PAGE: &str = r#"{
      "meta": { "name": "openaq-api", "page": 1, "limit": 100, "found": 0 },
      "results": []
    }"#;
    let source = JsonScriptedSource::new(vec![Ok(EMPTY_PAGE)]);

    let result = aggregate_by_country(&source, "pm25", "mx").unwrap();

    assert!(result.data_set.is_empty());
    assert_eq!(result.max, None);
    assert_eq!(result.display_name, "PM2.5");

    let json = serde_json::to_value(&result).unwrap();
    assert!(json["max"].is_null(), "absent max serializes as null, not a sentinel number");
}
