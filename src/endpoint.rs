/// HTTP endpoint for the heatmap aggregation service
///
/// Provides the REST surface the heatmap frontend consumes.
///
/// Endpoints:
/// - GET /measurements?parameter=..&countryCode=..               - aggregate by country
/// - GET /measurements?parameter=..&latitude=..&longitude=..&radius=.. - aggregate around a coordinate
/// - GET /health - Service health check
///
/// Requests are dispatched to a worker pool, so several aggregations can
/// run concurrently; the only state they share is the client's catalog
/// snapshot cache, which is safe for concurrent reads.

use crate::aggregate::{self, LocationSource};
use crate::model::AqError;
use crate::validate;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use threadpool::ThreadPool;

// ---------------------------------------------------------------------------
// Request handling (pure, testable)
// ---------------------------------------------------------------------------

/// Splits a request URL into its path and decoded query parameters.
/// Repeated keys keep the last value.
pub fn parse_query(url: &str) -> (&str, HashMap<String, String>) {
    let (path, raw_query) = match url.split_once('?') {
        Some((path, raw_query)) => (path, raw_query),
        None => (url, ""),
    };

    let mut params = HashMap::new();
    for pair in raw_query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = urlencoding::decode(key).map(|k| k.into_owned());
        let value = urlencoding::decode(value).map(|v| v.into_owned());
        if let (Ok(key), Ok(value)) = (key, value) {
            params.insert(key, value);
        }
    }

    (path, params)
}

/// Routes one request and produces `(status, JSON body)`.
///
/// Mode selection mirrors the query-parameter contract: `countryCode`
/// selects country mode, the latitude/longitude/radius triple selects
/// coordinate mode. Validation failures return every violation message as
/// a JSON array with status 422.
pub fn handle_request<S: LocationSource>(
    source: &S,
    max_radius_meters: u32,
    url: &str,
) -> (u16, serde_json::Value) {
    let (path, params) = parse_query(url);

    match path {
        "/health" => handle_health(),
        "/measurements" => handle_measurements(source, max_radius_meters, &params),
        _ => (
            404,
            serde_json::json!({
                "error": "Not found",
                "available_endpoints": ["/health", "/measurements"]
            }),
        ),
    }
}

fn handle_health() -> (u16, serde_json::Value) {
    (
        200,
        serde_json::json!({
            "status": "ok",
            "service": "aqmap_service",
            "version": env!("CARGO_PKG_VERSION")
        }),
    )
}

fn handle_measurements<S: LocationSource>(
    source: &S,
    max_radius_meters: u32,
    params: &HashMap<String, String>,
) -> (u16, serde_json::Value) {
    let parameter = params.get("parameter").map(String::as_str).unwrap_or("");

    let result = if let Some(country_code) = params.get("countryCode") {
        if let Err(e) = validate::validate_parameter(parameter) {
            return (422, serde_json::json!([e.to_string()]));
        }
        aggregate::aggregate_by_country(source, parameter, country_code)
    } else if let (Some(latitude), Some(longitude), Some(radius_raw)) = (
        params.get("latitude"),
        params.get("longitude"),
        params.get("radius"),
    ) {
        match validate::validate_coordinate_request(
            parameter,
            latitude,
            longitude,
            radius_raw,
            max_radius_meters,
        ) {
            Ok(radius) => {
                aggregate::aggregate_by_coordinates(source, parameter, latitude, longitude, radius)
            }
            Err(violations) => return (422, serde_json::json!(violations)),
        }
    } else {
        return (
            422,
            serde_json::json!(["Invalid parameters supplied"]),
        );
    };

    match result {
        Ok(response) => match serde_json::to_value(&response) {
            Ok(body) => (200, body),
            Err(e) => (500, serde_json::json!({ "error": format!("serialization failed: {}", e) })),
        },
        Err(err) => error_response(&err),
    }
}

/// Maps the error taxonomy onto HTTP statuses: client mistakes are 422,
/// upstream failures are 502, and pagination metadata the loop cannot
/// terminate on is 500.
fn error_response(err: &AqError) -> (u16, serde_json::Value) {
    match err {
        AqError::InvalidParameter | AqError::InvalidInput(_) => {
            (422, serde_json::json!(err.to_string()))
        }
        AqError::HttpStatus(_) | AqError::Transport(_) | AqError::Parse(_) => {
            (502, serde_json::json!({ "error": err.to_string() }))
        }
        AqError::DegeneratePagination { .. } => {
            (500, serde_json::json!({ "error": err.to_string() }))
        }
    }
}

// ---------------------------------------------------------------------------
// HTTP Server
// ---------------------------------------------------------------------------

/// Start the HTTP endpoint server on the specified port, serving requests
/// from a pool of `workers` threads. Blocks forever.
pub fn start_endpoint_server<S>(
    port: u16,
    workers: usize,
    max_radius_meters: u32,
    source: Arc<S>,
) -> Result<(), String>
where
    S: LocationSource + Send + Sync + 'static,
{
    let server = tiny_http::Server::http(format!("0.0.0.0:{}", port))
        .map_err(|e| format!("Failed to start HTTP server: {}", e))?;
    let pool = ThreadPool::new(workers.max(1));

    println!("📡 HTTP endpoint listening on http://0.0.0.0:{}", port);
    println!("   GET /measurements?parameter=..&countryCode=..");
    println!("   GET /measurements?parameter=..&latitude=..&longitude=..&radius=..");
    println!("   GET /health - Service health check\n");

    for request in server.incoming_requests() {
        let source = Arc::clone(&source);
        pool.execute(move || {
            let started = Utc::now();
            let url = request.url().to_string();
            let (status, body) = handle_request(source.as_ref(), max_radius_meters, &url);

            println!(
                "{} GET {} -> {} ({} ms)",
                started.format("%Y-%m-%d %H:%M:%S UTC"),
                url,
                status,
                (Utc::now() - started).num_milliseconds()
            );

            if let Err(e) = request.respond(create_response(status, &body)) {
                eprintln!("Failed to send response: {}", e);
            }
        });
    }

    Ok(())
}

/// Create HTTP response with JSON body
fn create_response(
    status_code: u16,
    json: &serde_json::Value,
) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let body = serde_json::to_string(json).unwrap_or_else(|_| "{}".to_string());

    tiny_http::Response::from_data(body.into_bytes())
        .with_status_code(tiny_http::StatusCode::from(status_code))
        .with_header(
            tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap(),
        )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
