/// aqmap_service: air quality heatmap aggregation service.
///
/// # Module structure
///
/// ```text
/// aqmap_service
/// ├── model      — shared data types (LocationQuery, OutputRow, HeatmapResponse, AqError)
/// ├── config     — service configuration loader (aqmap.toml)
/// ├── ingest
/// │   ├── openaq — OpenAQ v2 API: URL construction + JSON parsing
/// │   └── fixtures (test only) — representative API response payloads
/// ├── client     — blocking OpenAQ fetcher: retries + catalog snapshot cache
/// ├── aggregate  — the pipeline: validate, paginate, reduce, resolve, assemble
/// ├── validate   — request-input validation (coordinates, radius, parameter)
/// └── endpoint   — heatmap HTTP API on tiny_http with a worker pool
/// ```

/// Public modules
pub mod aggregate;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod ingest;
pub mod model;
pub mod validate;
