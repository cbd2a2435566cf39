/// Test fixtures: representative JSON payloads from the OpenAQ v2 API.
///
/// These fixtures are structurally complete but truncated to the minimum
/// needed to exercise the parser. They reflect the real envelopes returned
/// by:
///   https://api.openaq.org/v2/locations
///   https://api.openaq.org/v2/parameters
///
/// Locations response shape:
///   meta.page / meta.limit / meta.found — pagination metadata; the echoed
///     `page` drives the pipeline's termination check
///   results[]
///     .coordinates.latitude / .longitude — decimal degrees, usually JSON
///       numbers but occasionally strings on mirrors
///     .parameters[] — latest measure per reported parameter; can contain
///       parameters other than the one the request filtered on, and can
///       repeat the requested one
///
/// Parameters response shape:
///   results[].name / .displayName / .description / .preferredUnit
///   (`displayName` is null for a few niche parameters)

/// One Mexico City location reporting a single pm25 measure.
#[cfg(test)]
pub(crate) fn fixture_single_location_json() -> &'static str {
    r#"{
      "meta": {
        "name": "openaq-api",
        "license": "CC BY 4.0",
        "website": "https://docs.openaq.org/",
        "page": 1,
        "limit": 100,
        "found": 1
      },
      "results": [
        {
          "id": 2178,
          "name": "Benito Juarez",
          "country": "MX",
          "coordinates": { "latitude": 19.4, "longitude": -99.1 },
          "parameters": [
            { "id": 2, "parameter": "pm25", "lastValue": 12.5, "unit": "µg/m³" }
          ]
        }
      ]
    }"#
}

/// Coordinates served as strings, with trailing zeros that must survive.
#[cfg(test)]
pub(crate) fn fixture_string_coordinates_json() -> &'static str {
    r#"{
      "meta": { "name": "openaq-api", "page": 1, "limit": 100, "found": 1 },
      "results": [
        {
          "coordinates": { "latitude": "40.5614000", "longitude": "-89.9956" },
          "parameters": [
            { "parameter": "pm10", "lastValue": 31.0, "unit": "µg/m³" }
          ]
        }
      ]
    }"#
}

/// One location whose measure list leaks past the upstream parameter
/// filter: an o3 entry first, then pm25 twice with different values. The
/// pipeline must take the first pm25 (7.1) and emit exactly one row.
#[cfg(test)]
pub(crate) fn fixture_multi_parameter_json() -> &'static str {
    r#"{
      "meta": { "name": "openaq-api", "page": 1, "limit": 100, "found": 1 },
      "results": [
        {
          "coordinates": { "latitude": "19.35", "longitude": "-99.20" },
          "parameters": [
            { "parameter": "o3", "lastValue": 0.041, "unit": "ppm" },
            { "parameter": "pm25", "lastValue": 7.1, "unit": "µg/m³" },
            { "parameter": "pm25", "lastValue": 9.9, "unit": "µg/m³" }
          ]
        }
      ]
    }"#
}

/// A valid page with zero matching locations.
#[cfg(test)]
pub(crate) fn fixture_empty_results_json() -> &'static str {
    r#"{
      "meta": { "name": "openaq-api", "page": 1, "limit": 100, "found": 0 },
      "results": []
    }"#
}

/// Parameter catalog with a null displayName on one entry.
#[cfg(test)]
pub(crate) fn fixture_parameters_json() -> &'static str {
    r#"{
      "meta": { "name": "openaq-api", "page": 1, "limit": 100, "found": 3 },
      "results": [
        {
          "id": 2,
          "name": "pm25",
          "displayName": "PM2.5",
          "description": "Particulate matter less than 2.5 micrometers in diameter",
          "preferredUnit": "µg/m³"
        },
        {
          "id": 3,
          "name": "o3",
          "displayName": "O₃",
          "description": "Ozone",
          "preferredUnit": "ppm"
        },
        {
          "id": 129,
          "name": "um010",
          "displayName": null,
          "description": "Particle count at 1.0 µm",
          "preferredUnit": "particles/cm³"
        }
      ]
    }"#
}
