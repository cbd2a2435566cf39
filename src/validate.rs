/// Request-input validation for the measurements endpoint.
///
/// Coordinates arrive as decimal-degree strings and stay strings all the
/// way to the output rows, so validation is a format check, not a numeric
/// parse: an optional sign, a bounded integer part, an optional dot with
/// up to eight fraction digits. The radius is a bounded positive integer
/// in meters.
///
/// Violations are `AqError::InvalidInput`; their display text is what the
/// endpoint returns verbatim in its 422 responses.

use crate::model::AqError;

/// The parameter must be present and non-blank.
pub fn validate_parameter(parameter: &str) -> Result<(), AqError> {
    if parameter.trim().is_empty() {
        return Err(AqError::InvalidInput(
            "parameter must not be blank".to_string(),
        ));
    }
    Ok(())
}

/// Latitude: decimal degrees with up to two integer digits.
pub fn validate_latitude(latitude: &str) -> Result<(), AqError> {
    if latitude.is_empty() {
        return Err(AqError::InvalidInput(
            "latitude must not be empty".to_string(),
        ));
    }
    if !decimal_degree_format_ok(latitude, false) {
        return Err(AqError::InvalidInput(
            "latitude format is invalid".to_string(),
        ));
    }
    Ok(())
}

/// Longitude: up to three integer digits, the third only for the 1xx
/// range.
pub fn validate_longitude(longitude: &str) -> Result<(), AqError> {
    if longitude.is_empty() {
        return Err(AqError::InvalidInput(
            "longitude must not be empty".to_string(),
        ));
    }
    if !decimal_degree_format_ok(longitude, true) {
        return Err(AqError::InvalidInput(
            "longitude format is invalid".to_string(),
        ));
    }
    Ok(())
}

/// Radius: a positive integer no larger than `max_radius_meters`.
/// Returns the parsed value.
pub fn validate_radius(raw: &str, max_radius_meters: u32) -> Result<u32, AqError> {
    let radius: u32 = raw
        .parse()
        .map_err(|_| AqError::InvalidInput("radius must be an integer".to_string()))?;
    if radius < 1 {
        return Err(AqError::InvalidInput(
            "radius must be bigger than 0".to_string(),
        ));
    }
    if radius > max_radius_meters {
        return Err(AqError::InvalidInput(format!(
            "radius must be smaller or equal than {}",
            max_radius_meters
        )));
    }
    Ok(radius)
}

/// Validates the whole coordinate-mode request at once, collecting every
/// violation message rather than stopping at the first, and yielding the
/// parsed radius on success.
pub fn validate_coordinate_request(
    parameter: &str,
    latitude: &str,
    longitude: &str,
    radius_raw: &str,
    max_radius_meters: u32,
) -> Result<u32, Vec<String>> {
    let mut violations = Vec::new();

    if let Err(e) = validate_parameter(parameter) {
        violations.push(e.to_string());
    }
    if let Err(e) = validate_latitude(latitude) {
        violations.push(e.to_string());
    }
    if let Err(e) = validate_longitude(longitude) {
        violations.push(e.to_string());
    }

    let radius = match validate_radius(radius_raw, max_radius_meters) {
        Ok(radius) => Some(radius),
        Err(e) => {
            violations.push(e.to_string());
            None
        }
    };

    match radius {
        Some(radius) if violations.is_empty() => Ok(radius),
        _ => Err(violations),
    }
}

/// Format check for a decimal-degree string: optional leading `-`, one or
/// two integer digits (three for longitudes in the 1xx range), optionally
/// a dot followed by at most eight fraction digits.
fn decimal_degree_format_ok(s: &str, is_longitude: bool) -> bool {
    let unsigned = s.strip_prefix('-').unwrap_or(s);

    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (unsigned, None),
    };

    if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let max_int_digits = if is_longitude { 3 } else { 2 };
    if int_part.len() > max_int_digits {
        return false;
    }
    // Longitudes only reach ±180, so a three-digit integer part must be 1xx.
    if is_longitude && int_part.len() == 3 && !int_part.starts_with('1') {
        return false;
    }

    match frac_part {
        Some(frac) => frac.len() <= 8 && frac.bytes().all(|b| b.is_ascii_digit()),
        None => true,
    }
}
