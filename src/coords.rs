use geo::Point;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Matches two signed decimal numbers, optionally degree-annotated, e.g.
/// "12.345°, 67.890°" (semantic schema place locations and path points).
static LATLNG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(-?\d+\.?\d*)\s*°?,?\s*(-?\d+\.?\d*)").unwrap());

/// Build a point from a (lat, lng) pair, rejecting values outside the
/// valid coordinate ranges. x = longitude, y = latitude.
pub fn checked_point(lat: f64, lng: f64) -> Option<Point<f64>> {
    if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng) {
        Some(Point::new(lng, lat))
    } else {
        None
    }
}

/// Like `checked_point`, but a zero on either axis is treated as an
/// unpopulated source field rather than a real coordinate.
fn nonzero_checked_point(lat: f64, lng: f64) -> Option<Point<f64>> {
    if lat == 0.0 || lng == 0.0 {
        return None;
    }
    checked_point(lat, lng)
}

/// Parse a geo string in the format "geo:latitude,longitude" into a Point.
/// Returns None if the string is malformed or coordinates are invalid.
pub fn parse_geo_string(geo_str: &str) -> Option<Point<f64>> {
    let coords = geo_str.strip_prefix("geo:")?;
    let parts: Vec<&str> = coords.split(',').collect();

    // Must have exactly two parts (lat,lng)
    if parts.len() != 2 {
        return None;
    }

    let latitude: f64 = parts[0].parse().ok()?;
    let longitude: f64 = parts[1].parse().ok()?;

    checked_point(latitude, longitude)
}

/// Parse a degree-annotated string like "12.345°, 67.890°" into a Point.
pub fn parse_latlng_string(latlng_str: &str) -> Option<Point<f64>> {
    let caps = LATLNG_PATTERN.captures(latlng_str)?;

    let latitude: f64 = caps.get(1)?.as_str().parse().ok()?;
    let longitude: f64 = caps.get(2)?.as_str().parse().ok()?;

    checked_point(latitude, longitude)
}

/// Read a standard-schema location object carrying `latitudeE7` /
/// `longitudeE7` fixed-point integers (real value × 1e7). Missing or zero
/// axes are unrecoverable.
pub fn parse_e7_location(location: &Value) -> Option<Point<f64>> {
    let lat = location
        .get("latitudeE7")
        .and_then(Value::as_f64)
        .unwrap_or(0.0)
        / 1e7;
    let lng = location
        .get("longitudeE7")
        .and_then(Value::as_f64)
        .unwrap_or(0.0)
        / 1e7;

    nonzero_checked_point(lat, lng)
}

/// Read a standard-schema path point. Each axis is either E7 fixed-point
/// (`latE7` / `lngE7`) or already-scaled (`lat` / `lng`), decided per axis.
pub fn parse_waypoint(point: &Value) -> Option<Point<f64>> {
    let lat = if point.get("latE7").is_some() {
        point.get("latE7").and_then(Value::as_f64).unwrap_or(0.0) / 1e7
    } else {
        point.get("lat").and_then(Value::as_f64).unwrap_or(0.0)
    };
    let lng = if point.get("lngE7").is_some() {
        point.get("lngE7").and_then(Value::as_f64).unwrap_or(0.0) / 1e7
    } else {
        point.get("lng").and_then(Value::as_f64).unwrap_or(0.0)
    };

    nonzero_checked_point(lat, lng)
}
