use serde::Serialize;

/// A WGS84 coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Great-circle distance in kilometers (haversine, mean earth radius).
/// Plenty accurate at city scale.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;

    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    EARTH_RADIUS_KM * 2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}

/// A transit station found near a geocoded point.
#[derive(Debug, Clone, Serialize)]
pub struct StationHit {
    pub name: String,
    pub distance_km: f64,
}

/// What the locate command reports for one address. Field names match the
/// catalog's listing fields so the JSON form can be pasted straight in.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichmentReport {
    pub geocoded_address: String,
    pub lat: f64,
    pub lon: f64,
    pub nearest_tube: Option<String>,
    pub nearest_tube_distance_km: Option<f64>,
    pub distance_to_bank_km: f64,
}

/// Round to two decimals for reporting; distances below 10m are noise.
pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
