use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use tokio_retry::{strategy::ExponentialBackoff, Retry};

use super::cache::GeoCache;
use super::types::{haversine_km, round2, EnrichmentReport, GeoPoint, StationHit};
use crate::config::ReferencePoint;

const NOMINATIM_BASE: &str = "https://nominatim.openstreetmap.org/search";

/// A raw Nominatim search result. Coordinates arrive as strings.
#[derive(Debug, Clone, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: String,
}

impl NominatimPlace {
    fn point(&self) -> Option<GeoPoint> {
        let lat = self.lat.parse::<f64>().ok()?;
        let lon = self.lon.parse::<f64>().ok()?;
        Some(GeoPoint { lat, lon })
    }

    /// Nominatim display names are long comma chains; the first segment is
    /// the place name itself.
    fn short_name(&self) -> String {
        self.display_name
            .split(',')
            .next()
            .unwrap_or("Unknown")
            .trim()
            .to_string()
    }
}

/// Client for the public Nominatim lookup service (keyless, rate-limited).
pub struct GeoClient {
    http: reqwest::Client,
    base_url: String,
    cache: Option<GeoCache>,
}

impl GeoClient {
    pub fn new(cache: Option<GeoCache>) -> Result<Self> {
        // Nominatim's usage policy requires an identifying user agent.
        let http = reqwest::Client::builder()
            .user_agent(concat!("flat-scout/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url: NOMINATIM_BASE.to_string(),
            cache,
        })
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Fetch a search URL with retry, consulting the disk cache first.
    async fn fetch_places(&self, params: &[(&str, String)]) -> Result<Vec<NominatimPlace>> {
        let url = reqwest::Url::parse_with_params(&self.base_url, params)
            .context("Failed to build lookup URL")?;
        let url_str = url.to_string();

        if let Some(cache) = &self.cache {
            if let Some(body) = cache.get(&url_str) {
                if let Ok(places) = serde_json::from_slice(&body) {
                    return Ok(places);
                }
            }
        }

        let retry_strategy = ExponentialBackoff::from_millis(250)
            .max_delay(std::time::Duration::from_secs(5))
            .take(3);

        let body = Retry::spawn(retry_strategy, || async {
            let response = self
                .http
                .get(url.clone())
                .header("Accept", "application/json")
                .send()
                .await
                .map_err(|e| {
                    if e.is_timeout() {
                        anyhow!("Lookup service timed out. Try again in a moment.")
                    } else if e.is_connect() {
                        anyhow!("Could not reach the lookup service. Check your network connection.")
                    } else {
                        anyhow!("Lookup request failed: {}", e)
                    }
                })?;

            let status = response.status();
            if status.as_u16() == 429 || status.as_u16() == 403 {
                return Err(anyhow!(
                    "Lookup service rate limit hit. Nominatim is a shared public service; wait a minute and retry."
                ));
            }
            if !status.is_success() {
                return Err(anyhow!("Lookup service returned {}", status));
            }

            response
                .bytes()
                .await
                .map_err(|e| anyhow!("Failed to read lookup response: {}", e))
        })
        .await?;

        let places: Vec<NominatimPlace> =
            serde_json::from_slice(&body).context("Failed to parse lookup response")?;

        if let Some(cache) = &self.cache {
            cache.put(&url_str, &body);
        }

        Ok(places)
    }

    /// Geocode a free-text address or postcode to its best match.
    pub async fn geocode(&self, query: &str) -> Result<Option<NominatimMatch>> {
        let places = self
            .fetch_places(&[
                ("format", "jsonv2".to_string()),
                ("limit", "1".to_string()),
                ("q", query.to_string()),
            ])
            .await?;

        Ok(places.into_iter().find_map(|p| {
            let point = p.point()?;
            Some(NominatimMatch {
                display_name: p.display_name.clone(),
                point,
            })
        }))
    }

    /// Find the nearest Underground station to a point, searching a small
    /// bounding box around it.
    pub async fn nearest_station(&self, point: GeoPoint) -> Result<Option<StationHit>> {
        // ~2km box at London latitudes.
        let viewbox = format!(
            "{},{},{},{}",
            point.lon - 0.02,
            point.lat + 0.02,
            point.lon + 0.02,
            point.lat - 0.02
        );

        let places = self
            .fetch_places(&[
                ("format", "jsonv2".to_string()),
                ("limit", "5".to_string()),
                ("q", "Underground station".to_string()),
                ("viewbox", viewbox),
                ("bounded", "1".to_string()),
            ])
            .await?;

        let nearest = places
            .iter()
            .filter_map(|p| {
                let station_point = p.point()?;
                Some(StationHit {
                    name: p.short_name(),
                    distance_km: haversine_km(point, station_point),
                })
            })
            .min_by(|a, b| {
                a.distance_km
                    .partial_cmp(&b.distance_km)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

        Ok(nearest)
    }

    /// Full enrichment for one address: geocode, nearest station, distance
    /// to the reference point. Returns None when geocoding finds no match.
    pub async fn enrich(
        &self,
        address: &str,
        reference: &ReferencePoint,
    ) -> Result<Option<EnrichmentReport>> {
        let hit = match self.geocode(address).await? {
            Some(hit) => hit,
            None => return Ok(None),
        };

        // A failed station lookup shouldn't sink the whole report.
        let station = match self.nearest_station(hit.point).await {
            Ok(station) => station,
            Err(e) => {
                crate::buffered_eprintln!("Warning: station lookup failed: {}", e);
                None
            }
        };

        let reference_point = GeoPoint {
            lat: reference.lat,
            lon: reference.lon,
        };

        Ok(Some(EnrichmentReport {
            geocoded_address: hit.display_name,
            lat: hit.point.lat,
            lon: hit.point.lon,
            nearest_tube: station.as_ref().map(|s| s.name.clone()),
            nearest_tube_distance_km: station.as_ref().map(|s| round2(s.distance_km)),
            distance_to_bank_km: round2(haversine_km(hit.point, reference_point)),
        }))
    }
}

/// A geocoded address: the resolved display name and its coordinate.
#[derive(Debug, Clone)]
pub struct NominatimMatch {
    pub display_name: String,
    pub point: GeoPoint,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_place_point_parses_string_coordinates() {
        let place = NominatimPlace {
            lat: "51.5133".to_string(),
            lon: "-0.0898".to_string(),
            display_name: "Bank, London".to_string(),
        };
        let point = place.point().unwrap();
        assert!((point.lat - 51.5133).abs() < 1e-9);
        assert!((point.lon + 0.0898).abs() < 1e-9);
    }

    #[test]
    fn test_place_point_rejects_garbage() {
        let place = NominatimPlace {
            lat: "fifty-one".to_string(),
            lon: "-0.0898".to_string(),
            display_name: String::new(),
        };
        assert!(place.point().is_none());
    }

    #[test]
    fn test_short_name_takes_first_segment() {
        let place = NominatimPlace {
            lat: "0".to_string(),
            lon: "0".to_string(),
            display_name: "Angel, Islington, London, Greater London".to_string(),
        };
        assert_eq!(place.short_name(), "Angel");
    }

    #[tokio::test]
    async fn test_fetch_places_uses_cache_without_network() {
        // Pre-seed the cache with the exact URL the client will build, then
        // point the client at an unroutable base so a network hit would fail.
        let dir = env::temp_dir().join("flat_scout_test_client_cache");
        let cache = GeoCache::new(dir.clone());

        let base = "http://127.0.0.1:1/search";
        let params = [
            ("format", "jsonv2".to_string()),
            ("limit", "1".to_string()),
            ("q", "10 Test Street".to_string()),
        ];
        let url = reqwest::Url::parse_with_params(base, &params).unwrap();
        cache.put(
            url.as_str(),
            br#"[{"lat": "51.5", "lon": "-0.1", "display_name": "Test Street, London"}]"#,
        );

        let client = GeoClient::new(Some(GeoCache::new(dir.clone())))
            .unwrap()
            .with_base_url(base.to_string());

        let hit = client.geocode("10 Test Street").await.unwrap().unwrap();
        assert_eq!(hit.display_name, "Test Street, London");
        assert!((hit.point.lat - 51.5).abs() < 1e-9);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
