pub mod cache;
pub mod client;
pub mod types;

pub use cache::{clear_cache, get_cache_path, GeoCache};
pub use client::GeoClient;
pub use types::{haversine_km, EnrichmentReport, GeoPoint, StationHit};
