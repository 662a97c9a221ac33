use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// The seven subjective rating fields, in the order they contribute to the
/// subjective sub-score. The average always divides by this full list.
pub const SUBJECTIVE_FIELDS: [&str; 7] = [
    "layout",
    "light",
    "noise",
    "outdoor",
    "kitchen",
    "bathroom",
    "area_vibe",
];

/// A candidate property listing.
///
/// Every field is optional: the catalog is hand-maintained JSON and entries
/// fill in over time (a viewing adds subjective ratings, the locate command
/// adds distances). A field that is missing or fails numeric coercion is
/// `None` and scoring applies its documented default.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Listing {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default, deserialize_with = "lenient_u32")]
    pub bedrooms: Option<u32>,
    #[serde(default)]
    pub tenure: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub zone: Option<u32>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub travel_time_to_zone1: Option<f64>,
    #[serde(default)]
    pub epc: Option<String>,

    /// Enrichment from the locate command (km to the reference point).
    #[serde(default, deserialize_with = "lenient_f64")]
    pub distance_to_bank_km: Option<f64>,
    #[serde(default)]
    pub nearest_tube: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub nearest_tube_distance_km: Option<f64>,

    /// Date of the viewing, if one happened ("2025-09-14" or RFC 3339).
    #[serde(default)]
    pub viewing_date: Option<String>,

    // Subjective ratings, 0-10 each.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub layout: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub light: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub noise: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub outdoor: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub kitchen: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub bathroom: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub area_vibe: Option<f64>,
}

impl Listing {
    /// The subjective ratings in `SUBJECTIVE_FIELDS` order.
    pub fn subjective_ratings(&self) -> [Option<f64>; 7] {
        [
            self.layout,
            self.light,
            self.noise,
            self.outdoor,
            self.kitchen,
            self.bathroom,
            self.area_vibe,
        ]
    }

    /// Stable identity for dedup and dismiss state: id, else url, else
    /// address. Listings with none of these cannot be deduplicated or
    /// dismissed, only scored.
    pub fn key(&self) -> Option<String> {
        self.id
            .as_deref()
            .or(self.url.as_deref())
            .or(self.address.as_deref())
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
    }

    /// Human-readable label for tables and flash messages.
    pub fn label(&self) -> &str {
        self.address
            .as_deref()
            .or(self.id.as_deref())
            .unwrap_or("(unnamed listing)")
    }

    /// Viewing date as a unix timestamp, for sorting. Accepts a bare date or
    /// a full RFC 3339 timestamp; anything else is treated as absent.
    pub fn viewing_ts(&self) -> Option<i64> {
        let raw = self.viewing_date.as_deref()?.trim();
        if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
            return Some(dt.timestamp());
        }
        chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc().timestamp())
    }
}

/// Accept a JSON number or a numeric string; anything else coerces to None.
/// Non-finite values are dropped so downstream math never sees NaN.
fn lenient_f64<'de, D>(de: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Text(String),
        Other(IgnoredAny),
    }

    Ok(match Option::<Raw>::deserialize(de)? {
        Some(Raw::Num(n)) if n.is_finite() => Some(n),
        Some(Raw::Text(s)) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    })
}

/// Like `lenient_f64` but for counts: negative and fractional inputs round
/// toward zero, garbage coerces to None.
fn lenient_u32<'de, D>(de: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Text(String),
        Other(IgnoredAny),
    }

    let as_u32 = |n: f64| {
        if n.is_finite() && n >= 0.0 {
            Some(n as u32)
        } else {
            None
        }
    };

    Ok(match Option::<Raw>::deserialize(de)? {
        Some(Raw::Num(n)) => as_u32(n),
        Some(Raw::Text(s)) => s.trim().parse::<f64>().ok().and_then(as_u32),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_listing_parses() {
        let json = r#"{
            "id": "flat-1",
            "address": "12 Example Road, E8",
            "url": "https://example.com/flat-1",
            "bedrooms": 2,
            "tenure": "Freehold",
            "price": 380000,
            "zone": 2,
            "travel_time_to_zone1": 25,
            "epc": "B",
            "layout": 7,
            "light": 8.5
        }"#;
        let listing: Listing = serde_json::from_str(json).unwrap();
        assert_eq!(listing.bedrooms, Some(2));
        assert_eq!(listing.price, Some(380000.0));
        assert_eq!(listing.epc.as_deref(), Some("B"));
        assert_eq!(listing.layout, Some(7.0));
        assert_eq!(listing.light, Some(8.5));
    }

    #[test]
    fn test_empty_listing_parses() {
        let listing: Listing = serde_json::from_str("{}").unwrap();
        assert!(listing.price.is_none());
        assert!(listing.bedrooms.is_none());
        assert!(listing.key().is_none());
        assert_eq!(listing.label(), "(unnamed listing)");
    }

    #[test]
    fn test_numeric_strings_coerce() {
        let json = r#"{"price": "415000", "bedrooms": "3", "zone": " 2 "}"#;
        let listing: Listing = serde_json::from_str(json).unwrap();
        assert_eq!(listing.price, Some(415000.0));
        assert_eq!(listing.bedrooms, Some(3));
        assert_eq!(listing.zone, Some(2));
    }

    #[test]
    fn test_malformed_fields_coerce_to_absent() {
        // Wrong types must not fail the parse, they become None.
        let json = r#"{"price": "around 400k", "bedrooms": true, "zone": [2], "layout": {"a": 1}}"#;
        let listing: Listing = serde_json::from_str(json).unwrap();
        assert!(listing.price.is_none());
        assert!(listing.bedrooms.is_none());
        assert!(listing.zone.is_none());
        assert!(listing.layout.is_none());
    }

    #[test]
    fn test_negative_count_coerces_to_absent() {
        let json = r#"{"bedrooms": -2}"#;
        let listing: Listing = serde_json::from_str(json).unwrap();
        assert!(listing.bedrooms.is_none());
    }

    #[test]
    fn test_key_prefers_id_then_url_then_address() {
        let mut listing = Listing {
            id: Some("flat-9".to_string()),
            url: Some("https://example.com/9".to_string()),
            address: Some("9 Test St".to_string()),
            ..Default::default()
        };
        assert_eq!(listing.key().as_deref(), Some("flat-9"));

        listing.id = None;
        assert_eq!(listing.key().as_deref(), Some("https://example.com/9"));

        listing.url = None;
        assert_eq!(listing.key().as_deref(), Some("9 Test St"));
    }

    #[test]
    fn test_viewing_ts_bare_date_and_rfc3339() {
        let bare = Listing {
            viewing_date: Some("2025-09-14".to_string()),
            ..Default::default()
        };
        let full = Listing {
            viewing_date: Some("2025-09-14T00:00:00Z".to_string()),
            ..Default::default()
        };
        assert_eq!(bare.viewing_ts(), full.viewing_ts());

        let junk = Listing {
            viewing_date: Some("next tuesday".to_string()),
            ..Default::default()
        };
        assert!(junk.viewing_ts().is_none());
    }

    #[test]
    fn test_subjective_ratings_order_matches_field_list() {
        let listing = Listing {
            layout: Some(1.0),
            area_vibe: Some(7.0),
            ..Default::default()
        };
        let ratings = listing.subjective_ratings();
        assert_eq!(ratings[0], Some(1.0));
        assert_eq!(ratings[6], Some(7.0));
        assert_eq!(ratings.len(), SUBJECTIVE_FIELDS.len());
    }
}
