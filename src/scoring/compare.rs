use std::cmp::Ordering;

use super::engine::ScoredListing;

/// The fields a listing table can be ordered by.
///
/// Direction is part of the key: `price` and `zone` sort ascending (lower is
/// preferred), everything else descending (higher is preferred). Absent
/// values always sort last, regardless of direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Score,
    Price,
    Bedrooms,
    Zone,
    Travel,
    Epc,
    Address,
    ViewingDate,
}

impl SortKey {
    pub const ALL: [SortKey; 8] = [
        SortKey::Score,
        SortKey::Price,
        SortKey::Bedrooms,
        SortKey::Zone,
        SortKey::Travel,
        SortKey::Epc,
        SortKey::Address,
        SortKey::ViewingDate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Score => "score",
            SortKey::Price => "price",
            SortKey::Bedrooms => "bedrooms",
            SortKey::Zone => "zone",
            SortKey::Travel => "travel",
            SortKey::Epc => "epc",
            SortKey::Address => "address",
            SortKey::ViewingDate => "viewing_date",
        }
    }

    pub fn parse(s: &str) -> Option<SortKey> {
        SortKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s.trim().to_lowercase())
    }

    /// The next key in display order, for cycling in the TUI.
    pub fn next(self) -> SortKey {
        let idx = SortKey::ALL.iter().position(|k| *k == self).unwrap_or(0);
        SortKey::ALL[(idx + 1) % SortKey::ALL.len()]
    }

    fn ascending(self) -> bool {
        matches!(self, SortKey::Price | SortKey::Zone)
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field value under comparison. Each key produces one variant only; the
/// cross-variant arms exist to keep the ordering total.
enum FieldValue<'a> {
    Number(f64),
    Text(&'a str),
}

fn field_value(entry: &ScoredListing, key: SortKey) -> Option<FieldValue<'_>> {
    let listing = &entry.listing;
    match key {
        SortKey::Score => Some(FieldValue::Number(entry.result.score)),
        SortKey::Price => listing.price.map(FieldValue::Number),
        SortKey::Bedrooms => listing.bedrooms.map(|b| FieldValue::Number(b as f64)),
        SortKey::Zone => listing.zone.map(|z| FieldValue::Number(z as f64)),
        SortKey::Travel => listing.travel_time_to_zone1.map(FieldValue::Number),
        SortKey::Epc => listing.epc.as_deref().map(FieldValue::Text),
        SortKey::Address => listing.address.as_deref().map(FieldValue::Text),
        SortKey::ViewingDate => listing.viewing_ts().map(|ts| FieldValue::Number(ts as f64)),
    }
}

impl FieldValue<'_> {
    fn cmp_natural(&self, other: &FieldValue<'_>) -> Ordering {
        match (self, other) {
            (FieldValue::Number(a), FieldValue::Number(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            (FieldValue::Number(_), FieldValue::Text(_)) => Ordering::Less,
            (FieldValue::Text(_), FieldValue::Number(_)) => Ordering::Greater,
        }
    }
}

/// Total-order comparator over scored listings, parameterized by field.
///
/// Absent-value policy: both absent compares equal; an absent value sorts
/// after a present one regardless of the key's direction. Present values
/// compare by natural order with the key's direction applied.
pub fn compare(a: &ScoredListing, b: &ScoredListing, key: SortKey) -> Ordering {
    match (field_value(a, key), field_value(b, key)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(va), Some(vb)) => {
            let natural = va.cmp_natural(&vb);
            if key.ascending() {
                natural
            } else {
                natural.reverse()
            }
        }
    }
}

/// Sort listings in place by the given key. `sort_by` is stable, so listings
/// that compare equal keep their original relative order.
pub fn sort_listings(entries: &mut [ScoredListing], key: SortKey) {
    entries.sort_by(|a, b| compare(a, b, key));
}
