use super::types::DismissState;
use crate::listings::Listing;

/// Keep only listings that are not currently dismissed. Listings without an
/// identity key cannot be dismissed and always count as active.
pub fn filter_active_listings(listings: Vec<Listing>, state: &DismissState) -> Vec<Listing> {
    listings
        .into_iter()
        .filter(|l| match l.key() {
            Some(key) => !state.is_dismissed(&key),
            None => true,
        })
        .collect()
}

/// Keep only currently dismissed listings.
pub fn filter_dismissed_listings(listings: Vec<Listing>, state: &DismissState) -> Vec<Listing> {
    listings
        .into_iter()
        .filter(|l| match l.key() {
            Some(key) => state.is_dismissed(&key),
            None => false,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn listing(id: &str) -> Listing {
        Listing {
            id: Some(id.to_string()),
            address: Some(format!("{} Test Road", id)),
            ..Default::default()
        }
    }

    #[test]
    fn test_filter_active_removes_dismissed() {
        let mut state = DismissState::new();
        state.dismiss("flat-1".to_string(), None);

        let listings = vec![listing("flat-1"), listing("flat-2")];
        let active = filter_active_listings(listings, &state);

        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id.as_deref(), Some("flat-2"));
    }

    #[test]
    fn test_filter_active_keeps_expired_dismissals() {
        let mut state = DismissState::new();
        state.dismiss("flat-1".to_string(), Some(Utc::now() - Duration::hours(1)));

        let listings = vec![listing("flat-1"), listing("flat-2")];
        let active = filter_active_listings(listings, &state);

        assert_eq!(active.len(), 2);
    }

    #[test]
    fn test_keyless_listing_is_always_active() {
        let mut state = DismissState::new();
        state.dismiss("flat-1".to_string(), None);

        let listings = vec![Listing::default()];
        let active = filter_active_listings(listings, &state);
        assert_eq!(active.len(), 1);

        let dismissed = filter_dismissed_listings(vec![Listing::default()], &state);
        assert!(dismissed.is_empty());
    }

    #[test]
    fn test_filter_dismissed_keeps_only_dismissed() {
        let mut state = DismissState::new();
        state.dismiss("flat-1".to_string(), None);
        state.dismiss("flat-3".to_string(), Some(Utc::now() + Duration::hours(1)));

        let listings = vec![listing("flat-1"), listing("flat-2"), listing("flat-3")];
        let dismissed = filter_dismissed_listings(listings, &state);

        assert_eq!(dismissed.len(), 2);
        assert_eq!(dismissed[0].id.as_deref(), Some("flat-1"));
        assert_eq!(dismissed[1].id.as_deref(), Some("flat-3"));
    }
}
