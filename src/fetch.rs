use anyhow::Result;
use std::collections::HashSet;

use crate::config::Config;
use crate::dismiss::{filter_active_listings, filter_dismissed_listings, DismissState};
use crate::listings::load_listings;
use crate::scoring::{score_listing, sort_listings, ScoredListing, ScoringConfig, SortKey};

/// Load the catalog, deduplicate, score every listing, and split into active
/// and dismissed lists. Both lists come back sorted by score descending.
///
/// This is the one pipeline behind the list command and the TUI (initial
/// load and manual reload).
pub fn load_and_score(
    config: &Config,
    scoring: &ScoringConfig,
    dismiss_state: &DismissState,
    verbose: bool,
) -> Result<(Vec<ScoredListing>, Vec<ScoredListing>)> {
    let path = config.listings_path();
    let listings = load_listings(&path)?;

    if verbose {
        crate::buffered_eprintln!("Loaded {} listings from {}", listings.len(), path.display());
    }

    // Deduplicate by identity key (an entry pasted twice into the catalog).
    // Keyless listings are kept as-is; there is nothing to match them on.
    let mut seen_keys = HashSet::new();
    let unique: Vec<_> = listings
        .into_iter()
        .filter(|listing| match listing.key() {
            Some(key) => seen_keys.insert(key),
            None => true,
        })
        .collect();

    if verbose {
        crate::buffered_eprintln!("After deduplication: {} unique listings", unique.len());
    }

    let active = filter_active_listings(unique.clone(), dismiss_state);
    let dismissed = filter_dismissed_listings(unique, dismiss_state);

    if verbose {
        crate::buffered_eprintln!(
            "After filter: {} active, {} dismissed",
            active.len(),
            dismissed.len()
        );
    }

    let mut active_scored: Vec<_> = active
        .into_iter()
        .map(|listing| score_listing(listing, scoring))
        .collect();
    let mut dismissed_scored: Vec<_> = dismissed
        .into_iter()
        .map(|listing| score_listing(listing, scoring))
        .collect();

    sort_listings(&mut active_scored, SortKey::Score);
    sort_listings(&mut dismissed_scored, SortKey::Score);

    Ok((active_scored, dismissed_scored))
}
