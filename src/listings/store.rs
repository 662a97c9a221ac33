use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::types::Listing;

/// Load the listing catalog from a JSON array file.
///
/// # Errors
///
/// Returns an error if the file is missing, unreadable, or not a JSON array.
/// Individual malformed fields inside a listing do not fail the load; they
/// coerce to absent at deserialization time.
pub fn load_listings(path: &Path) -> Result<Vec<Listing>> {
    if !path.exists() {
        anyhow::bail!(
            "Catalog file not found at {}. Point `listings:` in your config at a JSON array of listings.",
            path.display()
        );
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file at {}", path.display()))?;

    let listings: Vec<Listing> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse catalog: invalid JSON in {}", path.display()))?;

    Ok(listings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_load_missing_file_is_error() {
        let path = env::temp_dir().join("flat_scout_test_missing.json");
        let _ = fs::remove_file(&path);
        let err = load_listings(&path).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_load_catalog_roundtrip() {
        let path = env::temp_dir().join("flat_scout_test_catalog.json");
        fs::write(
            &path,
            r#"[
                {"address": "1 First St", "price": 380000, "bedrooms": 2},
                {"address": "2 Second St", "price": "not listed"}
            ]"#,
        )
        .unwrap();

        let listings = load_listings(&path).unwrap();
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].price, Some(380000.0));
        assert!(listings[1].price.is_none());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_non_array_is_error() {
        let path = env::temp_dir().join("flat_scout_test_nonarray.json");
        fs::write(&path, r#"{"address": "1 First St"}"#).unwrap();
        assert!(load_listings(&path).is_err());
        let _ = fs::remove_file(&path);
    }
}
