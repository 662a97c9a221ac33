use anyhow::{Context, Result};
use std::path::PathBuf;

/// Get the platform-appropriate cache directory for flat-scout
pub fn get_cache_path() -> PathBuf {
    dirs::cache_dir()
        .map(|p| p.join("flat-scout/lookup-cache"))
        .unwrap_or_else(|| {
            PathBuf::from(format!(
                "{}/.cache/flat-scout/lookup-cache",
                std::env::var("HOME").unwrap_or_default()
            ))
        })
}

/// Clear the lookup cache directory
pub fn clear_cache() -> Result<()> {
    let cache_path = get_cache_path();
    match std::fs::remove_dir_all(&cache_path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).context("Failed to remove cache directory"),
    }
}

/// Disk cache for geocoding lookups, keyed by request URL.
///
/// Nominatim asks clients to go easy on it, and an address does not move:
/// once a query has resolved, the answer is reused from disk. `--no-cache`
/// skips construction entirely.
#[derive(Clone, Debug)]
pub struct GeoCache {
    cache_path: PathBuf,
}

impl GeoCache {
    pub fn new(cache_path: PathBuf) -> Self {
        Self { cache_path }
    }

    /// Fetch a cached response body, if any.
    pub fn get(&self, url: &str) -> Option<Vec<u8>> {
        cacache::read_sync(&self.cache_path, url).ok()
    }

    /// Store a response body. Disk errors are ignored; the cache is an
    /// optimization, not a requirement.
    pub fn put(&self, url: &str, body: &[u8]) {
        let _ = cacache::write_sync(&self.cache_path, url, body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_get_missing_entry_is_none() {
        let cache = GeoCache::new(env::temp_dir().join("flat_scout_test_cache_miss"));
        assert!(cache.get("https://example.com/nothing").is_none());
    }

    #[test]
    fn test_put_then_get_roundtrip() {
        let dir = env::temp_dir().join("flat_scout_test_cache_roundtrip");
        let cache = GeoCache::new(dir.clone());

        let url = "https://example.com/search?q=test";
        cache.put(url, b"[{\"lat\": \"51.5\"}]");

        let body = cache.get(url).unwrap();
        assert_eq!(body, b"[{\"lat\": \"51.5\"}]");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
