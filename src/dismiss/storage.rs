use super::types::DismissState;
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Get the default dismiss state file path (~/.config/flat-scout/dismissed.json)
pub fn get_dismiss_path() -> PathBuf {
    crate::config::get_config_dir().join("dismissed.json")
}

/// Load dismiss state from a JSON file
///
/// If the file doesn't exist, returns a new empty state.
/// If the file exists but has an unsupported version, returns an error.
pub fn load_dismiss_state(path: &Path) -> Result<DismissState> {
    if !path.exists() {
        return Ok(DismissState::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open dismiss state file at {}", path.display()))?;

    let state: DismissState =
        serde_json::from_reader(file).context("Failed to load dismiss state")?;

    if state.version != 1 {
        anyhow::bail!("Unsupported dismiss state version: {}", state.version);
    }

    Ok(state)
}

/// Save dismiss state to a JSON file atomically, so an interrupted write
/// never leaves a corrupted file behind.
pub fn save_dismiss_state(path: &Path, state: &DismissState) -> Result<()> {
    crate::config::ensure_config_dir()?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, state).context("Failed to serialize dismiss state")?;

    file.commit().context("Failed to save dismiss state")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use std::env;

    #[test]
    fn test_load_missing_file_returns_empty() {
        let temp_path = env::temp_dir().join("flat_scout_test_missing_dismiss.json");
        let _ = std::fs::remove_file(&temp_path);

        let state = load_dismiss_state(&temp_path).unwrap();
        assert_eq!(state.version, 1);
        assert!(state.dismissed.is_empty());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_path = env::temp_dir().join("flat_scout_test_dismiss_roundtrip.json");
        let _ = std::fs::remove_file(&temp_path);

        let mut state = DismissState::new();
        state.dismiss("flat-1".to_string(), None);
        state.dismiss(
            "flat-2".to_string(),
            Some(Utc::now() + Duration::weeks(2)),
        );

        save_dismiss_state(&temp_path, &state).unwrap();
        let loaded = load_dismiss_state(&temp_path).unwrap();

        assert_eq!(loaded.version, 1);
        assert_eq!(loaded.dismissed.len(), 2);
        assert!(loaded.is_dismissed("flat-1"));
        assert!(loaded.is_dismissed("flat-2"));

        let _ = std::fs::remove_file(&temp_path);
    }

    #[test]
    fn test_unsupported_version_is_error() {
        let temp_path = env::temp_dir().join("flat_scout_test_dismiss_version.json");
        std::fs::write(&temp_path, r#"{"version": 9, "dismissed": {}}"#).unwrap();

        assert!(load_dismiss_state(&temp_path).is_err());

        let _ = std::fs::remove_file(&temp_path);
    }
}
