use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Listings the user has ruled out, keyed by listing identity
/// (`Listing::key()`). A dismissal can be indefinite ("never showing me that
/// bathroom again") or timed ("revisit in 2w if it's still on the market").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DismissState {
    pub version: u32,
    #[serde(default)]
    pub dismissed: HashMap<String, DismissEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DismissEntry {
    pub dismissed_at: DateTime<Utc>,
    pub revisit_at: Option<DateTime<Utc>>,
}

impl DismissEntry {
    /// Human-friendly remaining time: "indefinite", "expired", or "{N}d left".
    pub fn format_remaining(&self) -> String {
        match self.revisit_at {
            None => "indefinite".to_string(),
            Some(until) => {
                let now = Utc::now();
                if until <= now {
                    "expired".to_string()
                } else {
                    let duration = until - now;
                    let hours = duration.num_hours();
                    let days = duration.num_days();
                    let weeks = days / 7;

                    if weeks >= 1 {
                        format!("{}w left", weeks)
                    } else if days >= 1 {
                        format!("{}d left", days)
                    } else if hours >= 1 {
                        format!("{}h left", hours)
                    } else {
                        let minutes = duration.num_minutes();
                        if minutes >= 1 {
                            format!("{}m left", minutes)
                        } else {
                            "<1m left".to_string()
                        }
                    }
                }
            }
        }
    }
}

impl Default for DismissState {
    fn default() -> Self {
        Self::new()
    }
}

impl DismissState {
    pub fn new() -> Self {
        Self {
            version: 1,
            dismissed: HashMap::new(),
        }
    }

    /// Whether a listing is currently ruled out (indefinite or not yet due
    /// for a revisit).
    pub fn is_dismissed(&self, key: &str) -> bool {
        if let Some(entry) = self.dismissed.get(key) {
            match entry.revisit_at {
                None => true,
                Some(until) => Utc::now() < until,
            }
        } else {
            false
        }
    }

    pub fn dismiss(&mut self, key: String, revisit_at: Option<DateTime<Utc>>) {
        let entry = DismissEntry {
            dismissed_at: Utc::now(),
            revisit_at,
        };
        self.dismissed.insert(key, entry);
    }

    /// Returns true if the listing was previously dismissed.
    pub fn restore(&mut self, key: &str) -> bool {
        self.dismissed.remove(key).is_some()
    }

    /// Drop entries whose revisit time has passed.
    pub fn clean_expired(&mut self) {
        let now = Utc::now();
        self.dismissed.retain(|_key, entry| match entry.revisit_at {
            None => true,
            Some(until) => now < until,
        });
    }

    pub fn entries(&self) -> &HashMap<String, DismissEntry> {
        &self.dismissed
    }
}
