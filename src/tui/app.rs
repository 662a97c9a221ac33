use crate::config::Config;
use crate::dismiss::DismissState;
use crate::scoring::{sort_listings, ScoredListing, ScoringConfig, SortKey};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::Instant;

const MAX_UNDO: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Active,
    Dismissed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    DismissInput,
    Help,
    ScoreBreakdown,
}

/// The table's tenure filter, mirroring the filter the catalog page offered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TenureFilter {
    All,
    FreeholdOnly,
    ShareOrFreehold,
}

impl TenureFilter {
    pub fn next(self) -> Self {
        match self {
            TenureFilter::All => TenureFilter::FreeholdOnly,
            TenureFilter::FreeholdOnly => TenureFilter::ShareOrFreehold,
            TenureFilter::ShareOrFreehold => TenureFilter::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TenureFilter::All => "all tenures",
            TenureFilter::FreeholdOnly => "freehold only",
            TenureFilter::ShareOrFreehold => "freehold/share",
        }
    }

    pub fn matches(self, tenure: Option<&str>) -> bool {
        let folded = tenure.map(|t| t.trim().to_lowercase()).unwrap_or_default();
        match self {
            TenureFilter::All => true,
            TenureFilter::FreeholdOnly => folded == "freehold",
            TenureFilter::ShareOrFreehold => {
                folded == "freehold" || folded == "share of freehold"
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum UndoAction {
    Dismissed {
        key: String,
        label: String,
    },
    Restored {
        key: String,
        label: String,
        revisit_at: Option<DateTime<Utc>>,
    },
}

pub struct App {
    pub active: Vec<ScoredListing>,
    pub dismissed: Vec<ScoredListing>,
    /// What the table currently shows: the selected view, filtered and
    /// sorted. Rebuilt whenever view, filters, sort key, or lists change.
    pub view_rows: Vec<ScoredListing>,
    pub table_state: ratatui::widgets::TableState,
    pub current_view: View,
    pub sort_key: SortKey,
    pub min_beds_filter: u32,
    pub tenure_filter: TenureFilter,
    pub dismiss_state: DismissState,
    pub dismiss_path: PathBuf,
    pub input_mode: InputMode,
    pub dismiss_input: String,
    pub flash_message: Option<(String, Instant)>,
    pub undo_stack: VecDeque<UndoAction>,
    pub should_quit: bool,
    pub config: Config,
    pub scoring: ScoringConfig,
    pub verbose: bool,
    pub theme: super::theme::ThemeColors,
}

impl App {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        active: Vec<ScoredListing>,
        dismissed: Vec<ScoredListing>,
        dismiss_state: DismissState,
        dismiss_path: PathBuf,
        config: Config,
        scoring: ScoringConfig,
        verbose: bool,
    ) -> Self {
        let mut app = Self {
            active,
            dismissed,
            view_rows: Vec::new(),
            table_state: ratatui::widgets::TableState::default(),
            current_view: View::Active,
            sort_key: SortKey::Score,
            min_beds_filter: 0,
            tenure_filter: TenureFilter::All,
            dismiss_state,
            dismiss_path,
            input_mode: InputMode::Normal,
            dismiss_input: String::new(),
            flash_message: None,
            undo_stack: VecDeque::new(),
            should_quit: false,
            config,
            scoring,
            verbose,
            theme: super::theme::resolve_theme(),
        };
        app.rebuild_view();
        if !app.view_rows.is_empty() {
            app.table_state.select(Some(0));
        }
        app
    }

    /// Re-derive the visible rows from the current view, filters, and sort
    /// key. Keeps the selection on a valid row.
    pub fn rebuild_view(&mut self) {
        let source = match self.current_view {
            View::Active => &self.active,
            View::Dismissed => &self.dismissed,
        };

        let min_beds = self.min_beds_filter;
        let tenure_filter = self.tenure_filter;
        let mut rows: Vec<ScoredListing> = source
            .iter()
            .filter(|entry| entry.listing.bedrooms.unwrap_or(0) >= min_beds)
            .filter(|entry| tenure_filter.matches(entry.listing.tenure.as_deref()))
            .cloned()
            .collect();

        sort_listings(&mut rows, self.sort_key);
        self.view_rows = rows;

        if self.view_rows.is_empty() {
            self.table_state.select(None);
        } else {
            match self.table_state.selected() {
                Some(selected) if selected >= self.view_rows.len() => {
                    self.table_state.select(Some(self.view_rows.len() - 1));
                }
                None => self.table_state.select(Some(0)),
                _ => {}
            }
        }
    }

    pub fn next_row(&mut self) {
        if self.view_rows.is_empty() {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) => {
                if i >= self.view_rows.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous_row(&mut self) {
        if self.view_rows.is_empty() {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) => {
                if i == 0 {
                    self.view_rows.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn selected_entry(&self) -> Option<&ScoredListing> {
        self.table_state.selected().and_then(|i| self.view_rows.get(i))
    }

    pub fn push_undo(&mut self, action: UndoAction) {
        self.undo_stack.push_front(action);
        if self.undo_stack.len() > MAX_UNDO {
            self.undo_stack.pop_back();
        }
    }

    pub fn update_flash(&mut self) {
        if let Some((_, timestamp)) = self.flash_message {
            if timestamp.elapsed().as_secs() >= 3 {
                self.flash_message = None;
            }
        }
    }

    pub fn show_flash(&mut self, msg: String) {
        self.flash_message = Some((msg, Instant::now()));
    }

    /// Open the selected listing's page in the browser
    pub fn open_selected(&mut self) {
        let (url, label) = match self.selected_entry() {
            Some(entry) => (
                entry.listing.url.clone(),
                entry.listing.label().to_string(),
            ),
            None => return,
        };
        match url {
            Some(url) => {
                if let Err(e) = crate::browser::open_url(&url) {
                    self.show_flash(format!("Failed to open browser: {}", e));
                } else {
                    self.show_flash(format!("Opened: {}", label));
                }
            }
            None => self.show_flash(format!("No URL on record for {}", label)),
        }
    }

    /// Cycle the sort key and re-sort the table
    pub fn cycle_sort_key(&mut self) {
        self.sort_key = self.sort_key.next();
        self.rebuild_view();
        self.show_flash(format!("Sorted by {}", self.sort_key));
    }

    /// Adjust the minimum-bedrooms filter (0 disables it)
    pub fn bump_min_beds(&mut self, delta: i32) {
        let current = self.min_beds_filter as i32;
        self.min_beds_filter = (current + delta).clamp(0, 10) as u32;
        self.rebuild_view();
        if self.min_beds_filter == 0 {
            self.show_flash("Bedroom filter off".to_string());
        } else {
            self.show_flash(format!("Min bedrooms: {}", self.min_beds_filter));
        }
    }

    pub fn cycle_tenure_filter(&mut self) {
        self.tenure_filter = self.tenure_filter.next();
        self.rebuild_view();
        self.show_flash(format!("Tenure filter: {}", self.tenure_filter.label()));
    }

    /// Start dismiss input mode
    pub fn start_dismiss_input(&mut self) {
        // Only in Active view, and only for listings with an identity key.
        if !matches!(self.current_view, View::Active) {
            return;
        }
        let has_key = self.selected_entry().map(|e| e.listing.key().is_some());
        match has_key {
            Some(true) => {
                self.input_mode = InputMode::DismissInput;
                self.dismiss_input.clear();
            }
            Some(false) => {
                self.show_flash("Listing has no id/url/address; cannot dismiss".to_string())
            }
            None => {}
        }
    }

    /// Confirm and apply the dismiss input
    pub fn confirm_dismiss_input(&mut self) {
        let (key, label) = match self.selected_entry().and_then(|e| {
            e.listing
                .key()
                .map(|k| (k, e.listing.label().to_string()))
        }) {
            Some(pair) => pair,
            None => {
                self.input_mode = InputMode::Normal;
                return;
            }
        };

        // Empty input = ruled out for good; otherwise a revisit duration.
        let revisit_at = if self.dismiss_input.trim().is_empty() {
            None
        } else {
            match humantime::parse_duration(self.dismiss_input.trim()) {
                Ok(duration) => {
                    let until =
                        Utc::now() + chrono::Duration::from_std(duration).unwrap_or_default();
                    Some(until)
                }
                Err(_) => {
                    self.show_flash(format!("Invalid duration: '{}'", self.dismiss_input));
                    self.input_mode = InputMode::Normal;
                    self.dismiss_input.clear();
                    return;
                }
            }
        };

        self.dismiss_state.dismiss(key.clone(), revisit_at);

        if let Err(e) = crate::dismiss::save_dismiss_state(&self.dismiss_path, &self.dismiss_state)
        {
            self.show_flash(format!("Failed to save dismiss state: {}", e));
            self.input_mode = InputMode::Normal;
            return;
        }

        self.push_undo(UndoAction::Dismissed {
            key: key.clone(),
            label: label.clone(),
        });

        self.move_between_lists(&key, true);
        self.show_flash(format!("Dismissed: {} (z to undo)", label));

        self.input_mode = InputMode::Normal;
        self.dismiss_input.clear();
    }

    /// Cancel dismiss input
    pub fn cancel_dismiss_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.dismiss_input.clear();
    }

    /// Restore the selected listing (only works in Dismissed view)
    pub fn restore_selected(&mut self) {
        if !matches!(self.current_view, View::Dismissed) {
            return;
        }

        let (key, label, revisit_at) = match self.selected_entry() {
            Some(entry) => {
                let key = match entry.listing.key() {
                    Some(k) => k,
                    None => return,
                };
                let label = entry.listing.label().to_string();
                let revisit_at = self
                    .dismiss_state
                    .entries()
                    .get(&key)
                    .and_then(|e| e.revisit_at);
                (key, label, revisit_at)
            }
            None => return,
        };

        self.dismiss_state.restore(&key);

        if let Err(e) = crate::dismiss::save_dismiss_state(&self.dismiss_path, &self.dismiss_state)
        {
            self.show_flash(format!("Failed to save dismiss state: {}", e));
            return;
        }

        self.push_undo(UndoAction::Restored {
            key: key.clone(),
            label: label.clone(),
            revisit_at,
        });

        self.move_between_lists(&key, false);
        self.show_flash(format!("Restored: {} (z to undo)", label));
    }

    /// Undo the last dismiss or restore action
    pub fn undo_last(&mut self) {
        let action = match self.undo_stack.pop_front() {
            Some(action) => action,
            None => {
                self.show_flash("Nothing to undo".to_string());
                return;
            }
        };

        match action {
            UndoAction::Dismissed { key, label } => {
                self.dismiss_state.restore(&key);
                if let Err(e) =
                    crate::dismiss::save_dismiss_state(&self.dismiss_path, &self.dismiss_state)
                {
                    self.show_flash(format!("Failed to save dismiss state: {}", e));
                    return;
                }
                self.move_between_lists(&key, false);
                self.show_flash(format!("Undid dismiss: {}", label));
            }
            UndoAction::Restored {
                key,
                label,
                revisit_at,
            } => {
                self.dismiss_state.dismiss(key.clone(), revisit_at);
                if let Err(e) =
                    crate::dismiss::save_dismiss_state(&self.dismiss_path, &self.dismiss_state)
                {
                    self.show_flash(format!("Failed to save dismiss state: {}", e));
                    return;
                }
                self.move_between_lists(&key, true);
                self.show_flash(format!("Undid restore: {}", label));
            }
        }
    }

    /// Move a listing between the active and dismissed lists, keeping both
    /// sorted by score descending, and rebuild the visible rows.
    fn move_between_lists(&mut self, key: &str, from_active_to_dismissed: bool) {
        let (source, dest) = if from_active_to_dismissed {
            (&mut self.active, &mut self.dismissed)
        } else {
            (&mut self.dismissed, &mut self.active)
        };

        if let Some(pos) = source
            .iter()
            .position(|e| e.listing.key().as_deref() == Some(key))
        {
            let entry = source.remove(pos);
            let insert_pos = dest
                .iter()
                .position(|e| e.score() < entry.score())
                .unwrap_or(dest.len());
            dest.insert(insert_pos, entry);
        }

        self.rebuild_view();
    }

    /// Toggle between Active and Dismissed views
    pub fn toggle_view(&mut self) {
        self.current_view = match self.current_view {
            View::Active => View::Dismissed,
            View::Dismissed => View::Active,
        };
        self.table_state.select(None);
        self.rebuild_view();
    }

    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    pub fn dismiss_help(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn show_score_breakdown(&mut self) {
        if self.selected_entry().is_some() {
            self.input_mode = InputMode::ScoreBreakdown;
        }
    }

    pub fn dismiss_score_breakdown(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Reload the catalog from disk and re-score everything.
    pub fn reload(&mut self) {
        // Pick up external edits to the dismiss state too.
        if let Ok(state) = crate::dismiss::load_dismiss_state(&self.dismiss_path) {
            self.dismiss_state = state;
        }

        match crate::fetch::load_and_score(
            &self.config,
            &self.scoring,
            &self.dismiss_state,
            self.verbose,
        ) {
            Ok((active, dismissed)) => {
                self.active = active;
                self.dismissed = dismissed;
                self.rebuild_view();
                self.show_flash(format!(
                    "Reloaded ({} active, {} dismissed)",
                    self.active.len(),
                    self.dismissed.len()
                ));
            }
            Err(e) => self.show_flash(format!("Reload failed: {}", e)),
        }
    }
}
