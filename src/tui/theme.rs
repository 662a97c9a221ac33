//! Centralized theme module for TUI color constants and styles

use ratatui::prelude::*;

/// Complete color palette for the TUI
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Score-based colors: high score = good flat = green
    pub score_high: Color,
    pub score_mid: Color,
    pub score_low: Color,
    pub bar_empty: Color,

    // Table colors
    pub row_alt_bg: Color,
    pub index_color: Color,
    pub price_color: Color,
    pub epc_color: Color,

    // Styles
    pub header_style: Style,
    pub row_selected: Style,

    // General colors
    pub muted: Color,
    pub title_color: Color,

    // Status bar colors
    pub status_bar_bg: Color,
    pub status_key_color: Color,
    pub flash_success: Color,
    pub flash_error: Color,

    // Popup overlay colors
    pub popup_border: Color,
}

impl ThemeColors {
    /// Dark theme palette
    pub fn dark() -> Self {
        Self {
            score_high: Color::Green,
            score_mid: Color::Yellow,
            score_low: Color::Red,
            bar_empty: Color::DarkGray,
            row_alt_bg: Color::Indexed(235),
            index_color: Color::DarkGray,
            price_color: Color::Green,
            epc_color: Color::Cyan,
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            muted: Color::Gray,
            title_color: Color::Cyan,
            status_bar_bg: Color::Indexed(236),
            status_key_color: Color::Cyan,
            flash_success: Color::Green,
            flash_error: Color::Red,
            popup_border: Color::Cyan,
        }
    }

    /// Light theme palette, for terminals with a bright background
    pub fn light() -> Self {
        Self {
            score_high: Color::Green,
            score_mid: Color::Rgb(180, 130, 0),
            score_low: Color::Red,
            bar_empty: Color::Gray,
            row_alt_bg: Color::Indexed(254),
            index_color: Color::Gray,
            price_color: Color::Rgb(0, 110, 0),
            epc_color: Color::Blue,
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            muted: Color::DarkGray,
            title_color: Color::Blue,
            status_bar_bg: Color::Indexed(253),
            status_key_color: Color::Blue,
            flash_success: Color::Green,
            flash_error: Color::Red,
            popup_border: Color::Blue,
        }
    }

    /// Returns the color for a score on the 0-10 display scale.
    pub fn score_color(&self, score: f64) -> Color {
        if score >= 7.0 {
            self.score_high
        } else if score >= 4.0 {
            self.score_mid
        } else {
            self.score_low
        }
    }
}

/// Pick a palette from the terminal background. Detection failures fall
/// back to dark, the safer default for most terminals.
pub fn resolve_theme() -> ThemeColors {
    match terminal_light::luma() {
        Ok(luma) if luma > 0.6 => ThemeColors::light(),
        _ => ThemeColors::dark(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_color_thresholds() {
        let theme = ThemeColors::dark();
        assert_eq!(theme.score_color(7.9), theme.score_high);
        assert_eq!(theme.score_color(7.0), theme.score_high);
        assert_eq!(theme.score_color(5.0), theme.score_mid);
        assert_eq!(theme.score_color(0.0), theme.score_low);
    }
}
