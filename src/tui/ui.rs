use ratatui::prelude::*;
use ratatui::widgets::{Block, Cell, Clear, Paragraph, Row, Table, Tabs};

use crate::output::{format_price, format_score};
use crate::tui::app::{App, InputMode, View};

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Handle very small terminal sizes gracefully
    if area.height < 6 || area.width < 40 {
        let msg = Paragraph::new("Terminal too small").alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    // Layout: Title(1) + Tabs(1) + Table(fill) + Status(1)
    let chunks = Layout::vertical([
        Constraint::Length(1), // Title bar
        Constraint::Length(1), // Tab bar
        Constraint::Fill(1),   // Listing table
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    render_title(frame, chunks[0], app);
    render_tabs(frame, chunks[1], app);
    render_table(frame, chunks[2], app);
    render_status_bar(frame, chunks[3], app);

    // Render overlays based on input mode
    match app.input_mode {
        InputMode::DismissInput => render_dismiss_popup(frame, app),
        InputMode::Help => render_help_popup(frame, app),
        InputMode::ScoreBreakdown => render_breakdown_popup(frame, app),
        InputMode::Normal => {}
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        "Flat Scout",
        Style::default().fg(app.theme.title_color).bold(),
    )];

    // Show the price band on the right; it anchors every score in the table.
    if let Some(target) = app.scoring.price.target {
        let band_text = format!(
            "target {} +-{}%",
            format_price(Some(target)),
            (app.scoring.price.tolerance() * 100.0).round()
        );
        let left_len = "Flat Scout".len();
        let padding_len = (area.width as usize).saturating_sub(left_len + band_text.len());
        spans.push(Span::raw(" ".repeat(padding_len)));
        spans.push(Span::styled(band_text, Style::default().fg(app.theme.muted)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let titles = vec!["Active", "Dismissed"];
    let selected = match app.current_view {
        View::Active => 0,
        View::Dismissed => 1,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(app.theme.muted))
        .highlight_style(
            Style::default()
                .fg(app.theme.title_color)
                .bold()
                .reversed(),
        )
        .divider(" | ");

    frame.render_widget(tabs, area);
}

fn render_table(frame: &mut Frame, area: Rect, app: &mut App) {
    if app.view_rows.is_empty() {
        let msg = match app.current_view {
            View::Active => "No listings match the current filters",
            View::Dismissed => "Nothing dismissed",
        };
        let empty_msg = Paragraph::new(msg)
            .alignment(Alignment::Center)
            .block(Block::default());
        frame.render_widget(empty_msg, area);
        return;
    }

    let theme = app.theme.clone();
    let rows: Vec<Row> = app
        .view_rows
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let listing = &entry.listing;
            let score = entry.score();

            let score_color = theme.score_color(score);
            let bar = score_bar(score, 8, score_color, theme.bar_empty);
            let mut score_spans = vec![Span::styled(
                format!("{:>4} ", format_score(score)),
                Style::default().fg(score_color),
            )];
            score_spans.extend(bar.spans);

            // Alternating row background (odd rows get subtle background)
            let row_style = if idx % 2 == 1 {
                Style::default().bg(theme.row_alt_bg)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(format!("{}.", idx + 1))
                    .style(Style::default().fg(theme.index_color)),
                Cell::from(Line::from(score_spans)),
                Cell::from(format!("{:>9}", format_price(listing.price)))
                    .style(Style::default().fg(theme.price_color)),
                Cell::from(
                    listing
                        .bedrooms
                        .map(|b| b.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                ),
                Cell::from(
                    listing
                        .zone
                        .map(|z| z.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                ),
                Cell::from(
                    listing
                        .travel_time_to_zone1
                        .map(|t| format!("{}m", t as i64))
                        .unwrap_or_else(|| "-".to_string()),
                ),
                Cell::from(listing.epc.clone().unwrap_or_else(|| "-".to_string()))
                    .style(Style::default().fg(theme.epc_color)),
                Cell::from(listing.label().to_string()),
            ])
            .style(row_style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),  // Index: "99."
        Constraint::Length(14), // Score + bar: " 7.9 ████░░░░"
        Constraint::Length(10), // Price
        Constraint::Length(4),  // Beds
        Constraint::Length(4),  // Zone
        Constraint::Length(6),  // Travel
        Constraint::Length(3),  // EPC
        Constraint::Fill(1),    // Address
    ];

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["#", "Score", "Price", "Bed", "Zone", "Tvl", "EPC", "Address"])
                .style(theme.header_style)
                .bottom_margin(1),
        )
        .row_highlight_style(theme.row_selected);

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let text = if let Some((ref msg, _)) = app.flash_message {
        let msg_color = if msg.starts_with("Failed") || msg.starts_with("Reload failed") || msg.starts_with("Invalid") {
            theme.flash_error
        } else {
            theme.flash_success
        };
        Line::from(Span::styled(msg.clone(), Style::default().fg(msg_color)))
    } else {
        let count = format!("{} listings", app.view_rows.len());
        let sort = format!("sort: {}", app.sort_key);
        let filters = if app.min_beds_filter > 0 {
            format!("{}, beds>={}", app.tenure_filter.label(), app.min_beds_filter)
        } else {
            app.tenure_filter.label().to_string()
        };

        let hints: &[(&str, &str)] = match app.current_view {
            View::Active => &[
                ("j/k", ":nav "),
                ("Enter", ":open "),
                ("s", ":sort "),
                ("t", ":tenure "),
                ("+/-", ":beds "),
                ("b", ":breakdown "),
                ("d", ":dismiss "),
                ("?", ":help "),
                ("q", ":quit"),
            ],
            View::Dismissed => &[
                ("j/k", ":nav "),
                ("Enter", ":open "),
                ("u", ":restore "),
                ("Tab", ":active "),
                ("?", ":help "),
                ("q", ":quit"),
            ],
        };

        let mut spans = vec![
            Span::styled(count, Style::default().fg(theme.muted)),
            Span::raw(" "),
            Span::styled(sort, Style::default().fg(theme.muted)),
            Span::raw(" "),
            Span::styled(filters, Style::default().fg(theme.muted)),
            Span::raw("  "),
        ];
        // In the Dismissed view, say when the selected listing comes back.
        if matches!(app.current_view, View::Dismissed) {
            if let Some(remaining) = app
                .selected_entry()
                .and_then(|e| e.listing.key())
                .and_then(|k| app.dismiss_state.entries().get(&k))
                .map(|entry| entry.format_remaining())
            {
                spans.push(Span::styled(
                    format!("[{}]  ", remaining),
                    Style::default().fg(theme.muted),
                ));
            }
        }
        for (i, (key, label)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(
                *key,
                Style::default().fg(theme.status_key_color),
            ));
            spans.push(Span::raw(*label));
        }
        Line::from(spans)
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(theme.status_bar_bg)),
        area,
    );
}

fn score_bar(score: f64, width: usize, filled_color: Color, empty_color: Color) -> Line<'static> {
    let ratio = (score / 10.0).clamp(0.0, 1.0);
    let filled = (ratio * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);

    let mut spans = Vec::new();
    if filled > 0 {
        spans.push(Span::styled(
            "█".repeat(filled),
            Style::default().fg(filled_color),
        ));
    }
    if empty > 0 {
        spans.push(Span::styled(
            "░".repeat(empty),
            Style::default().fg(empty_color),
        ));
    }

    Line::from(spans)
}

/// Create a centered rectangle with fixed width and height
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);

    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Render the dismiss duration input popup
fn render_dismiss_popup(frame: &mut Frame, app: &App) {
    let popup_area = centered_rect_fixed(44, 5, frame.area());

    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title("Dismiss listing")
        .border_style(Style::default().fg(app.theme.popup_border));
    frame.render_widget(block.clone(), popup_area);

    let inner = block.inner(popup_area);
    let chunks = Layout::vertical([
        Constraint::Length(1), // Input line
        Constraint::Length(1), // Help text
    ])
    .split(inner);

    let input_text = format!("{}|", app.dismiss_input);
    frame.render_widget(Paragraph::new(input_text), chunks[0]);

    let help = Paragraph::new("Enter: confirm | Esc: cancel | empty = for good")
        .style(Style::default().fg(app.theme.muted));
    frame.render_widget(help, chunks[1]);
}

/// Render the help overlay popup
fn render_help_popup(frame: &mut Frame, app: &App) {
    let popup_area = centered_rect_fixed(54, 18, frame.area());

    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(" Keyboard Shortcuts ")
        .border_style(Style::default().fg(app.theme.popup_border));
    frame.render_widget(block.clone(), popup_area);

    let inner = block.inner(popup_area);
    let key_style = Style::default().fg(app.theme.status_key_color).bold();

    let entries = [
        ("j / Down      ", "Move down"),
        ("k / Up        ", "Move up"),
        ("Enter / o     ", "Open listing in browser"),
        ("s             ", "Cycle sort key"),
        ("t             ", "Cycle tenure filter"),
        ("+ / -         ", "Raise/lower bedroom filter"),
        ("b             ", "Score breakdown"),
        ("d             ", "Dismiss listing (e.g. '2w' to revisit)"),
        ("u             ", "Restore dismissed listing"),
        ("z             ", "Undo last action"),
        ("Tab           ", "Toggle Active/Dismissed"),
        ("r             ", "Reload catalog from disk"),
        ("?             ", "Show/hide this help"),
        ("q / Ctrl-c    ", "Quit"),
    ];

    let mut help_lines: Vec<Line> = entries
        .iter()
        .map(|(key, desc)| {
            Line::from(vec![Span::styled(*key, key_style), Span::raw(*desc)])
        })
        .collect();
    help_lines.push(Line::from(""));
    help_lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(app.theme.muted),
    )));

    frame.render_widget(Paragraph::new(help_lines), inner);
}

/// Render the score breakdown overlay for the selected listing
fn render_breakdown_popup(frame: &mut Frame, app: &App) {
    let entry = match app.selected_entry() {
        Some(entry) => entry,
        None => return,
    };

    let popup_area = centered_rect_fixed(48, 14, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(" Score Breakdown ")
        .border_style(Style::default().fg(app.theme.popup_border));
    frame.render_widget(block.clone(), popup_area);

    let inner = block.inner(popup_area);

    let mut lines = vec![
        Line::from(Span::styled(
            entry.listing.label().to_string(),
            Style::default().bold(),
        )),
        Line::from(""),
    ];

    if entry.result.breakdown.gated {
        lines.push(Line::from(
            "Score 0.0: fails a hard constraint (bedrooms or tenure).",
        ));
    } else {
        for factor in &entry.result.breakdown.factors {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{:<11}", factor.label),
                    Style::default().fg(app.theme.muted),
                ),
                Span::raw(format!(
                    "{:.2} x {:.2} = {:+.3}",
                    factor.value, factor.weight, factor.weighted
                )),
            ]));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Score      ", Style::default().fg(app.theme.muted)),
            Span::styled(
                format_score(entry.score()),
                Style::default()
                    .fg(app.theme.score_color(entry.score()))
                    .bold(),
            ),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}
