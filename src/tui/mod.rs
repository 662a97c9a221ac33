pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::App;
pub use theme::{resolve_theme, ThemeColors};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Event, EventHandler};

pub async fn run_tui(mut app: App) -> anyhow::Result<()> {
    // Buffer stderr while TUI is active to prevent output corrupting the display
    crate::stderr_buffer::activate();

    // Init terminal (sets up panic hooks automatically)
    let mut terminal = ratatui::init();

    let mut events = EventHandler::new(250); // 250ms tick

    // Main loop
    loop {
        terminal.draw(|frame| ui::draw(frame, &mut app))?;

        match events.next().await {
            Event::Key(key) => handle_key_event(&mut app, key),
            Event::Tick => app.update_flash(),
        }

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    ratatui::restore();

    // Flush buffered stderr messages now that the terminal is restored
    for msg in crate::stderr_buffer::drain() {
        eprintln!("{}", msg);
    }

    Ok(())
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    match app.input_mode {
        app::InputMode::Normal => {
            match key.code {
                // Quit
                KeyCode::Char('q') => app.should_quit = true,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    app.should_quit = true
                }

                // Navigation
                KeyCode::Char('j') | KeyCode::Down => app.next_row(),
                KeyCode::Char('k') | KeyCode::Up => app.previous_row(),

                // Open listing in browser
                KeyCode::Enter | KeyCode::Char('o') => app.open_selected(),

                // Sorting and filters
                KeyCode::Char('s') => app.cycle_sort_key(),
                KeyCode::Char('t') => app.cycle_tenure_filter(),
                KeyCode::Char('+') | KeyCode::Char('=') => app.bump_min_beds(1),
                KeyCode::Char('-') => app.bump_min_beds(-1),

                // Dismiss / restore / undo
                KeyCode::Char('d') => app.start_dismiss_input(),
                KeyCode::Char('u') => app.restore_selected(),
                KeyCode::Char('z') => app.undo_last(),

                // Tab switching
                KeyCode::Tab => app.toggle_view(),

                // Reload catalog from disk
                KeyCode::Char('r') => app.reload(),

                // Help
                KeyCode::Char('?') => app.show_help(),

                // Score breakdown
                KeyCode::Char('b') => app.show_score_breakdown(),

                _ => {}
            }
        }
        app::InputMode::DismissInput => {
            match key.code {
                // Confirm dismiss
                KeyCode::Enter => app.confirm_dismiss_input(),

                // Cancel dismiss
                KeyCode::Esc => app.cancel_dismiss_input(),

                // Backspace
                KeyCode::Backspace => {
                    app.dismiss_input.pop();
                }

                // Character input (alphanumeric + space)
                KeyCode::Char(c) if c.is_alphanumeric() || c == ' ' => {
                    app.dismiss_input.push(c);
                }

                // Ignore all other keys (don't propagate to Normal mode)
                _ => {}
            }
        }
        app::InputMode::ScoreBreakdown => match key.code {
            KeyCode::Esc | KeyCode::Char('b') => app.dismiss_score_breakdown(),
            KeyCode::Char('j') | KeyCode::Down => app.next_row(),
            KeyCode::Char('k') | KeyCode::Up => app.previous_row(),
            _ => {}
        },
        app::InputMode::Help => {
            // Any key exits help
            app.dismiss_help();
        }
    }
}
