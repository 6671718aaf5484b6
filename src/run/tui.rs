use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Instant;

use crate::config::Config;
use crate::session::SessionStore;
use crate::ui::app::{App, InputMode, ANIMATION_TICK};
use crate::ui::util::{is_amount_char, scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

pub(crate) fn as_tui(store: SessionStore, config: &Config) -> Result<()> {
    let ledger = store.restore_ledger(config.rules())?;
    let mut app = App::new(ledger, store, config.currency_symbol.clone());
    app.refresh_history();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!(error = %e, "terminal session failed");
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            // title + balance card + list borders + status + command
            let content_height = f.area().height.saturating_sub(11) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app);
        })?;

        // Only wake up on a timer while the balance is counting.
        if app.is_animating() && !event::poll(ANIMATION_TICK)? {
            app.tick(Instant::now());
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                app.running = false;
                continue;
            }
            if app.show_help {
                app.show_help = false;
                continue;
            }
            match app.input_mode {
                InputMode::Normal => handle_normal_input(key, app),
                InputMode::Category => handle_category_input(key, app),
                InputMode::Confirm => handle_confirm_input(key, app),
                InputMode::Budget
                | InputMode::CustomCategory
                | InputMode::Amount
                | InputMode::Income => handle_text_input(key, app),
            }
        }
        app.tick(Instant::now());
    }
    Ok(())
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: event::KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Char('q') => app.running = false,
        KeyCode::Char('e') => app.open_expense(),
        KeyCode::Char('i') => app.open_income(),
        KeyCode::Char('R') => app.request_reset(),
        KeyCode::Char('h') => app.toggle_history(),
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Char('j') | KeyCode::Down => handle_move_down(app),
        KeyCode::Char('k') | KeyCode::Up => handle_move_up(app),
        KeyCode::Char('g') => handle_goto_top(app),
        KeyCode::Char('G') => handle_goto_bottom(app),
        KeyCode::Esc => app.set_status(""),
        _ => {}
    }
}

fn handle_category_input(key: event::KeyEvent, app: &mut App) {
    let options = App::category_options();
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            app.category_index = (app.category_index + 1) % options;
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.category_index = app.category_index.checked_sub(1).unwrap_or(options - 1);
        }
        KeyCode::Enter => app.choose_category(),
        KeyCode::Esc => app.cancel(),
        _ => {}
    }
}

fn handle_text_input(key: event::KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Enter => match app.input_mode {
            InputMode::Budget => app.submit_budget(),
            InputMode::CustomCategory => app.submit_custom_category(),
            InputMode::Amount => app.submit_expense(),
            InputMode::Income => app.submit_income(),
            _ => {}
        },
        KeyCode::Esc => {
            // The splash prompt has nowhere to go back to.
            if app.input_mode == InputMode::Budget && !app.ledger.is_active() {
                app.running = false;
            } else {
                app.cancel();
            }
        }
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Char(c) if app.input_mode.takes_amount() => {
            if is_amount_char(c) {
                app.input.push(c);
            }
        }
        KeyCode::Char(c) => app.input.push(c),
        _ => {}
    }
}

fn handle_confirm_input(key: event::KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm(),
        _ => {
            app.cancel();
            app.set_status("Cancelled");
        }
    }
}

// ── Navigation ───────────────────────────────────────────────

fn list_len(app: &App) -> usize {
    if app.show_history {
        app.history.len()
    } else {
        app.ledger.state().map_or(0, |s| s.entries().len())
    }
}

fn handle_move_down(app: &mut App) {
    let len = list_len(app);
    let page = app.visible_rows;
    if app.show_history {
        scroll_down(&mut app.history_index, &mut app.history_scroll, len, page);
    } else {
        scroll_down(&mut app.entry_index, &mut app.entry_scroll, len, page);
    }
}

fn handle_move_up(app: &mut App) {
    if app.show_history {
        scroll_up(&mut app.history_index, &mut app.history_scroll);
    } else {
        scroll_up(&mut app.entry_index, &mut app.entry_scroll);
    }
}

fn handle_goto_top(app: &mut App) {
    if app.show_history {
        scroll_to_top(&mut app.history_index, &mut app.history_scroll);
    } else {
        scroll_to_top(&mut app.entry_index, &mut app.entry_scroll);
    }
}

fn handle_goto_bottom(app: &mut App) {
    let len = list_len(app);
    let page = app.visible_rows;
    if app.show_history {
        scroll_to_bottom(&mut app.history_index, &mut app.history_scroll, len, page);
    } else {
        scroll_to_bottom(&mut app.entry_index, &mut app.entry_scroll, len, page);
    }
}
