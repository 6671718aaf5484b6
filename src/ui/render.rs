use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use std::time::Instant;

use super::app::{App, InputMode};
use super::theme;
use super::util::{format_amount, progress_bar, truncate};
use crate::models::{Category, Entry};

pub(crate) fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Length(6), // Balance card
            Constraint::Min(3),    // Entries or history
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Command bar
        ])
        .split(f.area());

    render_title_bar(f, chunks[0], app);
    render_hero(f, chunks[1], app);
    if app.show_history {
        render_history(f, chunks[2], app);
    } else {
        render_entries(f, chunks[2], app);
    }
    render_status_bar(f, chunks[3], app);
    render_command_bar(f, chunks[4], app);

    match app.input_mode {
        InputMode::Budget => render_splash(f, f.area(), app),
        InputMode::Category => render_category_picker(f, f.area(), app),
        _ => {}
    }
    if app.show_help {
        render_help_overlay(f, f.area());
    }
}

fn render_title_bar(f: &mut Frame, area: Rect, app: &App) {
    let budget = app
        .ledger
        .state()
        .map(|s| format!("Budget {} ", format_amount(s.budget(), &app.currency)))
        .unwrap_or_default();
    let title = " Happy Pocket ";
    let pad = (area.width as usize).saturating_sub(title.len() + budget.chars().count());
    let bar = Paragraph::new(Line::from(vec![
        Span::styled(
            title,
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" ".repeat(pad)),
        Span::styled(budget, theme::dim_style()),
    ]))
    .style(Style::default().bg(theme::HEADER_BG));
    f.render_widget(bar, area);
}

fn render_hero(f: &mut Frame, area: Rect, app: &App) {
    let metrics = &app.metrics;
    let balance = app.displayed_balance(Instant::now());
    let hero_style = theme::hero_style(metrics.is_critical());

    let (used, budget) = app
        .ledger
        .state()
        .map(|s| (s.used(), s.budget()))
        .unwrap_or_default();
    let ratio = metrics.usage_percent.to_f64().unwrap_or(0.0) / 100.0;
    let bar_width = (area.width as usize).saturating_sub(12).min(48);

    let lines = vec![
        Line::from(Span::styled("Remaining", theme::dim_style())).centered(),
        Line::from(Span::styled(
            format_amount(balance, &app.currency),
            hero_style,
        ))
        .centered(),
        Line::from(vec![
            Span::styled(
                progress_bar(ratio, bar_width),
                theme::progress_style(metrics.usage_alert),
            ),
            Span::styled(
                format!(" {}%", metrics.rounded_percent()),
                theme::progress_style(metrics.usage_alert).add_modifier(Modifier::BOLD),
            ),
        ])
        .centered(),
        Line::from(Span::styled(
            format!(
                "Used {} of {}",
                format_amount(used, &app.currency),
                format_amount(budget, &app.currency)
            ),
            theme::dim_style(),
        ))
        .centered(),
    ];

    let card = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if metrics.is_critical() {
                theme::RED
            } else {
                theme::OVERLAY
            })),
    );
    f.render_widget(card, area);
}

fn entry_line<'a>(entry: &'a Entry, app: &App, style: Style) -> Line<'a> {
    let (badge_color, sign, amount_style) = match &entry.category {
        Some(category) => (theme::category_color(category), "-", theme::expense_style()),
        None => (theme::GREEN, "+", theme::income_style()),
    };
    let label_style = if entry.category.as_ref().is_some_and(|c| c.is_custom()) {
        style.add_modifier(Modifier::ITALIC)
    } else {
        style
    };
    Line::from(vec![
        Span::styled(format!("{:>4} ", entry.seq), theme::dim_style()),
        Span::styled("● ", Style::default().fg(badge_color)),
        Span::styled(format!("{:<20}", truncate(entry.label(), 20)), label_style),
        Span::styled(
            format!(
                "{sign}{:>12}",
                format_amount(entry.amount, &app.currency)
            ),
            amount_style,
        ),
    ])
}

fn render_entries(f: &mut Frame, area: Rect, app: &App) {
    let entries = app.ledger.state().map(|s| s.entries()).unwrap_or_default();
    if entries.is_empty() {
        let hint = if app.ledger.is_active() {
            "No entries yet. Press e to add an expense, i to add income"
        } else {
            "No active budget"
        };
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(hint, theme::dim_style())),
        ])
        .centered()
        .block(list_block(" Entries "));
        f.render_widget(msg, area);
        return;
    }

    let items: Vec<ListItem> = entries
        .iter()
        .enumerate()
        .skip(app.entry_scroll)
        .take(area.height.saturating_sub(2) as usize)
        .map(|(i, entry)| {
            let style = if i == app.entry_index {
                theme::selected_style()
            } else if i % 2 == 0 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };
            ListItem::new(entry_line(entry, app, style))
        })
        .collect();

    let title = format!(" Entries ({}) ", entries.len());
    f.render_widget(List::new(items).block(list_block(&title)), area);
}

fn render_history(f: &mut Frame, area: Rect, app: &App) {
    if app.history.is_empty() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("No archived cycles", theme::dim_style())),
        ])
        .centered()
        .block(list_block(" History "));
        f.render_widget(msg, area);
        return;
    }

    // Newest cycle on top.
    let items: Vec<ListItem> = app
        .history
        .iter()
        .rev()
        .enumerate()
        .skip(app.history_scroll)
        .take(area.height.saturating_sub(2) as usize)
        .map(|(i, record)| {
            let style = if i == app.history_index {
                theme::selected_style()
            } else if i % 2 == 0 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };
            let state = &record.state;
            let date = record.completed_at.get(..10).unwrap_or(&record.completed_at);
            ListItem::new(Line::from(vec![
                Span::styled(format!("{date:<12}"), style),
                Span::styled(
                    format!(
                        "budget {:>10}  used {:>10}  left {:>10}",
                        format_amount(state.budget(), &app.currency),
                        format_amount(state.used(), &app.currency),
                        format_amount(state.remaining(), &app.currency)
                    ),
                    style,
                ),
                Span::styled(
                    format!("  {} entries", state.entries().len()),
                    theme::dim_style(),
                ),
            ]))
        })
        .collect();

    let title = format!(" History ({}) ", app.history.len());
    f.render_widget(List::new(items).block(list_block(&title)), area);
}

fn list_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            title,
            Style::default()
                .fg(theme::TEXT_DIM)
                .add_modifier(Modifier::BOLD),
        ))
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mode_label = format!(" {} ", app.input_mode);
    let mode_bg = match app.input_mode {
        InputMode::Normal => theme::ACCENT,
        InputMode::Budget | InputMode::Income => theme::GREEN,
        InputMode::Category | InputMode::CustomCategory | InputMode::Amount => theme::YELLOW,
        InputMode::Confirm => theme::RED,
    };
    let mode_style = Style::default()
        .fg(theme::HEADER_BG)
        .bg(mode_bg)
        .add_modifier(Modifier::BOLD);

    let info = format!(
        " {} | {}",
        app.metrics.warning_level,
        if app.metrics.usage_alert {
            "usage alert"
        } else {
            "on track"
        }
    );

    let right = match app.input_mode {
        InputMode::Normal if app.show_history => " h entries | j/k scroll | ? help ",
        InputMode::Normal => " e expense | i income | R reset | h history | ? help ",
        InputMode::Category => " j/k choose | Enter select | Esc cancel ",
        InputMode::Confirm => " y confirm | any key cancel ",
        _ => " Enter submit | Esc cancel ",
    };

    let available = area.width as usize;
    let used = mode_label.len() + info.len() + right.len();
    let pad = available.saturating_sub(used);

    let bar = Paragraph::new(Line::from(vec![
        Span::styled(&mode_label, mode_style),
        Span::styled(&info, theme::status_bar_style()),
        Span::styled(" ".repeat(pad), theme::status_bar_style()),
        Span::styled(right, theme::status_bar_style()),
    ]));
    f.render_widget(bar, area);
}

fn render_command_bar(f: &mut Frame, area: Rect, app: &App) {
    let prompt = match app.input_mode {
        InputMode::Budget => Some("budget> "),
        InputMode::CustomCategory => Some("category> "),
        InputMode::Amount => Some("amount> "),
        InputMode::Income => Some("income> "),
        _ => None,
    };

    let (content, cursor_offset) = match (app.input_mode, prompt) {
        (_, Some(prompt)) => {
            let label = match (&app.pending_category, app.input_mode) {
                (Some(category), InputMode::Amount) => format!("{category} "),
                _ => String::new(),
            };
            let offset = label.chars().count() + prompt.len() + app.input.chars().count();
            (
                Line::from(vec![
                    Span::styled(label, theme::dim_style()),
                    Span::styled(prompt, Style::default().fg(theme::GREEN)),
                    Span::styled(&app.input, theme::command_bar_style()),
                ]),
                Some(offset as u16),
            )
        }
        (InputMode::Confirm, None) => (
            Line::from(vec![
                Span::styled(&app.confirm_message, Style::default().fg(theme::YELLOW)),
                Span::styled(" [y/N] ", Style::default().fg(theme::RED)),
            ]),
            None,
        ),
        _ => (
            if app.status_message.is_empty() {
                Line::from(Span::styled(" Press ? for help", theme::dim_style()))
            } else {
                Line::from(Span::styled(
                    &app.status_message,
                    theme::command_bar_style(),
                ))
            },
            None,
        ),
    };

    let bar = Paragraph::new(content).style(Style::default().bg(theme::COMMAND_BG));
    f.render_widget(bar, area);

    if let Some(offset) = cursor_offset {
        f.set_cursor_position((area.x + offset, area.y));
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn render_splash(f: &mut Frame, area: Rect, app: &App) {
    let popup = centered(area, 44, 9);
    let mut lines = vec![
        Line::from(Span::styled(
            "Welcome to Happy Pocket",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        ))
        .centered(),
        Line::from(""),
        Line::from(Span::styled("Enter your budget for this cycle", theme::dim_style()))
            .centered(),
        Line::from(""),
        Line::from(Span::styled(
            format!("{}{}", app.currency, app.input),
            theme::hero_style(false),
        ))
        .centered(),
    ];
    if !app.status_message.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(&app.status_message, theme::expense_style())).centered());
    }

    f.render_widget(Clear, popup);
    let splash = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT))
            .style(Style::default().bg(theme::HEADER_BG)),
    );
    f.render_widget(splash, popup);
}

fn render_category_picker(f: &mut Frame, area: Rect, app: &App) {
    let options = App::category_options();
    let popup = centered(area, 30, options as u16 + 2);

    let items: Vec<ListItem> = Category::all()
        .iter()
        .map(|c| (c.as_str(), theme::category_color(c)))
        .chain(std::iter::once(("Custom…", theme::TEXT_DIM)))
        .enumerate()
        .map(|(i, (name, color))| {
            let style = if i == app.category_index {
                theme::selected_style()
            } else {
                theme::normal_style()
            };
            ListItem::new(Line::from(vec![
                Span::styled(" ● ", Style::default().fg(color)),
                Span::styled(name, style),
            ]))
        })
        .collect();

    f.render_widget(Clear, popup);
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT))
            .title(Span::styled(" Category ", theme::heading_style()))
            .style(Style::default().bg(theme::HEADER_BG)),
    );
    f.render_widget(list, popup);
}

fn render_help_overlay(f: &mut Frame, area: Rect) {
    let rows: &[(&str, &str)] = &[
        ("e", "Add an expense"),
        ("i", "Add income"),
        ("R", "Archive the cycle and start over"),
        ("h", "Toggle history"),
        ("j/k or Up/Down", "Scroll"),
        ("g/G", "Top/Bottom"),
        ("Enter", "Submit"),
        ("Esc", "Cancel"),
        ("q or Ctrl-c", "Quit"),
    ];

    let mut help_text = vec![
        Line::from(Span::styled(
            " Happy Pocket Help ",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(" Keys", theme::heading_style())),
    ];
    for (key, desc) in rows {
        help_text.push(Line::from(Span::styled(
            format!("  {key:<16} {desc}"),
            theme::normal_style(),
        )));
    }
    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(
        " Press any key to close ",
        Style::default().fg(theme::TEXT_DIM),
    )));

    let popup_area = centered(area, 52, help_text.len() as u16 + 2);
    f.render_widget(Clear, popup_area);
    let help = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT))
            .style(Style::default().bg(theme::HEADER_BG)),
    );
    f.render_widget(help, popup_area);
}
