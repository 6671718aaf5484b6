use ratatui::style::{Color, Modifier, Style};

use crate::models::Category;

pub(crate) const HEADER_BG: Color = Color::Rgb(30, 30, 46);
pub(crate) const ACCENT: Color = Color::Rgb(137, 180, 250);
pub(crate) const GREEN: Color = Color::Rgb(166, 227, 161);
pub(crate) const RED: Color = Color::Rgb(243, 139, 168);
pub(crate) const YELLOW: Color = Color::Rgb(249, 226, 175);
pub(crate) const SURFACE: Color = Color::Rgb(49, 50, 68);
pub(crate) const TEXT: Color = Color::Rgb(205, 214, 244);
pub(crate) const TEXT_DIM: Color = Color::Rgb(127, 132, 156);
pub(crate) const OVERLAY: Color = Color::Rgb(69, 71, 90);
pub(crate) const COMMAND_BG: Color = Color::Rgb(24, 24, 37);

/// Badge color for an expense category. Custom labels share one color.
pub(crate) fn category_color(category: &Category) -> Color {
    match category {
        Category::Food => Color::Rgb(0xFF, 0x70, 0x43),
        Category::Travel => Color::Rgb(0x42, 0xA5, 0xF5),
        Category::Shopping => Color::Rgb(0xAB, 0x47, 0xBC),
        Category::Bills => Color::Rgb(0x26, 0xA6, 0x9A),
        Category::Entertainment => Color::Rgb(0xEC, 0x40, 0x7A),
        Category::Health => Color::Rgb(0x66, 0xBB, 0x6A),
        Category::Education => Color::Rgb(0x5C, 0x6B, 0xC0),
        Category::Recharge => Color::Rgb(0xFF, 0xA7, 0x26),
        Category::Subscriptions => Color::Rgb(0x8D, 0x6E, 0x63),
        Category::Other | Category::Custom(_) => Color::Rgb(0x78, 0x90, 0x9C),
    }
}

pub(crate) fn hero_style(critical: bool) -> Style {
    Style::default()
        .fg(if critical { RED } else { GREEN })
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn progress_style(alert: bool) -> Style {
    Style::default().fg(if alert { RED } else { ACCENT })
}

pub(crate) fn selected_style() -> Style {
    Style::default().fg(HEADER_BG).bg(ACCENT)
}

pub(crate) fn normal_style() -> Style {
    Style::default().fg(TEXT)
}

pub(crate) fn dim_style() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub(crate) fn income_style() -> Style {
    Style::default().fg(GREEN)
}

pub(crate) fn expense_style() -> Style {
    Style::default().fg(RED)
}

pub(crate) fn alt_row_style() -> Style {
    Style::default().fg(TEXT).bg(SURFACE)
}

pub(crate) fn command_bar_style() -> Style {
    Style::default().fg(TEXT).bg(COMMAND_BG)
}

pub(crate) fn status_bar_style() -> Style {
    Style::default().fg(TEXT_DIM).bg(SURFACE)
}

pub(crate) fn heading_style() -> Style {
    Style::default().fg(YELLOW).add_modifier(Modifier::BOLD)
}
