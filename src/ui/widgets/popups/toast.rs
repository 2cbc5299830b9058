use crate::app::{App, Toast};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use std::time::Instant;
use unicode_width::UnicodeWidthStr;

const SLIDE_MS: u128 = 300;

/// Columns the toast is pushed right of its resting place (slide in / out)
fn slide_offset(toast: &Toast, now: Instant, width: u16) -> u16 {
    let shown = now.duration_since(toast.start_time).as_millis();
    let left = toast.deadline.saturating_duration_since(now).as_millis();

    let hidden = if shown < SLIDE_MS {
        let t = shown as f32 / SLIDE_MS as f32;
        (1.0 - t).powi(3)
    } else if left < SLIDE_MS {
        let t = (SLIDE_MS - left) as f32 / SLIDE_MS as f32;
        t.powi(3)
    } else {
        0.0
    };
    (width as f32 * hidden) as u16
}

/// Top-right notice; expiry is handled by `App::on_tick`
pub fn render(f: &mut Frame, app: &App) {
    let Some(ref toast) = app.toast else {
        return;
    };
    let theme = &app.theme;
    let screen = f.area();

    let message = toast.message.as_str();
    let width = (message.width() as u16 + 6).min(screen.width.saturating_sub(4));
    let x = screen.width.saturating_sub(width + 1) + slide_offset(toast, Instant::now(), width);
    if x >= screen.width {
        return;
    }

    let area = Rect::new(x, 1, width, 3).intersection(screen);
    if area.is_empty() {
        return;
    }

    // Warnings in red, everything else blue
    let color = if message.starts_with('⚠') || message.starts_with('⏹') {
        theme.red
    } else {
        theme.blue
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
        .style(Style::default().bg(Color::Reset));
    let text = Paragraph::new(Line::from(Span::styled(
        message,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(block);

    f.render_widget(Clear, area);
    f.render_widget(text, area);
}
