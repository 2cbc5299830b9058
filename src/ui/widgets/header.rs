use crate::app::{App, Focus};
use crate::player::PlaybackStatus;
use crate::ui::utils::{format_seconds, truncate};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

/// Title line and the live player line
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let width = area.width as usize;

    let count = match &app.active_filter {
        Some(filter) => format!("{} matching \"{}\"", app.rows.len(), filter),
        None => format!("{} bookmarks", app.rows.len()),
    };
    let title = Line::from(vec![
        Span::styled(
            " 🔖 mocmarks ",
            Style::default().fg(theme.magenta).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" · {}", count), Style::default().fg(theme.overlay)),
    ]);

    let playback = &app.playback;
    let (icon, color) = match playback.status {
        PlaybackStatus::Playing => ("▶", theme.green),
        PlaybackStatus::Paused => ("⏸", theme.yellow),
        PlaybackStatus::Stopped => ("⏹", theme.overlay),
        PlaybackStatus::NotRunning | PlaybackStatus::Unknown => ("○", theme.red),
    };

    let mut player = vec![
        Span::styled(format!(" {} ", icon), Style::default().fg(color)),
        Span::styled(
            playback.status.label(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
    ];
    if let Some(pos) = playback.position_seconds {
        player.push(Span::styled(", position: ", Style::default().fg(theme.overlay)));
        player.push(Span::styled(
            format_seconds(pos as i64),
            Style::default().fg(theme.text),
        ));
    }
    if let Some(ref file) = playback.current_file {
        // Status and clock take about 24 columns
        player.push(Span::styled("  ", Style::default()));
        player.push(Span::styled(
            truncate(file, width.saturating_sub(24)),
            Style::default().fg(theme.blue),
        ));
    }

    let p = Paragraph::new(vec![title, Line::from(player)]).alignment(Alignment::Left);
    f.render_widget(p, area);
}

/// Search field, highlighted while it has focus
pub fn render_search(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let focused = app.focus == Focus::Search;
    let border = if focused { theme.green } else { theme.surface };

    let mut spans = vec![
        Span::styled(
            " / ",
            Style::default().fg(theme.green).add_modifier(Modifier::BOLD),
        ),
        Span::styled(app.search_query.as_str(), Style::default().fg(theme.text)),
    ];
    if focused {
        spans.push(Span::styled("▌", Style::default().fg(theme.green)));
    } else if app.search_query.is_empty() {
        spans.push(Span::styled(
            format!("press {} to search", app.keys.display(&app.keys.search)),
            Style::default().fg(theme.overlay),
        ));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .title(Span::styled(" Search ", Style::default().fg(theme.blue)));
    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}
