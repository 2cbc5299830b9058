use crate::app::App;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Hotkey menu on the bottom line
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let keys = &app.keys;

    let hints = [
        (&keys.capture, "mark"),
        (&keys.play_selected, "play"),
        (&keys.play_pause, "pause"),
        (&keys.prev_bookmark, "prev"),
        (&keys.next_bookmark, "next"),
        (&keys.edit, "edit"),
        (&keys.delete, "del"),
        (&keys.search, "search"),
        (&keys.reload, "reload"),
        (&keys.export, "cue"),
        (&keys.quit, "quit"),
    ];

    let mut spans = Vec::new();
    for (key, label) in hints {
        spans.push(Span::styled(
            format!(" {} ", keys.display(key)),
            Style::default().fg(theme.blue).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!("{} ", label),
            Style::default().fg(theme.overlay),
        ));
    }

    f.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Left),
        area,
    );
}
