use crate::app::{App, Focus};
use crate::ui::utils::{file_name, format_seconds, pad_to, truncate};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let width = area.width as usize;
    let height = area.height as usize;

    let green = theme.green;
    let cream = theme.yellow;
    let muted = theme.overlay;
    let grid = theme.surface;

    let mut lines: Vec<Line> = Vec::new();

    if app.rows.is_empty() {
        lines.push(Line::from(""));
        lines.push(
            Line::from(Span::styled("No bookmarks", Style::default().fg(muted)))
                .alignment(Alignment::Center),
        );
        lines.push(
            Line::from(Span::styled(
                format!(
                    "Press {} while MOC plays to save one",
                    app.keys.display(&app.keys.capture)
                ),
                Style::default().fg(grid),
            ))
            .alignment(Alignment::Center),
        );
        f.render_widget(Paragraph::new(lines), area);
        return;
    }

    // id, time and rating are fixed; file and comment share the rest
    let id_w = 5;
    let time_w = 9;
    let glyph_w = app.max_rating as usize + 1;
    let flexible = width.saturating_sub(4 + id_w + time_w + glyph_w + 2);
    let file_w = flexible / 2;
    let comment_w = flexible.saturating_sub(file_w);

    let current = app.playback.current_file.as_deref();
    let start_idx = app
        .selected
        .saturating_sub(height / 2)
        .min(app.rows.len().saturating_sub(height));

    for (idx, row) in app.rows.iter().enumerate().skip(start_idx).take(height) {
        let is_sel = idx == app.selected;
        let is_current = current == Some(row.bookmark.file_path.as_str());
        let bookmark = &row.bookmark;

        // ● selected, ◉ in the playing file, ○ otherwise
        let (marker, m_color, text_style) = if is_sel {
            let style = if app.focus == Focus::List {
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text)
            };
            ("●", cream, style)
        } else if is_current {
            ("◉", theme.red, Style::default().fg(theme.red))
        } else {
            ("○", grid, Style::default().fg(theme.text))
        };

        lines.push(Line::from(vec![
            Span::styled(format!("  {} ", marker), Style::default().fg(m_color)),
            Span::styled(
                format!("{:>4} ", bookmark.id),
                Style::default().fg(if is_sel { green } else { muted }),
            ),
            Span::styled(
                pad_to(&truncate(file_name(&bookmark.file_path), file_w), file_w),
                text_style,
            ),
            Span::styled(
                format!(" {} ", format_seconds(bookmark.position)),
                Style::default().fg(green),
            ),
            Span::styled(format!("{} ", row.glyph), Style::default().fg(cream)),
            Span::styled(
                truncate(&bookmark.comment, comment_w),
                Style::default().fg(muted),
            ),
        ]));
    }

    f.render_widget(Paragraph::new(lines), area);
}
