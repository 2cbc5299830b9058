use crate::app::dialog::{BookmarkForm, FormField};
use crate::store::MAX_RATING;
use crate::ui::layout::centered_popup;
use crate::ui::theme::Theme;
use crate::ui::utils::truncate;
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

/// Create / edit bookmark dialog
pub fn render(f: &mut Frame, theme: &Theme, form: &BookmarkForm) {
    let popup_area = centered_popup(f.area(), 60, 12);
    if popup_area.width < 30 || popup_area.height < 8 {
        return;
    }
    f.render_widget(Clear, popup_area);

    let inner_w = popup_area.width.saturating_sub(4) as usize;
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(
        form.heading.as_str(),
        Style::default().fg(theme.magenta).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(vec![
        Span::styled("    File: ", Style::default().fg(theme.overlay)),
        Span::styled(
            truncate(&form.file_path, inner_w.saturating_sub(10)),
            Style::default().fg(theme.blue),
        ),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Position: ", Style::default().fg(theme.overlay)),
        Span::styled(form.position_label(), Style::default().fg(theme.text)),
    ]));
    lines.push(Line::from(""));

    let rating_label = format!("Rating 0-{}", MAX_RATING);
    let fields = [
        (FormField::Rating, rating_label.as_str(), &form.rating),
        (FormField::Comment, "Comment", &form.comment),
    ];
    for (field, label, value) in fields {
        let is_active = field == form.active_field;
        let field_style = if is_active {
            Style::default().fg(theme.green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.overlay)
        };
        let value_style = if is_active {
            Style::default().fg(theme.text).add_modifier(Modifier::UNDERLINED)
        } else {
            Style::default().fg(theme.text)
        };

        let cursor = if is_active { "▌" } else { "" };
        lines.push(Line::from(vec![
            Span::styled(format!("{:>10}: ", label), field_style),
            Span::styled(truncate(value, inner_w.saturating_sub(14)), value_style),
            Span::styled(cursor, Style::default().fg(theme.green)),
        ]));
    }

    lines.push(Line::from(""));
    match form.error {
        Some(ref msg) => lines.push(Line::from(Span::styled(
            format!("⚠ {}", msg),
            Style::default().fg(theme.red).add_modifier(Modifier::BOLD),
        ))),
        None => lines.push(Line::from(vec![
            Span::styled("Tab", Style::default().fg(theme.blue).add_modifier(Modifier::BOLD)),
            Span::styled(" next  ", Style::default().fg(theme.overlay)),
            Span::styled("Enter", Style::default().fg(theme.green).add_modifier(Modifier::BOLD)),
            Span::styled(" save  ", Style::default().fg(theme.overlay)),
            Span::styled("Esc", Style::default().fg(theme.red).add_modifier(Modifier::BOLD)),
            Span::styled(" cancel", Style::default().fg(theme.overlay)),
        ])),
    }

    let popup = Paragraph::new(lines).alignment(Alignment::Left).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.blue))
            .title(Span::styled(
                format!(" {} ", form.title),
                Style::default().fg(theme.blue).add_modifier(Modifier::BOLD),
            ))
            .title_alignment(Alignment::Left)
            .style(Style::default().bg(Color::Reset)),
    );
    f.render_widget(popup, popup_area);
}
