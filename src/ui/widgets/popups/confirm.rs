use crate::app::dialog::ConfirmPrompt;
use crate::ui::layout::centered_popup;
use crate::ui::theme::Theme;
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn render(f: &mut Frame, theme: &Theme, prompt: &ConfirmPrompt) {
    let height = prompt.lines.len() as u16 + 4;
    let area = centered_popup(f.area(), 70, height);
    f.render_widget(Clear, area);

    let mut lines: Vec<Line> = vec![Line::from("")];
    lines.extend(
        prompt
            .lines
            .iter()
            .map(|l| Line::from(Span::styled(l.as_str(), Style::default().fg(theme.text)))),
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.yellow))
        .title(Span::styled(
            format!(" {} ", prompt.title),
            Style::default().fg(theme.yellow).add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Left)
        .style(Style::default().bg(Color::Reset));

    let p = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
    f.render_widget(p, area);
}
