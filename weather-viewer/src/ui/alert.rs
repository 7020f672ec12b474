use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Flex, Layout},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::app::Alert;

/// Modal box in the middle of the screen. Long server messages wrap.
pub fn render(f: &mut Frame, alert: &Alert) {
    let screen = f.area();
    let width = (alert.message.chars().count() as u16 + 6)
        .clamp(30, screen.width.saturating_sub(4).max(30))
        .min(screen.width);
    let text_width = width.saturating_sub(4).max(1) as usize;
    let wrapped_rows = alert
        .message
        .lines()
        .map(|l| l.chars().count().div_ceil(text_width).max(1))
        .sum::<usize>() as u16;
    let height = (wrapped_rows + 4).min(screen.height);

    let [area] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(screen);
    let [area] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);

    let style = if alert.title == "Input Error" {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Red)
    };

    let mut lines: Vec<Line> = alert.message.lines().map(Line::from).collect();
    lines.push(Line::from(""));
    lines.push(Line::styled("[Enter] OK", Style::default().fg(Color::DarkGray)).centered());

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .alignment(Alignment::Left)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(style)
                    .title(Line::styled(
                        format!(" {} ", alert.title),
                        style.add_modifier(Modifier::BOLD),
                    )),
            ),
        area,
    );
}
