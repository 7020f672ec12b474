use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::{App, Focus, NavAction};

const SPINNER: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

const PLACEHOLDER: &str = "Enter a location (e.g. Washington,DC,USA) and press Enter to see \
the last 7 days of weather.";

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let [input, summary, actions] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(6),
        Constraint::Length(3),
    ])
    .areas(area);

    render_input(f, input, app);
    render_summary(f, summary, app);
    render_actions(f, actions, app);
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Gray)
    }
}

fn render_input(f: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::Input;
    let mut title = vec![Span::raw(" Location ")];
    if app.session.is_searching() {
        let frame = SPINNER[app.tick % SPINNER.len()];
        title.push(Span::styled(
            format!("{frame} fetching "),
            Style::default().fg(Color::Yellow),
        ));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_style(focused))
        .title(Line::from(title));

    // Keep the end of long input visible.
    let inner_width = area.width.saturating_sub(3) as usize;
    let chars = app.input.chars().count();
    let skip = chars.saturating_sub(inner_width);
    let visible: String = app.input.chars().skip(skip).collect();

    f.render_widget(Paragraph::new(visible.as_str()).block(block), area);

    if focused && app.chart.is_none() && app.alert.is_none() {
        let x = area.x + 1 + (chars - skip) as u16;
        f.set_cursor_position(Position::new(x, area.y + 1));
    }
}

fn render_summary(f: &mut Frame, area: Rect, app: &App) {
    let (title, lines): (String, Vec<Line>) = match (app.session.data(), app.session.pending()) {
        (_, Some(pending)) => (
            " Summary ".to_string(),
            vec![Line::styled(
                format!("Fetching weather for {}...", pending.location),
                Style::default().fg(Color::Yellow),
            )],
        ),
        (Some(data), None) => (
            format!(" Summary for {} ", data.table.location()),
            data.summary.lines().into_iter().map(Line::from).collect(),
        ),
        (None, None) => (
            " Summary ".to_string(),
            vec![Line::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray))],
        ),
    };

    let summary = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false })
        .scroll((app.summary_scroll, 0));
    f.render_widget(summary, area);
}

fn render_actions(f: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::Actions;
    let enabled = app.session.navigation_enabled();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_style(focused))
        .title(" Actions ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let cells = Layout::horizontal([Constraint::Ratio(1, NavAction::ALL.len() as u32); 5])
        .split(inner);

    for (i, (action, cell)) in NavAction::ALL.iter().zip(cells.iter()).enumerate() {
        let mut style = if enabled {
            Style::default()
        } else {
            Style::default().fg(Color::DarkGray)
        };
        if focused && i == app.selected {
            style = style.add_modifier(Modifier::REVERSED);
        }

        let number = if enabled { style.fg(Color::Yellow) } else { style };
        let label = Line::from(vec![
            Span::styled(format!("{} ", i + 1), number),
            Span::styled(action.label(), style),
        ]);
        f.render_widget(Paragraph::new(label).alignment(Alignment::Center), *cell);
    }
}
