//! Drawing. Everything here reads [`App`] and only writes back layout facts
//! (table scroll state, chart plot area).

pub mod alert;
pub mod chart;
pub mod search;
pub mod table;

use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use weather_core::View;

use crate::app::{App, Focus};

pub fn render(f: &mut Frame, app: &mut App) {
    let [main, status] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(f.area());

    match app.session.view() {
        View::Search => search::render(f, main, app),
        View::Table => table::render(f, main, app),
    }
    render_status(f, status, app);

    if let Some(overlay) = app.chart.as_mut() {
        let area = centered_rect(f.area(), 90, 85);
        chart::render(f, area, overlay);
    }
    if let Some(alert) = &app.alert {
        alert::render(f, alert);
    }
}

/// A `percent_x` by `percent_y` rectangle centred in `area`.
pub fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let [area] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(area);
    area
}

fn key_hints(app: &App) -> &'static [(&'static str, &'static str)] {
    if app.alert.is_some() {
        return &[("[Enter]", "dismiss ")];
    }
    if app.chart.is_some() {
        return &[("[←/→]", "point "), ("[Esc]", "close ")];
    }
    match (app.session.view(), app.focus) {
        (View::Table, _) => &[("[↑/↓]", "row "), ("[Esc]", "back ")],
        (View::Search, Focus::Input) => &[("[Enter]", "search "), ("[Tab]", "actions ")],
        (View::Search, Focus::Actions) => &[("[1-5]", "open "), ("[Tab]", "input ")],
    }
}

fn render_status(f: &mut Frame, area: Rect, app: &App) {
    let [left, right] =
        Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(area);

    f.render_widget(
        Paragraph::new(Span::styled(app.status.as_str(), Style::default().fg(Color::Cyan))),
        left,
    );

    let mut spans = Vec::new();
    for (key, what) in key_hints(app) {
        spans.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(*what));
    }
    spans.push(Span::styled("[Ctrl-C]", Style::default().fg(Color::Yellow)));
    spans.push(Span::raw("quit"));
    f.render_widget(
        Paragraph::new(Line::from(spans)).alignment(ratatui::layout::Alignment::Right),
        right,
    );
}


#[cfg(test)]
mod tests {
    use super::testing::{contains, draw};
    use super::*;
    use crate::test_support::{loaded_app, new_app, runtime};

    #[test]
    fn centered_rect_stays_inside() {
        let outer = Rect::new(0, 0, 100, 40);
        let inner = centered_rect(outer, 50, 50);
        assert_eq!(inner, Rect::new(25, 10, 50, 20));
    }

    #[test]
    fn status_bar_shows_message_and_hints() {
        let rt = runtime();
        let mut app = loaded_app(&rt);

        let buffer = draw(&mut app, 120, 30);
        assert!(contains(&buffer, "Loaded 7 days for Washington,DC,USA"));
        assert!(contains(&buffer, "[Enter]search"));
    }

    #[test]
    fn alert_draws_over_the_search_view() {
        let rt = runtime();
        let mut app = new_app(&rt);
        app.search_for(" ");

        let buffer = draw(&mut app, 100, 30);
        assert!(contains(&buffer, "Input Error"));
        assert!(contains(&buffer, "Please enter a location"));
    }
}
