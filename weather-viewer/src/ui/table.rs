use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};
use weather_core::{WeatherRecord, model::TABLE_COLUMNS};

use crate::app::App;

pub fn render(f: &mut Frame, area: Rect, app: &mut App) {
    let Some(data) = app.session.data() else {
        f.render_widget(
            Paragraph::new("No weather data loaded.")
                .block(Block::default().borders(Borders::ALL).title(" Data ")),
            area,
        );
        return;
    };

    let rows: Vec<[String; 6]> = data.table.iter().map(WeatherRecord::cells).collect();

    let mut widths = TABLE_COLUMNS.map(|h| h.chars().count() as u16);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count() as u16);
        }
    }

    let header = Row::new(TABLE_COLUMNS.iter().map(|h| Cell::from(*h)))
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .bottom_margin(1);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Weather Data for {} ", data.table.location()))
        .title_bottom(Line::from(" Esc / Backspace / b: Back ").right_aligned());

    let table = Table::new(rows.into_iter().map(Row::new), widths.map(Constraint::Length))
        .header(header)
        .block(block)
        .column_spacing(2)
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    f.render_stateful_widget(table, area, &mut app.table_state);
}

#[cfg(test)]
mod tests {
    use crate::test_support::{fixture_table, loaded_app, runtime};
    use crate::ui::testing::{draw, lines};
    use weather_core::model::TABLE_COLUMNS;

    #[test]
    fn table_shows_every_record_under_the_headers() {
        let rt = runtime();
        let mut app = loaded_app(&rt);
        app.session.show_table().unwrap();

        let buffer = draw(&mut app, 140, 24);
        let screen = lines(&buffer);

        let header = screen
            .iter()
            .find(|l| l.contains("Precipitation (inches)"))
            .expect("header row");
        let mut last = 0;
        for title in TABLE_COLUMNS {
            let at = header.find(title).expect(title);
            assert!(at >= last, "{title} out of order");
            last = at;
        }

        for record in fixture_table().iter() {
            let row = screen
                .iter()
                .find(|l| l.contains(&record.display_date()))
                .unwrap_or_else(|| panic!("row for {}", record.display_date()));
            let tokens: Vec<&str> = row.trim().trim_matches('│').split_whitespace().collect();
            assert_eq!(tokens, record.cells().iter().map(String::as_str).collect::<Vec<_>>());
        }
    }

    #[test]
    fn title_names_the_location() {
        let rt = runtime();
        let mut app = loaded_app(&rt);
        app.session.show_table().unwrap();

        let screen = lines(&draw(&mut app, 140, 24));
        assert!(screen.iter().any(|l| l.contains("Weather Data for Washington,DC,USA")));
        assert!(screen.iter().any(|l| l.contains("Esc / Backspace / b: Back")));
    }
}
