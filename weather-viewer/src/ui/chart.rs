//! Chart overlays: line charts through ratatui's `Chart`, the pie on a braille `Canvas`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Axis, Block, Borders, Chart, Clear, Dataset, GraphType, LegendPosition, List, ListItem,
        Paragraph,
        canvas::{Canvas, Points},
    },
};
use weather_core::chart::{ChartModel, LineChart, PieChart};

use crate::app::ChartOverlay;

/// Canvas extent of the pie; the unit circle plus room for the exploded slice.
const PIE_EXTENT: f64 = 1.1;
const EXPLODE: f64 = 0.08;

const SLICE_COLORS: [Color; 7] = [
    Color::Cyan,
    Color::Green,
    Color::Yellow,
    Color::Magenta,
    Color::Blue,
    Color::Red,
    Color::LightCyan,
];

fn slice_color(index: usize) -> Color {
    SLICE_COLORS[index % SLICE_COLORS.len()]
}

pub fn render(f: &mut Frame, area: Rect, overlay: &mut ChartOverlay) {
    let ChartOverlay {
        model,
        cursor,
        plot_area,
    } = overlay;

    f.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", model.kind().title()))
        .title_bottom(Line::from(" ←/→ or mouse: inspect  Esc: close ").right_aligned());
    let inner = block.inner(area);
    f.render_widget(block, area);

    match &*model {
        ChartModel::Line(line) => {
            render_line(f, inner, line, model.kind().y_label(), *cursor, plot_area)
        }
        ChartModel::Pie(pie) => render_pie(f, inner, pie, *cursor, plot_area),
    }

    if let Some(index) = *cursor {
        let anchor = anchor_for(model, *plot_area, index);
        if let (Some(text), Some(anchor)) = (model.tooltip(index), anchor) {
            render_tooltip(f, inner, anchor, &text);
        }
    }
}

fn render_line(
    f: &mut Frame,
    area: Rect,
    line: &LineChart,
    y_title: &str,
    cursor: Option<usize>,
    plot_area: &mut Rect,
) {
    let [lo, hi] = line.y_bounds();
    let y_labels = [lo, (lo + hi) / 2.0, hi].map(|v| format!("{v:.1}"));
    let y_label_width = y_labels.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u16;

    let dates = line.x_labels();
    let x_labels: Vec<String> = if area.width as usize >= dates.len() * 12 {
        dates
    } else {
        [dates.first(), dates.last()].into_iter().flatten().cloned().collect()
    };

    *plot_area = Rect {
        x: area.x + y_label_width + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(y_label_width + 2),
        height: area.height.saturating_sub(3),
    };

    let colors: &[Color] = if line.has_legend() {
        &[Color::Blue, Color::Red]
    } else {
        &[Color::Cyan]
    };

    let highlight: Vec<(f64, f64)> = cursor
        .map(|i| line.series().iter().filter_map(|s| s.points.get(i).copied()).collect())
        .unwrap_or_default();

    let mut datasets = Vec::new();
    for (series, color) in line.series().iter().zip(colors.iter().cycle()) {
        let mut path = Dataset::default()
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(*color))
            .data(&series.points);
        if line.has_legend() {
            path = path.name(series.name);
        }
        datasets.push(path);
        datasets.push(
            Dataset::default()
                .marker(Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(*color).add_modifier(Modifier::BOLD))
                .data(&series.points),
        );
    }
    datasets.push(
        Dataset::default()
            .marker(Marker::Block)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(Color::Yellow))
            .data(&highlight),
    );

    let chart = Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title("Date")
                .style(Style::default().fg(Color::Gray))
                .bounds(line.x_bounds())
                .labels(x_labels)
                .labels_alignment(Alignment::Right),
        )
        .y_axis(
            Axis::default()
                .title(y_title)
                .style(Style::default().fg(Color::Gray))
                .bounds([lo, hi])
                .labels(y_labels.to_vec()),
        )
        .legend_position(line.has_legend().then_some(LegendPosition::TopLeft));

    f.render_widget(chart, area);
}

/// Largest rectangle in `area` that draws the pie round on cells twice as tall as wide.
pub fn pie_bounds(area: Rect) -> Rect {
    let height = area.height.min(area.width / 2);
    let width = height * 2;
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_pie(
    f: &mut Frame,
    area: Rect,
    pie: &PieChart,
    cursor: Option<usize>,
    plot_area: &mut Rect,
) {
    let [left, right] =
        Layout::horizontal([Constraint::Percentage(65), Constraint::Percentage(35)]).areas(area);

    if !pie.is_drawable() {
        *plot_area = Rect::default();
        let [middle] = Layout::vertical([Constraint::Length(1)])
            .flex(ratatui::layout::Flex::Center)
            .areas(area);
        f.render_widget(
            Paragraph::new("No rainfall recorded over the last 7 days.")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            middle,
        );
        return;
    }

    let bounds = pie_bounds(left);
    *plot_area = bounds;

    let mut sectors: Vec<Vec<(f64, f64)>> = vec![Vec::new(); pie.slices().len()];
    let dx = 2.0 * PIE_EXTENT / (f64::from(bounds.width.max(1)) * 2.0);
    let dy = 2.0 * PIE_EXTENT / (f64::from(bounds.height.max(1)) * 4.0);
    let mut y: f64 = -1.0;
    while y <= 1.0 {
        let mut x: f64 = -1.0;
        while x <= 1.0 {
            if x.hypot(y) <= 1.0 {
                if let Some(i) = pie.slice_at_angle(y.atan2(x)) {
                    let (ox, oy) = if cursor == Some(i) {
                        let mid = pie.slices()[i].mid_angle();
                        (EXPLODE * mid.cos(), EXPLODE * mid.sin())
                    } else {
                        (0.0, 0.0)
                    };
                    sectors[i].push((x + ox, y + oy));
                }
            }
            x += dx;
        }
        y += dy;
    }

    let char_width = 2.0 * PIE_EXTENT / f64::from(bounds.width.max(1));
    let labels: Vec<(f64, f64, String)> = pie
        .slices()
        .iter()
        .filter(|s| s.share >= 0.04)
        .map(|s| {
            let text = s.percent_label();
            let half = text.chars().count() as f64 * char_width / 2.0;
            let (x, y) = (0.62 * s.mid_angle().cos(), 0.62 * s.mid_angle().sin());
            (x - half, y, text)
        })
        .collect();

    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([-PIE_EXTENT, PIE_EXTENT])
        .y_bounds([-PIE_EXTENT, PIE_EXTENT])
        .paint(|ctx| {
            for (i, coords) in sectors.iter().enumerate() {
                ctx.draw(&Points {
                    coords,
                    color: slice_color(i),
                });
            }
            ctx.layer();
            for (x, y, text) in &labels {
                ctx.print(
                    *x,
                    *y,
                    Span::styled(
                        text.clone(),
                        Style::default().fg(Color::Black).add_modifier(Modifier::BOLD),
                    ),
                );
            }
        });
    f.render_widget(canvas, bounds);

    let mut items: Vec<ListItem> = pie
        .slices()
        .iter()
        .map(|s| {
            let mut style = Style::default();
            if cursor == Some(s.index) {
                style = style.add_modifier(Modifier::REVERSED);
            }
            ListItem::new(Line::from(vec![
                Span::styled("■ ", Style::default().fg(slice_color(s.index))),
                Span::styled(pie.label(s), style),
            ]))
        })
        .collect();
    items.push(ListItem::new(""));
    items.push(ListItem::new(format!("Total: {:.2} inches", pie.total())));

    f.render_widget(
        List::new(items).block(Block::default().borders(Borders::LEFT).title(" Days ")),
        right,
    );
}

/// Cell for data coordinates `(x, y)` inside `plot`.
fn to_screen(plot: Rect, x_bounds: [f64; 2], y_bounds: [f64; 2], x: f64, y: f64) -> (u16, u16) {
    let frac = |v: f64, [lo, hi]: [f64; 2]| {
        if hi > lo { ((v - lo) / (hi - lo)).clamp(0.0, 1.0) } else { 0.0 }
    };
    let col = frac(x, x_bounds) * f64::from(plot.width.saturating_sub(1));
    let row = (1.0 - frac(y, y_bounds)) * f64::from(plot.height.saturating_sub(1));
    (plot.x + col.round() as u16, plot.y + row.round() as u16)
}

fn anchor_for(model: &ChartModel, plot: Rect, index: usize) -> Option<(u16, u16)> {
    if plot.is_empty() {
        return None;
    }
    match model {
        ChartModel::Line(line) => {
            let point = line.series().last()?.points.get(index).copied()?;
            Some(to_screen(plot, line.x_bounds(), line.y_bounds(), point.0, point.1))
        }
        ChartModel::Pie(pie) => {
            let mid = pie.slices().get(index)?.mid_angle();
            let extent = [-PIE_EXTENT, PIE_EXTENT];
            Some(to_screen(plot, extent, extent, 0.6 * mid.cos(), 0.6 * mid.sin()))
        }
    }
}

fn render_tooltip(f: &mut Frame, container: Rect, (ax, ay): (u16, u16), text: &str) {
    let lines: Vec<&str> = text.lines().collect();
    let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u16 + 4;
    let height = lines.len() as u16 + 2;
    if width > container.width || height > container.height {
        return;
    }

    let x = if ax + 2 + width <= container.right() {
        ax + 2
    } else {
        ax.saturating_sub(width + 1).max(container.x)
    };
    let y = ay
        .saturating_sub(height / 2)
        .clamp(container.y, container.bottom() - height);
    let area = Rect::new(x, y, width, height);

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines.into_iter().map(Line::from).collect::<Vec<_>>()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        ),
        area,
    );
}

/// Point or slice under the terminal cell `(column, row)`, using the plot area of the last draw.
pub fn hover_index(overlay: &ChartOverlay, column: u16, row: u16) -> Option<usize> {
    let area = overlay.plot_area;
    if area.is_empty() || !area.contains(Position::new(column, row)) {
        return None;
    }

    match &overlay.model {
        ChartModel::Line(line) => {
            let [x0, x1] = line.x_bounds();
            let frac = f64::from(column - area.x) / f64::from(area.width.saturating_sub(1).max(1));
            line.nearest_index(x0 + frac * (x1 - x0))
        }
        ChartModel::Pie(pie) => {
            let x = -PIE_EXTENT
                + (f64::from(column - area.x) + 0.5) / f64::from(area.width) * 2.0 * PIE_EXTENT;
            let y = PIE_EXTENT
                - (f64::from(row - area.y) + 0.5) / f64::from(area.height) * 2.0 * PIE_EXTENT;
            if x.hypot(y) > PIE_EXTENT {
                return None;
            }
            pie.slice_at_angle(y.atan2(x))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixture_table;
    use crate::ui::testing::lines;
    use chrono::NaiveDate;
    use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};
    use std::sync::Arc;
    use weather_core::{ChartKind, WeatherRecord, WeatherTable};

    fn overlay(kind: ChartKind) -> ChartOverlay {
        ChartOverlay::new(ChartModel::build(kind, Arc::new(fixture_table())))
    }

    fn draw(overlay: &mut ChartOverlay) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                render(f, area, overlay)
            })
            .unwrap();
        terminal.backend().buffer().clone()
    }

    fn screen_contains(buffer: &Buffer, needle: &str) -> bool {
        lines(buffer).iter().any(|l| l.contains(needle))
    }

    #[test]
    fn temperature_chart_shows_legend_and_tooltip() {
        let mut chart = overlay(ChartKind::Temperature);
        chart.cursor = Some(2);

        let buffer = draw(&mut chart);
        assert!(screen_contains(&buffer, "Temperature Over the Last 7 Days"));
        assert!(screen_contains(&buffer, "Max Temperature"));
        assert!(screen_contains(&buffer, "Date: 05-03-2024"));
        assert!(screen_contains(&buffer, "Min Temperature: 45.6°F"));
        assert!(screen_contains(&buffer, "Max Temperature: 66.2°F"));
        assert!(!chart.plot_area.is_empty());
    }

    #[test]
    fn rainfall_line_tooltip_has_two_decimals() {
        let mut chart = overlay(ChartKind::RainfallLine);
        chart.cursor = Some(4);

        let buffer = draw(&mut chart);
        assert!(screen_contains(&buffer, "Date: 07-03-2024"));
        assert!(screen_contains(&buffer, "Precipitation: 0.00 inches"));
    }

    #[test]
    fn no_tooltip_without_cursor() {
        let mut chart = overlay(ChartKind::Humidity);
        let buffer = draw(&mut chart);
        assert!(screen_contains(&buffer, "Humidity Over the Last 7 Days"));
        assert!(!screen_contains(&buffer, "Date: "));
    }

    #[test]
    fn pie_lists_every_day_with_its_share() {
        let mut chart = overlay(ChartKind::RainfallPie);
        chart.cursor = Some(3);

        let buffer = draw(&mut chart);
        assert!(screen_contains(&buffer, "06-03-2024 53.8%"));
        assert!(screen_contains(&buffer, "05-03-2024 24.5%"));
        assert!(screen_contains(&buffer, "03-03-2024 0.0%"));
        assert!(screen_contains(&buffer, "Total: 2.08 inches"));
        assert!(screen_contains(&buffer, "Precipitation: 1.12 inches"));
    }

    #[test]
    fn dry_week_pie_draws_a_notice() {
        let record = WeatherRecord {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            temperature: 50.0,
            humidity: 60.0,
            precipitation: 0.0,
            min_temperature: 40.0,
            max_temperature: 55.0,
        };
        let table = Arc::new(WeatherTable::new("Oslo", vec![record]));
        let mut chart = ChartOverlay::new(ChartModel::build(ChartKind::RainfallPie, table));

        let buffer = draw(&mut chart);
        assert!(screen_contains(&buffer, "No rainfall recorded over the last 7 days."));
        assert_eq!(hover_index(&chart, 70, 20), None);
    }

    #[test]
    fn line_hover_maps_columns_to_days() {
        let mut chart = overlay(ChartKind::Humidity);
        chart.plot_area = Rect::new(10, 2, 61, 20);

        assert_eq!(hover_index(&chart, 10, 5), Some(0));
        assert_eq!(hover_index(&chart, 40, 5), Some(3));
        assert_eq!(hover_index(&chart, 70, 21), Some(6));
        assert_eq!(hover_index(&chart, 5, 5), None);
        assert_eq!(hover_index(&chart, 40, 30), None);
    }

    #[test]
    fn pie_hover_maps_angle_to_slice() {
        let mut chart = overlay(ChartKind::RainfallPie);
        chart.plot_area = Rect::new(10, 5, 44, 22);

        // Right of centre is 220 degrees past the start, inside the 06-03 slice.
        assert_eq!(hover_index(&chart, 41, 15), Some(3));
        // Corner lies outside the disc.
        assert_eq!(hover_index(&chart, 10, 5), None);
    }

    #[test]
    fn pie_bounds_keep_a_two_to_one_cell_ratio() {
        assert_eq!(pie_bounds(Rect::new(0, 0, 80, 20)), Rect::new(20, 0, 40, 20));
        assert_eq!(pie_bounds(Rect::new(0, 0, 30, 20)), Rect::new(0, 2, 30, 15));
    }
}
