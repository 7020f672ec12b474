//! Toolkit-independent chart models.
//!
//! Every model is built from a shared, read-only [`WeatherTable`]; the front end only decides
//! how to draw the points and where the pointer is.

use std::{f64::consts::TAU, sync::Arc};

use crate::{WeatherRecord, WeatherTable};

/// Where the first pie slice starts, in degrees counter-clockwise from 3 o'clock.
pub const PIE_START_ANGLE_DEG: f64 = 140.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    RainfallLine,
    RainfallPie,
    Temperature,
    Humidity,
}

impl ChartKind {
    pub const fn all() -> &'static [ChartKind] {
        &[
            ChartKind::RainfallLine,
            ChartKind::RainfallPie,
            ChartKind::Temperature,
            ChartKind::Humidity,
        ]
    }

    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::RainfallLine => "Rainfall Over the Last 7 Days",
            ChartKind::RainfallPie => "Rainfall Distribution Over the Last 7 Days",
            ChartKind::Temperature => "Temperature Over the Last 7 Days",
            ChartKind::Humidity => "Humidity Over the Last 7 Days",
        }
    }

    pub fn y_label(&self) -> &'static str {
        match self {
            ChartKind::RainfallLine | ChartKind::RainfallPie => "Precipitation (inches)",
            ChartKind::Temperature => "Temperature (°F)",
            ChartKind::Humidity => "Relative Humidity (%)",
        }
    }

    /// Hover text for one day of the table.
    pub fn tooltip(&self, record: &WeatherRecord) -> String {
        let date = record.display_date();
        match self {
            ChartKind::RainfallLine | ChartKind::RainfallPie => format!(
                "Date: {date}\nPrecipitation: {:.2} inches",
                record.precipitation
            ),
            ChartKind::Temperature => format!(
                "Date: {date}\nMin Temperature: {}°F\nMax Temperature: {}°F",
                record.min_temperature, record.max_temperature
            ),
            ChartKind::Humidity => {
                format!("Date: {date}\nRelative Humidity: {}%", record.humidity)
            }
        }
    }
}

/// One plotted line; x is the day index into the table.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: &'static str,
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone)]
pub struct LineChart {
    kind: ChartKind,
    table: Arc<WeatherTable>,
    series: Vec<Series>,
}

impl LineChart {
    fn build(kind: ChartKind, table: Arc<WeatherTable>) -> Self {
        let series_of = |name: &'static str, value: fn(&WeatherRecord) -> f64| Series {
            name,
            points: table
                .iter()
                .enumerate()
                .map(|(i, r)| (i as f64, value(r)))
                .collect(),
        };

        let series = match kind {
            ChartKind::Temperature => vec![
                series_of("Min Temperature", |r| r.min_temperature),
                series_of("Max Temperature", |r| r.max_temperature),
            ],
            ChartKind::Humidity => vec![series_of("Relative Humidity", |r| r.humidity)],
            ChartKind::RainfallLine | ChartKind::RainfallPie => {
                vec![series_of("Precipitation", |r| r.precipitation)]
            }
        };

        Self {
            kind,
            table,
            series,
        }
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    /// Only the two-series temperature chart carries a legend.
    pub fn has_legend(&self) -> bool {
        self.series.len() > 1
    }

    pub fn x_bounds(&self) -> [f64; 2] {
        [0.0, (self.table.len().saturating_sub(1)).max(1) as f64]
    }

    /// Data range padded by a tenth on each side, or by one unit for a flat line.
    pub fn y_bounds(&self) -> [f64; 2] {
        let values = self.series.iter().flat_map(|s| s.points.iter().map(|(_, y)| *y));
        let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

        if !lo.is_finite() || !hi.is_finite() {
            return [0.0, 1.0];
        }

        let pad = if hi > lo { (hi - lo) * 0.1 } else { 1.0 };
        [lo - pad, hi + pad]
    }

    pub fn x_labels(&self) -> Vec<String> {
        self.table.iter().map(WeatherRecord::display_date).collect()
    }

    /// Index of the point closest to `x` along the day axis.
    pub fn nearest_index(&self, x: f64) -> Option<usize> {
        let last = self.table.len().checked_sub(1)?;
        if !x.is_finite() {
            return None;
        }
        Some((x.round().max(0.0) as usize).min(last))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub index: usize,
    pub value: f64,
    pub share: f64,
    /// Radians, counter-clockwise from the positive x axis.
    pub start_angle: f64,
    pub sweep: f64,
}

impl PieSlice {
    pub fn mid_angle(&self) -> f64 {
        self.start_angle + self.sweep / 2.0
    }

    pub fn percent_label(&self) -> String {
        format!("{:.1}%", self.share * 100.0)
    }
}

#[derive(Debug, Clone)]
pub struct PieChart {
    table: Arc<WeatherTable>,
    slices: Vec<PieSlice>,
    total: f64,
}

impl PieChart {
    fn build(table: Arc<WeatherTable>) -> Self {
        let total: f64 = table.iter().map(|r| r.precipitation.max(0.0)).sum();

        let mut angle = PIE_START_ANGLE_DEG.to_radians();
        let slices = table
            .iter()
            .enumerate()
            .map(|(index, r)| {
                let value = r.precipitation.max(0.0);
                let share = if total > 0.0 { value / total } else { 0.0 };
                let slice = PieSlice {
                    index,
                    value: r.precipitation,
                    share,
                    start_angle: angle,
                    sweep: share * TAU,
                };
                angle += slice.sweep;
                slice
            })
            .collect();

        Self {
            table,
            slices,
            total,
        }
    }

    pub fn slices(&self) -> &[PieSlice] {
        &self.slices
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    /// A week without rain has nothing to divide.
    pub fn is_drawable(&self) -> bool {
        self.total > 0.0
    }

    pub fn label(&self, slice: &PieSlice) -> String {
        let date = self
            .table
            .records()
            .get(slice.index)
            .map(WeatherRecord::display_date)
            .unwrap_or_default();
        format!("{date} {}", slice.percent_label())
    }

    /// Slice covering `angle` (radians, counter-clockwise from the positive x axis).
    pub fn slice_at_angle(&self, angle: f64) -> Option<usize> {
        if !self.is_drawable() || !angle.is_finite() {
            return None;
        }

        let origin = PIE_START_ANGLE_DEG.to_radians();
        let offset = (angle - origin).rem_euclid(TAU);
        self.slices
            .iter()
            .filter(|s| s.sweep > 0.0)
            .find(|s| offset < s.start_angle - origin + s.sweep)
            .or_else(|| self.slices.iter().rev().find(|s| s.sweep > 0.0))
            .map(|s| s.index)
    }
}

#[derive(Debug, Clone)]
pub enum ChartModel {
    Line(LineChart),
    Pie(PieChart),
}

impl ChartModel {
    pub fn build(kind: ChartKind, table: Arc<WeatherTable>) -> Self {
        match kind {
            ChartKind::RainfallPie => ChartModel::Pie(PieChart::build(table)),
            _ => ChartModel::Line(LineChart::build(kind, table)),
        }
    }

    pub fn kind(&self) -> ChartKind {
        match self {
            ChartModel::Line(line) => line.kind,
            ChartModel::Pie(_) => ChartKind::RainfallPie,
        }
    }

    pub fn table(&self) -> &Arc<WeatherTable> {
        match self {
            ChartModel::Line(line) => &line.table,
            ChartModel::Pie(pie) => &pie.table,
        }
    }

    /// Number of hoverable points or slices.
    pub fn len(&self) -> usize {
        self.table().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn tooltip(&self, index: usize) -> Option<String> {
        let record = self.table().records().get(index)?;
        Some(self.kind().tooltip(record))
    }
}
