use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Length of the trailing window every search covers.
pub const HISTORY_DAYS: i64 = 7;

/// Day-month-year, used everywhere a date is shown to the user.
pub const DISPLAY_DATE_FORMAT: &str = "%d-%m-%Y";

/// Column headers of the tabular view, in cell order.
pub const TABLE_COLUMNS: [&str; 6] = [
    "Date",
    "Temperature (°F)",
    "Relative Humidity (%)",
    "Precipitation (inches)",
    "Min Temperature (°F)",
    "Max Temperature (°F)",
];

/// One day of aggregated weather history. Units are US customary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub date: NaiveDate,
    pub temperature: f64,
    pub humidity: f64,
    pub precipitation: f64,
    pub min_temperature: f64,
    pub max_temperature: f64,
}

impl WeatherRecord {
    pub fn display_date(&self) -> String {
        format_date(self.date)
    }

    /// Row cells matching [`TABLE_COLUMNS`]. Floats use shortest round-trip formatting.
    pub fn cells(&self) -> [String; 6] {
        [
            self.display_date(),
            self.temperature.to_string(),
            self.humidity.to_string(),
            self.precipitation.to_string(),
            self.min_temperature.to_string(),
            self.max_temperature.to_string(),
        ]
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

/// Result of one search: records ordered by date ascending.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct WeatherTable {
    location: String,
    records: Vec<WeatherRecord>,
}

impl WeatherTable {
    pub fn new(location: impl Into<String>, mut records: Vec<WeatherRecord>) -> Self {
        records.sort_by_key(|r| r.date);
        Self {
            location: location.into(),
            records,
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn records(&self) -> &[WeatherRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WeatherRecord> {
        self.records.iter()
    }
}

/// Date range sent to the history endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateWindow {
    /// The `days` calendar days ending at `now`.
    pub fn trailing(now: DateTime<Utc>, days: i64) -> Self {
        Self {
            start: now - Duration::days(days),
            end: now,
        }
    }

    pub fn start_param(&self) -> String {
        day_start_param(self.start)
    }

    pub fn end_param(&self) -> String {
        day_start_param(self.end)
    }
}

fn day_start_param(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT00:00:00").to_string()
}

#[derive(Debug, Clone)]
pub struct HistoryQuery {
    pub location: String,
    pub window: DateWindow,
}

impl HistoryQuery {
    pub fn trailing_week(location: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            location: location.into(),
            window: DateWindow::trailing(now, HISTORY_DAYS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(date: NaiveDate, precipitation: f64) -> WeatherRecord {
        WeatherRecord {
            date,
            temperature: 60.5,
            humidity: 70.25,
            precipitation,
            min_temperature: 50.0,
            max_temperature: 71.3,
        }
    }

    #[test]
    fn table_orders_records_by_date() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
        let table = WeatherTable::new("Paris", vec![record(d(5), 0.1), record(d(3), 0.2), record(d(4), 0.3)]);

        let dates: Vec<_> = table.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![d(3), d(4), d(5)]);
        assert_eq!(table.location(), "Paris");
    }

    #[test]
    fn cells_use_day_month_year() {
        let r = record(NaiveDate::from_ymd_opt(2024, 1, 9).unwrap(), 0.07);
        let cells = r.cells();

        assert_eq!(cells[0], "09-01-2024");
        assert_eq!(cells[3], "0.07");
        assert_eq!(cells.len(), TABLE_COLUMNS.len());
    }

    #[test]
    fn trailing_window_spans_seven_days() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 15, 42, 7).unwrap();
        let window = DateWindow::trailing(now, HISTORY_DAYS);

        assert_eq!(window.start_param(), "2024-03-03T00:00:00");
        assert_eq!(window.end_param(), "2024-03-10T00:00:00");
    }
}
