//! CSV response body → [`WeatherTable`].

use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};

use crate::{WeatherError, WeatherRecord, WeatherTable};

const DATE_COLUMN: &str = "Date time";
const TEMPERATURE_COLUMN: &str = "Temperature";
const HUMIDITY_COLUMN: &str = "Relative Humidity";
const PRECIPITATION_COLUMN: &str = "Precipitation";
const MIN_TEMPERATURE_COLUMN: &str = "Minimum Temperature";
const MAX_TEMPERATURE_COLUMN: &str = "Maximum Temperature";

const DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d"];
const DATE_TIME_FORMATS: &[&str] = &["%m/%d/%Y %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Index of each selected column inside the source header row.
struct Columns {
    date: usize,
    temperature: usize,
    humidity: usize,
    precipitation: usize,
    min_temperature: usize,
    max_temperature: usize,
}

impl Columns {
    fn locate(headers: &StringRecord, body: &str) -> Result<Self, WeatherError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}') == name)
                .ok_or_else(|| {
                    WeatherError::MalformedResponse(format!(
                        "missing column '{name}' in response: {}",
                        excerpt(body)
                    ))
                })
        };

        Ok(Self {
            date: find(DATE_COLUMN)?,
            temperature: find(TEMPERATURE_COLUMN)?,
            humidity: find(HUMIDITY_COLUMN)?,
            precipitation: find(PRECIPITATION_COLUMN)?,
            min_temperature: find(MIN_TEMPERATURE_COLUMN)?,
            max_temperature: find(MAX_TEMPERATURE_COLUMN)?,
        })
    }
}

/// Parse a history CSV, keeping only the six columns the viewer needs.
pub fn parse_history_csv(location: &str, body: &str) -> Result<WeatherTable, WeatherError> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(body.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| WeatherError::MalformedResponse(format!("unreadable header row: {e}")))?
        .clone();
    let columns = Columns::locate(&headers, body)?;

    let mut records = Vec::new();
    for (idx, row) in reader.records().enumerate() {
        let line = idx + 2;
        let row = row
            .map_err(|e| WeatherError::MalformedResponse(format!("row {line}: {e}")))?;
        records.push(parse_row(&row, &columns, line)?);
    }

    if records.is_empty() {
        return Err(WeatherError::EmptyDataset);
    }

    tracing::debug!(rows = records.len(), "parsed history csv");
    Ok(WeatherTable::new(location, records))
}

fn parse_row(row: &StringRecord, columns: &Columns, line: usize) -> Result<WeatherRecord, WeatherError> {
    let cell = |idx: usize, name: &str| {
        row.get(idx).ok_or_else(|| {
            WeatherError::MalformedResponse(format!("row {line}: missing value for '{name}'"))
        })
    };

    let date = parse_date(cell(columns.date, DATE_COLUMN)?).ok_or_else(|| {
        WeatherError::MalformedResponse(format!(
            "row {line}: unrecognised date '{}'",
            row.get(columns.date).unwrap_or_default()
        ))
    })?;

    let number = |idx: usize, name: &str| -> Result<f64, WeatherError> {
        let raw = cell(idx, name)?;
        parse_number(raw).ok_or_else(|| {
            WeatherError::MalformedResponse(format!("row {line}: invalid {name} value '{raw}'"))
        })
    };

    let precipitation = match cell(columns.precipitation, PRECIPITATION_COLUMN)? {
        "" => 0.0,
        _ => number(columns.precipitation, PRECIPITATION_COLUMN)?,
    };

    Ok(WeatherRecord {
        date,
        temperature: number(columns.temperature, TEMPERATURE_COLUMN)?,
        humidity: number(columns.humidity, HUMIDITY_COLUMN)?,
        precipitation,
        min_temperature: number(columns.min_temperature, MIN_TEMPERATURE_COLUMN)?,
        max_temperature: number(columns.max_temperature, MAX_TEMPERATURE_COLUMN)?,
    })
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATE_TIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn excerpt(body: &str) -> String {
    const MAX: usize = 120;
    let first_line = body.lines().next().unwrap_or_default();
    match first_line.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &first_line[..cut]),
        None => first_line.to_string(),
    }
}
