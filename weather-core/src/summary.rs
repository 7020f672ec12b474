use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use crate::{WeatherError, WeatherRecord, WeatherTable, model::format_date};

/// A reported minimum or maximum together with the first day it occurred.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extremum {
    pub value: f64,
    pub date: NaiveDate,
}

impl Extremum {
    pub fn display_date(&self) -> String {
        format_date(self.date)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSummary {
    pub max_temperature: Extremum,
    pub min_temperature: Extremum,
    pub max_precipitation: Extremum,
    pub max_humidity: Extremum,
}

impl WeatherSummary {
    pub fn from_table(table: &WeatherTable) -> Result<Self, WeatherError> {
        let records = table.records();

        Ok(Self {
            max_temperature: first_extremum(records, |r| r.max_temperature, Pick::Highest)?,
            min_temperature: first_extremum(records, |r| r.min_temperature, Pick::Lowest)?,
            max_precipitation: first_extremum(records, |r| r.precipitation, Pick::Highest)?,
            max_humidity: first_extremum(records, |r| r.humidity, Pick::Highest)?,
        })
    }

    /// The four report lines, in display order.
    pub fn lines(&self) -> [String; 4] {
        [
            format!(
                "Maximum Temperature: {}°F on {}",
                self.max_temperature.value,
                self.max_temperature.display_date()
            ),
            format!(
                "Minimum Temperature: {}°F on {}",
                self.min_temperature.value,
                self.min_temperature.display_date()
            ),
            format!(
                "Maximum Rainfall: {} inches on {}",
                self.max_precipitation.value,
                self.max_precipitation.display_date()
            ),
            format!(
                "Highest Humidity: {}% on {}",
                self.max_humidity.value,
                self.max_humidity.display_date()
            ),
        ]
    }
}

impl fmt::Display for WeatherSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines().join("\n"))
    }
}

#[derive(Clone, Copy)]
enum Pick {
    Highest,
    Lowest,
}

/// Ties keep the earliest row: only a strictly better value replaces the current pick.
fn first_extremum(
    records: &[WeatherRecord],
    value: impl Fn(&WeatherRecord) -> f64,
    pick: Pick,
) -> Result<Extremum, WeatherError> {
    let (first, rest) = records.split_first().ok_or(WeatherError::EmptyDataset)?;

    let mut best = Extremum {
        value: value(first),
        date: first.date,
    };
    for record in rest {
        let v = value(record);
        let better = match pick {
            Pick::Highest => v > best.value,
            Pick::Lowest => v < best.value,
        };
        if better {
            best = Extremum {
                value: v,
                date: record.date,
            };
        }
    }

    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn rec(d: u32, min: f64, max: f64, precip: f64, humidity: f64) -> WeatherRecord {
        WeatherRecord {
            date: day(d),
            temperature: (min + max) / 2.0,
            humidity,
            precipitation: precip,
            min_temperature: min,
            max_temperature: max,
        }
    }

    fn week() -> WeatherTable {
        WeatherTable::new(
            "Washington,DC,USA",
            vec![
                rec(1, 35.0, 51.2, 0.0, 61.0),
                rec(2, 33.4, 58.0, 0.31, 88.5),
                rec(3, 40.1, 62.7, 0.02, 70.0),
                rec(4, 38.0, 62.7, 0.31, 88.5),
                rec(5, 33.4, 49.9, 0.0, 55.3),
                rec(6, 36.6, 55.0, 1.05, 93.1),
                rec(7, 41.0, 60.3, 0.0, 64.8),
            ],
        )
    }

    #[test]
    fn picks_extremes_with_first_date_on_ties() {
        let summary = WeatherSummary::from_table(&week()).unwrap();

        assert_eq!(summary.max_temperature, Extremum { value: 62.7, date: day(3) });
        assert_eq!(summary.min_temperature, Extremum { value: 33.4, date: day(2) });
        assert_eq!(summary.max_precipitation, Extremum { value: 1.05, date: day(6) });
        assert_eq!(summary.max_humidity, Extremum { value: 93.1, date: day(6) });
    }

    #[test]
    fn reported_dates_point_at_rows_holding_the_value() {
        let table = week();
        let summary = WeatherSummary::from_table(&table).unwrap();

        let row = |date: NaiveDate| table.iter().find(|r| r.date == date).unwrap();
        assert_eq!(row(summary.max_temperature.date).max_temperature, summary.max_temperature.value);
        assert_eq!(row(summary.min_temperature.date).min_temperature, summary.min_temperature.value);
        assert_eq!(row(summary.max_precipitation.date).precipitation, summary.max_precipitation.value);
        assert_eq!(row(summary.max_humidity.date).humidity, summary.max_humidity.value);
    }

    #[test]
    fn renders_four_report_lines() {
        let text = WeatherSummary::from_table(&week()).unwrap().to_string();

        assert_eq!(
            text,
            "Maximum Temperature: 62.7°F on 03-03-2024\n\
             Minimum Temperature: 33.4°F on 02-03-2024\n\
             Maximum Rainfall: 1.05 inches on 06-03-2024\n\
             Highest Humidity: 93.1% on 06-03-2024"
        );
    }

    #[test]
    fn empty_table_is_empty_dataset() {
        let err = WeatherSummary::from_table(&WeatherTable::default()).unwrap_err();
        assert!(matches!(err, WeatherError::EmptyDataset));
    }
}
