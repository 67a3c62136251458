//! Date-bucketed rollups.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

use super::cell;
use crate::registry::Row;
use crate::value::{as_number, as_text, CellValue};

/// Date-only formats, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Date-time formats, tried after [`DATE_FORMATS`].
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y/%m/%d %H:%M:%S"];

/// Day-first and month-first formats, tried last before RFC 3339.
const REGIONAL_FORMATS: &[&str] = &["%m/%d/%Y", "%d-%m-%Y"];

/// Bucket width for a rollup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    Day,
    Week,
    Month,
    Year,
    /// Unrecognized period: every row lands in the `""` bucket.
    Other,
}

impl Period {
    /// Resolve a period by its exact name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "day" => Period::Day,
            "week" => Period::Week,
            "month" => Period::Month,
            "year" => Period::Year,
            _ => Period::Other,
        }
    }

    /// Canonical name.
    pub fn name(&self) -> &'static str {
        match self {
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
            Period::Year => "year",
            Period::Other => "",
        }
    }
}

impl From<&str> for Period {
    fn from(name: &str) -> Self {
        Period::from_name(name)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Week bucketing policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodConfig {
    /// First day of a week bucket.
    pub week_start: Weekday,
    /// Text appended to the week start date to form the bucket label.
    pub week_marker: String,
}

impl Default for PeriodConfig {
    fn default() -> Self {
        Self {
            week_start: Weekday::Sun,
            week_marker: " 周".to_string(),
        }
    }
}

/// One bucket of a rollup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodValue {
    pub period: String,
    pub value: f64,
}

/// Sums a value column into date buckets.
#[derive(Debug, Clone, Default)]
pub struct PeriodAggregator {
    config: PeriodConfig,
}

impl PeriodAggregator {
    /// Create an aggregator with the default week policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an aggregator with a custom week policy.
    pub fn with_config(config: PeriodConfig) -> Self {
        Self { config }
    }

    /// Bucket `rows` by `date_column` and sum `value_column` per bucket.
    ///
    /// Rows with an absent or unparseable date are skipped. Output is sorted
    /// by label as plain strings.
    pub fn aggregate(
        &self,
        rows: &[Row],
        date_column: &str,
        value_column: &str,
        period: Period,
    ) -> Vec<PeriodValue> {
        let mut buckets: HashMap<String, f64> = HashMap::new();

        for row in rows {
            let Some(date) = parse_date_cell(cell(row, date_column)) else {
                continue;
            };

            let key = self.bucket_key(date, period);
            *buckets.entry(key).or_insert(0.0) += as_number(cell(row, value_column));
        }

        let mut data: Vec<PeriodValue> = buckets
            .into_iter()
            .map(|(period, value)| PeriodValue { period, value })
            .collect();
        data.sort_by(|a, b| a.period.cmp(&b.period));
        data
    }

    /// Label of the bucket containing `date`.
    pub fn bucket_key(&self, date: NaiveDateTime, period: Period) -> String {
        match period {
            Period::Day => date.format("%Y-%m-%d").to_string(),
            Period::Week => {
                let start = week_start(date.date(), self.config.week_start);
                format!("{}{}", start.format("%Y-%m-%d"), self.config.week_marker)
            }
            Period::Month => date.format("%Y-%m").to_string(),
            Period::Year => date.format("%Y").to_string(),
            Period::Other => String::new(),
        }
    }
}

/// Aggregate with the default week policy.
pub fn aggregate(
    rows: &[Row],
    date_column: &str,
    value_column: &str,
    period: Period,
) -> Vec<PeriodValue> {
    PeriodAggregator::new().aggregate(rows, date_column, value_column, period)
}

/// Parse a date cell's text against the supported formats, in order.
///
/// Layouts are matched exactly: four-digit years, two-digit fields and no
/// surrounding whitespace. RFC 3339 timestamps keep the wall-clock time of
/// their own offset.
pub fn parse_date(text: &str) -> Option<NaiveDateTime> {
    let date_only = |formats: &[&str]| {
        formats
            .iter()
            .find_map(|f| {
                NaiveDate::parse_from_str(text, f)
                    .ok()
                    .filter(|d| d.format(f).to_string() == text)
            })
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    };

    date_only(DATE_FORMATS)
        .or_else(|| {
            DATETIME_FORMATS.iter().find_map(|f| {
                NaiveDateTime::parse_from_str(text, f)
                    .ok()
                    .filter(|dt| dt.format(f).to_string() == text)
            })
        })
        .or_else(|| date_only(REGIONAL_FORMATS))
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.naive_local())
        })
}

/// Parse a cell as a date, rendering numbers as text first.
pub fn parse_date_cell(value: &CellValue) -> Option<NaiveDateTime> {
    if value.is_absent() {
        return None;
    }
    parse_date(&as_text(value))
}

/// The most recent `start` weekday on or before `date`.
fn week_start(date: NaiveDate, start: Weekday) -> NaiveDate {
    let offset = (date.weekday().num_days_from_sunday() + 7 - start.num_days_from_sunday()) % 7;
    date.checked_sub_days(Days::new(u64::from(offset)))
        .unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::DecodedTable;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2023-01-02"), Some(ymd(2023, 1, 2)));
        assert_eq!(parse_date("2023/01/02"), Some(ymd(2023, 1, 2)));
        assert_eq!(
            parse_date("2023-01-02 13:45:00"),
            ymd(2023, 1, 2).date().and_hms_opt(13, 45, 0)
        );
        assert_eq!(
            parse_date("2023/01/02 08:00:30"),
            ymd(2023, 1, 2).date().and_hms_opt(8, 0, 30)
        );
        assert_eq!(parse_date("01/02/2023"), Some(ymd(2023, 1, 2)));
        assert_eq!(parse_date("02-01-2023"), Some(ymd(2023, 1, 2)));
        assert_eq!(
            parse_date("2023-01-02T23:30:00+08:00"),
            ymd(2023, 1, 2).date().and_hms_opt(23, 30, 0)
        );
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("2023-13-40"), None);
        assert_eq!(parse_date("2023-01-02 garbage"), None);
        assert_eq!(parse_date_cell(&CellValue::Number(20230102.0)), None);
        assert_eq!(parse_date_cell(&CellValue::Absent), None);
    }

    #[test]
    fn test_parse_date_requires_exact_layout() {
        assert_eq!(parse_date("1/2/23"), None);
        assert_eq!(parse_date("12-11-10"), None);
        assert_eq!(parse_date("2023-1-2"), None);
        assert_eq!(parse_date(" 2023-01-02"), None);
        assert_eq!(parse_date("2023-01-02 "), None);
        assert_eq!(parse_date("1/2/2023"), None);
        assert_eq!(parse_date("2023-01-02 1:02:03"), None);
    }

    #[test]
    fn test_short_dates_are_skipped_not_bucketed() {
        let rows = DecodedTable::from_records(
            ["date", "value"],
            vec![vec!["2023-01-02", "10"], vec!["12-11-10", "99"]],
        )
        .rows;

        let data = aggregate(&rows, "date", "value", Period::Month);
        assert_eq!(
            data,
            vec![PeriodValue {
                period: "2023-01".into(),
                value: 10.0
            }]
        );
    }

    #[test]
    fn test_bucket_keys() {
        let agg = PeriodAggregator::new();
        // 2023-01-04 is a Wednesday
        let date = ymd(2023, 1, 4);

        assert_eq!(agg.bucket_key(date, Period::Day), "2023-01-04");
        assert_eq!(agg.bucket_key(date, Period::Week), "2023-01-01 周");
        assert_eq!(agg.bucket_key(date, Period::Month), "2023-01");
        assert_eq!(agg.bucket_key(date, Period::Year), "2023");
        assert_eq!(agg.bucket_key(date, Period::Other), "");
    }

    #[test]
    fn test_week_on_start_day_is_itself() {
        let agg = PeriodAggregator::new();
        // 2023-01-01 is a Sunday
        assert_eq!(agg.bucket_key(ymd(2023, 1, 1), Period::Week), "2023-01-01 周");
    }

    #[test]
    fn test_monday_week_start() {
        let agg = PeriodAggregator::with_config(PeriodConfig {
            week_start: Weekday::Mon,
            week_marker: "W".to_string(),
        });
        assert_eq!(agg.bucket_key(ymd(2023, 1, 1), Period::Week), "2022-12-26W");
        assert_eq!(agg.bucket_key(ymd(2023, 1, 4), Period::Week), "2023-01-02W");
    }

    #[test]
    fn test_month_rollup() {
        let rows = DecodedTable::from_records(
            ["date", "value"],
            vec![vec!["2023-01-02", "10"], vec!["2023-01-20", "5"]],
        )
        .rows;

        let data = aggregate(&rows, "date", "value", Period::Month);
        assert_eq!(
            data,
            vec![PeriodValue {
                period: "2023-01".into(),
                value: 15.0
            }]
        );
    }

    #[test]
    fn test_skips_bad_dates_and_sorts_labels() {
        let rows = DecodedTable::from_records(
            ["date", "value"],
            vec![
                vec!["2024-03-01", "1"],
                vec!["not a date", "100"],
                vec!["2023-12-31", "2"],
                vec!["", "100"],
                vec!["2024/03/09", "3"],
            ],
        )
        .rows;

        let data = aggregate(&rows, "date", "value", Period::Month);
        let labels: Vec<&str> = data.iter().map(|d| d.period.as_str()).collect();
        assert_eq!(labels, vec!["2023-12", "2024-03"]);
        assert_eq!(data[1].value, 4.0);
    }

    #[test]
    fn test_unrecognized_period_collapses() {
        let rows = DecodedTable::from_records(
            ["date", "value"],
            vec![vec!["2023-01-02", "1"], vec!["2024-05-06", "2"], vec!["bad", "4"]],
        )
        .rows;

        let data = aggregate(&rows, "date", "value", Period::from_name("quarter"));
        assert_eq!(
            data,
            vec![PeriodValue {
                period: String::new(),
                value: 3.0
            }]
        );
    }

    #[test]
    fn test_missing_date_column() {
        let rows = DecodedTable::from_records(["value"], vec![vec!["1"]]).rows;
        assert!(aggregate(&rows, "date", "value", Period::Day).is_empty());
    }
}
