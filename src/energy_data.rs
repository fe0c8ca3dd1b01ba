//! Parses the energy readings file into the four time-bucketed series the
//! Graphs screen can display.
//!
//! The source file is CSV-like: a header line naming the columns, then one
//! reading per line. Columns are located by name, so the file may order them
//! freely. The windowing rules match the upstream data pipeline exactly: the
//! hour window is `index > n - 24` over 1-based row indices rather than a
//! true last-24 window, and the week/month buckets keep only the first
//! reading seen per label.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use thiserror::Error;

/// Time granularity selectable on the Graphs screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Hour,
    Day,
    Week,
    Month,
}

impl Period {
    pub const ALL: [Period; 4] = [Period::Hour, Period::Day, Period::Week, Period::Month];

    /// Selector caption, matching the filter buttons of the app.
    pub fn caption(&self) -> &'static str {
        match self {
            Period::Hour => "HOUR",
            Period::Day => "DAY",
            Period::Week => "WEEK",
            Period::Month => "MONTH",
        }
    }
}

#[derive(Debug, Error)]
pub enum DataError {
    #[error("energy data file is empty")]
    Empty,
    #[error("energy data header is missing required column: {name}")]
    MissingColumn { name: &'static str },
}

/// One displayable series: labels and both readings kept in lock-step by
/// index. Equal length across the three vectors is an invariant; the only
/// way points are added is [`ChartSeries::push`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub consumption: Vec<f64>,
    pub generation: Vec<f64>,
}

impl ChartSeries {
    fn push(&mut self, label: String, consumption: f64, generation: f64) {
        self.labels.push(label);
        self.consumption.push(consumption);
        self.generation.push(generation);
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// The parsed dataset, one series per period. Built in a single pass over
/// the data lines and immutable afterwards; a reload replaces it wholesale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BucketedDataset {
    pub hour: ChartSeries,
    pub day: ChartSeries,
    pub week: ChartSeries,
    pub month: ChartSeries,
}

impl BucketedDataset {
    pub fn series(&self, period: Period) -> &ChartSeries {
        match period {
            Period::Hour => &self.hour,
            Period::Day => &self.day,
            Period::Week => &self.week,
            Period::Month => &self.month,
        }
    }
}

struct Columns {
    timestamp: usize,
    consumption: usize,
    generation: usize,
}

fn resolve_columns(header: &str) -> Result<Columns, DataError> {
    let names: Vec<&str> = header.split(',').collect();
    let find = |name: &'static str| {
        names
            .iter()
            .position(|column| *column == name)
            .ok_or(DataError::MissingColumn { name })
    };
    Ok(Columns {
        timestamp: find("timestamp")?,
        consumption: find("consumption")?,
        generation: find("generation")?,
    })
}

/// Parse the raw file contents into all four series in one pass.
///
/// Each bucket applies its own inclusion rule per line; the row index is
/// shared. Lines with an unparseable timestamp still contribute, under
/// placeholder labels, and unparseable readings contribute NaN points, so a
/// bad line never aborts the whole parse. A missing header column does.
pub fn process_data(raw: &str) -> Result<BucketedDataset, DataError> {
    let lines: Vec<&str> = raw.trim().lines().collect();
    let header = lines.first().ok_or(DataError::Empty)?;
    let columns = resolve_columns(header)?;

    let data = &lines[1..];
    let n = data.len() as i64;
    let mut dataset = BucketedDataset::default();

    for (index, line) in data.iter().enumerate() {
        // 1-based row index, shared by every bucket's window rule.
        let i = index as i64 + 1;
        let values: Vec<&str> = line.split(',').collect();

        let timestamp = values
            .get(columns.timestamp)
            .and_then(|value| parse_timestamp(value));
        let consumption = parse_reading(values.get(columns.consumption).copied());
        let generation = parse_reading(values.get(columns.generation).copied());
        if timestamp.is_none() {
            tracing::warn!("Unparseable timestamp on data line {}", i);
        }

        if i > n - 24 {
            dataset.hour.push(hour_label(timestamp), consumption, generation);
        }

        if i > n - 7 {
            dataset.day.push(day_label(timestamp), consumption, generation);
        }

        if i > n - 28 {
            let label = week_label(timestamp);
            if !dataset.week.labels.contains(&label) {
                dataset.week.push(label, consumption, generation);
            }
        }

        let label = month_label(timestamp);
        if !dataset.month.labels.contains(&label) {
            dataset.month.push(label, consumption, generation);
        }
    }

    Ok(dataset)
}

fn parse_reading(field: Option<&str>) -> f64 {
    field
        .and_then(|value| value.trim().parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

/// Accepts RFC 3339 plus the `YYYY-MM-DD[ HH:MM[:SS]]` forms the readings
/// file uses. Anything else is an invalid date, not a parse failure.
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_local());
    }
    for format in [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}

fn hour_label(timestamp: Option<NaiveDateTime>) -> String {
    match timestamp {
        Some(ts) => format!("{}:00", ts.hour()),
        None => "NaN:00".to_string(),
    }
}

fn day_label(timestamp: Option<NaiveDateTime>) -> String {
    match timestamp {
        Some(ts) => ts.format("%a").to_string(),
        None => "Invalid Date".to_string(),
    }
}

fn week_label(timestamp: Option<NaiveDateTime>) -> String {
    match timestamp {
        Some(ts) => format!("W{}", (ts.day() + 6) / 7),
        None => "WNaN".to_string(),
    }
}

fn month_label(timestamp: Option<NaiveDateTime>) -> String {
    match timestamp {
        Some(ts) => ts.format("%b").to_string(),
        None => "Invalid Date".to_string(),
    }
}
