//! Data models for BMI measurements
//!
//! This module contains the record schema persisted by the record store,
//! the in-memory table of records, and the points handed to trend consumers.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Column names of the storage file, in order.
pub const COLUMNS: [&str; 5] = ["Name", "Height", "Weight", "BMI", "Date"];

/// Text format of the `Date` column.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One BMI measurement event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Name of the person measured
    #[serde(rename = "Name")]
    pub name: String,
    /// Height in centimeters
    #[serde(rename = "Height")]
    pub height: f64,
    /// Weight in kilograms
    #[serde(rename = "Weight")]
    pub weight: f64,
    /// BMI computed at insertion time
    #[serde(rename = "BMI")]
    pub bmi: f64,
    /// Wall-clock time of the measurement, second precision
    #[serde(rename = "Date", with = "date_format")]
    pub date: NaiveDateTime,
}

impl Record {
    /// Build a record, computing BMI from `height` and `weight`.
    ///
    /// The timestamp is truncated to whole seconds so that it survives
    /// a trip through the storage file unchanged.
    #[must_use]
    pub fn new(name: impl Into<String>, height: f64, weight: f64, date: NaiveDateTime) -> Self {
        Self {
            name: name.into(),
            height,
            weight,
            bmi: crate::store::compute_bmi(weight, height),
            date: truncate_to_seconds(date),
        }
    }

    /// Date rendered as `YYYY-MM-DD HH:MM:SS`.
    #[must_use]
    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    /// Fields rendered in storage column order.
    #[must_use]
    pub fn to_fields(&self) -> [String; 5] {
        [
            self.name.clone(),
            format_float(self.height),
            format_float(self.weight),
            format_float(self.bmi),
            self.date_string(),
        ]
    }
}

/// Ordered sequence of records, insertion order preserved
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    records: Vec<Record>,
}

impl Table {
    /// Create an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self { records: Vec::new() }
    }

    /// Column schema. Identical for empty and non-empty tables.
    #[must_use]
    pub const fn columns(&self) -> &'static [&'static str] {
        &COLUMNS
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in insertion order.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Iterate over records in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Append a record at the end.
    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }
}

impl From<Vec<Record>> for Table {
    fn from(records: Vec<Record>) -> Self {
        Self { records }
    }
}

impl FromIterator<Record> for Table {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// A single point of a BMI trend line
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendPoint {
    /// Measurement time (x axis)
    #[serde(rename = "Date", with = "date_format")]
    pub date: NaiveDateTime,
    /// BMI at that time (y axis)
    #[serde(rename = "BMI")]
    pub bmi: f64,
}

impl From<&Record> for TrendPoint {
    fn from(record: &Record) -> Self {
        Self {
            date: record.date,
            bmi: record.bmi,
        }
    }
}

/// Render a float in plain decimal notation.
///
/// Uses the shortest representation that parses back to the same value and
/// keeps a trailing `.0` on integral values (`170.0`, not `170`).
#[must_use]
pub fn format_float(value: f64) -> String {
    let text = value.to_string();
    if value.is_finite() && !text.contains('.') {
        format!("{text}.0")
    } else {
        text
    }
}

fn truncate_to_seconds(date: NaiveDateTime) -> NaiveDateTime {
    date.with_nanosecond(0).unwrap_or(date)
}

mod date_format {
    use super::DATE_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&date.format(DATE_FORMAT))
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&text, DATE_FORMAT).map_err(|e| {
            serde::de::Error::custom(format!("invalid date '{text}', expected YYYY-MM-DD HH:MM:SS ({e})"))
        })
    }
}
