//! BMI record store.
//!
//! Owns the on-disk CSV table and the pure query operations over it. Only
//! [`RecordStore::load`] and [`RecordStore::save`] touch the filesystem;
//! every other operation works on an explicit [`Table`] value.
//!
//! There is no locking: two processes saving to the same file race, and the
//! later save silently discards the other's append.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{BmiError, Result};
use crate::logging::OperationTimer;
use crate::metrics::StoreMetrics;
use crate::models::{Record, Table, TrendPoint, COLUMNS};

/// Handle to a CSV file holding the record table
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
    metrics: StoreMetrics,
}

impl RecordStore {
    /// Create a store backed by the file at `path`. The file need not exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            metrics: StoreMetrics::default(),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full table.
    ///
    /// A missing or unreadable file yields an empty table. A file that exists
    /// but does not parse into records fails with [`BmiError::StorageCorrupt`];
    /// no rows are skipped.
    pub fn load(&self) -> Result<Table> {
        self.load_inner(true)
    }

    /// Load the full table ahead of a save.
    ///
    /// Same as [`load`](Self::load) except that a file which exists but
    /// cannot be read fails with [`BmiError::StorageUnreadable`], so the
    /// following save cannot replace it with a near-empty table.
    pub fn load_for_append(&self) -> Result<Table> {
        self.load_inner(false)
    }

    fn load_inner(&self, tolerate_unreadable: bool) -> Result<Table> {
        let timer = OperationTimer::new("store.load");

        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No storage file yet, starting with an empty table");
                self.metrics.record_load(0, timer.finish_duration(), true);
                return Ok(Table::new());
            },
            Err(e) if tolerate_unreadable => {
                warn!(path = %self.path.display(), error = %e, "Storage file unreadable, starting with an empty table");
                self.metrics.record_load(0, timer.finish_duration(), true);
                return Ok(Table::new());
            },
            Err(source) => {
                self.metrics.record_load(0, timer.finish_duration(), false);
                return Err(BmiError::StorageUnreadable {
                    path: self.path.clone(),
                    source,
                });
            },
        };

        match parse_table(&bytes) {
            Ok(table) => {
                debug!(path = %self.path.display(), rows = table.len(), "Loaded records");
                self.metrics.record_load(table.len(), timer.finish_duration(), true);
                Ok(table)
            },
            Err(reason) => {
                self.metrics.record_load(0, timer.finish_duration(), false);
                Err(BmiError::storage_corrupt(&self.path, reason))
            },
        }
    }

    /// Overwrite the backing file with `table`.
    ///
    /// The whole file is rewritten on every call, header included, so an
    /// empty table still produces a valid file. The write is not atomic.
    pub fn save(&self, table: &Table) -> Result<()> {
        let timer = OperationTimer::new("store.save");
        let result = self.write_table(table);
        self.metrics.record_save(table.len(), timer.finish_duration(), result.is_ok());

        if result.is_ok() {
            info!(path = %self.path.display(), rows = table.len(), "Saved records");
        }
        result
    }

    fn write_table(&self, table: &Table) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut writer = csv::Writer::from_path(&self.path)?;
        write_records(&mut writer, table)
    }
}

/// Write `table` in the storage layout: header row, then one row per record.
pub(crate) fn write_records<W: Write>(writer: &mut csv::Writer<W>, table: &Table) -> Result<()> {
    writer.write_record(COLUMNS)?;
    for record in table {
        writer.write_record(record.to_fields())?;
    }
    writer.flush()?;
    Ok(())
}

fn parse_table(bytes: &[u8]) -> std::result::Result<Table, String> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(bytes);

    let headers = reader.headers().map_err(|e| e.to_string())?.clone();
    if headers.is_empty() {
        return Err("missing header row".to_string());
    }
    if !headers.iter().eq(COLUMNS) {
        return Err(format!(
            "expected header '{}', found '{}'",
            COLUMNS.join(","),
            headers.iter().collect::<Vec<_>>().join(",")
        ));
    }

    reader
        .deserialize::<Record>()
        .enumerate()
        .map(|(index, row)| {
            let record = row.map_err(|e| e.to_string())?;
            check_row(&record).map_err(|problem| format!("record {}: {problem}", index + 1))?;
            Ok(record)
        })
        .collect()
}

// Stored rows must satisfy the same constraints as new submissions.
fn check_row(record: &Record) -> std::result::Result<(), String> {
    if record.name.is_empty() {
        return Err("Name is empty".to_string());
    }
    for (column, value) in [("Height", record.height), ("Weight", record.weight)] {
        if !value.is_finite() || value <= 0.0 {
            return Err(format!("{column} must be a finite number greater than 0, found {value}"));
        }
    }
    if !record.bmi.is_finite() {
        return Err(format!("BMI must be a finite number, found {}", record.bmi));
    }
    Ok(())
}

/// Body Mass Index: `weight_kg / (height_cm / 100)^2`.
///
/// No validation and no rounding. The caller rejects non-positive heights.
#[must_use]
pub fn compute_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    weight_kg / (height_cm / 100.0).powi(2)
}

/// Records whose name equals `name` exactly (case-sensitive, untrimmed),
/// in their original order.
#[must_use]
pub fn filter_by_name(table: &Table, name: &str) -> Table {
    table.iter().filter(|record| record.name == name).cloned().collect()
}

/// A new table with `record` added at the end. `table` is left untouched.
#[must_use]
pub fn append_record(table: &Table, record: Record) -> Table {
    let mut appended = table.clone();
    appended.push(record);
    appended
}

/// `(Date, BMI)` pairs for `name` in insertion order.
///
/// Points are not re-sorted by date: a record inserted with an earlier
/// timestamp than its predecessor still follows it.
#[must_use]
pub fn trend(table: &Table, name: &str) -> Vec<TrendPoint> {
    table
        .iter()
        .filter(|record| record.name == name)
        .map(TrendPoint::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use tempfile::tempdir;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, day)
            .and_then(|d| d.and_hms_opt(hour, 0, 0))
            .unwrap()
    }

    fn sample_table() -> Table {
        Table::from(vec![
            Record::new("Alice", 170.0, 65.0, at(1, 8)),
            Record::new("Bob", 180.0, 90.0, at(1, 9)),
            Record::new("Alice", 170.0, 70.0, at(2, 8)),
        ])
    }

    #[test]
    fn test_compute_bmi() {
        assert!((compute_bmi(70.0, 175.0) - 22.857_142_857_142_858).abs() < 1e-9);
        assert!((compute_bmi(100.0, 200.0) - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_filter_by_name_preserves_order() {
        let table = sample_table();
        let alice = filter_by_name(&table, "Alice");
        assert_eq!(alice.len(), 2);
        assert_eq!(alice.records()[0], table.records()[0]);
        assert_eq!(alice.records()[1], table.records()[2]);
    }

    #[test]
    fn test_filter_by_name_is_case_sensitive() {
        let table = sample_table();
        assert!(filter_by_name(&table, "alice").is_empty());
        assert!(filter_by_name(&table, "Alice ").is_empty());
    }

    #[test]
    fn test_append_record_leaves_input_untouched() {
        let table = sample_table();
        let record = Record::new("Carol", 160.0, 50.0, at(3, 8));
        let appended = append_record(&table, record.clone());

        assert_eq!(table.len(), 3);
        assert_eq!(appended.len(), 4);
        assert_eq!(&appended.records()[..3], table.records());
        assert_eq!(appended.records()[3], record);
    }

    #[test]
    fn test_trend_keeps_insertion_order() {
        let table = Table::from(vec![
            Record::new("Alice", 170.0, 65.0, at(5, 8)),
            Record::new("Alice", 170.0, 70.0, at(1, 8)),
        ]);
        let points = trend(&table, "Alice");
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, at(5, 8));
        assert_eq!(points[1].date, at(1, 8));
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("missing.csv"));
        let table = store.load().unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns().len(), 5);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("bmi_data.csv"));
        let table = sample_table();

        store.save(&table).unwrap();
        assert_eq!(store.load().unwrap(), table);
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("nested/deeper/bmi_data.csv"));
        store.save(&sample_table()).unwrap();
        assert_eq!(store.load().unwrap().len(), 3);
    }

    #[test]
    fn test_parse_rejects_wrong_header() {
        let err = parse_table(b"Name,Height,Weight,Date\n").unwrap_err();
        assert!(err.contains("expected header"));
    }

    #[test]
    fn test_parse_reports_record_number() {
        let input = b"Name,Height,Weight,BMI,Date\n\
            Alice,170.0,65.0,22.49,2024-01-15 08:30:00\n\
            Bob,-180.0,80.0,24.69,2024-01-15 08:31:00\n";
        let err = parse_table(input).unwrap_err();
        assert!(err.starts_with("record 2:"), "{err}");
        assert!(err.contains("Height"), "{err}");
    }

    #[test]
    fn test_parse_rejects_empty_input() {
        assert!(parse_table(b"").is_err());
    }
}
