//! One interaction cycle of the tracker.
//!
//! Each call loads the table fresh from the store, so nothing is cached
//! between cycles, and writes at most once.

use chrono::{Local, NaiveDateTime};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::metrics::StoreMetrics;
use crate::models::{Record, Table, TrendPoint};
use crate::store::{self, RecordStore};
use crate::validation::InputValidator;

/// Entry, history and trend operations over a [`RecordStore`]
#[derive(Debug, Clone)]
pub struct TrackerService {
    store: RecordStore,
    metrics: StoreMetrics,
}

impl TrackerService {
    /// Create a service over `store`.
    #[must_use]
    pub fn new(store: RecordStore) -> Self {
        Self {
            store,
            metrics: StoreMetrics::default(),
        }
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Record a measurement taken now.
    pub fn submit(&self, name: &str, height_cm: f64, weight_kg: f64) -> Result<Record> {
        self.submit_at(name, height_cm, weight_kg, Local::now().naive_local())
    }

    /// Record a measurement taken at `at`.
    ///
    /// Invalid input is rejected before the store is read or written. A
    /// storage file that exists but cannot be read is left alone.
    pub fn submit_at(&self, name: &str, height_cm: f64, weight_kg: f64, at: NaiveDateTime) -> Result<Record> {
        if let Err(e) = InputValidator::validate_submission(name, height_cm, weight_kg) {
            warn!(name, height_cm, weight_kg, error = %e, "Rejected submission");
            self.metrics.record_rejected_submission();
            return Err(e);
        }

        let table = self.store.load_for_append()?;
        let record = Record::new(name, height_cm, weight_kg, at);
        let table = store::append_record(&table, record.clone());
        self.store.save(&table)?;

        self.metrics.record_append();
        info!(name, bmi = record.bmi, rows = table.len(), "Recorded measurement");
        Ok(record)
    }

    /// All records for `name` in insertion order. Empty when nothing matches.
    pub fn history(&self, name: &str) -> Result<Table> {
        let table = self.store.load()?;
        let rows = store::filter_by_name(&table, name);

        self.metrics.record_query("history", rows.len());
        debug!(name, rows = rows.len(), "History query");
        Ok(rows)
    }

    /// `(Date, BMI)` points for `name` in insertion order.
    pub fn trend(&self, name: &str) -> Result<Vec<TrendPoint>> {
        let table = self.store.load()?;
        let points = store::trend(&table, name);

        self.metrics.record_query("trend", points.len());
        debug!(name, points = points.len(), "Trend query");
        Ok(points)
    }
}
