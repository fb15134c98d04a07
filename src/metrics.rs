use metrics::{counter, histogram};
use std::time::Duration;

/// Metric names emitted by the record store and tracker service
///
/// Without an installed recorder every call is a no-op.
#[derive(Debug, Clone, Copy)]
pub struct StoreMetrics {
    // Storage metrics
    pub loads_total: &'static str,
    pub saves_total: &'static str,
    pub rows_loaded: &'static str,
    pub operation_duration: &'static str,

    // Tracker metrics
    pub records_appended_total: &'static str,
    pub submissions_rejected_total: &'static str,
    pub queries_total: &'static str,
    pub empty_queries_total: &'static str,

    // Error metrics
    pub errors_total: &'static str,
}

impl Default for StoreMetrics {
    fn default() -> Self {
        Self {
            loads_total: "bmi_tracker_store_loads_total",
            saves_total: "bmi_tracker_store_saves_total",
            rows_loaded: "bmi_tracker_store_rows_loaded",
            operation_duration: "bmi_tracker_store_operation_duration_seconds",

            records_appended_total: "bmi_tracker_records_appended_total",
            submissions_rejected_total: "bmi_tracker_submissions_rejected_total",
            queries_total: "bmi_tracker_queries_total",
            empty_queries_total: "bmi_tracker_empty_queries_total",

            errors_total: "bmi_tracker_errors_total",
        }
    }
}

const fn status(success: bool) -> &'static str {
    if success {
        "success"
    } else {
        "error"
    }
}

impl StoreMetrics {
    /// Record a table load
    pub fn record_load(&self, rows: usize, duration: Duration, success: bool) {
        counter!(self.loads_total, "status" => status(success)).increment(1);
        histogram!(self.operation_duration, "operation" => "load").record(duration.as_secs_f64());
        histogram!(self.rows_loaded).record(rows as f64);

        if !success {
            self.record_error("storage_corrupt", "load");
        }
    }

    /// Record a table save
    pub fn record_save(&self, rows: usize, duration: Duration, success: bool) {
        counter!(self.saves_total, "status" => status(success)).increment(1);
        histogram!(self.operation_duration, "operation" => "save").record(duration.as_secs_f64());
        tracing::trace!(rows, success, "save recorded");

        if !success {
            self.record_error("io", "save");
        }
    }

    /// Record a successfully appended record
    pub fn record_append(&self) {
        counter!(self.records_appended_total).increment(1);
    }

    /// Record a submission rejected by validation
    pub fn record_rejected_submission(&self) {
        counter!(self.submissions_rejected_total).increment(1);
    }

    /// Record a history or trend query and whether it matched anything
    pub fn record_query(&self, view: &'static str, matched: usize) {
        counter!(self.queries_total, "view" => view).increment(1);
        if matched == 0 {
            counter!(self.empty_queries_total, "view" => view).increment(1);
        }
    }

    /// Record error metrics
    pub fn record_error(&self, error_type: &'static str, operation: &'static str) {
        counter!(self.errors_total, "type" => error_type, "operation" => operation).increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names() {
        let metrics = StoreMetrics::default();
        assert_eq!(metrics.loads_total, "bmi_tracker_store_loads_total");
        assert!(metrics.errors_total.starts_with("bmi_tracker_"));
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        let metrics = StoreMetrics::default();
        metrics.record_load(3, Duration::from_millis(2), true);
        metrics.record_save(3, Duration::from_millis(2), false);
        metrics.record_append();
        metrics.record_rejected_submission();
        metrics.record_query("history", 0);
    }
}
