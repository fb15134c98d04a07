//! BMI Tracker - Personal Body Mass Index History
//!
//! A Rust library for recording BMI measurements in a flat CSV file and
//! querying them back per person.
//!
//! # Features
//!
//! - Append-only record store backed by a single CSV file
//! - Exact, case-sensitive history lookup by name
//! - Insertion-ordered trend points for plotting
//! - Export of history and trend results (TXT, CSV, JSON)

/// Configuration management
pub mod config;
/// Error types
pub mod error;
/// Logging setup and utilities
pub mod logging;
/// Metrics collection
pub mod metrics;
/// Data models and structures
pub mod models;
/// Rendering and export of query results
pub mod report;
/// Interaction cycles over the record store
pub mod service;
/// CSV-backed record store and queries
pub mod store;
/// Input validation
pub mod validation;

// Re-export key components for easier access
pub use error::{BmiError, Result};
pub use models::{Record, Table, TrendPoint};
pub use service::TrackerService;
pub use store::{append_record, compute_bmi, filter_by_name, trend, RecordStore};
