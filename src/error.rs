//! Error types for obstacle mapping

use crate::common::types::UtmZone;
use thiserror::Error;

/// Failures raised by the projection and estimation core.
///
/// All of these are local to a single call. A batch caller skips the
/// offending record and keeps going; only `EmptyTrajectory` stops a run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimationError {
    /// Latitude/longitude outside the projectable range
    #[error("Invalid coordinate: lat={latitude}, lon={longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    /// Negative (or NaN) range handed to the estimator
    #[error("Invalid range: {0} cm")]
    InvalidRange(f64),

    /// No valid pose to anchor the relative frame
    #[error("Empty trajectory: no valid pose sample to establish an origin")]
    EmptyTrajectory,

    /// Points projected under different zones were combined
    #[error("Zone mismatch: expected zone {expected}, found {found}")]
    ZoneMismatch { expected: UtmZone, found: UtmZone },
}

/// Failures while parsing a single telemetry line.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("Unknown record tag: {0:?}")]
    UnknownTag(String),

    #[error("{tag} record has {found} fields")]
    FieldCount { tag: &'static str, found: usize },

    #[error("Invalid number in field {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}

/// Failures reading or writing CSV stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
