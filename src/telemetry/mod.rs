//! Telemetry ingestion and persistence
pub mod record;
pub mod recorder;
pub mod source;
pub mod store;

use crate::common::types::{DetectionSample, PoseSample};

pub use self::record::TelemetryRecord;
pub use self::recorder::BackupRecorder;
pub use self::source::{replay_backup, TelemetryReader};

/// A closed batch of samples in stream order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TelemetryBatch {
    pub poses: Vec<PoseSample>,
    pub detections: Vec<DetectionSample>,
}

impl TelemetryBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to the stream it belongs to
    pub fn push(&mut self, record: TelemetryRecord) {
        match record {
            TelemetryRecord::Path(pose) => self.poses.push(pose),
            TelemetryRecord::Obstacle(detection) => self.detections.push(detection),
        }
    }

    pub fn len(&self) -> usize {
        self.poses.len() + self.detections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty() && self.detections.is_empty()
    }
}
