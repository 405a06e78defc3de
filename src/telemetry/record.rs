//! Telemetry line format
//!
//! Lines look like `PATH,<lat>,<lon>,<heading>` and
//! `OBS,<lat>,<lon>,<heading>,<range>`. The radio receiver may append one
//! extra field (signal strength), which is ignored.

use crate::common::types::{DetectionSample, PoseSample};
use crate::error::RecordError;

const PATH_TAG: &str = "PATH";
const OBS_TAG: &str = "OBS";

/// One parsed telemetry line
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TelemetryRecord {
    Path(PoseSample),
    Obstacle(DetectionSample),
}

impl TelemetryRecord {
    /// Parse a raw telemetry line
    pub fn parse(line: &str) -> Result<Self, RecordError> {
        let parts: Vec<&str> = line.trim().split(',').map(str::trim).collect();

        match parts[0] {
            PATH_TAG => {
                check_field_count(PATH_TAG, parts.len(), 4)?;
                Ok(TelemetryRecord::Path(PoseSample {
                    latitude: parse_field("latitude", parts[1])?,
                    longitude: parse_field("longitude", parts[2])?,
                    heading: parse_field("heading", parts[3])?,
                }))
            }
            OBS_TAG => {
                check_field_count(OBS_TAG, parts.len(), 5)?;
                Ok(TelemetryRecord::Obstacle(DetectionSample {
                    latitude: parse_field("latitude", parts[1])?,
                    longitude: parse_field("longitude", parts[2])?,
                    heading: parse_field("heading", parts[3])?,
                    range: parse_field("range", parts[4])?,
                }))
            }
            other => Err(RecordError::UnknownTag(other.to_string())),
        }
    }
}

fn check_field_count(tag: &'static str, found: usize, expected: usize) -> Result<(), RecordError> {
    if found == expected || found == expected + 1 {
        Ok(())
    } else {
        Err(RecordError::FieldCount { tag, found })
    }
}

fn parse_field(field: &'static str, value: &str) -> Result<f64, RecordError> {
    match value.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(number),
        _ => Err(RecordError::InvalidNumber {
            field,
            value: value.to_string(),
        }),
    }
}
