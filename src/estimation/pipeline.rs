//! Batch estimation pipeline
//!
//! Takes a closed batch of pose and detection samples and produces the
//! absolute and relative coordinate series a renderer needs. Records that
//! fail are logged and skipped; the run only fails when no valid pose is
//! left to anchor the frame.

use super::estimator::estimate_obstacle;
use super::frame::{first_origin, to_relative};
use crate::common::is_zero_fix;
use crate::common::types::{EstimatedObstacle, PlanarPoint, UtmZone};
use crate::config::MapperConfig;
use crate::error::EstimationError;
use crate::geodesy::{normalize, Projector, UtmProjector};
use crate::telemetry::TelemetryBatch;
use std::fmt;
use tracing::{debug, info, warn};

/// Which input stream a record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Pose,
    Detection,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Pose => write!(f, "pose"),
            RecordKind::Detection => write!(f, "detection"),
        }
    }
}

/// A record dropped from the run, with its position in its input stream
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    pub kind: RecordKind,
    pub index: usize,
    pub error: EstimationError,
}

/// Output series of one estimation run
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryReport {
    /// Zone every point in the report was projected in
    pub zone: UtmZone,
    /// Origin of the relative series
    pub origin: PlanarPoint,
    pub path: Vec<PlanarPoint>,
    /// Math-convention headings, index-aligned with `path`
    pub path_headings: Vec<f64>,
    pub obstacles: Vec<EstimatedObstacle>,
    pub relative_path: Vec<PlanarPoint>,
    pub relative_obstacles: Vec<EstimatedObstacle>,
    /// Samples dropped as "no fix"
    pub no_fix: usize,
    pub skipped: Vec<SkippedRecord>,
}

/// Turns telemetry batches into obstacle maps
pub struct ObstacleMapper {
    config: MapperConfig,
    projector: Box<dyn Projector>,
}

impl ObstacleMapper {
    /// Create a mapper using the UTM projection
    pub fn new(config: MapperConfig) -> Self {
        Self::with_projector(config, UtmProjector::new())
    }

    /// Create a mapper with a specific projection
    pub fn with_projector<P: Projector + 'static>(config: MapperConfig, projector: P) -> Self {
        ObstacleMapper {
            config,
            projector: Box::new(projector),
        }
    }

    /// Run the estimation over a complete batch
    pub fn run(&self, batch: TelemetryBatch) -> Result<TrajectoryReport, EstimationError> {
        let epsilon = self.config.zero_fix_epsilon;
        let mut zone: Option<UtmZone> = None;
        let mut no_fix = 0;
        let mut skipped = Vec::new();

        let mut path = Vec::with_capacity(batch.poses.len());
        let mut path_headings = Vec::with_capacity(batch.poses.len());

        for (index, pose) in batch.poses.into_iter().enumerate() {
            if is_zero_fix(pose.latitude, pose.longitude, epsilon) {
                debug!(index, "Dropping pose sample without fix");
                no_fix += 1;
                continue;
            }

            match self.project_in_zone(pose.latitude, pose.longitude, &mut zone) {
                Ok(point) => {
                    path.push(point);
                    path_headings.push(normalize(pose.heading));
                }
                Err(error) => skip(&mut skipped, RecordKind::Pose, index, error),
            }
        }

        // The zone is set by the first pose that projected
        let zone = zone.ok_or(EstimationError::EmptyTrajectory)?;
        let mut run_zone = Some(zone);

        let mut obstacles = Vec::with_capacity(batch.detections.len());

        for (index, detection) in batch.detections.into_iter().enumerate() {
            if is_zero_fix(detection.latitude, detection.longitude, epsilon) {
                debug!(index, "Dropping detection sample without fix");
                no_fix += 1;
                continue;
            }

            let estimated = self
                .project_in_zone(detection.latitude, detection.longitude, &mut run_zone)
                .and_then(|vehicle| {
                    estimate_obstacle(vehicle, normalize(detection.heading), detection.range)
                });

            match estimated {
                Ok(obstacle) => obstacles.push(obstacle),
                Err(error) => skip(&mut skipped, RecordKind::Detection, index, error),
            }
        }

        let origin = match self.config.origin {
            Some(origin) => origin,
            None => first_origin(&path)?,
        };

        let relative_path = to_relative(&path, origin)?;
        let relative_obstacles = if obstacles.is_empty() {
            Vec::new()
        } else {
            to_relative(&obstacles, origin)?
        };

        info!(
            zone = %zone,
            path = path.len(),
            obstacles = obstacles.len(),
            no_fix,
            skipped = skipped.len(),
            "Estimation run complete"
        );

        Ok(TrajectoryReport {
            zone,
            origin,
            path,
            path_headings,
            obstacles,
            relative_path,
            relative_obstacles,
            no_fix,
            skipped,
        })
    }

    /// Project a fix and check it against the run zone, fixing the zone on
    /// first use
    fn project_in_zone(
        &self,
        latitude: f64,
        longitude: f64,
        zone: &mut Option<UtmZone>,
    ) -> Result<PlanarPoint, EstimationError> {
        let projected = self.projector.project(latitude, longitude)?;

        match zone {
            None => {
                *zone = Some(projected.zone);
                Ok(projected.point)
            }
            Some(expected) if expected.is_compatible(&projected.zone) => Ok(projected.point),
            Some(expected) => Err(EstimationError::ZoneMismatch {
                expected: *expected,
                found: projected.zone,
            }),
        }
    }
}

fn skip(skipped: &mut Vec<SkippedRecord>, kind: RecordKind, index: usize, error: EstimationError) {
    warn!(%kind, index, %error, "Skipping record");
    skipped.push(SkippedRecord { kind, index, error });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::{DetectionSample, PoseSample};

    fn pose(latitude: f64, longitude: f64, heading: f64) -> PoseSample {
        PoseSample {
            latitude,
            longitude,
            heading,
        }
    }

    fn detection(latitude: f64, longitude: f64, heading: f64, range: f64) -> DetectionSample {
        DetectionSample {
            latitude,
            longitude,
            heading,
            range,
        }
    }

    #[test]
    fn test_headings_normalized_and_aligned() {
        let batch = TelemetryBatch {
            poses: vec![pose(1.0, 1.0, 0.0), pose(0.0, 0.0, 10.0), pose(1.0001, 1.0, 270.0)],
            detections: Vec::new(),
        };
        let report = ObstacleMapper::new(MapperConfig::new()).run(batch).unwrap();

        assert_eq!(report.path.len(), 2);
        assert_eq!(report.path_headings, vec![90.0, -180.0]);
        assert_eq!(report.no_fix, 1);
        assert!(report.relative_obstacles.is_empty());
    }

    #[test]
    fn test_zone_mismatch_skips_record() {
        let batch = TelemetryBatch {
            poses: vec![pose(1.0, 1.0, 0.0), pose(1.0, 7.0, 0.0), pose(-1.0, 1.0, 0.0)],
            detections: vec![detection(1.0, 13.0, 0.0, 10.0), detection(1.0, 1.0, 0.0, 10.0)],
        };
        let report = ObstacleMapper::new(MapperConfig::new()).run(batch).unwrap();

        assert_eq!(report.zone.number, 31);
        assert_eq!(report.path.len(), 1);
        assert_eq!(report.obstacles.len(), 1);

        let kinds: Vec<_> = report.skipped.iter().map(|s| (s.kind, s.index)).collect();
        assert_eq!(
            kinds,
            vec![
                (RecordKind::Pose, 1),
                (RecordKind::Pose, 2),
                (RecordKind::Detection, 0)
            ]
        );
        assert!(report
            .skipped
            .iter()
            .all(|s| matches!(s.error, EstimationError::ZoneMismatch { .. })));
    }

    #[test]
    fn test_invalid_records_do_not_abort_run() {
        let batch = TelemetryBatch {
            poses: vec![pose(89.0, 1.0, 0.0), pose(1.0, 1.0, 0.0)],
            detections: vec![detection(1.0, 1.0, 0.0, -5.0), detection(1.0, 1.0, 0.0, 5.0)],
        };
        let report = ObstacleMapper::new(MapperConfig::new()).run(batch).unwrap();

        assert_eq!(report.path.len(), 1);
        assert_eq!(report.obstacles.len(), 1);
        assert!(matches!(
            report.skipped[0].error,
            EstimationError::InvalidCoordinate { .. }
        ));
        assert_eq!(report.skipped[1].error, EstimationError::InvalidRange(-5.0));
    }

    #[test]
    fn test_no_valid_pose_is_empty_trajectory() {
        let batch = TelemetryBatch {
            poses: vec![pose(0.0, 0.0, 0.0)],
            detections: vec![detection(1.0, 1.0, 0.0, 5.0)],
        };
        let result = ObstacleMapper::new(MapperConfig::new()).run(batch);
        assert_eq!(result, Err(EstimationError::EmptyTrajectory));
    }

    #[test]
    fn test_configured_origin_overrides_first_pose() {
        let mut config = MapperConfig::new();
        config.origin = Some(PlanarPoint::new(277_000.0, 110_000.0));

        let batch = TelemetryBatch {
            poses: vec![pose(1.0, 1.0, 0.0)],
            detections: Vec::new(),
        };
        let report = ObstacleMapper::new(config).run(batch).unwrap();

        let expected = report.path[0].relative_to(PlanarPoint::new(277_000.0, 110_000.0));
        assert_eq!(report.origin, PlanarPoint::new(277_000.0, 110_000.0));
        assert_eq!(report.relative_path[0], expected);
    }
}
