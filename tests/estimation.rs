use obstacle_mapper::common::types::{DetectionSample, PlanarPoint, PoseSample};
use obstacle_mapper::config::MapperConfig;
use obstacle_mapper::error::EstimationError;
use obstacle_mapper::estimation::{to_relative, ObstacleMapper};
use obstacle_mapper::geodesy::{normalize, ProjectedPoint, Projector, UtmProjector};
use obstacle_mapper::telemetry::TelemetryBatch;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const TOLERANCE: f64 = 1e-6;

/// Counts projections and records every input it sees
struct CountingProjector {
    calls: Arc<AtomicUsize>,
    inner: UtmProjector,
}

impl Projector for CountingProjector {
    fn project(&self, latitude: f64, longitude: f64) -> Result<ProjectedPoint, EstimationError> {
        assert!(
            latitude.abs() >= 1e-6 || longitude.abs() >= 1e-6,
            "zero-fix sample reached the projector"
        );
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.project(latitude, longitude)
    }
}

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
fn end_to_end_single_detection() {
    let batch = TelemetryBatch {
        poses: vec![pose(0.0, 0.0, 0.0), pose(1.0, 1.0, 0.0)],
        detections: vec![detection(1.0, 1.0, 90.0, 200.0)],
    };
    let report = ObstacleMapper::new(MapperConfig::new()).run(batch).unwrap();

    let vehicle = UtmProjector::new().project(1.0, 1.0).unwrap().point;
    assert_eq!(report.path, vec![vehicle]);
    assert_eq!(report.origin, vehicle);

    let obstacle = report.obstacles[0];
    assert_eq!(obstacle.heading, normalize(90.0));
    assert_eq!(obstacle.heading, 0.0);
    assert!((obstacle.position.easting - (vehicle.easting + 2.0)).abs() < TOLERANCE);
    assert!((obstacle.position.northing - vehicle.northing).abs() < TOLERANCE);

    let relative = report.relative_obstacles[0];
    assert!((relative.position.easting - 2.0).abs() < TOLERANCE);
    assert!(relative.position.northing.abs() < TOLERANCE);
    assert_eq!(report.relative_path[0], PlanarPoint::new(0.0, 0.0));
}

#[test]
fn zero_fix_samples_never_projected() {
    let calls = Arc::new(AtomicUsize::new(0));
    let projector = CountingProjector {
        calls: Arc::clone(&calls),
        inner: UtmProjector::new(),
    };

    let batch = TelemetryBatch {
        poses: vec![
            pose(0.0, 0.0, 0.0),
            pose(1.0, 1.0, 0.0),
            pose(5e-7, -5e-7, 0.0),
            pose(1.00001, 1.0, 0.0),
        ],
        detections: vec![detection(0.0, 0.0, 0.0, 10.0), detection(1.0, 1.0, 0.0, 10.0)],
    };
    let report = ObstacleMapper::with_projector(MapperConfig::new(), projector)
        .run(batch)
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(report.path.len(), 2);
    assert_eq!(report.obstacles.len(), 1);
    assert_eq!(report.no_fix, 3);
    assert!(report.skipped.is_empty());
}

#[test]
fn invalid_detection_keeps_order_of_the_rest() {
    let detections = vec![
        detection(1.0, 1.0, 0.0, 10.0),
        detection(1.0, 1.0, 0.0, 20.0),
        detection(0.0, 0.0, 0.0, 30.0),
        detection(1.0, 1.0, 0.0, 40.0),
        detection(1.0, 1.0, 0.0, 50.0),
    ];
    let batch = TelemetryBatch {
        poses: vec![pose(1.0, 1.0, 0.0)],
        detections,
    };
    let report = ObstacleMapper::new(MapperConfig::new()).run(batch).unwrap();

    let ranges: Vec<f64> = report.obstacles.iter().map(|o| o.range).collect();
    assert_eq!(ranges, vec![10.0, 20.0, 40.0, 50.0]);

    let relative: Vec<f64> = report.relative_obstacles.iter().map(|o| o.range).collect();
    assert_eq!(relative, ranges);
}

#[test]
fn relative_transform_shifts_again_when_reapplied() {
    let batch = TelemetryBatch {
        poses: vec![pose(1.0, 1.0, 0.0), pose(1.0001, 1.0001, 45.0)],
        detections: Vec::new(),
    };
    let report = ObstacleMapper::new(MapperConfig::new()).run(batch).unwrap();
    let origin = report.origin;

    let twice = to_relative(&report.relative_path, origin).unwrap();
    for (shifted, once) in twice.iter().zip(&report.relative_path) {
        assert_eq!(shifted.easting, once.easting - origin.easting);
        assert_eq!(shifted.northing, once.northing - origin.northing);
    }
}

#[test]
fn empty_trajectory_when_every_pose_lacks_a_fix() {
    let batch = TelemetryBatch {
        poses: vec![pose(0.0, 0.0, 0.0), pose(1e-7, 0.0, 0.0)],
        detections: vec![detection(1.0, 1.0, 0.0, 10.0)],
    };
    assert_eq!(
        ObstacleMapper::new(MapperConfig::new()).run(batch),
        Err(EstimationError::EmptyTrajectory)
    );
}
