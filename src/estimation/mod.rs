//! Estimation module: obstacle positions and relative frames
pub mod estimator;
pub mod frame;
pub mod pipeline;

pub use self::estimator::{estimate, estimate_obstacle};
pub use self::frame::{first_origin, to_relative, Relocate};
pub use self::pipeline::{ObstacleMapper, RecordKind, SkippedRecord, TrajectoryReport};
