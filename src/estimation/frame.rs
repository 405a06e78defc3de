//! Relative coordinate frame
//!
//! Shifts absolute planar series onto a shared origin, usually the first
//! valid vehicle fix, so path and obstacles are plotted from the start point.

use crate::common::types::{EstimatedObstacle, PlanarPoint};
use crate::error::EstimationError;

/// Types that can be expressed relative to an origin
pub trait Relocate {
    /// Return a copy shifted by `-origin`
    fn shifted(&self, origin: PlanarPoint) -> Self;
}

impl Relocate for PlanarPoint {
    fn shifted(&self, origin: PlanarPoint) -> Self {
        self.relative_to(origin)
    }
}

impl Relocate for EstimatedObstacle {
    fn shifted(&self, origin: PlanarPoint) -> Self {
        EstimatedObstacle {
            position: self.position.relative_to(origin),
            vehicle: self.vehicle.relative_to(origin),
            ..*self
        }
    }
}

/// The conventional origin: the first point of the path series
pub fn first_origin(path: &[PlanarPoint]) -> Result<PlanarPoint, EstimationError> {
    path.first().copied().ok_or(EstimationError::EmptyTrajectory)
}

/// Subtract `origin` from every element of `series`
pub fn to_relative<T: Relocate>(
    series: &[T],
    origin: PlanarPoint,
) -> Result<Vec<T>, EstimationError> {
    if series.is_empty() {
        return Err(EstimationError::EmptyTrajectory);
    }

    Ok(series.iter().map(|item| item.shifted(origin)).collect())
}
