//! Dead-reckoning obstacle position estimator

use crate::common::types::{EstimatedObstacle, PlanarPoint};
use crate::error::EstimationError;
use nalgebra::Vector2;

const CM_PER_METER: f64 = 100.0;

/// Project a polar reading from the vehicle position into the planar frame.
///
/// `heading` is in the math convention (degrees, counter-clockwise from
/// east) and `range_cm` is the sensor range in centimeters. A zero range
/// puts the obstacle on the vehicle.
pub fn estimate(
    vehicle: PlanarPoint,
    heading: f64,
    range_cm: f64,
) -> Result<PlanarPoint, EstimationError> {
    if range_cm.is_nan() || range_cm < 0.0 {
        return Err(EstimationError::InvalidRange(range_cm));
    }

    let range_m = range_cm / CM_PER_METER;
    let heading_rad = heading.to_radians();
    let displacement = Vector2::new(range_m * heading_rad.cos(), range_m * heading_rad.sin());

    Ok(PlanarPoint::from(vehicle.to_vector() + displacement))
}

/// Estimate an obstacle and keep the reading it came from
pub fn estimate_obstacle(
    vehicle: PlanarPoint,
    heading: f64,
    range_cm: f64,
) -> Result<EstimatedObstacle, EstimationError> {
    let position = estimate(vehicle, heading, range_cm)?;
    Ok(EstimatedObstacle {
        position,
        vehicle,
        heading,
        range: range_cm,
    })
}
