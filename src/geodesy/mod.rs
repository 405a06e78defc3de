//! Geodesy module: projection of GPS fixes and heading conventions
pub mod heading;
pub mod projector;

pub use self::heading::normalize;
pub use self::projector::{ProjectedPoint, Projector, UtmProjector};
