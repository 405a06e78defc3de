//! Common utilities and types for obstacle mapping

/// Default tolerance for the (0, 0) "no fix" sentinel
pub const ZERO_FIX_EPSILON: f64 = 1e-6;

/// Check whether a latitude/longitude pair is the "no fix" sentinel
pub fn is_zero_fix(latitude: f64, longitude: f64, epsilon: f64) -> bool {
    latitude.abs() < epsilon && longitude.abs() < epsilon
}

/// Common types used across the codebase
pub mod types {
    use nalgebra::Vector2;
    use std::fmt;

    /// A point in the local planar frame, in meters
    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct PlanarPoint {
        pub easting: f64,
        pub northing: f64,
    }

    impl PlanarPoint {
        pub fn new(easting: f64, northing: f64) -> Self {
            PlanarPoint { easting, northing }
        }

        pub fn to_vector(self) -> Vector2<f64> {
            Vector2::new(self.easting, self.northing)
        }

        /// Per-axis difference `self - origin`
        pub fn relative_to(self, origin: PlanarPoint) -> PlanarPoint {
            PlanarPoint::from(self.to_vector() - origin.to_vector())
        }
    }

    impl From<Vector2<f64>> for PlanarPoint {
        fn from(v: Vector2<f64>) -> Self {
            PlanarPoint::new(v.x, v.y)
        }
    }

    /// A UTM zone: longitudinal number plus latitude band letter
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct UtmZone {
        pub number: u8,
        pub letter: char,
    }

    impl UtmZone {
        /// Bands N..X lie in the northern hemisphere
        pub fn is_northern(&self) -> bool {
            self.letter >= 'N'
        }

        /// Two zones share one planar frame when they have the same number
        /// and hemisphere. Band letters within a hemisphere do not change
        /// the projection.
        pub fn is_compatible(&self, other: &UtmZone) -> bool {
            self.number == other.number && self.is_northern() == other.is_northern()
        }
    }

    impl fmt::Display for UtmZone {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}{}", self.number, self.letter)
        }
    }

    /// One vehicle pose observation
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct PoseSample {
        pub latitude: f64,
        pub longitude: f64,
        /// Compass heading, degrees clockwise from north
        pub heading: f64,
    }

    /// One obstacle detection, carrying the vehicle fix at detection time
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct DetectionSample {
        pub latitude: f64,
        pub longitude: f64,
        /// Compass bearing to the obstacle
        pub heading: f64,
        /// Range to the obstacle in centimeters
        pub range: f64,
    }

    /// Estimated obstacle position derived from one detection
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct EstimatedObstacle {
        pub position: PlanarPoint,
        /// Vehicle position the reading was taken from
        pub vehicle: PlanarPoint,
        /// Math-convention heading in degrees
        pub heading: f64,
        /// Range in centimeters
        pub range: f64,
    }
}
