//! Geodetic to planar projection
//!
//! Projects WGS84 latitude/longitude onto UTM easting/northing using the
//! Krüger series truncated at the sixth order in the longitude offset.
//! Accuracy is millimetric inside a zone, which is far below the noise of
//! the GPS fixes this is fed with.

use crate::common::types::{PlanarPoint, UtmZone};
use crate::error::EstimationError;
use std::f64::consts::PI;

/// Scale factor on the central meridian
const K0: f64 = 0.9996;
/// WGS84 semi-major axis (m)
const EQUATORIAL_RADIUS: f64 = 6_378_137.0;
/// WGS84 first eccentricity squared
const E: f64 = 0.006_694_38;
const E2: f64 = E * E;
const E3: f64 = E2 * E;
/// Second eccentricity squared
const E_P2: f64 = E / (1.0 - E);

// Meridian arc coefficients
const M1: f64 = 1.0 - E / 4.0 - 3.0 * E2 / 64.0 - 5.0 * E3 / 256.0;
const M2: f64 = 3.0 * E / 8.0 + 3.0 * E2 / 32.0 + 45.0 * E3 / 1024.0;
const M3: f64 = 15.0 * E2 / 256.0 + 45.0 * E3 / 1024.0;
const M4: f64 = 35.0 * E3 / 3072.0;

const FALSE_EASTING: f64 = 500_000.0;
const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

pub const MIN_LATITUDE: f64 = -80.0;
pub const MAX_LATITUDE: f64 = 84.0;

const ZONE_LETTERS: &[u8] = b"CDEFGHJKLMNPQRSTUVWXX";

/// A planar point together with the zone it was projected in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint {
    pub point: PlanarPoint,
    pub zone: UtmZone,
}

/// Trait for geodetic projections
pub trait Projector: Send + Sync {
    /// Project a latitude/longitude pair (degrees) onto the plane
    fn project(&self, latitude: f64, longitude: f64) -> Result<ProjectedPoint, EstimationError>;
}

/// Universal Transverse Mercator projection on the WGS84 ellipsoid
#[derive(Debug, Clone, Copy, Default)]
pub struct UtmProjector;

impl UtmProjector {
    pub fn new() -> Self {
        UtmProjector
    }

    /// Zone number for a position, including the Norway and Svalbard
    /// exceptions
    pub fn zone_number(latitude: f64, longitude: f64) -> u8 {
        if (56.0..64.0).contains(&latitude) && (3.0..12.0).contains(&longitude) {
            return 32;
        }

        if (72.0..=84.0).contains(&latitude) && longitude >= 0.0 {
            if longitude < 9.0 {
                return 31;
            } else if longitude < 21.0 {
                return 33;
            } else if longitude < 33.0 {
                return 35;
            } else if longitude < 42.0 {
                return 37;
            }
        }

        if longitude == 180.0 {
            return 60;
        }

        (((longitude + 180.0) / 6.0).floor() as i32).rem_euclid(60) as u8 + 1
    }

    /// Latitude band letter, C through X
    pub fn zone_letter(latitude: f64) -> char {
        let index = ((latitude + 80.0) as usize) >> 3;
        ZONE_LETTERS[index.min(ZONE_LETTERS.len() - 1)] as char
    }

    /// Longitude of the zone's central meridian in degrees
    pub fn central_longitude(zone_number: u8) -> f64 {
        (zone_number as f64 - 1.0) * 6.0 - 180.0 + 3.0
    }
}

/// Wrap an angle into [-pi, pi)
fn wrap_angle(value: f64) -> f64 {
    (value + PI).rem_euclid(2.0 * PI) - PI
}

impl Projector for UtmProjector {
    fn project(&self, latitude: f64, longitude: f64) -> Result<ProjectedPoint, EstimationError> {
        if !(MIN_LATITUDE..=MAX_LATITUDE).contains(&latitude)
            || !(-180.0..=180.0).contains(&longitude)
        {
            return Err(EstimationError::InvalidCoordinate {
                latitude,
                longitude,
            });
        }

        let zone = UtmZone {
            number: Self::zone_number(latitude, longitude),
            letter: Self::zone_letter(latitude),
        };

        let lat_rad = latitude.to_radians();
        let lat_sin = lat_rad.sin();
        let lat_cos = lat_rad.cos();
        let lat_tan = lat_sin / lat_cos;
        let lat_tan2 = lat_tan * lat_tan;
        let lat_tan4 = lat_tan2 * lat_tan2;

        let central_lon_rad = Self::central_longitude(zone.number).to_radians();

        let n = EQUATORIAL_RADIUS / (1.0 - E * lat_sin * lat_sin).sqrt();
        let c = E_P2 * lat_cos * lat_cos;

        let a = lat_cos * wrap_angle(longitude.to_radians() - central_lon_rad);
        let a2 = a * a;
        let a3 = a2 * a;
        let a4 = a3 * a;
        let a5 = a4 * a;
        let a6 = a5 * a;

        let m = EQUATORIAL_RADIUS
            * (M1 * lat_rad - M2 * (2.0 * lat_rad).sin() + M3 * (4.0 * lat_rad).sin()
                - M4 * (6.0 * lat_rad).sin());

        let easting = K0
            * n
            * (a + a3 / 6.0 * (1.0 - lat_tan2 + c)
                + a5 / 120.0 * (5.0 - 18.0 * lat_tan2 + lat_tan4 + 72.0 * c - 58.0 * E_P2))
            + FALSE_EASTING;

        let mut northing = K0
            * (m + n
                * lat_tan
                * (a2 / 2.0
                    + a4 / 24.0 * (5.0 - lat_tan2 + 9.0 * c + 4.0 * c * c)
                    + a6 / 720.0
                        * (61.0 - 58.0 * lat_tan2 + lat_tan4 + 600.0 * c - 330.0 * E_P2)));

        if latitude < 0.0 {
            northing += FALSE_NORTHING_SOUTH;
        }

        Ok(ProjectedPoint {
            point: PlanarPoint::new(easting, northing),
            zone,
        })
    }
}
