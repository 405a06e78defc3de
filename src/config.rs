//! Mapper configuration

use crate::common::types::PlanarPoint;
use crate::common::ZERO_FIX_EPSILON;
use std::collections::HashMap;

/// Parameters of an estimation run
#[derive(Debug, Clone, PartialEq)]
pub struct MapperConfig {
    /// Fixes with both |lat| and |lon| below this are treated as "no fix"
    pub zero_fix_epsilon: f64,
    /// Origin of the relative frame; the first valid pose when unset
    pub origin: Option<PlanarPoint>,
}

impl Default for MapperConfig {
    fn default() -> Self {
        MapperConfig {
            zero_fix_epsilon: ZERO_FIX_EPSILON,
            origin: None,
        }
    }
}

impl MapperConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure from named parameters
    pub fn configure(&mut self, params: &HashMap<String, f64>) -> Result<(), String> {
        if let Some(&epsilon) = params.get("zero_fix_epsilon") {
            if !epsilon.is_finite() || epsilon <= 0.0 {
                return Err("Zero-fix epsilon must be positive and finite".to_string());
            }
            self.zero_fix_epsilon = epsilon;
        }

        match (params.get("origin_easting"), params.get("origin_northing")) {
            (Some(&easting), Some(&northing)) => {
                if !easting.is_finite() || !northing.is_finite() {
                    return Err("Origin must be finite".to_string());
                }
                self.origin = Some(PlanarPoint::new(easting, northing));
            }
            (None, None) => {}
            _ => {
                return Err(
                    "origin_easting and origin_northing must be given together".to_string(),
                )
            }
        }

        Ok(())
    }
}
