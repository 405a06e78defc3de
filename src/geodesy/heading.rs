//! Heading convention conversion

/// Convert a compass heading (degrees clockwise from north) into the math
/// convention (degrees counter-clockwise from east).
///
/// The result is not wrapped. Trigonometry downstream is periodic and the
/// raw value is kept as-is for the exports.
pub fn normalize(compass_heading: f64) -> f64 {
    90.0 - compass_heading
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_is_exact() {
        for h in [0.0, 45.0, 90.0, 180.0, 270.0, 359.9, -30.0, 725.0, 1e-12] {
            assert_eq!(normalize(h), 90.0 - h);
        }
    }

    #[test]
    fn test_no_wrapping() {
        assert_eq!(normalize(270.0), -180.0);
        assert_eq!(normalize(450.0), -360.0);
        assert_eq!(normalize(-90.0), 180.0);
    }
}
