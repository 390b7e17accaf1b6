//! Linear transfer functions from raw counts to physical units.

/// Full-scale divisor of a 20-bit count.
const FULL_SCALE: f32 = (1u32 << 20) as f32;

/// Converts a raw humidity count to relative humidity in percent.
pub fn humidity_rh(raw: u32) -> f32 {
    raw as f32 * 100.0 / FULL_SCALE
}

/// Converts a raw temperature count to degrees Celsius.
pub fn temperature_c(raw: u32) -> f32 {
    raw as f32 * 200.0 / FULL_SCALE - 50.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_humidity_bounds() {
        assert_eq!(humidity_rh(0), 0.0);
        assert_eq!(humidity_rh(0x10_0000), 100.0);
        assert_eq!(humidity_rh(0x08_0000), 50.0);
    }

    #[test]
    fn test_temperature_bounds() {
        assert_eq!(temperature_c(0), -50.0);
        assert_eq!(temperature_c(0x10_0000), 150.0);
        assert_eq!(temperature_c(0x04_0000), 0.0);
    }

    #[test]
    fn test_captured_counts() {
        assert!((humidity_rh(416_578) - 39.728).abs() < 0.001);
        assert!((temperature_c(380_198) - 22.517).abs() < 0.001);
    }
}
