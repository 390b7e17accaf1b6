use crate::conversion;
use crate::frame::RawMeasurement;

/// One decoded measurement.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    /// Monotonic capture time in microseconds.
    pub timestamp_us: u64,
    /// Raw 20-bit humidity count.
    pub humidity_raw: u32,
    /// Raw 20-bit temperature count.
    pub temperature_raw: u32,
    /// Relative humidity in percent, within `0.0..=100.0`.
    pub humidity_rh: f32,
    /// Temperature in degrees Celsius.
    pub temperature_c: f32,
}

impl Sample {
    /// Builds a sample from raw counts captured at `timestamp_us`.
    pub fn from_raw(raw: RawMeasurement, timestamp_us: u64) -> Self {
        Sample {
            timestamp_us,
            humidity_raw: raw.humidity,
            temperature_raw: raw.temperature,
            humidity_rh: conversion::humidity_rh(raw.humidity),
            temperature_c: conversion::temperature_c(raw.temperature),
        }
    }
}

/// Clamps relative humidity to its physical range.
pub(crate) fn clamp_humidity(value: f32) -> f32 {
    value.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw() {
        let raw = RawMeasurement {
            humidity: 0x08_0000,
            temperature: 0x04_0000,
        };

        let sample = Sample::from_raw(raw, 1_234);

        assert_eq!(
            sample,
            Sample {
                timestamp_us: 1_234,
                humidity_raw: 0x08_0000,
                temperature_raw: 0x04_0000,
                humidity_rh: 50.0,
                temperature_c: 0.0,
            }
        );
    }

    #[test]
    fn test_clamp_humidity() {
        assert_eq!(clamp_humidity(-0.5), 0.0);
        assert_eq!(clamp_humidity(100.5), 100.0);
        assert_eq!(clamp_humidity(42.0), 42.0);
    }
}
