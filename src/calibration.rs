//! Fixed additive corrections applied after conversion.

use crate::sample::{Sample, clamp_humidity};

/// Additive correction for systematic sensor bias.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Offset {
    /// Added to the temperature, in degrees Celsius.
    pub temperature_c: f32,
    /// Added to the relative humidity, in percent.
    pub humidity_rh: f32,
}

impl Offset {
    /// No correction.
    pub const ZERO: Offset = Offset {
        temperature_c: 0.0,
        humidity_rh: 0.0,
    };

    /// Creates an offset from a temperature and a humidity correction.
    pub const fn new(temperature_c: f32, humidity_rh: f32) -> Self {
        Offset {
            temperature_c,
            humidity_rh,
        }
    }

    /// Returns `sample` with this offset applied.
    ///
    /// Temperature is shifted unclamped; humidity is clamped to `0..=100`.
    /// Applying the same offset twice counts it twice.
    pub fn apply(&self, sample: Sample) -> Sample {
        Sample {
            temperature_c: sample.temperature_c + self.temperature_c,
            humidity_rh: clamp_humidity(sample.humidity_rh + self.humidity_rh),
            ..sample
        }
    }
}

/// Applies a temperature and humidity offset to one sample.
pub fn apply_offset(sample: Sample, temperature_offset_c: f32, humidity_offset_rh: f32) -> Sample {
    Offset::new(temperature_offset_c, humidity_offset_rh).apply(sample)
}
