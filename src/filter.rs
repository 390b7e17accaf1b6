//! Exponential moving average over successive samples.

use crate::error::Dht20Error;
use crate::sample::{Sample, clamp_humidity};

/// Smoothed values carried between samples.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FilterState {
    /// No sample seen since construction or the last reset.
    Uninitialized,
    /// Running estimate.
    Seeded {
        /// Smoothed relative humidity in percent, unclamped.
        humidity_rh: f32,
        /// Smoothed temperature in degrees Celsius.
        temperature_c: f32,
    },
}

/// EMA filter for one signal path.
///
/// The first sample after [`EmaFilter::new`] or [`EmaFilter::reset`] seeds the
/// estimate; every later sample is blended as
/// `smoothed = alpha * input + (1 - alpha) * smoothed`.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EmaFilter {
    alpha: f32,
    state: FilterState,
}

impl EmaFilter {
    /// Creates a filter with smoothing coefficient `alpha`.
    ///
    /// # Errors
    ///
    /// Returns `Dht20Error::InvalidArgument` unless `alpha` is finite and in `(0, 1]`.
    pub fn new(alpha: f32) -> Result<Self, Dht20Error> {
        if !alpha.is_finite() || alpha <= 0.0 || alpha > 1.0 {
            return Err(Dht20Error::InvalidArgument);
        }

        Ok(EmaFilter {
            alpha,
            state: FilterState::Uninitialized,
        })
    }

    /// Smoothing coefficient.
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Current tagged filter state.
    pub fn state(&self) -> FilterState {
        self.state
    }

    /// Whether the next sample will be blended rather than used as a seed.
    pub fn is_seeded(&self) -> bool {
        matches!(self.state, FilterState::Seeded { .. })
    }

    /// Forgets the running estimate. `alpha` is kept.
    pub fn reset(&mut self) {
        self.state = FilterState::Uninitialized;
    }

    /// Feeds one sample and returns the filtered sample.
    ///
    /// Timestamp and raw counts are passed through from `input`. The returned
    /// humidity is clamped to `0..=100`; the internal estimate is not.
    pub fn apply(&mut self, input: &Sample) -> Sample {
        let (humidity_rh, temperature_c) = match self.state {
            FilterState::Uninitialized => (input.humidity_rh, input.temperature_c),
            FilterState::Seeded {
                humidity_rh,
                temperature_c,
            } => {
                let keep = 1.0 - self.alpha;
                (
                    self.alpha * input.humidity_rh + keep * humidity_rh,
                    self.alpha * input.temperature_c + keep * temperature_c,
                )
            }
        };

        self.state = FilterState::Seeded {
            humidity_rh,
            temperature_c,
        };

        Sample {
            humidity_rh: clamp_humidity(humidity_rh),
            temperature_c,
            ..*input
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(humidity_rh: f32, temperature_c: f32) -> Sample {
        Sample {
            timestamp_us: 0,
            humidity_raw: 0,
            temperature_raw: 0,
            humidity_rh,
            temperature_c,
        }
    }

    #[test]
    fn test_new_rejects_bad_alpha() {
        for alpha in [0.0, -0.1, 1.01, f32::NAN, f32::INFINITY] {
            assert_eq!(EmaFilter::new(alpha), Err(Dht20Error::InvalidArgument));
        }
        assert!(EmaFilter::new(1.0).is_ok());
        assert!(EmaFilter::new(f32::MIN_POSITIVE).is_ok());
    }

    #[test]
    fn test_first_apply_seeds() {
        let mut filter = EmaFilter::new(0.25).unwrap();
        assert!(!filter.is_seeded());

        let input = sample(48.0, 21.0);
        assert_eq!(filter.apply(&input), input);
        assert_eq!(
            filter.state(),
            FilterState::Seeded {
                humidity_rh: 48.0,
                temperature_c: 21.0,
            }
        );
    }

    #[test]
    fn test_blend() {
        let mut filter = EmaFilter::new(0.5).unwrap();
        filter.apply(&sample(40.0, 20.0));

        let out = filter.apply(&sample(60.0, 30.0));

        assert_eq!(out.humidity_rh, 50.0);
        assert_eq!(out.temperature_c, 25.0);
    }

    #[test]
    fn test_alpha_one_passes_through() {
        let mut filter = EmaFilter::new(1.0).unwrap();
        for (h, t) in [(10.0, -5.0), (90.0, 40.0), (33.3, 12.5)] {
            let input = sample(h, t);
            assert_eq!(filter.apply(&input), input);
        }
    }

    #[test]
    fn test_constant_input_converges_monotonically() {
        let mut filter = EmaFilter::new(0.3).unwrap();
        filter.apply(&sample(20.0, 10.0));

        let target = sample(80.0, 30.0);
        let mut last = 20.0;
        for _ in 0..200 {
            let out = filter.apply(&target);
            assert!(out.humidity_rh >= last - 1e-4);
            assert!(out.humidity_rh <= 80.0 + 1e-4);
            assert!(out.temperature_c <= 30.0 + 1e-4);
            last = out.humidity_rh;
        }

        let out = filter.apply(&target);
        assert!((out.humidity_rh - 80.0).abs() < 1e-3);
        assert!((out.temperature_c - 30.0).abs() < 1e-3);
    }

    #[test]
    fn test_humidity_output_clamped() {
        let mut filter = EmaFilter::new(0.5).unwrap();
        filter.apply(&sample(100.0, 20.0));

        let out = filter.apply(&sample(120.0, 20.0));
        assert_eq!(out.humidity_rh, 100.0);

        let mut filter = EmaFilter::new(0.5).unwrap();
        filter.apply(&sample(0.0, 20.0));

        let out = filter.apply(&sample(-10.0, 20.0));
        assert_eq!(out.humidity_rh, 0.0);
    }

    #[test]
    fn test_temperature_output_unclamped() {
        let mut filter = EmaFilter::new(0.5).unwrap();
        filter.apply(&sample(50.0, 140.0));

        let out = filter.apply(&sample(50.0, 160.0));
        assert_eq!(out.temperature_c, 150.0);
    }

    #[test]
    fn test_reset_reseeds() {
        let mut filter = EmaFilter::new(0.1).unwrap();
        filter.apply(&sample(10.0, 10.0));
        filter.apply(&sample(90.0, 90.0));

        filter.reset();
        assert!(!filter.is_seeded());
        assert_eq!(filter.alpha(), 0.1);

        let input = sample(70.0, 5.0);
        assert_eq!(filter.apply(&input), input);
    }

    #[test]
    fn test_passes_through_metadata() {
        let mut filter = EmaFilter::new(0.5).unwrap();
        filter.apply(&sample(10.0, 10.0));

        let input = Sample {
            timestamp_us: 99,
            humidity_raw: 7,
            temperature_raw: 8,
            humidity_rh: 20.0,
            temperature_c: 20.0,
        };
        let out = filter.apply(&input);

        assert_eq!(out.timestamp_us, 99);
        assert_eq!(out.humidity_raw, 7);
        assert_eq!(out.temperature_raw, 8);
    }
}
