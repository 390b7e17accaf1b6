//! DHT20 Sensor Driver for Embedded Rust
//!
//! This crate provides a platform-agnostic driver for the DHT20 (AHT20 family)
//! temperature and humidity sensor, built on top of the [`embedded-hal`] traits.
//!
//! The acquisition pipeline is: trigger a conversion, poll the sensor until the
//! frame is ready or a deadline passes, validate and decode the frame, convert
//! raw counts to physical units, then optionally apply a calibration
//! [`Offset`] and an [`EmaFilter`].
//!
//! # Features
//! - Blocking synchronous API using `embedded-hal` traits
//! - Designed for `no_std` environments
//! - CRC-8 frame validation and busy-flag polling with timeout
//! - Optional logging support via `defmt`
//!
//! # Dependencies
//! This driver depends on the following traits:
//! - [`I2c`] for bus access, through the crate's [`Bus`] trait
//! - [`DelayNs`] for settle times and poll intervals
//! - [`Clock`] for poll deadlines and sample timestamps
//!
//! # Optional Features
//! - `defmt`: Implements `defmt::Format` for logging support and emits driver logs
//!
//! # Example
//!
//! ```ignore
//! let mut dht = Dht20::new(i2c, delay, clock, Config::default());
//! dht.init()?;
//!
//! let mut filter = EmaFilter::new(0.2)?;
//! let offset = Offset::new(-0.5, 0.0);
//!
//! let sample = dht.read_oneshot(PollSettings::default())?;
//! let smoothed = filter.apply(&offset.apply(sample));
//! ```
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal
//! [`I2c`]: embedded_hal::i2c::I2c
//! [`DelayNs`]: embedded_hal::delay::DelayNs

#![cfg_attr(not(test), no_std)]

mod fmt;

pub mod calibration;
pub mod conversion;
pub mod dht20;
pub mod error;
pub mod filter;
pub mod frame;
pub mod hal;
pub mod sample;

pub use calibration::{Offset, apply_offset};
pub use dht20::{Config, DEFAULT_ADDRESS, Dht20, PollSettings};
pub use error::Dht20Error;
pub use filter::{EmaFilter, FilterState};
pub use frame::{FrameError, RawMeasurement, Status};
pub use hal::{Bus, Clock};
pub use sample::Sample;
