use core::fmt::Debug;
use core::time::Duration;

use embedded_hal::delay::DelayNs;

use crate::error::Dht20Error;
use crate::frame::{self, FRAME_LEN, FrameError, RawMeasurement, Status};
use crate::hal::{Bus, Clock};
use crate::sample::Sample;

/// Default I2C address of the DHT20.
pub const DEFAULT_ADDRESS: u8 = 0x38;

const CMD_SOFT_RESET: [u8; 1] = [0xBA];
const CMD_STATUS: [u8; 1] = [0x71];
const CMD_TRIGGER: [u8; 3] = [0xAC, 0x33, 0x00];
const CMD_CALIBRATE: [u8; 3] = [0xBE, 0x08, 0x00];

/// Settle time after power-up before the first command.
const POWER_ON_DELAY_MS: u32 = 100;
/// Settle time after a soft reset.
const SOFT_RESET_DELAY_MS: u32 = 20;
/// Settle time after the calibration command.
const CALIBRATION_DELAY_MS: u32 = 10;

/// Shortest sleep between two poll attempts.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Bus configuration for one sensor.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// 7-bit device address.
    pub address: u8,
    /// Timeout handed to every bus transaction.
    pub bus_timeout: Duration,
}

impl Config {
    /// Creates a configuration for `address` with the default bus timeout.
    pub const fn new(address: u8) -> Self {
        Config {
            address,
            bus_timeout: Duration::from_millis(20),
        }
    }

    /// Returns a copy using `address`.
    pub const fn with_address(self, address: u8) -> Self {
        Config { address, ..self }
    }

    /// Returns a copy using `bus_timeout`.
    pub const fn with_bus_timeout(self, bus_timeout: Duration) -> Self {
        Config {
            bus_timeout,
            ..self
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new(DEFAULT_ADDRESS)
    }
}

/// Bounds for waiting on a conversion.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollSettings {
    /// Give up once this much time has passed since the first attempt.
    pub timeout: Duration,
    /// Sleep between attempts. Values below 1 ms are raised to 1 ms.
    pub interval: Duration,
}

impl PollSettings {
    /// Creates poll settings from a timeout and an interval.
    pub const fn new(timeout: Duration, interval: Duration) -> Self {
        PollSettings { timeout, interval }
    }
}

impl Default for PollSettings {
    fn default() -> Self {
        PollSettings::new(Duration::from_millis(120), Duration::from_millis(2))
    }
}

/// Driver for the DHT20 temperature and humidity sensor.
pub struct Dht20<BUS, D, C> {
    bus: BUS,
    delay: D,
    clock: C,
    config: Config,
}

impl<BUS, DELAY, CLOCK> Dht20<BUS, DELAY, CLOCK>
where
    BUS: Bus,
    DELAY: DelayNs,
    CLOCK: Clock,
{
    /// Creates a new instance of the DHT20 driver.
    ///
    /// No bus traffic happens here; call [`Dht20::init`] once after power-up.
    ///
    /// # Arguments
    ///
    /// * `bus` - The two-wire bus the sensor is attached to.
    /// * `delay` - A delay provider implementing the `DelayNs` trait.
    /// * `clock` - Monotonic clock used for poll deadlines and sample timestamps.
    /// * `config` - Device address and bus timeout.
    pub fn new(bus: BUS, delay: DELAY, clock: CLOCK, config: Config) -> Self {
        Dht20 {
            bus,
            delay,
            clock,
            config,
        }
    }

    /// Configuration the driver was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Destroys the driver and hands back the bus, delay and clock.
    pub fn release(self) -> (BUS, DELAY, CLOCK) {
        (self.bus, self.delay, self.clock)
    }

    /// Brings the sensor from power-up to ready.
    ///
    /// Waits for the power-up settle time, soft-resets the sensor and reads
    /// its status. If the calibration bit is clear the calibration command is
    /// sent once. Any bus failure aborts the sequence and is returned as is.
    ///
    /// ```text
    ///   power-up wait ─► soft reset ─► status ─► calibrated? ── yes ─► ready
    ///                                                 │
    ///                                                 no ─► calibrate ─► ready
    /// ```
    pub fn init(&mut self) -> Result<(), Dht20Error<BUS::Error>> {
        self.delay.delay_ms(POWER_ON_DELAY_MS);

        self.soft_reset()?;

        let status = self.read_status()?;
        if !status.is_calibrated() {
            debug!("dht20: not calibrated (status {}), sending calibration", status);
            self.write(&CMD_CALIBRATE)?;
            self.delay.delay_ms(CALIBRATION_DELAY_MS);
        }

        debug!("dht20: ready");
        Ok(())
    }

    /// Issues a soft reset and waits for the sensor to settle.
    pub fn soft_reset(&mut self) -> Result<(), Dht20Error<BUS::Error>> {
        trace!("dht20: soft reset");
        self.write(&CMD_SOFT_RESET)?;
        self.delay.delay_ms(SOFT_RESET_DELAY_MS);
        Ok(())
    }

    /// Reads the status byte.
    pub fn read_status(&mut self) -> Result<Status, Dht20Error<BUS::Error>> {
        let mut status = [0u8; 1];
        self.write(&CMD_STATUS)?;
        self.read(&mut status)?;
        Ok(Status(status[0]))
    }

    /// Triggers one conversion. Does not wait for it to finish.
    pub fn start_measurement(&mut self) -> Result<(), Dht20Error<BUS::Error>> {
        trace!("dht20: trigger");
        self.write(&CMD_TRIGGER)
    }

    /// Reads and decodes one frame.
    ///
    /// # Returns
    ///
    /// * `Ok(Sample)` if the conversion finished and the checksum is valid.
    /// * `Err(Dht20Error::NotReady)` if the conversion is still running.
    /// * `Err(Dht20Error::ChecksumMismatch { .. })` if the frame is corrupted.
    /// * `Err(Dht20Error::Bus(_))` if the bus read failed.
    pub fn read_measurement(&mut self) -> Result<Sample, Dht20Error<BUS::Error>> {
        let raw = Self::read_frame(&mut self.bus, &self.config)?;
        Ok(Sample::from_raw(raw, self.clock.now_us()))
    }

    /// Reads frames until the conversion is done or `settings.timeout` elapses.
    ///
    /// Only a busy frame is retried. Checksum and bus errors are returned on
    /// first occurrence.
    pub fn read_measurement_wait(
        &mut self,
        settings: PollSettings,
    ) -> Result<Sample, Dht20Error<BUS::Error>> {
        let raw = poll_until_ready(&mut self.delay, &mut self.clock, settings, || {
            Self::read_frame(&mut self.bus, &self.config)
        })?;
        Ok(Sample::from_raw(raw, self.clock.now_us()))
    }

    /// Triggers a conversion and polls for its result.
    pub fn read_oneshot(
        &mut self,
        settings: PollSettings,
    ) -> Result<Sample, Dht20Error<BUS::Error>> {
        self.start_measurement()?;
        self.read_measurement_wait(settings)
    }

    /// Triggers a conversion, sleeps `conversion_wait` and reads once.
    ///
    /// Kept for compatibility. There is no polling and no timeout detection:
    /// if the sensor is still converting after the fixed wait this returns
    /// `Dht20Error::NotReady`. Prefer [`Dht20::read_oneshot`].
    pub fn read_with_delay(
        &mut self,
        conversion_wait: Duration,
    ) -> Result<Sample, Dht20Error<BUS::Error>> {
        self.start_measurement()?;

        if !conversion_wait.is_zero() {
            self.delay.delay_us(duration_as_us(conversion_wait));
        }

        self.read_measurement()
    }

    fn read_frame(
        bus: &mut BUS,
        config: &Config,
    ) -> Result<RawMeasurement, Dht20Error<BUS::Error>> {
        let mut frame = [0u8; FRAME_LEN];
        bus.read(config.address, &mut frame, config.bus_timeout)
            .map_err(Dht20Error::Bus)?;

        let raw = frame::decode(&frame).inspect_err(|e| {
            if let FrameError::ChecksumMismatch { expected, computed } = e {
                warn!(
                    "dht20: checksum mismatch, expected {} computed {}",
                    expected, computed
                );
            }
        })?;
        Ok(raw)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), Dht20Error<BUS::Error>> {
        self.bus
            .write(self.config.address, bytes, self.config.bus_timeout)
            .map_err(Dht20Error::Bus)
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<(), Dht20Error<BUS::Error>> {
        self.bus
            .read(self.config.address, buffer, self.config.bus_timeout)
            .map_err(Dht20Error::Bus)
    }
}

/// Repeats `attempt` until it stops reporting `NotReady` or the deadline passes.
///
/// The deadline is fixed once, from the clock reading taken before the first
/// attempt. Between attempts the loop sleeps `settings.interval`, raised to at
/// least [`MIN_POLL_INTERVAL`].
///
/// # Errors
///
/// Returns `Dht20Error::Timeout` once the clock reaches the deadline after a
/// `NotReady` attempt. Every other error from `attempt` is returned unchanged.
pub(crate) fn poll_until_ready<T, E, D, C, F>(
    delay: &mut D,
    clock: &mut C,
    settings: PollSettings,
    mut attempt: F,
) -> Result<T, Dht20Error<E>>
where
    E: Debug,
    D: DelayNs,
    C: Clock,
    F: FnMut() -> Result<T, Dht20Error<E>>,
{
    let interval_us = duration_as_us(settings.interval.max(MIN_POLL_INTERVAL));
    let timeout_us = u64::try_from(settings.timeout.as_micros()).unwrap_or(u64::MAX);
    let deadline = clock.now_us().saturating_add(timeout_us);

    loop {
        match attempt() {
            Err(Dht20Error::NotReady) => {}
            result => return result,
        }

        if clock.now_us() >= deadline {
            warn!("dht20: conversion not ready after {} us", timeout_us);
            return Err(Dht20Error::Timeout);
        }

        trace!("dht20: busy, retrying");
        delay.delay_us(interval_us);
    }
}

fn duration_as_us(duration: Duration) -> u32 {
    u32::try_from(duration.as_micros()).unwrap_or(u32::MAX)
}
