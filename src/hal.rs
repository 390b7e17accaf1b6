//! Collaborator traits: the two-wire bus and a monotonic clock.
//!
//! Sleeping is done through [`DelayNs`](embedded_hal::delay::DelayNs).

use core::fmt::Debug;
use core::time::Duration;

use embedded_hal::i2c::I2c;

/// Blocking transport to a device on a two-wire bus.
pub trait Bus {
    /// Error reported by the transport.
    type Error: Debug;

    /// Writes `bytes` to the device at `address`.
    fn write(&mut self, address: u8, bytes: &[u8], timeout: Duration) -> Result<(), Self::Error>;

    /// Fills `buffer` with bytes read from the device at `address`.
    fn read(
        &mut self,
        address: u8,
        buffer: &mut [u8],
        timeout: Duration,
    ) -> Result<(), Self::Error>;
}

/// Any `embedded-hal` I2C peripheral is a [`Bus`].
///
/// `embedded-hal` peripherals carry their transaction timeout in the HAL's own
/// configuration, so the per-call timeout is not forwarded.
impl<I: I2c> Bus for I {
    type Error = I::Error;

    fn write(&mut self, address: u8, bytes: &[u8], _timeout: Duration) -> Result<(), Self::Error> {
        I2c::write(self, address, bytes)
    }

    fn read(
        &mut self,
        address: u8,
        buffer: &mut [u8],
        _timeout: Duration,
    ) -> Result<(), Self::Error> {
        I2c::read(self, address, buffer)
    }
}

/// Monotonic microsecond clock.
pub trait Clock {
    /// Microseconds elapsed since an arbitrary, fixed origin.
    fn now_us(&mut self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &mut C {
    fn now_us(&mut self) -> u64 {
        (**self).now_us()
    }
}
