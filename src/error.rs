use core::convert::Infallible;
use core::fmt::Debug;

use crate::frame::FrameError;

/// Possible errors from the DHT20 driver.
///
/// `E` is the error type of the underlying bus. Operations that never touch
/// the bus (such as building a filter) use the default `Infallible`.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum Dht20Error<E = Infallible>
where
    E: Debug,
{
    /// An argument was outside its accepted range.
    #[error("invalid argument")]
    InvalidArgument,
    /// The sensor reported that a conversion is still in progress.
    #[error("conversion not ready")]
    NotReady,
    /// The frame checksum did not match the received data.
    #[error("checksum mismatch: expected {expected:#04x}, computed {computed:#04x}")]
    ChecksumMismatch {
        /// Checksum byte carried by the frame.
        expected: u8,
        /// Checksum computed over the frame payload.
        computed: u8,
    },
    /// Polling ran past its deadline without a ready frame.
    #[error("timed out waiting for conversion")]
    Timeout,
    /// Error from the I2C bus.
    #[error("bus error: {0:?}")]
    Bus(E),
}

impl<E: Debug> From<FrameError> for Dht20Error<E> {
    fn from(value: FrameError) -> Self {
        match value {
            FrameError::Busy => Self::NotReady,
            FrameError::ChecksumMismatch { expected, computed } => {
                Self::ChecksumMismatch { expected, computed }
            }
        }
    }
}
