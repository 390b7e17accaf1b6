//! Measurement frame layout and decoding.
//!
//! A frame is seven bytes: one status byte, five bytes carrying a 20-bit
//! humidity count and a 20-bit temperature count, and a CRC-8 over the first
//! six bytes.
//!
//! ```text
//!  byte:   0        1        2        3        4        5        6
//!       status   hhhhhhhh hhhhhhhh hhhhtttt tttttttt tttttttt   crc
//! ```

use crc::{CRC_8_NRSC_5, Crc};

/// Length of a measurement frame in bytes.
pub const FRAME_LEN: usize = 7;

/// Status bit set while a conversion is in progress.
const STATUS_BUSY: u8 = 1 << 7;
/// Status bit set once the sensor holds its factory calibration.
const STATUS_CALIBRATED: u8 = 1 << 3;

/// CRC-8, polynomial 0x31, initial value 0xFF, MSB first, no final XOR.
const CRC8: Crc<u8> = Crc::<u8>::new(&CRC_8_NRSC_5);

/// Computes the frame checksum over `data`.
#[inline]
pub fn crc8(data: &[u8]) -> u8 {
    CRC8.checksum(data)
}

/// View over the sensor status byte.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Status(pub u8);

impl Status {
    /// A conversion is still running; measurement bytes are not valid yet.
    pub fn is_busy(self) -> bool {
        self.0 & STATUS_BUSY != 0
    }

    /// The sensor reports a valid calibration.
    pub fn is_calibrated(self) -> bool {
        self.0 & STATUS_CALIBRATED != 0
    }
}

/// Raw 20-bit counts extracted from a valid frame.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawMeasurement {
    /// Humidity count, `0..=0xFFFFF`.
    pub humidity: u32,
    /// Temperature count, `0..=0xFFFFF`.
    pub temperature: u32,
}

/// Reasons a frame did not yield a measurement.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameError {
    /// The busy bit was set.
    Busy,
    /// The trailing checksum byte did not match the payload.
    ChecksumMismatch {
        /// Checksum byte carried by the frame.
        expected: u8,
        /// Checksum computed over the first six bytes.
        computed: u8,
    },
}

/// Decodes one measurement frame.
///
/// The busy bit is checked before the checksum, so a frame from a sensor that
/// is still converting always reports [`FrameError::Busy`].
pub fn decode(frame: &[u8; FRAME_LEN]) -> Result<RawMeasurement, FrameError> {
    if Status(frame[0]).is_busy() {
        return Err(FrameError::Busy);
    }

    let computed = crc8(&frame[..FRAME_LEN - 1]);
    let expected = frame[FRAME_LEN - 1];
    if computed != expected {
        return Err(FrameError::ChecksumMismatch { expected, computed });
    }

    let [_, b1, b2, b3, b4, b5, _] = frame.map(u32::from);

    Ok(RawMeasurement {
        humidity: (b1 << 12) | (b2 << 4) | (b3 >> 4),
        temperature: ((b3 & 0x0F) << 16) | (b4 << 8) | b5,
    })
}
