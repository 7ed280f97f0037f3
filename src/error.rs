use core::fmt;

use crate::frame::ChecksumError;

/// Possible errors from the DHT11 driver.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq)]
pub enum DhtError<E> {
    /// The sensor never pulled the line low after the start signal.
    AckTimeout,
    /// The sensor pulled the line low but did not raise it again within the ack window.
    AckHighMissing,
    /// The acknowledgment high phase did not end in time.
    AckLowTimeout,
    /// Timed out waiting for an edge while reading payload bit `bit` (0..40).
    BitTimeout { bit: u8 },
    /// Checksum did not match the received data.
    ChecksumMismatch { expected: u8, actual: u8 },
    /// Error from the GPIO pin (input/output).
    PinError(E),
}

impl<E> DhtError<E> {
    /// Returns `true` for every acknowledgment-phase failure.
    ///
    /// Callers that do not care which part of the handshake went wrong can
    /// treat all of these as "the sensor did not respond".
    pub fn is_no_response(&self) -> bool {
        matches!(
            self,
            DhtError::AckTimeout | DhtError::AckHighMissing | DhtError::AckLowTimeout
        )
    }

    pub(crate) fn checksum(value: ChecksumError) -> Self {
        Self::ChecksumMismatch {
            expected: value.expected,
            actual: value.actual,
        }
    }
}

impl<E> From<E> for DhtError<E> {
    fn from(value: E) -> Self {
        Self::PinError(value)
    }
}

impl<E: fmt::Debug> fmt::Display for DhtError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DhtError::AckTimeout => write!(f, "no acknowledgment from sensor"),
            DhtError::AckHighMissing => write!(f, "missing ack-high phase"),
            DhtError::AckLowTimeout => write!(f, "acknowledgment phase did not end"),
            DhtError::BitTimeout { bit } => write!(f, "timed out reading bit {bit}"),
            DhtError::ChecksumMismatch { expected, actual } => write!(
                f,
                "checksum mismatch: expected {expected:#04x}, got {actual:#04x}"
            ),
            DhtError::PinError(e) => write!(f, "pin error: {e:?}"),
        }
    }
}
