use crate::status::StatusWord;

use arrayvec::CapacityError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeviceError {
    /// An error when writing data or reading data from the device.
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    Translation(#[from] TranslationError),
    /// The device answered with something other than `0x9000` where success was required.
    #[error("device answered with status {0}")]
    StatusResponse(StatusWord),
    #[error(transparent)]
    PortError(#[from] serialport::Error),
    /// The reply payload was `found` bytes long when `expected` bytes were required.
    #[error("expected a reply of {expected} bytes, found {found} bytes")]
    UnexpectedLength { expected: usize, found: usize },
    /// A transport was selected without the setting it needs.
    #[error("no {0} configured")]
    MissingSetting(&'static str),
    /// The HID transport or hidapi failed.
    #[error("HID transport: {0}")]
    HidTransport(String),
    /// The selected transport was left out of this build.
    #[error("{0} is not supported by this build")]
    Unsupported(&'static str),
    /// A raw APDU given as text was not valid hex.
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl From<CapacityError> for DeviceError {
    fn from(_: CapacityError) -> Self {
        Self::Translation(TranslationError::DataTooLarge)
    }
}

impl From<hex::FromHexError> for DeviceError {
    fn from(value: hex::FromHexError) -> Self {
        Self::InvalidHex(value.to_string())
    }
}

/// Errors raised while encoding or decoding APDUs and their stream frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TranslationError {
    /// Payload exceeds what a short APDU or a single frame can carry.
    #[error("data exceeded the maximum length of 255 bytes")]
    DataTooLarge,
    /// Expected at least the first value of bytes, found the second.
    #[error("was expected at least {0} bytes, found {1} bytes")]
    NotEnoughData(usize, usize),
    /// The `Lc` byte announced the first value of bytes while the second followed the header.
    #[error("Lc announced {0} bytes of data but {1} bytes followed the header")]
    LengthMismatch(usize, usize),
}
