//! Error type definitions for the LTC2990 driver
//!
//! # Copyright
//! Copyright (C) 2020 QUARTIQ GmbH - All Rights Reserved
//! Unauthorized usage, editing, or copying is strictly prohibited.
//! Proprietary and confidential.

/// An error that the LTC2990 driver may encounter.
///
/// # Note
/// Errors are never retried by the driver. A failed mode change may have already updated the
/// stored mode and the CONTROL register of the device.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error<E> {
    /// The I2C bus reported an error.
    Interface(E),
    /// A channel identifier does not name one of the LTC2990 measurements.
    InvalidChannel,
    /// A requested mode is outside of 0..=7 or could not be parsed.
    InvalidArgument,
    /// The attribute cannot be written.
    ReadOnly,
    /// Publishing the updated channel visibility failed after a mode change.
    Publish,
}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Error<E> {
        Error::Interface(err)
    }
}
