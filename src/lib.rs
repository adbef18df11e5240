//! Driver for the LTC2990 quad I2C voltage, current and temperature monitor.
//!
//! # Copyright
//! Copyright (C) 2020 QUARTIQ GmbH - All Rights Reserved
//! Unauthorized usage, editing, or copying is strictly prohibited.
//! Proprietary and confidential.
//!
//! # Description
//! The LTC2990 multiplexes its four V1..V4 inputs into one of eight measurement modes. Each mode
//! combines single-ended voltages, differential (shunt) voltages and remote diode temperatures.
//! The internal temperature and the supply voltage are measured in every mode.
//!
//! The driver keeps the configured mode behind a lock so that mode changes are serialized, while
//! channel reads go straight to the bus. A channel always reads the same register regardless of
//! the configured mode; the mode only decides which channels are meaningful (visible).
//!
//! All measurements are reported as integers:
//! * Temperatures in millidegrees Celsius.
//! * Voltages in millivolts.
//! * Differential (shunt) voltages in microvolts.
#![no_std]
#![deny(warnings)]

#[macro_use]
extern crate log;

pub mod channel;
pub mod conversion;
mod error;
pub mod hwmon;
mod lock;
pub mod mode;
mod monitor;
pub mod settings;
pub mod telemetry;

pub use channel::{Channel, ChannelSet};
pub use error::Error;
pub use hwmon::{Attribute, Publish};
pub use mode::Mode;
pub use monitor::{Ltc2990, Status};
pub use settings::Settings;
pub use telemetry::Telemetry;

/// Registers of the LTC2990.
///
/// Measurement registers are 16 bits wide and are read MSB first starting at the `*Msb` address.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Register {
    Status = 0x00,
    Control = 0x01,
    Trigger = 0x02,
    TintMsb = 0x04,
    V1Msb = 0x06,
    V2Msb = 0x08,
    V3Msb = 0x0A,
    V4Msb = 0x0C,
    VccMsb = 0x0E,
}

/// Represents the various states of the ADR1/ADR0 address pins on the device. The value of the
/// enum corresponds to the 7-bit I2C bus address it represents.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Address {
    #[default]
    Adr00 = 0x4C,
    Adr01 = 0x4D,
    Adr10 = 0x4E,
    Adr11 = 0x4F,
}

impl Address {
    /// Look up the pin strapping for a 7-bit bus address.
    ///
    /// # Returns
    /// None if the LTC2990 cannot be strapped to the address.
    pub fn from_bus_address(address: u8) -> Option<Self> {
        match address {
            0x4C => Some(Address::Adr00),
            0x4D => Some(Address::Adr01),
            0x4E => Some(Address::Adr10),
            0x4F => Some(Address::Adr11),
            _ => None,
        }
    }
}
