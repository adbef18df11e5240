//! LTC2990 device settings
//!
//! # Copyright
//! Copyright (C) 2020 QUARTIQ GmbH - All Rights Reserved
//! Unauthorized usage, editing, or copying is strictly prohibited.
//! Proprietary and confidential.
use serde::{Deserialize, Serialize};

use crate::Address;

/// Configurable settings of an LTC2990.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// The 7-bit I2C address of the device.
    pub address: u8,

    /// The initial measurement mode. The default mode is used if no mode is configured.
    pub mode: Option<u32>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            address: Address::default() as u8,
            mode: None,
        }
    }
}

/// Settings as stored, before each field is range checked.
#[derive(Deserialize, Default)]
#[serde(default)]
struct StoredSettings {
    address: Option<i64>,
    mode: Option<i64>,
}

impl Settings {
    /// Load settings from a JSON document.
    ///
    /// # Note
    /// Missing fields keep their default value, as do numeric fields out of range for their type.
    /// If the document is not a valid settings object (including trailing data after the object),
    /// all settings are defaulted.
    ///
    /// # Args
    /// * `data` - The serialized settings.
    pub fn from_json(data: &[u8]) -> Self {
        let stored = match serde_json_core::from_slice::<StoredSettings>(data) {
            Ok((stored, _)) => stored,
            Err(err) => {
                warn!("Failed to load settings ({:?}), using defaults", err);
                return Settings::default();
            }
        };

        let mut settings = Settings::default();

        if let Some(address) = stored.address {
            match u8::try_from(address) {
                Ok(address) => settings.address = address,
                Err(_) => warn!(
                    "Address {} out of range, using {:#04x}",
                    address, settings.address
                ),
            }
        }

        if let Some(mode) = stored.mode {
            match u32::try_from(mode) {
                Ok(mode) => settings.mode = Some(mode),
                Err(_) => warn!("Mode {} out of range, using default mode", mode),
            }
        }

        settings
    }
}
