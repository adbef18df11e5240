//! LTC2990 monitor control
//!
//! # Copyright
//! Copyright (C) 2020 QUARTIQ GmbH - All Rights Reserved
//! Unauthorized usage, editing, or copying is strictly prohibited.
//! Proprietary and confidential.
use bit_field::BitField;
use core::cell::{Cell, RefCell};
use embedded_hal::i2c::I2c;
use embedded_hal_bus::i2c::CriticalSectionDevice;

use crate::{
    channel::{Channel, ChannelSet},
    conversion,
    hwmon::Publish,
    lock::AtomicLock,
    mode::Mode,
    settings::Settings,
    Address, Error, Register,
};

/// Decoded contents of the STATUS register.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Status {
    /// A conversion is in progress.
    pub busy: bool,
    pub tint_ready: bool,
    pub v1_ready: bool,
    pub v2_ready: bool,
    pub v3_ready: bool,
    pub v4_ready: bool,
    pub vcc_ready: bool,
}

impl From<u8> for Status {
    fn from(status: u8) -> Self {
        Self {
            busy: status.get_bit(0),
            tint_ready: status.get_bit(1),
            v1_ready: status.get_bit(2),
            v2_ready: status.get_bit(3),
            v3_ready: status.get_bit(4),
            v4_ready: status.get_bit(5),
            vcc_ready: status.get_bit(6),
        }
    }
}

impl Status {
    /// Check if new data is available in the register backing `channel`.
    pub fn is_ready(&self, channel: Channel) -> bool {
        match channel.register() {
            Register::TintMsb => self.tint_ready,
            Register::V1Msb => self.v1_ready,
            Register::V2Msb => self.v2_ready,
            Register::V3Msb => self.v3_ready,
            Register::V4Msb => self.v4_ready,
            Register::VccMsb => self.vcc_ready,
            _ => false,
        }
    }
}

/// The LTC2990 monitor driver.
///
/// # Note
/// The driver is intended to be shared by reference. Mode changes are serialized by an internal
/// lock that channel reads and mode queries never take. Reads only synchronize on the bus itself
/// for the duration of a single transaction.
pub struct Ltc2990<I2C, P = ()> {
    i2c: critical_section::Mutex<RefCell<I2C>>,
    address: u8,
    mode: critical_section::Mutex<Cell<Mode>>,
    // Held for the whole of a mode change, including the republish.
    publisher: AtomicLock<P>,
}

impl<I2C> Ltc2990<I2C, ()>
where
    I2C: I2c,
{
    /// Construct a new LTC2990 driver and start continuous conversions.
    ///
    /// # Args
    /// * `i2c` - The I2C bus used to communicate with the device.
    /// * `address` - The address pin strapping of the device.
    /// * `mode` - The configured measurement mode. The default mode is used if no mode is
    ///   configured or if the configured mode is out of range.
    pub fn new(i2c: I2C, address: Address, mode: Option<u32>) -> Result<Self, Error<I2C::Error>> {
        Self::with_publisher(i2c, address, mode, ())
    }

    /// Construct a new LTC2990 driver from device settings.
    ///
    /// # Args
    /// * `i2c` - The I2C bus used to communicate with the device.
    /// * `settings` - The device settings.
    pub fn from_settings(i2c: I2C, settings: &Settings) -> Result<Self, Error<I2C::Error>> {
        let address = Address::from_bus_address(settings.address).ok_or(Error::InvalidArgument)?;
        Self::new(i2c, address, settings.mode)
    }
}

impl<I2C, P> Ltc2990<I2C, P>
where
    I2C: I2c,
    P: Publish,
{
    /// Construct a new LTC2990 driver that reports channel visibility changes.
    ///
    /// # Note
    /// The publisher is called with the initially visible channels once conversions started and
    /// after every successful mode change. It may query the mode and channel visibility, which
    /// already reflect the new mode, but must not change the mode itself.
    ///
    /// # Args
    /// * `i2c` - The I2C bus used to communicate with the device.
    /// * `address` - The address pin strapping of the device.
    /// * `mode` - The configured measurement mode. The default mode is used if no mode is
    ///   configured or if the configured mode is out of range.
    /// * `publisher` - Receives the set of visible channels.
    pub fn with_publisher(
        i2c: I2C,
        address: Address,
        mode: Option<u32>,
        publisher: P,
    ) -> Result<Self, Error<I2C::Error>> {
        let mode = match mode {
            Some(configured) => Mode::new(configured).unwrap_or_else(|| {
                warn!(
                    "Mode {} out of range, defaulting to {}",
                    configured,
                    Mode::DEFAULT
                );
                Mode::DEFAULT
            }),
            None => Mode::DEFAULT,
        };

        let device = Ltc2990 {
            i2c: critical_section::Mutex::new(RefCell::new(i2c)),
            address: address as u8,
            mode: critical_section::Mutex::new(Cell::new(mode)),
            publisher: AtomicLock::new(publisher),
        };

        device.start_conversion(mode)?;
        device
            .publisher
            .lock(|publisher| Self::publish(publisher, mode.enabled_channels()))?;

        Ok(device)
    }

    /// Release the driver.
    ///
    /// # Returns
    /// The I2C bus and the publisher.
    pub fn release(self) -> (I2C, P) {
        (self.i2c.into_inner().into_inner(), self.publisher.into_inner())
    }

    fn publish(publisher: &mut P, enabled: ChannelSet) -> Result<(), Error<I2C::Error>> {
        publisher.publish(enabled).map_err(|err| {
            error!("Failed to publish channel visibility: {:?}", err);
            Error::Publish
        })
    }

    fn read_word(&self, register: Register) -> Result<u16, Error<I2C::Error>> {
        let mut word: [u8; 2] = [0; 2];
        CriticalSectionDevice::new(&self.i2c).write_read(
            self.address,
            &[register as u8],
            &mut word,
        )?;

        Ok(u16::from_be_bytes(word))
    }

    fn read_byte(&self, register: Register) -> Result<u8, Error<I2C::Error>> {
        let mut result: [u8; 1] = [0; 1];
        CriticalSectionDevice::new(&self.i2c).write_read(
            self.address,
            &[register as u8],
            &mut result,
        )?;

        Ok(result[0])
    }

    fn write_byte(&self, register: Register, value: u8) -> Result<(), Error<I2C::Error>> {
        CriticalSectionDevice::new(&self.i2c).write(self.address, &[register as u8, value])?;

        Ok(())
    }

    /// Configure continuous acquisition of all channels of `mode` and trigger the first
    /// conversion.
    ///
    /// # Note
    /// A failure of either write is returned as-is. The device is not restored to its previous
    /// configuration.
    fn start_conversion(&self, mode: Mode) -> Result<(), Error<I2C::Error>> {
        // Celsius units (bit 7) and repeated acquisition (bit 6) are selected by leaving both bits
        // clear.
        let control = *0u8.set_bits(3..5, 0b11).set_bits(0..3, mode.value());

        self.write_byte(Register::Control, control).map_err(|err| {
            error!("Failed to set control mode");
            err
        })?;

        // A single trigger starts the continuous conversion.
        self.write_byte(Register::Trigger, 0x01).map_err(|err| {
            error!("Failed to start acquisition");
            err
        })?;

        Ok(())
    }

    /// Get the currently configured measurement mode.
    pub fn mode(&self) -> Mode {
        critical_section::with(|cs| self.mode.borrow(cs).get())
    }

    /// Get all channels carrying a meaningful measurement in the current mode.
    pub fn enabled_channels(&self) -> ChannelSet {
        self.mode().enabled_channels()
    }

    /// Check if a channel carries a meaningful measurement in the current mode.
    pub fn is_visible(&self, channel: Channel) -> bool {
        self.mode().is_visible(channel)
    }

    /// Change the measurement mode.
    ///
    /// # Note
    /// The mode change is not atomic. If restarting the conversion or publishing the new channel
    /// visibility fails, the new mode is kept and the device may already be configured for it.
    ///
    /// # Args
    /// * `mode` - The new measurement mode within 0..=7.
    pub fn set_mode(&self, mode: u32) -> Result<(), Error<I2C::Error>> {
        let mode = Mode::new(mode).ok_or(Error::InvalidArgument)?;

        self.publisher.lock(|publisher| {
            critical_section::with(|cs| self.mode.borrow(cs).set(mode));

            self.start_conversion(mode)?;
            Self::publish(publisher, mode.enabled_channels())?;

            info!("Measurement mode set to {}", mode);
            Ok(())
        })
    }

    /// Measure a channel.
    ///
    /// # Note
    /// The channel is read regardless of the configured mode. Use [Ltc2990::is_visible] to check
    /// if the measurement is meaningful.
    ///
    /// # Args
    /// * `channel` - The channel to read.
    ///
    /// # Returns
    /// Millidegrees Celsius for temperatures, microvolts for differential channels and millivolts
    /// for voltages.
    pub fn read_channel(&self, channel: Channel) -> Result<i32, Error<I2C::Error>> {
        let raw = self.read_word(channel.register())?;
        debug!("{:?} raw {:#06x}", channel, raw);

        Ok(conversion::convert(channel, raw))
    }

    /// Measure a channel given its index.
    ///
    /// # Args
    /// * `index` - The channel index, see [Channel].
    pub fn read_channel_index(&self, index: u8) -> Result<i32, Error<I2C::Error>> {
        let channel = Channel::from_index(index).ok_or(Error::InvalidChannel)?;
        self.read_channel(channel)
    }

    /// Read the conversion status of the device.
    pub fn status(&self) -> Result<Status, Error<I2C::Error>> {
        Ok(self.read_byte(Register::Status)?.into())
    }
}
