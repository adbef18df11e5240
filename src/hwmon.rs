//! Hardware-monitor style attribute access to the LTC2990.
//!
//! # Copyright
//! Copyright (C) 2020 QUARTIQ GmbH - All Rights Reserved
//! Unauthorized usage, editing, or copying is strictly prohibited.
//! Proprietary and confidential.
//!
//! # Description
//! Measurements are exposed as named, text-valued attributes (e.g. `temp1_input`, `mode`). The
//! attributes of mode-dependent channels are only visible while their channel is measured.
use core::fmt::Write;
use embedded_hal::i2c::I2c;
use enum_iterator::Sequence;
use heapless::String;

use crate::{
    channel::{Channel, ChannelSet},
    mode::Mode,
    Error, Ltc2990,
};

/// Receives the set of visible channels whenever it changes.
pub trait Publish {
    type Error: core::fmt::Debug;

    /// Publish the channels that are currently visible.
    ///
    /// # Args
    /// * `enabled` - All channels measured in the current mode, including the static channels.
    fn publish(&mut self, enabled: ChannelSet) -> Result<(), Self::Error>;
}

impl Publish for () {
    type Error = core::convert::Infallible;

    fn publish(&mut self, _enabled: ChannelSet) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// A named attribute of the monitor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Sequence)]
pub enum Attribute {
    Temp1Input,
    Temp2Input,
    Temp3Input,
    Curr1Input,
    Curr2Input,
    In0Input,
    In1Input,
    In2Input,
    In3Input,
    In4Input,
    Mode,
}

impl Attribute {
    /// Get the attribute name.
    pub fn name(&self) -> &'static str {
        match self {
            Attribute::Temp1Input => "temp1_input",
            Attribute::Temp2Input => "temp2_input",
            Attribute::Temp3Input => "temp3_input",
            Attribute::Curr1Input => "curr1_input",
            Attribute::Curr2Input => "curr2_input",
            Attribute::In0Input => "in0_input",
            Attribute::In1Input => "in1_input",
            Attribute::In2Input => "in2_input",
            Attribute::In3Input => "in3_input",
            Attribute::In4Input => "in4_input",
            Attribute::Mode => "mode",
        }
    }

    /// Look up an attribute by name.
    pub fn from_name(name: &str) -> Option<Self> {
        enum_iterator::all::<Attribute>().find(|attribute| attribute.name() == name)
    }

    /// Get the measurement behind the attribute, if any.
    pub fn channel(&self) -> Option<Channel> {
        let channel = match self {
            Attribute::Temp1Input => Channel::Temp1,
            Attribute::Temp2Input => Channel::Temp2,
            Attribute::Temp3Input => Channel::Temp3,
            Attribute::Curr1Input => Channel::Curr1,
            Attribute::Curr2Input => Channel::Curr2,
            Attribute::In0Input => Channel::In0,
            Attribute::In1Input => Channel::In1,
            Attribute::In2Input => Channel::In2,
            Attribute::In3Input => Channel::In3,
            Attribute::In4Input => Channel::In4,
            Attribute::Mode => return None,
        };

        Some(channel)
    }

    /// Check if the attribute can be written.
    pub fn is_writable(&self) -> bool {
        matches!(self, Attribute::Mode)
    }

    /// Check if the attribute is visible in a given mode.
    pub fn is_visible(&self, mode: Mode) -> bool {
        self.channel()
            .map(|channel| mode.is_visible(channel))
            .unwrap_or(true)
    }
}

impl<I2C, P> Ltc2990<I2C, P>
where
    I2C: I2c,
    P: Publish,
{
    /// Iterate over the attributes visible in the current mode.
    pub fn visible_attributes(&self) -> impl Iterator<Item = Attribute> {
        let mode = self.mode();
        enum_iterator::all::<Attribute>().filter(move |attribute| attribute.is_visible(mode))
    }

    /// Render the value of an attribute.
    ///
    /// # Returns
    /// The decimal value terminated by a newline.
    pub fn show(&self, attribute: Attribute) -> Result<String<16>, Error<I2C::Error>> {
        let value = match attribute.channel() {
            Some(channel) => self.read_channel(channel)?,
            None => self.mode().value() as i32,
        };

        let mut text: String<16> = String::new();
        // Any i32 and the newline fit into the buffer.
        writeln!(&mut text, "{}", value).unwrap();
        Ok(text)
    }

    /// Render the value of an attribute given its name.
    pub fn show_named(&self, name: &str) -> Result<String<16>, Error<I2C::Error>> {
        let attribute = Attribute::from_name(name).ok_or(Error::InvalidChannel)?;
        self.show(attribute)
    }

    /// Write an attribute.
    ///
    /// # Note
    /// Only the `mode` attribute is writable. The value must be a decimal number within 0..=7,
    /// optionally followed by a newline.
    ///
    /// # Args
    /// * `attribute` - The attribute to write.
    /// * `text` - The value to write.
    ///
    /// # Returns
    /// The number of bytes consumed.
    pub fn store(&self, attribute: Attribute, text: &str) -> Result<usize, Error<I2C::Error>> {
        if !attribute.is_writable() {
            return Err(Error::ReadOnly);
        }

        let value = text.strip_suffix('\n').unwrap_or(text);
        let mode: u32 = value.parse().map_err(|_| Error::InvalidArgument)?;
        self.set_mode(mode)?;

        Ok(text.len())
    }
}
