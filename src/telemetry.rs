//! LTC2990 telemetry reporting
//!
//! # Copyright
//! Copyright (C) 2020 QUARTIQ GmbH - All Rights Reserved
//! Unauthorized usage, editing, or copying is strictly prohibited.
//! Proprietary and confidential.
use embedded_hal::i2c::I2c;
use heapless::String;
use serde::Serialize;

use crate::{channel::Channel, hwmon::Publish, Error, Ltc2990};

/// A snapshot of all channels visible in the configured mode.
///
/// # Note
/// Channels that are not measured in the mode are left out of the serialized report.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Telemetry {
    pub mode: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp1: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp2: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp3: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curr1: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curr2: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in0: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in1: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in2: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in3: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in4: Option<i32>,
}

impl Telemetry {
    /// Get the reported value of a channel.
    pub fn get(&self, channel: Channel) -> Option<i32> {
        *self.field(channel)
    }

    fn field(&self, channel: Channel) -> &Option<i32> {
        match channel {
            Channel::Temp1 => &self.temp1,
            Channel::Temp2 => &self.temp2,
            Channel::Temp3 => &self.temp3,
            Channel::Curr1 => &self.curr1,
            Channel::Curr2 => &self.curr2,
            Channel::In0 => &self.in0,
            Channel::In1 => &self.in1,
            Channel::In2 => &self.in2,
            Channel::In3 => &self.in3,
            Channel::In4 => &self.in4,
        }
    }

    fn field_mut(&mut self, channel: Channel) -> &mut Option<i32> {
        match channel {
            Channel::Temp1 => &mut self.temp1,
            Channel::Temp2 => &mut self.temp2,
            Channel::Temp3 => &mut self.temp3,
            Channel::Curr1 => &mut self.curr1,
            Channel::Curr2 => &mut self.curr2,
            Channel::In0 => &mut self.in0,
            Channel::In1 => &mut self.in1,
            Channel::In2 => &mut self.in2,
            Channel::In3 => &mut self.in3,
            Channel::In4 => &mut self.in4,
        }
    }

    /// Serialize the telemetry into JSON.
    pub fn to_json<const N: usize>(&self) -> Result<String<N>, serde_json_core::ser::Error> {
        serde_json_core::to_string(self)
    }
}

impl<I2C, P> Ltc2990<I2C, P>
where
    I2C: I2c,
    P: Publish,
{
    /// Measure every channel visible in the current mode.
    ///
    /// # Note
    /// The mode is sampled once. A concurrent mode change may take effect while the channels are
    /// being read.
    pub fn telemetry(&self) -> Result<Telemetry, Error<I2C::Error>> {
        let mode = self.mode();
        let mut telemetry = Telemetry {
            mode: mode.value(),
            ..Default::default()
        };

        for channel in mode.enabled_channels().iter() {
            *telemetry.field_mut(channel) = Some(self.read_channel(channel)?);
        }

        Ok(telemetry)
    }
}

#[cfg(test)]
mod test {
    extern crate std;

    use super::*;
    use crate::Address;
    use embedded_hal_mock::eh1::i2c::{Mock, Transaction};
    use std::vec;

    #[test]
    fn report_visible_channels() {
        // Mode 4 measures T2 and V3-V4 in addition to the static channels. Channels are read in
        // index order.
        let expectations = [
            Transaction::write(0x4C, vec![0x01, 0x1C]),
            Transaction::write(0x4C, vec![0x02, 0x01]),
            Transaction::write_read(0x4C, vec![0x0E], vec![0x20, 0x00]),
            Transaction::write_read(0x4C, vec![0x0A], vec![0x00, 0x64]),
            Transaction::write_read(0x4C, vec![0x04], vec![0x01, 0x90]),
            Transaction::write_read(0x4C, vec![0x06], vec![0x01, 0xA0]),
        ];

        let device = Ltc2990::new(Mock::new(&expectations), Address::Adr00, Some(4)).unwrap();
        let telemetry = device.telemetry().unwrap();

        assert_eq!(telemetry.mode, 4);
        assert_eq!(telemetry.get(Channel::In0), Some(5000));
        assert_eq!(telemetry.get(Channel::Curr2), Some(1942));
        assert_eq!(telemetry.get(Channel::Temp1), Some(25000));
        assert_eq!(telemetry.get(Channel::Temp2), Some(26000));
        assert_eq!(telemetry.get(Channel::In1), None);

        let json: String<256> = telemetry.to_json().unwrap();
        assert_eq!(
            json.as_str(),
            r#"{"mode":4,"temp1":25000,"temp2":26000,"curr2":1942,"in0":5000}"#
        );

        device.release().0.done();
    }

    #[test]
    fn buffer_too_small() {
        let telemetry = Telemetry {
            mode: 6,
            temp1: Some(25000),
            ..Default::default()
        };

        assert!(telemetry.to_json::<8>().is_err());
        assert_eq!(
            telemetry.to_json::<64>().unwrap().as_str(),
            r#"{"mode":6,"temp1":25000}"#
        );
    }
}
