//! LTC2990 register value conversions
//!
//! # Copyright
//! Copyright (C) 2020 QUARTIQ GmbH - All Rights Reserved
//! Unauthorized usage, editing, or copying is strictly prohibited.
//! Proprietary and confidential.
//!
//! # Description
//! All conversions use integer arithmetic only. Divisions truncate toward zero.
use bit_field::BitField;

use crate::channel::Channel;

/// Differential voltage resolution (19.42uV/LSB), applied to the 4x scaled code.
const DIFFERENTIAL_SCALE: i32 = 1942;
const DIFFERENTIAL_DIVISOR: i32 = 4 * 100;

/// Single-ended voltage resolution (305.18uV/LSB), applied to the 4x scaled code.
const VOLTAGE_SCALE: i32 = 30518;
const VOLTAGE_DIVISOR: i32 = 4 * 100 * 1000;

/// V_CC is measured with a 2.5V offset.
const SUPPLY_OFFSET_MV: i32 = 2500;

/// Sign-extend the 14-bit voltage field of a measurement register.
///
/// # Note
/// Bit 14 is the sign and bits 13..0 the magnitude. The result is scaled by 4 to keep two bits of
/// headroom for the fixed-point conversions. The data-valid bit 15 is ignored.
///
/// # Args
/// * `raw` - The raw register word.
pub fn decode_signed14(raw: u16) -> i32 {
    let magnitude = raw.get_bits(0..14) as i32;

    if raw.get_bit(14) {
        -(0x4000 - magnitude) << 2
    } else {
        magnitude << 2
    }
}

/// Convert a 13-bit temperature register word.
///
/// # Returns
/// The temperature in millidegrees Celsius (0.0625 degrees/LSB).
fn temperature(raw: u16) -> i32 {
    let code = (raw.get_bits(0..13) as i32) << 3;
    (code * 1000) >> 7
}

/// Convert a raw register word read for `channel` into its physical value.
///
/// # Args
/// * `channel` - The channel the register was read for.
/// * `raw` - The register word.
///
/// # Returns
/// Millidegrees Celsius for temperatures, microvolts for differential channels and millivolts for
/// voltages.
pub fn convert(channel: Channel, raw: u16) -> i32 {
    match channel {
        Channel::Temp1 | Channel::Temp2 | Channel::Temp3 => temperature(raw),
        Channel::Curr1 | Channel::Curr2 => {
            decode_signed14(raw) * DIFFERENTIAL_SCALE / DIFFERENTIAL_DIVISOR
        }
        Channel::In0 => decode_signed14(raw) * VOLTAGE_SCALE / VOLTAGE_DIVISOR + SUPPLY_OFFSET_MV,
        Channel::In1 | Channel::In2 | Channel::In3 | Channel::In4 => {
            decode_signed14(raw) * VOLTAGE_SCALE / VOLTAGE_DIVISOR
        }
    }
}
