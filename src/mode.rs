//! LTC2990 measurement modes.
//!
//! # Copyright
//! Copyright (C) 2020 QUARTIQ GmbH - All Rights Reserved
//! Unauthorized usage, editing, or copying is strictly prohibited.
//! Proprietary and confidential.
use crate::channel::{Channel, ChannelSet};

/// Channels measured in each mode, excluding the static channels.
const MODE_CHANNELS: [ChannelSet; 8] = [
    ChannelSet::empty()
        .with(Channel::In1)
        .with(Channel::In2)
        .with(Channel::Temp3),
    ChannelSet::empty().with(Channel::Curr1).with(Channel::Temp3),
    ChannelSet::empty()
        .with(Channel::Curr1)
        .with(Channel::In3)
        .with(Channel::In4),
    ChannelSet::empty()
        .with(Channel::Temp2)
        .with(Channel::In3)
        .with(Channel::In4),
    ChannelSet::empty().with(Channel::Temp2).with(Channel::Curr2),
    ChannelSet::empty().with(Channel::Temp2).with(Channel::Temp3),
    ChannelSet::empty().with(Channel::Curr1).with(Channel::Curr2),
    ChannelSet::empty()
        .with(Channel::In1)
        .with(Channel::In2)
        .with(Channel::In3)
        .with(Channel::In4),
];

/// A V1..V4 measurement mode. The value is always within 0..=7.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Mode(u8);

impl Mode {
    /// Mode 6 measures both differential pairs.
    pub const DEFAULT: Mode = Mode(6);

    /// The largest valid mode.
    pub const MAX: u8 = 7;

    /// Construct a mode.
    ///
    /// # Returns
    /// None if `mode` is larger than [Mode::MAX].
    pub fn new(mode: u32) -> Option<Self> {
        if mode > Self::MAX as u32 {
            None
        } else {
            Some(Mode(mode as u8))
        }
    }

    /// Get the 3-bit mode value.
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Get the mode-dependent channels measured in this mode.
    pub fn mode_channels(&self) -> ChannelSet {
        MODE_CHANNELS[self.0 as usize]
    }

    /// Get all channels measured in this mode, including the static channels.
    pub fn enabled_channels(&self) -> ChannelSet {
        self.mode_channels().union(ChannelSet::STATIC)
    }

    /// Check if a channel carries a meaningful measurement in this mode.
    pub fn is_visible(&self, channel: Channel) -> bool {
        self.enabled_channels().contains(channel)
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::DEFAULT
    }
}

impl core::fmt::Display for Mode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}
