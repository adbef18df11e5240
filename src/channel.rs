//! LTC2990 logical measurement channels.
//!
//! # Copyright
//! Copyright (C) 2020 QUARTIQ GmbH - All Rights Reserved
//! Unauthorized usage, editing, or copying is strictly prohibited.
//! Proprietary and confidential.
use bit_field::BitField;
use enum_iterator::Sequence;

use crate::Register;

/// A logical measurement of the LTC2990.
///
/// # Note
/// Several channels share a measurement register. Which interpretation is meaningful depends on
/// the configured [Mode](crate::Mode), but the register a channel reads never does.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Sequence)]
pub enum Channel {
    /// Supply voltage (V_CC).
    In0 = 0,
    /// Single-ended voltage on V1.
    In1 = 1,
    /// Single-ended voltage on V2.
    In2 = 2,
    /// Single-ended voltage on V3.
    In3 = 3,
    /// Single-ended voltage on V4.
    In4 = 4,
    /// Differential voltage V1 - V2.
    Curr1 = 5,
    /// Differential voltage V3 - V4.
    Curr2 = 6,
    /// Internal die temperature.
    Temp1 = 7,
    /// Remote diode temperature on V1-V2.
    Temp2 = 8,
    /// Remote diode temperature on V3-V4.
    Temp3 = 9,
}

impl Channel {
    /// Look up a channel from its index.
    ///
    /// # Returns
    /// None if the index does not name a channel.
    pub fn from_index(index: u8) -> Option<Self> {
        enum_iterator::all::<Channel>().find(|channel| *channel as u8 == index)
    }

    /// Get the measurement register backing the channel.
    pub fn register(&self) -> Register {
        match self {
            Channel::Temp1 => Register::TintMsb,
            Channel::In1 | Channel::Curr1 | Channel::Temp2 => Register::V1Msb,
            Channel::In2 => Register::V2Msb,
            Channel::In3 | Channel::Curr2 | Channel::Temp3 => Register::V3Msb,
            Channel::In4 => Register::V4Msb,
            Channel::In0 => Register::VccMsb,
        }
    }

    /// Check if the channel is measured regardless of the configured mode.
    pub fn is_static(&self) -> bool {
        matches!(self, Channel::Temp1 | Channel::In0)
    }
}

/// A set of channels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChannelSet(u16);

impl ChannelSet {
    /// The channels that are measured in every mode.
    pub const STATIC: ChannelSet = ChannelSet::empty().with(Channel::Temp1).with(Channel::In0);

    /// Construct a set without any channels.
    pub const fn empty() -> Self {
        ChannelSet(0)
    }

    /// Construct a set that additionally contains `channel`.
    pub const fn with(self, channel: Channel) -> Self {
        ChannelSet(self.0 | 1 << channel as u16)
    }

    /// Construct the union of two sets.
    pub const fn union(self, other: ChannelSet) -> Self {
        ChannelSet(self.0 | other.0)
    }

    pub fn contains(&self, channel: Channel) -> bool {
        self.0.get_bit(channel as usize)
    }

    pub fn insert(&mut self, channel: Channel) {
        self.0.set_bit(channel as usize, true);
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate over the channels of the set in index order.
    pub fn iter(&self) -> impl Iterator<Item = Channel> {
        let set = *self;
        enum_iterator::all::<Channel>().filter(move |channel| set.contains(*channel))
    }

    /// Get the raw bit mask. Bit `n` corresponds to the channel with index `n`.
    pub fn bits(&self) -> u16 {
        self.0
    }
}

impl FromIterator<Channel> for ChannelSet {
    fn from_iter<T: IntoIterator<Item = Channel>>(iter: T) -> Self {
        let mut set = ChannelSet::empty();
        for channel in iter {
            set.insert(channel);
        }
        set
    }
}
