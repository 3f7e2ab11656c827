//! IEEE 802.15.4 channel selection for the 2.4 GHz band.
//!
//! Zigbee uses channels 11-26. A channel mask sets bit `n` to select channel
//! `n`, so `1 << 13` is channel 13 and the full band is `0x07FF_F800`.

use std::fmt;

use super::ConfigError;

/// Lowest 2.4 GHz Zigbee channel.
pub const MIN_CHANNEL: u8 = 11;

/// Highest 2.4 GHz Zigbee channel.
pub const MAX_CHANNEL: u8 = 26;

/// Mask selecting every channel from 11 to 26.
pub const ALL_CHANNELS_MASK: u32 = 0x07FF_F800;

/// A validated, non-empty set of Zigbee channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(not(target_os = "espidf"), derive(serde::Serialize))]
#[cfg_attr(not(target_os = "espidf"), serde(into = "u32"))]
pub struct ChannelMask(u32);

impl ChannelMask {
    /// Mask selecting a single channel.
    pub const fn single(channel: u8) -> Result<Self, ConfigError> {
        if channel < MIN_CHANNEL || channel > MAX_CHANNEL {
            return Err(ConfigError::ChannelOutOfRange {
                mask: 1u32.wrapping_shl(channel as u32),
            });
        }
        Ok(Self(1 << channel))
    }

    /// Build a mask from a list of channel numbers.
    pub fn from_channels(channels: &[u8]) -> Result<Self, ConfigError> {
        let mut raw = 0u32;
        for &channel in channels {
            raw |= Self::single(channel)?.0;
        }
        validate_channel_mask(raw)
    }

    /// Raw bit mask as the stack expects it.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Whether `channel` is selected.
    pub const fn contains(self, channel: u8) -> bool {
        channel >= MIN_CHANNEL && channel <= MAX_CHANNEL && self.0 & (1 << channel) != 0
    }

    /// Number of selected channels.
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// Always false; kept for API symmetry with `len`.
    pub const fn is_empty(self) -> bool {
        false
    }

    /// Iterate over selected channels in ascending order.
    pub fn channels(self) -> impl Iterator<Item = u8> {
        (MIN_CHANNEL..=MAX_CHANNEL).filter(move |&ch| self.contains(ch))
    }
}

impl From<ChannelMask> for u32 {
    fn from(mask: ChannelMask) -> Self {
        mask.0
    }
}

impl fmt::Display for ChannelMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x} [", self.0)?;
        for (i, ch) in self.channels().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", ch)?;
        }
        write!(f, "]")
    }
}

/// Validate a raw channel mask.
///
/// Fails with [`ConfigError::EmptyMask`] when no bit is set and with
/// [`ConfigError::ChannelOutOfRange`] when a bit outside 11-26 is set.
pub const fn validate_channel_mask(raw: u32) -> Result<ChannelMask, ConfigError> {
    if raw == 0 {
        return Err(ConfigError::EmptyMask);
    }
    if raw & !ALL_CHANNELS_MASK != 0 {
        return Err(ConfigError::ChannelOutOfRange { mask: raw });
    }
    Ok(ChannelMask(raw))
}
