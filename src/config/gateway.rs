//! The assembled gateway configuration.

use std::fmt;

use super::channel::ChannelMask;
use super::role::RoleParameters;
use super::transport::{HostConfig, RadioConfig};
use super::zcl::ZclString;

/// Fully validated configuration handed to the Zigbee stack.
///
/// Only [`super::assemble`] constructs it. Fields are private and the type is
/// `Copy`, so the stack receives its own copy and nothing can change the
/// sequencer's copy after validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(not(target_os = "espidf"), derive(serde::Serialize))]
pub struct GatewayConfig {
    pub(super) channel_mask: ChannelMask,
    pub(super) role: RoleParameters,
    pub(super) manufacturer_name: ZclString,
    pub(super) model_identifier: ZclString,
    pub(super) endpoint: u8,
    pub(super) radio: RadioConfig,
    pub(super) host: HostConfig,
}

impl GatewayConfig {
    pub fn channel_mask(&self) -> ChannelMask {
        self.channel_mask
    }

    pub fn role(&self) -> &RoleParameters {
        &self.role
    }

    /// Basic cluster manufacturer name.
    pub fn manufacturer_name(&self) -> &ZclString {
        &self.manufacturer_name
    }

    /// Basic cluster model identifier.
    pub fn model_identifier(&self) -> &ZclString {
        &self.model_identifier
    }

    /// HA thermostat endpoint id.
    pub fn endpoint(&self) -> u8 {
        self.endpoint
    }

    pub fn radio(&self) -> &RadioConfig {
        &self.radio
    }

    pub fn host(&self) -> &HostConfig {
        &self.host
    }
}

impl fmt::Display for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "role={} channels={} manufacturer={:?} model={:?} endpoint={} radio={} host={}",
            self.role.role(),
            self.channel_mask,
            self.manufacturer_name.to_string(),
            self.model_identifier.to_string(),
            self.endpoint,
            self.radio,
            self.host
        )?;
        if let Some(max_children) = self.role.max_children() {
            write!(f, " max_children={}", max_children)?;
        }
        if self.role.install_code_policy() {
            write!(f, " install_code_policy=on")?;
        }
        Ok(())
    }
}
