//! Compile-time defaults for the HA thermostat gateway.
//!
//! These mirror the reference firmware header. The `const` block at the
//! bottom runs the validators at compile time, so a bad edit here fails the
//! build instead of the first boot.

use super::channel::validate_channel_mask;
use super::role::RoleDescriptor;
use super::transport::{check_transport_conflict, HostConfig, RadioConfig};
use super::validate::{validate_endpoint, validate_max_children, MAX_CHILDREN_CEILING};
use super::zcl::{validate_zcl_string, ZCL_STRING_MAX_LEN};

/// Maximum number of connected devices.
pub const MAX_CHILDREN: u32 = 10;

/// Require install codes for joining devices.
pub const INSTALLCODE_POLICY_ENABLE: bool = false;

/// Thermostat device endpoint.
pub const HA_THERMOSTAT_ENDPOINT: u8 = 1;

/// Primary channel mask (channel 13).
pub const PRIMARY_CHANNEL_MASK: u32 = 1 << 13;

/// Manufacturer name, ZCL encoded.
pub const MANUFACTURER_NAME: &[u8] = b"\x09ESPRESSIF";

/// Model identifier, ZCL encoded. Build overrides may replace it with the
/// actual IDF target.
pub const MODEL_IDENTIFIER: &[u8] = b"\x07ESP32H2";

/// Raw, unvalidated startup defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayDefaults {
    pub channel_mask: u32,
    pub max_children_ceiling: u32,
    pub manufacturer_name: &'static [u8],
    pub model_identifier: &'static [u8],
    pub endpoint: u8,
    pub radio: RadioConfig,
    pub host: HostConfig,
}

impl GatewayDefaults {
    /// Defaults of the HA thermostat gateway example.
    pub const fn thermostat() -> Self {
        Self {
            channel_mask: PRIMARY_CHANNEL_MASK,
            max_children_ceiling: MAX_CHILDREN_CEILING,
            manufacturer_name: MANUFACTURER_NAME,
            model_identifier: MODEL_IDENTIFIER,
            endpoint: HA_THERMOSTAT_ENDPOINT,
            radio: RadioConfig::Native,
            host: HostConfig::None,
        }
    }
}

impl Default for GatewayDefaults {
    fn default() -> Self {
        Self::thermostat()
    }
}

/// Default coordinator role request.
pub fn default_role() -> RoleDescriptor {
    RoleDescriptor::coordinator(MAX_CHILDREN, Some(INSTALLCODE_POLICY_ENABLE))
}

const _: () = {
    let d = GatewayDefaults::thermostat();
    assert!(validate_channel_mask(d.channel_mask).is_ok());
    assert!(validate_max_children(MAX_CHILDREN, d.max_children_ceiling).is_ok());
    assert!(validate_zcl_string(d.manufacturer_name, ZCL_STRING_MAX_LEN).is_ok());
    assert!(validate_zcl_string(d.model_identifier, ZCL_STRING_MAX_LEN).is_ok());
    assert!(validate_endpoint(d.endpoint).is_ok());
    assert!(check_transport_conflict(&d.radio, &d.host).is_ok());
};
