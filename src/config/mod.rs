//! Gateway configuration: defaults, overrides, validation and assembly.
//!
//! Everything here is host-testable and free of I/O.
//!
//! # Components
//!
//! - [`channel`] - channel mask type and validator
//! - [`zcl`] - length-prefixed ZCL strings
//! - [`validate`] - scalar validators (children, endpoint)
//! - [`role`] - role request and validated role parameters
//! - [`transport`] - radio and host connection modes
//! - [`defaults`] - compile-time defaults of the thermostat gateway
//! - [`overrides`] - build, environment and JSON overrides
//! - [`assemble`] - merging and validation into a [`GatewayConfig`]

pub mod assemble;
pub mod channel;
pub mod defaults;
mod error;
mod gateway;
pub mod overrides;
pub mod role;
pub mod transport;
pub mod validate;
pub mod zcl;

pub use assemble::assemble;
pub use channel::{validate_channel_mask, ChannelMask, ALL_CHANNELS_MASK};
pub use defaults::{default_role, GatewayDefaults};
pub use error::ConfigError;
pub use gateway::GatewayConfig;
pub use overrides::ConfigOverrides;
pub use role::{DeviceRole, EndDeviceTimeout, RawRoleParameters, RoleDescriptor, RoleParameters};
pub use transport::{HostConfig, RadioConfig, UartConfig};
pub use validate::{validate_endpoint, validate_max_children, MAX_CHILDREN_CEILING};
pub use zcl::{validate_zcl_string, ZclString, ZCL_STRING_MAX_LEN};
