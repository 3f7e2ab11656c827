//! ESP32 Zigbee gateway bootstrap library.
//!
//! Decides the node's network role, assembles the Zigbee stack configuration
//! from compile-time defaults and overrides, validates it, and hands it to the
//! stack exactly once. Everything here is platform-independent and can be
//! tested on the host machine without ESP32 hardware.

pub mod bootstrap;
pub mod config;
pub mod security;

// Re-export commonly used items
pub use bootstrap::{BootstrapSequencer, BootstrapState, LoggingStack, ZigbeeStack};
pub use config::{
    assemble, default_role, ChannelMask, ConfigError, ConfigOverrides, DeviceRole, GatewayConfig,
    GatewayDefaults, RoleDescriptor, RoleParameters, ZclString,
};
pub use security::{InstallCode, InstallCodeEntry};
