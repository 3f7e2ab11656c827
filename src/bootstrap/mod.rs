//! Startup sequencing and handoff to the Zigbee stack.
//!
//! The [`BootstrapSequencer`] assembles the configuration once, records the
//! outcome, and hands the validated [`GatewayConfig`] to a [`ZigbeeStack`]
//! exactly once. The stack itself is an external collaborator behind the
//! trait, so the same sequencing runs on ESP32 and in host tests.
//!
//! # Example
//!
//! ```
//! use esp_zigbee_gateway::bootstrap::{BootstrapSequencer, BootstrapState, LoggingStack};
//! use esp_zigbee_gateway::config::{default_role, ConfigOverrides, GatewayDefaults};
//!
//! let mut sequencer = BootstrapSequencer::new(
//!     GatewayDefaults::thermostat(),
//!     ConfigOverrides::new(),
//!     default_role(),
//! );
//! let mut stack = LoggingStack::default();
//!
//! sequencer.start()?;
//! sequencer.handoff(&mut stack)?;
//! assert!(matches!(sequencer.state(), BootstrapState::HandedOff(_)));
//! # Ok::<(), esp_zigbee_gateway::config::ConfigError>(())
//! ```

mod log_stack;
mod sequencer;

pub use log_stack::LoggingStack;
pub use sequencer::{BootstrapSequencer, BootstrapState};

use crate::config::GatewayConfig;
use crate::security::InstallCode;

/// Stack initialization entry point.
///
/// Implemented by the platform's Zigbee stack binding. The sequencer calls
/// [`ZigbeeStack::init`] once with its own copy of the configuration, then
/// registers any queued install codes.
pub trait ZigbeeStack {
    /// Initialize the stack. The stack owns `config` from here on.
    fn init(&mut self, config: GatewayConfig);

    /// Register the install code for a joining device.
    ///
    /// Only called after [`ZigbeeStack::init`] and only when the assembled
    /// coordinator role has the install-code policy enabled.
    fn add_install_code(&mut self, ieee_addr: u64, code: &InstallCode);
}
