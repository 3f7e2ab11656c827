//! Stand-in stack that logs what it receives.
//!
//! Used by the `gateway` binary until a Zigbee stack binding is linked, and
//! handy for dry runs on the host.

use log::info;

use super::ZigbeeStack;
use crate::config::GatewayConfig;
use crate::security::InstallCode;

/// Logs the handed-off configuration and keeps it for inspection.
#[derive(Debug, Default)]
pub struct LoggingStack {
    config: Option<GatewayConfig>,
    install_codes: usize,
}

impl LoggingStack {
    /// Configuration received from the sequencer, if any.
    pub fn config(&self) -> Option<&GatewayConfig> {
        self.config.as_ref()
    }

    /// Number of install codes registered.
    pub fn install_codes(&self) -> usize {
        self.install_codes
    }
}

impl ZigbeeStack for LoggingStack {
    fn init(&mut self, config: GatewayConfig) {
        info!("Stack init: {}", config);
        info!(
            "Basic cluster: manufacturer={:02x?} model={:02x?}",
            config.manufacturer_name().as_zcl_bytes(),
            config.model_identifier().as_zcl_bytes()
        );
        self.config = Some(config);
    }

    fn add_install_code(&mut self, ieee_addr: u64, code: &InstallCode) {
        info!("Stack install code: {:016x} ({:?})", ieee_addr, code);
        self.install_codes += 1;
    }
}
