//! ESP32 Zigbee gateway firmware entry point.
//!
//! Runs on both ESP32 and host platforms:
//! - **Host**: `cargo run --bin gateway`
//! - **ESP32-H2**: `cargo espflash flash --bin gateway --features esp32 --release`
//!
//! Overrides captured at build time apply first, then `ZB_*` variables from
//! the runtime environment. Install codes for joining devices can be given
//! as `ZB_INSTALL_CODES=<ieee>=<code>;<ieee>=<code>`.

use esp_zigbee_gateway::config::{default_role, ConfigOverrides, GatewayDefaults};
use esp_zigbee_gateway::{BootstrapSequencer, ConfigError, InstallCodeEntry, LoggingStack};
use log::{error, info};

// ESP32: Initialize ESP-IDF before anything else
#[cfg(feature = "esp32")]
fn platform_init() {
    esp_idf_sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();
    info!("ESP-IDF initialized");
}

// Host: Just initialize env_logger
#[cfg(not(feature = "esp32"))]
fn platform_init() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

fn load_overrides() -> Result<ConfigOverrides, ConfigError> {
    let build = ConfigOverrides::from_build_env()?;
    let runtime = ConfigOverrides::from_env()?;
    Ok(build.merge(runtime))
}

fn load_install_codes() -> Result<Vec<InstallCodeEntry>, ConfigError> {
    match std::env::var("ZB_INSTALL_CODES") {
        Ok(list) => InstallCodeEntry::parse_list(&list),
        Err(_) => Ok(Vec::new()),
    }
}

fn bootstrap() -> Result<LoggingStack, ConfigError> {
    let overrides = load_overrides()?;
    let install_codes = load_install_codes()?;

    let mut sequencer =
        BootstrapSequencer::new(GatewayDefaults::thermostat(), overrides, default_role())
            .with_install_codes(install_codes);

    // TODO: replace LoggingStack with an esp-zigbee-lib binding once one is
    // available for esp-idf-sys.
    let mut stack = LoggingStack::default();
    sequencer.run(&mut stack)?;
    Ok(stack)
}

fn main() {
    platform_init();

    info!("=== ESP Zigbee gateway starting ===");

    #[cfg(feature = "esp32")]
    info!("Platform: ESP32");
    #[cfg(not(feature = "esp32"))]
    info!("Platform: Host");

    match bootstrap() {
        Ok(stack) => {
            if let Some(config) = stack.config() {
                info!("Bootstrap complete: {}", config);
            }
        }
        Err(e) => {
            error!("Bootstrap failed: {}", e);
            std::process::exit(1);
        }
    }
}
