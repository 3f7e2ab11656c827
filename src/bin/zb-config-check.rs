//! Print the configuration the gateway would hand to the Zigbee stack.
//!
//! # Usage
//!
//! ```bash
//! # Defaults plus ZB_* environment overrides
//! cargo run --bin zb-config-check
//!
//! # Overrides from a JSON file, environment on top
//! ZB_CHANNELS=15,20 cargo run --bin zb-config-check -- overrides.json
//! ```
//!
//! Exits with status 1 and the offending field when validation fails.

#[cfg(not(target_os = "espidf"))]
mod host {
    use esp_zigbee_gateway::config::{default_role, ConfigOverrides, GatewayDefaults};
    use esp_zigbee_gateway::BootstrapSequencer;
    use log::info;
    use std::path::Path;

    fn load_file(path: &Path) -> Result<ConfigOverrides, Box<dyn std::error::Error>> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        let mut overrides = ConfigOverrides::from_build_env()?;
        if let Some(path) = std::env::args().nth(1) {
            info!("Reading overrides from {}", path);
            overrides = overrides.merge(load_file(Path::new(&path))?);
        }
        overrides = overrides.merge(ConfigOverrides::from_env()?);

        let mut sequencer =
            BootstrapSequencer::new(GatewayDefaults::thermostat(), overrides, default_role());
        let config = sequencer.start()?;

        println!("{}", serde_json::to_string_pretty(&config)?);
        Ok(())
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = host::run() {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_os = "espidf")]
fn main() {
    println!("zb-config-check is a host tool.");
}
