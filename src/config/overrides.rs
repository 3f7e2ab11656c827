//! Build-time and runtime configuration overrides.
//!
//! Every field is optional; `None` keeps the default. Overrides are applied
//! whole-field, so an override of `radio` replaces the complete radio
//! configuration rather than patching its UART settings.
//!
//! # Example
//!
//! ```
//! use esp_zigbee_gateway::config::ConfigOverrides;
//!
//! let env = [("ZB_CHANNELS", "15,20"), ("ZB_ROLE", "router")];
//! let overrides = ConfigOverrides::from_lookup(|key| {
//!     env.iter().find(|(k, _)| *k == key).map(|(_, v)| v.to_string())
//! })
//! .unwrap();
//! assert_eq!(overrides.channel_mask, Some((1 << 15) | (1 << 20)));
//! ```

use log::debug;

use super::role::DeviceRole;
use super::transport::{HostConfig, RadioConfig, UartConfig};
use super::zcl::encode_zcl;
use super::ConfigError;

/// Channel mask as a number (decimal or `0x` hex).
pub const KEY_CHANNEL_MASK: &str = "ZB_CHANNEL_MASK";
/// Comma-separated channel list; wins over [`KEY_CHANNEL_MASK`].
pub const KEY_CHANNELS: &str = "ZB_CHANNELS";
pub const KEY_ROLE: &str = "ZB_ROLE";
pub const KEY_MAX_CHILDREN: &str = "ZB_MAX_CHILDREN";
pub const KEY_INSTALL_CODE_POLICY: &str = "ZB_INSTALL_CODE_POLICY";
pub const KEY_ED_TIMEOUT: &str = "ZB_ED_TIMEOUT";
pub const KEY_KEEP_ALIVE_MS: &str = "ZB_KEEP_ALIVE_MS";
pub const KEY_MANUFACTURER_NAME: &str = "ZB_MANUFACTURER_NAME";
pub const KEY_MODEL_IDENTIFIER: &str = "ZB_MODEL_IDENTIFIER";
pub const KEY_ENDPOINT: &str = "ZB_ENDPOINT";
pub const KEY_RADIO_MODE: &str = "ZB_RADIO_MODE";
pub const KEY_HOST_MODE: &str = "ZB_HOST_MODE";

/// Every override key, in the order they are parsed.
pub const KEYS: [&str; 12] = [
    KEY_CHANNEL_MASK,
    KEY_CHANNELS,
    KEY_ROLE,
    KEY_MAX_CHILDREN,
    KEY_INSTALL_CODE_POLICY,
    KEY_ED_TIMEOUT,
    KEY_KEEP_ALIVE_MS,
    KEY_MANUFACTURER_NAME,
    KEY_MODEL_IDENTIFIER,
    KEY_ENDPOINT,
    KEY_RADIO_MODE,
    KEY_HOST_MODE,
];

/// Values of [`KEYS`] captured when the crate was built. `option_env!`
/// only takes literals, so the names are spelled out again here.
const BUILD_ENV: [(&str, Option<&str>); 12] = [
    (KEY_CHANNEL_MASK, option_env!("ZB_CHANNEL_MASK")),
    (KEY_CHANNELS, option_env!("ZB_CHANNELS")),
    (KEY_ROLE, option_env!("ZB_ROLE")),
    (KEY_MAX_CHILDREN, option_env!("ZB_MAX_CHILDREN")),
    (KEY_INSTALL_CODE_POLICY, option_env!("ZB_INSTALL_CODE_POLICY")),
    (KEY_ED_TIMEOUT, option_env!("ZB_ED_TIMEOUT")),
    (KEY_KEEP_ALIVE_MS, option_env!("ZB_KEEP_ALIVE_MS")),
    (KEY_MANUFACTURER_NAME, option_env!("ZB_MANUFACTURER_NAME")),
    (KEY_MODEL_IDENTIFIER, option_env!("ZB_MODEL_IDENTIFIER")),
    (KEY_ENDPOINT, option_env!("ZB_ENDPOINT")),
    (KEY_RADIO_MODE, option_env!("ZB_RADIO_MODE")),
    (KEY_HOST_MODE, option_env!("ZB_HOST_MODE")),
];

/// Per-field overrides on top of [`super::GatewayDefaults`] and the role
/// descriptor.
///
/// ZCL string fields hold the length-prefixed encoding; use
/// [`ConfigOverrides::with_manufacturer_name`] and
/// [`ConfigOverrides::with_model_identifier`] to encode plain text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(not(target_os = "espidf"), derive(serde::Deserialize))]
#[cfg_attr(not(target_os = "espidf"), serde(try_from = "json::OverrideDoc"))]
pub struct ConfigOverrides {
    pub channel_mask: Option<u32>,
    pub role: Option<DeviceRole>,
    pub max_children: Option<u32>,
    pub install_code_policy: Option<bool>,
    pub ed_timeout: Option<u8>,
    pub keep_alive_ms: Option<u32>,
    pub manufacturer_name: Option<Vec<u8>>,
    pub model_identifier: Option<Vec<u8>>,
    pub endpoint: Option<u8>,
    pub radio: Option<RadioConfig>,
    pub host: Option<HostConfig>,
}

impl ConfigOverrides {
    /// No overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the manufacturer name from plain text.
    pub fn with_manufacturer_name(mut self, text: &str) -> Self {
        self.manufacturer_name = Some(encode_zcl(text.as_bytes()));
        self
    }

    /// Set the model identifier from plain text.
    pub fn with_model_identifier(mut self, text: &str) -> Self {
        self.model_identifier = Some(encode_zcl(text.as_bytes()));
        self
    }

    /// Whether no field is overridden.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Combine two override sets; fields set in `later` win.
    pub fn merge(self, later: Self) -> Self {
        Self {
            channel_mask: later.channel_mask.or(self.channel_mask),
            role: later.role.or(self.role),
            max_children: later.max_children.or(self.max_children),
            install_code_policy: later.install_code_policy.or(self.install_code_policy),
            ed_timeout: later.ed_timeout.or(self.ed_timeout),
            keep_alive_ms: later.keep_alive_ms.or(self.keep_alive_ms),
            manufacturer_name: later.manufacturer_name.or(self.manufacturer_name),
            model_identifier: later.model_identifier.or(self.model_identifier),
            endpoint: later.endpoint.or(self.endpoint),
            radio: later.radio.or(self.radio),
            host: later.host.or(self.host),
        }
    }

    /// Read overrides through a key lookup.
    ///
    /// Empty values are treated as unset. Values that do not parse fail with
    /// [`ConfigError::InvalidOverride`] naming the key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut overrides = Self::new();

        if let Some(v) = get(KEY_CHANNEL_MASK) {
            overrides.channel_mask = Some(parse_u32(KEY_CHANNEL_MASK, &v)?);
        }
        if let Some(v) = get(KEY_CHANNELS) {
            overrides.channel_mask = Some(parse_channel_list(&v)?);
        }
        if let Some(v) = get(KEY_ROLE) {
            overrides.role = Some(v.parse()?);
        }
        if let Some(v) = get(KEY_MAX_CHILDREN) {
            overrides.max_children = Some(parse_u32(KEY_MAX_CHILDREN, &v)?);
        }
        if let Some(v) = get(KEY_INSTALL_CODE_POLICY) {
            overrides.install_code_policy = Some(parse_bool(KEY_INSTALL_CODE_POLICY, &v)?);
        }
        if let Some(v) = get(KEY_ED_TIMEOUT) {
            overrides.ed_timeout = Some(parse_u8(KEY_ED_TIMEOUT, &v)?);
        }
        if let Some(v) = get(KEY_KEEP_ALIVE_MS) {
            overrides.keep_alive_ms = Some(parse_u32(KEY_KEEP_ALIVE_MS, &v)?);
        }
        if let Some(v) = get(KEY_MANUFACTURER_NAME) {
            overrides = overrides.with_manufacturer_name(&v);
        }
        if let Some(v) = get(KEY_MODEL_IDENTIFIER) {
            overrides = overrides.with_model_identifier(&v);
        }
        if let Some(v) = get(KEY_ENDPOINT) {
            overrides.endpoint = Some(parse_u8(KEY_ENDPOINT, &v)?);
        }
        if let Some(v) = get(KEY_RADIO_MODE) {
            overrides.radio = Some(parse_radio_mode(&v)?);
        }
        if let Some(v) = get(KEY_HOST_MODE) {
            overrides.host = Some(parse_host_mode(&v)?);
        }

        if !overrides.is_empty() {
            debug!("Parsed overrides: {:?}", overrides);
        }
        Ok(overrides)
    }

    /// Read overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides captured from the build environment.
    ///
    /// When no model identifier is given, the upper-cased `IDF_TARGET` of
    /// the build is used.
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::from_captured(&BUILD_ENV, option_env!("IDF_TARGET"))
    }

    fn from_captured(
        captured: &[(&str, Option<&str>)],
        idf_target: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let mut overrides = Self::from_lookup(|key| {
            captured
                .iter()
                .find(|(k, _)| *k == key)
                .and_then(|(_, v)| *v)
                .map(str::to_string)
        })?;
        if overrides.model_identifier.is_none() {
            if let Some(target) = idf_target.filter(|t| !t.is_empty()) {
                overrides = overrides.with_model_identifier(&target.to_uppercase());
            }
        }
        Ok(overrides)
    }
}

fn parse_u32(key: &'static str, value: &str) -> Result<u32, ConfigError> {
    let parsed = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|_| ConfigError::InvalidOverride {
        key,
        expected: "an unsigned integer (decimal or 0x hex)",
    })
}

fn parse_u8(key: &'static str, value: &str) -> Result<u8, ConfigError> {
    let wide = parse_u32(key, value)?;
    u8::try_from(wide).map_err(|_| ConfigError::InvalidOverride {
        key,
        expected: "an integer from 0 to 255",
    })
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidOverride {
            key,
            expected: "true or false",
        }),
    }
}

/// Combine channel numbers into a raw mask. Range checks are left to
/// channel mask validation, except for numbers that cannot be a bit of a
/// `u32`.
pub(crate) fn channels_to_mask(channels: &[u8]) -> Result<u32, ConfigError> {
    channels.iter().try_fold(0u32, |mask, &ch| {
        1u32.checked_shl(u32::from(ch))
            .map(|bit| mask | bit)
            .ok_or(ConfigError::InvalidOverride {
                key: KEY_CHANNELS,
                expected: "channel numbers from 11 to 26",
            })
    })
}

fn parse_channel_list(value: &str) -> Result<u32, ConfigError> {
    let channels = value
        .split(',')
        .map(|part| parse_u8(KEY_CHANNELS, part.trim()))
        .collect::<Result<Vec<_>, _>>()?;
    channels_to_mask(&channels)
}

fn parse_radio_mode(value: &str) -> Result<RadioConfig, ConfigError> {
    match value.to_lowercase().as_str() {
        "native" => Ok(RadioConfig::Native),
        "uart-rcp" | "uart_rcp" | "rcp" => Ok(RadioConfig::UartRcp(UartConfig::rcp_default())),
        _ => Err(ConfigError::InvalidOverride {
            key: KEY_RADIO_MODE,
            expected: "native or uart-rcp",
        }),
    }
}

fn parse_host_mode(value: &str) -> Result<HostConfig, ConfigError> {
    match value.to_lowercase().as_str() {
        "none" => Ok(HostConfig::None),
        "cli-uart" | "cli_uart" | "cli" => Ok(HostConfig::CliUart(UartConfig::rcp_default())),
        "rcp-uart" | "rcp_uart" => Ok(HostConfig::RcpUart(UartConfig::rcp_default())),
        _ => Err(ConfigError::InvalidOverride {
            key: KEY_HOST_MODE,
            expected: "none, cli-uart or rcp-uart",
        }),
    }
}

/// JSON override documents (host only).
#[cfg(not(target_os = "espidf"))]
mod json {
    use serde::Deserialize;

    use super::{channels_to_mask, encode_zcl, ConfigOverrides};
    use crate::config::{ConfigError, DeviceRole, HostConfig, RadioConfig};

    /// Wire shape of an override file. Names are plain text here and get
    /// their ZCL length prefix on conversion.
    #[derive(Debug, Default, Deserialize)]
    #[serde(default, deny_unknown_fields)]
    pub struct OverrideDoc {
        channel_mask: Option<u32>,
        channels: Option<Vec<u8>>,
        role: Option<DeviceRole>,
        max_children: Option<u32>,
        install_code_policy: Option<bool>,
        ed_timeout: Option<u8>,
        keep_alive_ms: Option<u32>,
        manufacturer_name: Option<String>,
        model_identifier: Option<String>,
        endpoint: Option<u8>,
        radio: Option<RadioConfig>,
        host: Option<HostConfig>,
    }

    impl TryFrom<OverrideDoc> for ConfigOverrides {
        type Error = ConfigError;

        fn try_from(doc: OverrideDoc) -> Result<Self, Self::Error> {
            let channel_mask = match doc.channels {
                Some(channels) => Some(channels_to_mask(&channels)?),
                None => doc.channel_mask,
            };
            Ok(Self {
                channel_mask,
                role: doc.role,
                max_children: doc.max_children,
                install_code_policy: doc.install_code_policy,
                ed_timeout: doc.ed_timeout,
                keep_alive_ms: doc.keep_alive_ms,
                manufacturer_name: doc.manufacturer_name.map(|s| encode_zcl(s.as_bytes())),
                model_identifier: doc.model_identifier.map(|s| encode_zcl(s.as_bytes())),
                endpoint: doc.endpoint,
                radio: doc.radio,
                host: doc.host,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_empty_environment() {
        let overrides = ConfigOverrides::from_lookup(lookup(&[])).unwrap();
        assert!(overrides.is_empty());
    }

    #[test]
    fn test_numeric_overrides() {
        let overrides = ConfigOverrides::from_lookup(lookup(&[
            ("ZB_CHANNEL_MASK", "0x00008000"),
            ("ZB_MAX_CHILDREN", "15"),
            ("ZB_ENDPOINT", "10"),
        ]))
        .unwrap();
        assert_eq!(overrides.channel_mask, Some(1 << 15));
        assert_eq!(overrides.max_children, Some(15));
        assert_eq!(overrides.endpoint, Some(10));
    }

    #[test]
    fn test_channel_list_wins_over_mask() {
        let overrides = ConfigOverrides::from_lookup(lookup(&[
            ("ZB_CHANNEL_MASK", "8192"),
            ("ZB_CHANNELS", "11, 26"),
        ]))
        .unwrap();
        assert_eq!(overrides.channel_mask, Some((1 << 11) | (1 << 26)));
    }

    #[test]
    fn test_channel_number_beyond_u32() {
        let result = ConfigOverrides::from_lookup(lookup(&[("ZB_CHANNELS", "40")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidOverride {
                key: "ZB_CHANNELS",
                ..
            })
        ));
    }

    #[test]
    fn test_text_overrides_are_zcl_encoded() {
        let overrides = ConfigOverrides::from_lookup(lookup(&[
            ("ZB_MANUFACTURER_NAME", "ACME"),
            ("ZB_MODEL_IDENTIFIER", "ESP32C6"),
        ]))
        .unwrap();
        assert_eq!(overrides.manufacturer_name.as_deref(), Some(&b"\x04ACME"[..]));
        assert_eq!(
            overrides.model_identifier.as_deref(),
            Some(&b"\x07ESP32C6"[..])
        );
    }

    #[test]
    fn test_bool_and_role() {
        let overrides = ConfigOverrides::from_lookup(lookup(&[
            ("ZB_INSTALL_CODE_POLICY", "yes"),
            ("ZB_ROLE", "zr"),
        ]))
        .unwrap();
        assert_eq!(overrides.install_code_policy, Some(true));
        assert_eq!(overrides.role, Some(DeviceRole::Router));
    }

    #[test]
    fn test_invalid_values_name_the_key() {
        let cases = [
            ("ZB_CHANNEL_MASK", "thirteen"),
            ("ZB_MAX_CHILDREN", "-1"),
            ("ZB_INSTALL_CODE_POLICY", "maybe"),
            ("ZB_ENDPOINT", "300"),
            ("ZB_RADIO_MODE", "wifi"),
            ("ZB_HOST_MODE", "spi"),
        ];
        for (key, value) in cases {
            let err = ConfigOverrides::from_lookup(lookup(&[(key, value)])).unwrap_err();
            assert_eq!(err.field(), Some(key), "value {:?}", value);
        }
    }

    #[test]
    fn test_blank_values_ignored() {
        let overrides =
            ConfigOverrides::from_lookup(lookup(&[("ZB_MAX_CHILDREN", "  ")])).unwrap();
        assert_eq!(overrides.max_children, None);
    }

    #[test]
    fn test_transport_modes() {
        let overrides = ConfigOverrides::from_lookup(lookup(&[
            ("ZB_RADIO_MODE", "uart-rcp"),
            ("ZB_HOST_MODE", "none"),
        ]))
        .unwrap();
        assert_eq!(
            overrides.radio,
            Some(RadioConfig::UartRcp(UartConfig::rcp_default()))
        );
        assert_eq!(overrides.host, Some(HostConfig::None));
    }

    #[test]
    fn test_merge_last_write_wins() {
        let build = ConfigOverrides {
            channel_mask: Some(1 << 11),
            max_children: Some(4),
            ..Default::default()
        };
        let runtime = ConfigOverrides {
            channel_mask: Some(1 << 20),
            ..Default::default()
        };
        let merged = build.merge(runtime);
        assert_eq!(merged.channel_mask, Some(1 << 20));
        assert_eq!(merged.max_children, Some(4));
    }

    #[test]
    fn test_json_document() {
        let doc = r#"{
            "channels": [15, 25],
            "role": "router",
            "max_children": 6,
            "manufacturer_name": "ACME",
            "host": { "mode": "cli-uart", "uart": { "port": 0, "baud_rate": 115200, "rx_pin": 3, "tx_pin": 1 } }
        }"#;
        let overrides: ConfigOverrides = serde_json::from_str(doc).unwrap();
        assert_eq!(overrides.channel_mask, Some((1 << 15) | (1 << 25)));
        assert_eq!(overrides.role, Some(DeviceRole::Router));
        assert_eq!(overrides.max_children, Some(6));
        assert_eq!(overrides.manufacturer_name.as_deref(), Some(&b"\x04ACME"[..]));
        assert_eq!(
            overrides.host,
            Some(HostConfig::CliUart(UartConfig {
                port: 0,
                baud_rate: 115_200,
                rx_pin: 3,
                tx_pin: 1,
            }))
        );
    }

    #[test]
    fn test_build_env_captures_every_key() {
        let captured: Vec<&str> = BUILD_ENV.iter().map(|(k, _)| *k).collect();
        assert_eq!(captured, KEYS);

        let script = include_str!("../../build.rs");
        for key in KEYS.iter().chain(["IDF_TARGET"].iter()) {
            assert!(
                script.contains(&format!("\"{}\"", key)),
                "build.rs does not rerun on {}",
                key
            );
        }
    }

    #[test]
    fn test_captured_values_reach_every_field() {
        let captured = [
            (KEY_ED_TIMEOUT, Some("3")),
            (KEY_KEEP_ALIVE_MS, Some("5000")),
            (KEY_ENDPOINT, Some("10")),
            (KEY_RADIO_MODE, Some("native")),
            (KEY_HOST_MODE, Some("cli-uart")),
            (KEY_ROLE, None),
        ];
        let overrides = ConfigOverrides::from_captured(&captured, None).unwrap();
        assert_eq!(overrides.ed_timeout, Some(3));
        assert_eq!(overrides.keep_alive_ms, Some(5000));
        assert_eq!(overrides.endpoint, Some(10));
        assert_eq!(overrides.radio, Some(RadioConfig::Native));
        assert_eq!(
            overrides.host,
            Some(HostConfig::CliUart(UartConfig::rcp_default()))
        );
        assert_eq!(overrides.role, None);
    }

    #[test]
    fn test_idf_target_fills_model_identifier() {
        let overrides = ConfigOverrides::from_captured(&[], Some("esp32c6")).unwrap();
        assert_eq!(
            overrides.model_identifier.as_deref(),
            Some(&b"\x07ESP32C6"[..])
        );

        let captured = [(KEY_MODEL_IDENTIFIER, Some("Thermo"))];
        let overrides = ConfigOverrides::from_captured(&captured, Some("esp32c6")).unwrap();
        assert_eq!(
            overrides.model_identifier.as_deref(),
            Some(&b"\x06Thermo"[..])
        );

        let overrides = ConfigOverrides::from_captured(&[], Some("")).unwrap();
        assert!(overrides.is_empty());
    }

    #[test]
    fn test_captured_errors_name_the_key() {
        let captured = [(KEY_ENDPOINT, Some("1000"))];
        assert!(matches!(
            ConfigOverrides::from_captured(&captured, None),
            Err(ConfigError::InvalidOverride {
                key: "ZB_ENDPOINT",
                ..
            })
        ));
    }

    #[test]
    fn test_json_unknown_field_rejected() {
        let result: Result<ConfigOverrides, _> = serde_json::from_str(r#"{ "pan_id": 4660 }"#);
        assert!(result.is_err());
    }
}
