//! Radio and host connection modes.
//!
//! The stack either drives the SoC's own 802.15.4 radio or talks to a radio
//! co-processor (RCP) over UART. Independently, the node may expose a host
//! link (CLI or RCP) on a UART. Only one side may claim a UART link.

use std::fmt;

use super::ConfigError;

/// Number of UART controllers on the target SoC family.
pub const UART_PORT_COUNT: u8 = 3;

/// Fastest baud rate the UART peripheral supports.
pub const MAX_BAUD_RATE: u32 = 5_000_000;

/// Default RCP link baud rate.
pub const DEFAULT_RCP_BAUD_RATE: u32 = 460_800;

/// UART link settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    not(target_os = "espidf"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct UartConfig {
    pub port: u8,
    pub baud_rate: u32,
    pub rx_pin: u8,
    pub tx_pin: u8,
}

impl UartConfig {
    /// Default RCP wiring: UART1, 460800 baud, RX 4, TX 5.
    pub const fn rcp_default() -> Self {
        Self {
            port: 1,
            baud_rate: DEFAULT_RCP_BAUD_RATE,
            rx_pin: 4,
            tx_pin: 5,
        }
    }

    /// Validate port, baud rate and pin assignment.
    pub const fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        if self.port >= UART_PORT_COUNT {
            return Err(ConfigError::InvalidTransport {
                field,
                reason: "UART port must be 0-2",
            });
        }
        if self.baud_rate == 0 || self.baud_rate > MAX_BAUD_RATE {
            return Err(ConfigError::InvalidTransport {
                field,
                reason: "baud rate must be 1-5000000",
            });
        }
        if self.rx_pin == self.tx_pin {
            return Err(ConfigError::InvalidTransport {
                field,
                reason: "RX and TX must use different pins",
            });
        }
        Ok(())
    }
}

/// How the stack reaches the 802.15.4 radio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    not(target_os = "espidf"),
    derive(serde::Serialize, serde::Deserialize)
)]
#[cfg_attr(
    not(target_os = "espidf"),
    serde(tag = "mode", content = "uart", rename_all = "kebab-case")
)]
pub enum RadioConfig {
    /// The SoC's built-in radio.
    #[default]
    Native,
    /// A radio co-processor over UART.
    UartRcp(UartConfig),
}

impl RadioConfig {
    /// Whether this mode claims a UART link.
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::UartRcp(_))
    }

    /// UART settings, if any.
    pub const fn uart(&self) -> Option<&UartConfig> {
        match self {
            Self::Native => None,
            Self::UartRcp(uart) => Some(uart),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::UartRcp(_) => "uart-rcp",
        }
    }
}

impl fmt::Display for RadioConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Optional host connection exposed by the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    not(target_os = "espidf"),
    derive(serde::Serialize, serde::Deserialize)
)]
#[cfg_attr(
    not(target_os = "espidf"),
    serde(tag = "mode", content = "uart", rename_all = "kebab-case")
)]
pub enum HostConfig {
    /// No host link.
    #[default]
    None,
    /// Command-line interface over UART.
    CliUart(UartConfig),
    /// Node acts as RCP for an external host.
    RcpUart(UartConfig),
}

impl HostConfig {
    /// Whether this mode claims a UART link.
    pub const fn is_active(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// UART settings, if any.
    pub const fn uart(&self) -> Option<&UartConfig> {
        match self {
            Self::None => None,
            Self::CliUart(uart) | Self::RcpUart(uart) => Some(uart),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::CliUart(_) => "cli-uart",
            Self::RcpUart(_) => "rcp-uart",
        }
    }
}

impl fmt::Display for HostConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reject radio/host combinations where both sides claim a UART link.
pub const fn check_transport_conflict(
    radio: &RadioConfig,
    host: &HostConfig,
) -> Result<(), ConfigError> {
    if radio.is_active() && host.is_active() {
        return Err(ConfigError::ConflictingTransport);
    }
    Ok(())
}

/// Validate UART settings of whichever side is active.
pub const fn validate_transport(radio: &RadioConfig, host: &HostConfig) -> Result<(), ConfigError> {
    if let Some(uart) = radio.uart() {
        if let Err(e) = uart.validate("radio") {
            return Err(e);
        }
    }
    if let Some(uart) = host.uart() {
        if let Err(e) = uart.validate("host") {
            return Err(e);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_native_and_none() {
        assert_eq!(RadioConfig::default(), RadioConfig::Native);
        assert_eq!(HostConfig::default(), HostConfig::None);
        assert!(check_transport_conflict(&RadioConfig::Native, &HostConfig::None).is_ok());
    }

    #[test]
    fn test_single_active_side_allowed() {
        let uart = UartConfig::rcp_default();
        assert!(check_transport_conflict(&RadioConfig::UartRcp(uart), &HostConfig::None).is_ok());
        assert!(check_transport_conflict(&RadioConfig::Native, &HostConfig::RcpUart(uart)).is_ok());
        assert!(check_transport_conflict(&RadioConfig::Native, &HostConfig::CliUart(uart)).is_ok());
    }

    #[test]
    fn test_both_sides_active_conflict() {
        let uart = UartConfig::rcp_default();
        assert_eq!(
            check_transport_conflict(&RadioConfig::UartRcp(uart), &HostConfig::CliUart(uart)),
            Err(ConfigError::ConflictingTransport)
        );
    }

    #[test]
    fn test_uart_validation() {
        let mut uart = UartConfig::rcp_default();
        assert!(uart.validate("radio").is_ok());

        uart.port = 3;
        assert!(matches!(
            uart.validate("radio"),
            Err(ConfigError::InvalidTransport { field: "radio", .. })
        ));

        let mut uart = UartConfig::rcp_default();
        uart.baud_rate = 0;
        assert!(uart.validate("host").is_err());

        let mut uart = UartConfig::rcp_default();
        uart.tx_pin = uart.rx_pin;
        assert!(uart.validate("host").is_err());
    }

    #[test]
    fn test_validate_transport_names_side() {
        let mut bad = UartConfig::rcp_default();
        bad.baud_rate = MAX_BAUD_RATE + 1;
        assert!(matches!(
            validate_transport(&RadioConfig::Native, &HostConfig::CliUart(bad)),
            Err(ConfigError::InvalidTransport { field: "host", .. })
        ));
        assert!(validate_transport(&RadioConfig::Native, &HostConfig::None).is_ok());
    }
}
