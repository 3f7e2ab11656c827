//! Zigbee network role selection.
//!
//! A [`RoleDescriptor`] carries the requested role and its raw parameters as
//! they come from defaults and overrides. [`RoleDescriptor::describe`] turns
//! it into validated [`RoleParameters`].
//!
//! # Example
//!
//! ```
//! use esp_zigbee_gateway::config::{DeviceRole, RoleDescriptor, RoleParameters};
//!
//! let role: DeviceRole = "coordinator".parse().unwrap();
//! let descriptor = RoleDescriptor::coordinator(10, Some(false));
//! assert_eq!(descriptor.role, role);
//!
//! let params = descriptor.describe(10).unwrap();
//! assert_eq!(
//!     params,
//!     RoleParameters::Coordinator { max_children: 10, install_code_policy: false }
//! );
//! ```

use std::fmt;

use super::validate::validate_max_children;
use super::ConfigError;

/// Network role tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceRole {
    /// Forms the network and acts as trust center.
    Coordinator,
    /// Joins and routes for others.
    Router,
    /// Joins as a sleepy or non-routing leaf.
    EndDevice,
}

impl DeviceRole {
    /// Name used in logs, errors and overrides.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Coordinator => "coordinator",
            Self::Router => "router",
            Self::EndDevice => "end-device",
        }
    }

    /// Whether the role accepts child devices.
    pub fn accepts_children(&self) -> bool {
        !matches!(self, Self::EndDevice)
    }
}

impl std::str::FromStr for DeviceRole {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "coordinator" | "zc" => Ok(Self::Coordinator),
            "router" | "zr" => Ok(Self::Router),
            "end-device" | "end_device" | "enddevice" | "zed" => Ok(Self::EndDevice),
            _ => Err(ConfigError::InvalidOverride {
                key: "ZB_ROLE",
                expected: "coordinator, router or end-device",
            }),
        }
    }
}

impl fmt::Display for DeviceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(not(target_os = "espidf"))]
impl serde::Serialize for DeviceRole {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(not(target_os = "espidf"))]
impl<'de> serde::Deserialize<'de> for DeviceRole {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// End device aging timeout.
///
/// Index 0 is 10 seconds; index `n` for 1-14 is `2^n` minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(not(target_os = "espidf"), derive(serde::Serialize))]
pub struct EndDeviceTimeout(u8);

impl EndDeviceTimeout {
    /// Largest valid table index (16384 minutes).
    pub const MAX_INDEX: u8 = 14;

    /// Default used by the stack examples (64 minutes).
    pub const DEFAULT: Self = Self(6);

    /// Look up a timeout by table index.
    pub const fn from_index(index: u8) -> Option<Self> {
        if index > Self::MAX_INDEX {
            None
        } else {
            Some(Self(index))
        }
    }

    /// Table index as passed to the stack.
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Timeout in seconds.
    pub const fn as_secs(self) -> u64 {
        if self.0 == 0 {
            10
        } else {
            60 * (1u64 << self.0)
        }
    }
}

/// Raw role parameters before validation.
///
/// Fields that do not apply to the requested role are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawRoleParameters {
    /// Child slots for coordinator and router.
    pub max_children: u32,
    /// Install-code join policy; coordinator only. `None` is rejected.
    pub install_code_policy: Option<bool>,
    /// [`EndDeviceTimeout`] index; end device only.
    pub ed_timeout: u8,
    /// Keep-alive poll interval in milliseconds; end device only.
    pub keep_alive_ms: u32,
}

impl Default for RawRoleParameters {
    fn default() -> Self {
        Self {
            max_children: 0,
            install_code_policy: Some(false),
            ed_timeout: EndDeviceTimeout::DEFAULT.index(),
            keep_alive_ms: 3000,
        }
    }
}

/// Validated role with its role-specific parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(not(target_os = "espidf"), derive(serde::Serialize))]
#[cfg_attr(
    not(target_os = "espidf"),
    serde(tag = "role", rename_all = "kebab-case")
)]
pub enum RoleParameters {
    Coordinator {
        max_children: u8,
        install_code_policy: bool,
    },
    Router {
        max_children: u8,
    },
    EndDevice {
        timeout: EndDeviceTimeout,
        keep_alive_ms: u32,
    },
}

impl RoleParameters {
    /// Role tag of this variant.
    pub fn role(&self) -> DeviceRole {
        match self {
            Self::Coordinator { .. } => DeviceRole::Coordinator,
            Self::Router { .. } => DeviceRole::Router,
            Self::EndDevice { .. } => DeviceRole::EndDevice,
        }
    }

    /// Child slots, or `None` for an end device.
    pub fn max_children(&self) -> Option<u8> {
        match *self {
            Self::Coordinator { max_children, .. } | Self::Router { max_children } => {
                Some(max_children)
            }
            Self::EndDevice { .. } => None,
        }
    }

    /// Whether joining devices must present an install code.
    pub fn install_code_policy(&self) -> bool {
        matches!(
            self,
            Self::Coordinator {
                install_code_policy: true,
                ..
            }
        )
    }
}

/// Requested role plus raw parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleDescriptor {
    pub role: DeviceRole,
    pub params: RawRoleParameters,
}

impl RoleDescriptor {
    /// Coordinator request.
    pub fn coordinator(max_children: u32, install_code_policy: Option<bool>) -> Self {
        Self {
            role: DeviceRole::Coordinator,
            params: RawRoleParameters {
                max_children,
                install_code_policy,
                ..RawRoleParameters::default()
            },
        }
    }

    /// Router request.
    pub fn router(max_children: u32) -> Self {
        Self {
            role: DeviceRole::Router,
            params: RawRoleParameters {
                max_children,
                ..RawRoleParameters::default()
            },
        }
    }

    /// End device request.
    pub fn end_device(ed_timeout: u8, keep_alive_ms: u32) -> Self {
        Self {
            role: DeviceRole::EndDevice,
            params: RawRoleParameters {
                ed_timeout,
                keep_alive_ms,
                ..RawRoleParameters::default()
            },
        }
    }

    /// Validate the raw parameters for the requested role.
    ///
    /// Any sub-validator failure is reported as
    /// [`ConfigError::InvalidRoleParameter`] naming the role and field.
    pub fn describe(&self, ceiling: u32) -> Result<RoleParameters, ConfigError> {
        let p = &self.params;
        match self.role {
            DeviceRole::Coordinator => {
                let max_children = self.children(ceiling)?;
                let install_code_policy =
                    p.install_code_policy
                        .ok_or(ConfigError::InvalidRoleParameter {
                            role: self.role,
                            field: "install_code_policy",
                            constraint: "must be explicitly true or false",
                        })?;
                Ok(RoleParameters::Coordinator {
                    max_children,
                    install_code_policy,
                })
            }
            DeviceRole::Router => Ok(RoleParameters::Router {
                max_children: self.children(ceiling)?,
            }),
            DeviceRole::EndDevice => {
                let timeout = EndDeviceTimeout::from_index(p.ed_timeout).ok_or(
                    ConfigError::InvalidRoleParameter {
                        role: self.role,
                        field: "ed_timeout",
                        constraint: "timeout index must be 0-14",
                    },
                )?;
                if p.keep_alive_ms == 0 {
                    return Err(ConfigError::InvalidRoleParameter {
                        role: self.role,
                        field: "keep_alive_ms",
                        constraint: "must be non-zero",
                    });
                }
                Ok(RoleParameters::EndDevice {
                    timeout,
                    keep_alive_ms: p.keep_alive_ms,
                })
            }
        }
    }

    fn children(&self, ceiling: u32) -> Result<u8, ConfigError> {
        validate_max_children(self.params.max_children, ceiling).map_err(|_| {
            ConfigError::InvalidRoleParameter {
                role: self.role,
                field: "max_children",
                constraint: "exceeds the stack child ceiling",
            }
        })
    }
}
