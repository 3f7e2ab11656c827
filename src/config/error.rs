//! Configuration errors.
//!
//! Every failure in the bootstrap path is a `ConfigError`. The type is `Copy`
//! and carries only static strings and integers, so validators stay usable in
//! `const` context and errors can be recorded by the sequencer without
//! allocation.

use std::fmt;

use super::role::DeviceRole;

/// Errors that can occur while assembling or handing off the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Channel mask has no bits set.
    EmptyMask,
    /// Channel mask selects bits outside channels 11-26.
    ChannelOutOfRange { mask: u32 },
    /// Numeric field is larger than the stack allows.
    ExceedsCeiling {
        field: &'static str,
        value: u32,
        ceiling: u32,
    },
    /// ZCL string length prefix does not match the payload.
    LengthMismatch {
        field: &'static str,
        declared: usize,
        actual: usize,
    },
    /// ZCL string payload exceeds the maximum length.
    TooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
    /// A role-specific parameter is missing or invalid.
    InvalidRoleParameter {
        role: DeviceRole,
        field: &'static str,
        constraint: &'static str,
    },
    /// Radio and host configuration both claim a UART transport.
    ConflictingTransport,
    /// The configuration was already passed to the stack.
    AlreadyHandedOff,
    /// Handoff was attempted before the configuration was validated.
    NotReady,
    /// Endpoint id outside 1-240.
    InvalidEndpoint { value: u8 },
    /// UART settings for a radio or host link are invalid.
    InvalidTransport {
        field: &'static str,
        reason: &'static str,
    },
    /// An override value could not be parsed.
    InvalidOverride {
        key: &'static str,
        expected: &'static str,
    },
    /// Install code is malformed or fails its CRC.
    InvalidInstallCode { reason: &'static str },
}

impl ConfigError {
    /// Attach a field name to a field-agnostic validator error.
    ///
    /// Only the ZCL string and ceiling errors carry a field; other variants
    /// are returned unchanged.
    pub const fn with_field(self, field: &'static str) -> Self {
        match self {
            Self::LengthMismatch {
                declared, actual, ..
            } => Self::LengthMismatch {
                field,
                declared,
                actual,
            },
            Self::TooLong { len, max, .. } => Self::TooLong { field, len, max },
            Self::ExceedsCeiling { value, ceiling, .. } => Self::ExceedsCeiling {
                field,
                value,
                ceiling,
            },
            other => other,
        }
    }

    /// Name of the offending field, when the error is tied to one.
    pub fn field(&self) -> Option<&'static str> {
        match *self {
            Self::EmptyMask | Self::ChannelOutOfRange { .. } => Some("channel_mask"),
            Self::ExceedsCeiling { field, .. }
            | Self::LengthMismatch { field, .. }
            | Self::TooLong { field, .. }
            | Self::InvalidRoleParameter { field, .. }
            | Self::InvalidTransport { field, .. } => Some(field),
            Self::InvalidEndpoint { .. } => Some("endpoint"),
            Self::InvalidOverride { key, .. } => Some(key),
            Self::ConflictingTransport => Some("radio/host"),
            Self::AlreadyHandedOff | Self::NotReady | Self::InvalidInstallCode { .. } => None,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMask => write!(f, "channel_mask: no channel selected"),
            Self::ChannelOutOfRange { mask } => write!(
                f,
                "channel_mask: 0x{:08x} selects channels outside 11-26",
                mask
            ),
            Self::ExceedsCeiling {
                field,
                value,
                ceiling,
            } => write!(f, "{}: {} exceeds ceiling {}", field, value, ceiling),
            Self::LengthMismatch {
                field,
                declared,
                actual,
            } => write!(
                f,
                "{}: declared length {} but payload is {} bytes",
                field, declared, actual
            ),
            Self::TooLong { field, len, max } => {
                write!(f, "{}: {} bytes (max {})", field, len, max)
            }
            Self::InvalidRoleParameter {
                role,
                field,
                constraint,
            } => write!(f, "{} {}: {}", role, field, constraint),
            Self::ConflictingTransport => write!(
                f,
                "radio/host: radio and host connection both claim a UART link"
            ),
            Self::AlreadyHandedOff => write!(f, "configuration already handed to the stack"),
            Self::NotReady => write!(f, "configuration has not been validated"),
            Self::InvalidEndpoint { value } => {
                write!(f, "endpoint: {} outside 1-240", value)
            }
            Self::InvalidTransport { field, reason } => write!(f, "{}: {}", field, reason),
            Self::InvalidOverride { key, expected } => {
                write!(f, "{}: expected {}", key, expected)
            }
            Self::InvalidInstallCode { reason } => write!(f, "install code: {}", reason),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_field_renames_zcl_errors() {
        let err = ConfigError::TooLong {
            field: "zcl_string",
            len: 40,
            max: 32,
        }
        .with_field("model_identifier");
        assert_eq!(err.field(), Some("model_identifier"));
        assert_eq!(err.to_string(), "model_identifier: 40 bytes (max 32)");
    }

    #[test]
    fn test_with_field_leaves_other_variants() {
        assert_eq!(
            ConfigError::EmptyMask.with_field("anything"),
            ConfigError::EmptyMask
        );
    }

    #[test]
    fn test_display_names_field_and_constraint() {
        let err = ConfigError::ExceedsCeiling {
            field: "max_children",
            value: 15,
            ceiling: 10,
        };
        assert_eq!(err.to_string(), "max_children: 15 exceeds ceiling 10");

        let err = ConfigError::InvalidRoleParameter {
            role: DeviceRole::Coordinator,
            field: "install_code_policy",
            constraint: "must be true or false",
        };
        assert_eq!(
            err.to_string(),
            "coordinator install_code_policy: must be true or false"
        );
    }

    #[test]
    fn test_handoff_errors_have_no_field() {
        assert_eq!(ConfigError::AlreadyHandedOff.field(), None);
        assert_eq!(ConfigError::NotReady.field(), None);
    }
}
