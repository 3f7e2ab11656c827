//! Scalar field validators.
//!
//! Channel mask and ZCL string validators live next to their types in
//! [`super::channel`] and [`super::zcl`]. All validators are `const fn` and
//! side-effect free.

use super::ConfigError;

/// Stack-imposed ceiling on direct children of a coordinator or router.
pub const MAX_CHILDREN_CEILING: u32 = 10;

/// First application endpoint id.
pub const MIN_ENDPOINT: u8 = 1;

/// Last application endpoint id; 241-254 are reserved, 255 is broadcast.
pub const MAX_ENDPOINT: u8 = 240;

/// Validate the number of children a node accepts.
///
/// Returns the value unchanged when it is within `ceiling`. The stack stores
/// the count in a byte, so the effective ceiling never exceeds 255.
pub const fn validate_max_children(raw: u32, ceiling: u32) -> Result<u8, ConfigError> {
    let limit = if ceiling > u8::MAX as u32 {
        u8::MAX as u32
    } else {
        ceiling
    };
    if raw > limit {
        return Err(ConfigError::ExceedsCeiling {
            field: "max_children",
            value: raw,
            ceiling: limit,
        });
    }
    Ok(raw as u8)
}

/// Validate an application endpoint id.
pub const fn validate_endpoint(raw: u8) -> Result<u8, ConfigError> {
    if raw < MIN_ENDPOINT || raw > MAX_ENDPOINT {
        return Err(ConfigError::InvalidEndpoint { value: raw });
    }
    Ok(raw)
}
