//! Configuration assembly.
//!
//! Merges defaults, overrides and the role request, then validates the
//! result field by field. The first failing field wins, in this order:
//! channel mask, role parameters, manufacturer name, model identifier,
//! endpoint, radio/host UART settings. A radio/host conflict is checked
//! before any field, so it is reported even when other fields are also bad.

use log::debug;

use super::channel::validate_channel_mask;
use super::defaults::GatewayDefaults;
use super::gateway::GatewayConfig;
use super::overrides::ConfigOverrides;
use super::role::{DeviceRole, RoleDescriptor};
use super::transport::{check_transport_conflict, validate_transport};
use super::validate::{validate_endpoint, validate_max_children};
use super::zcl::{validate_zcl_string, ZCL_STRING_MAX_LEN};
use super::ConfigError;

/// Apply role-level overrides to a role request.
pub fn apply_role_overrides(role: &RoleDescriptor, overrides: &ConfigOverrides) -> RoleDescriptor {
    let mut merged = *role;
    if let Some(tag) = overrides.role {
        merged.role = tag;
    }
    let p = &mut merged.params;
    if let Some(v) = overrides.max_children {
        p.max_children = v;
    }
    if let Some(v) = overrides.install_code_policy {
        p.install_code_policy = Some(v);
    }
    if let Some(v) = overrides.ed_timeout {
        p.ed_timeout = v;
    }
    if let Some(v) = overrides.keep_alive_ms {
        p.keep_alive_ms = v;
    }
    merged
}

/// Assemble and validate the gateway configuration.
///
/// Deterministic: identical inputs yield identical configurations. Never
/// returns a partially valid value.
pub fn assemble(
    defaults: &GatewayDefaults,
    overrides: &ConfigOverrides,
    role: &RoleDescriptor,
) -> Result<GatewayConfig, ConfigError> {
    let channel_mask = overrides.channel_mask.unwrap_or(defaults.channel_mask);
    let role = apply_role_overrides(role, overrides);
    let manufacturer_name = overrides
        .manufacturer_name
        .as_deref()
        .unwrap_or(defaults.manufacturer_name);
    let model_identifier = overrides
        .model_identifier
        .as_deref()
        .unwrap_or(defaults.model_identifier);
    let endpoint = overrides.endpoint.unwrap_or(defaults.endpoint);
    let radio = overrides.radio.unwrap_or(defaults.radio);
    let host = overrides.host.unwrap_or(defaults.host);

    check_transport_conflict(&radio, &host)?;

    let channel_mask = validate_channel_mask(channel_mask)?;

    // Bare validators first so a plain range violation is reported as such;
    // the descriptor then adds role-specific checks.
    if role.role.accepts_children() {
        validate_max_children(role.params.max_children, defaults.max_children_ceiling)?;
    }
    let role_params = role.describe(defaults.max_children_ceiling)?;

    let manufacturer_name = validate_zcl_string(manufacturer_name, ZCL_STRING_MAX_LEN)
        .map_err(|e| e.with_field("manufacturer_name"))?;
    let model_identifier = validate_zcl_string(model_identifier, ZCL_STRING_MAX_LEN)
        .map_err(|e| e.with_field("model_identifier"))?;
    let endpoint = validate_endpoint(endpoint)?;
    validate_transport(&radio, &host)?;

    let config = GatewayConfig {
        channel_mask,
        role: role_params,
        manufacturer_name,
        model_identifier,
        endpoint,
        radio,
        host,
    };
    debug!("Assembled configuration: {}", config);
    Ok(config)
}

/// Role the assembler will describe: the override if set, else the request.
pub fn requested_role(role: &RoleDescriptor, overrides: &ConfigOverrides) -> DeviceRole {
    overrides.role.unwrap_or(role.role)
}
