//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate endpoint URLs and object identifiers
//! - Validate value ranges (timeouts > 0, gas budget > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ToolkitConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;

use crate::config::schema::ToolkitConfig;

/// A single semantic problem in a configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `network.rpc_url`.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ToolkitConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_url(&mut errors, "network.rpc_url", &config.network.rpc_url);
    for (i, url) in config.network.failover_urls.iter().enumerate() {
        check_url(&mut errors, &format!("network.failover_urls[{}]", i), url);
    }
    check_url(&mut errors, "network.faucet_url", &config.network.faucet_url);

    if config.network.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "network.rpc_timeout_secs",
            "must be greater than zero",
        ));
    }

    if config.keys.mnemonic_env.trim().is_empty() {
        errors.push(ValidationError::new("keys.mnemonic_env", "must not be empty"));
    }
    if let Some(path) = &config.keys.derivation_path {
        if let Err(e) = crate::keys::validate_path(Some(path.as_str())) {
            errors.push(ValidationError::new("keys.derivation_path", e.to_string()));
        }
    }

    check_hex_id(&mut errors, "contract.package_id", &config.contract.package_id);
    check_hex_id(
        &mut errors,
        "contract.global_config_id",
        &config.contract.global_config_id,
    );

    if config.contract.coin_type.split("::").count() != 3 {
        errors.push(ValidationError::new(
            "contract.coin_type",
            "expected <address>::<module>::<name>",
        ));
    }

    if config.contract.gas_budget == 0 {
        errors.push(ValidationError::new(
            "contract.gas_budget",
            "must be greater than zero",
        ));
    }

    let retries = &config.retries;
    if retries.enabled {
        if retries.max_attempts == 0 {
            errors.push(ValidationError::new(
                "retries.max_attempts",
                "must be at least 1 when retries are enabled",
            ));
        }
        if retries.base_delay_ms > retries.max_delay_ms {
            errors.push(ValidationError::new(
                "retries.base_delay_ms",
                "must not exceed retries.max_delay_ms",
            ));
        }
    }

    match config.observability.log_format.as_str() {
        "pretty" | "json" => {}
        other => errors.push(ValidationError::new(
            "observability.log_format",
            format!("unknown format '{}', expected 'pretty' or 'json'", other),
        )),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if let Err(e) = value.parse::<url::Url>() {
        errors.push(ValidationError::new(field, format!("invalid URL '{}': {}", value, e)));
    }
}

// Empty identifiers are allowed.
fn check_hex_id(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    let valid = value
        .strip_prefix("0x")
        .map(|hex| !hex.is_empty() && hex.len() <= 64 && hex.chars().all(|c| c.is_ascii_hexdigit()))
        .unwrap_or(false);
    if !valid {
        errors.push(ValidationError::new(field, "expected 0x-prefixed hex identifier"));
    }
}
