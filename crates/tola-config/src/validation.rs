// SPDX-FileCopyrightText: 2026 Tola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as valid host strings, non-empty paths, and SMTP
//! settings that are complete when enabled.

use crate::diagnostic::ConfigError;
use crate::model::TolaConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &TolaConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.service.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "service.log_level `{}` is not one of: {}",
                config.service.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    // Validate host is not empty and looks like an IP or hostname
    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("server.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    // SMTP settings only matter when delivery is enabled.
    if config.smtp.enabled {
        if config.smtp.host.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "smtp.host must not be empty when smtp.enabled = true".to_string(),
            });
        }
        if config.smtp.from_address.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "smtp.from_address must not be empty when smtp.enabled = true"
                    .to_string(),
            });
        } else if !config.smtp.from_address.contains('@') {
            errors.push(ConfigError::Validation {
                message: format!(
                    "smtp.from_address `{}` does not look like an email address",
                    config.smtp.from_address
                ),
            });
        }
        if config.smtp.username.is_some() && config.smtp.password.is_none() {
            errors.push(ConfigError::Validation {
                message: "smtp.password must be set when smtp.username is set".to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
