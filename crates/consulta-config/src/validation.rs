// SPDX-FileCopyrightText: 2026 Consulta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks semantic constraints that serde attributes cannot express. All
//! errors are collected rather than failing on the first one.

use crate::diagnostic::ConfigError;
use crate::model::ConsultaConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
pub fn validate_config(config: &ConsultaConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut invalid = |message: String| errors.push(ConfigError::Validation { message });

    let level = config.service.log_level.trim().to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        invalid(format!(
            "service.log_level `{}` must be one of: {}",
            config.service.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    if config.storage.database_path.trim().is_empty() {
        invalid("storage.database_path must not be empty".to_string());
    }

    let host = config.gateway.host.trim();
    if host.is_empty() {
        invalid("gateway.host must not be empty".to_string());
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
        if !is_valid_ip && !is_valid_hostname {
            invalid(format!(
                "gateway.host `{host}` is not a valid IP address or hostname"
            ));
        }
    }

    if config.gateway.port == 0 {
        invalid("gateway.port must be between 1 and 65535".to_string());
    }

    if let Some(token) = &config.gateway.bearer_token {
        if token.trim().is_empty() {
            invalid("gateway.bearer_token must not be blank when set".to_string());
        }
    }

    if let Some(base_url) = &config.meeting.base_url {
        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            invalid(format!(
                "meeting.base_url `{base_url}` must start with http:// or https://"
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
