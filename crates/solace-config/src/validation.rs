// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as non-empty paths, port ranges, and sampling bounds.

use crate::diagnostic::ConfigError;
use crate::model::SolaceConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Shortest accepted HS256 secret, in bytes.
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Largest accepted history window.
pub const MAX_HISTORY_LIMIT: u32 = 100;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &SolaceConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.app.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ConfigError::validation(format!(
            "app.log_level must be one of {}, got `{}`",
            LOG_LEVELS.join(", "),
            config.app.log_level
        )));
    }

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::validation("server.host must not be empty"));
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::validation(format!(
                "server.host `{host}` is not a valid IP address or hostname"
            )));
        }
    }

    if config.server.port == 0 {
        errors.push(ConfigError::validation("server.port must not be 0"));
    }

    if config.server.request_timeout_secs == 0 {
        errors.push(ConfigError::validation(
            "server.request_timeout_secs must be greater than 0",
        ));
    }

    if let Some(secret) = &config.auth.jwt_secret
        && secret.len() < MIN_JWT_SECRET_LEN
    {
        errors.push(ConfigError::validation(format!(
            "auth.jwt_secret must be at least {MIN_JWT_SECRET_LEN} bytes, got {}",
            secret.len()
        )));
    }

    let base_url = config.openai.base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        errors.push(ConfigError::validation(format!(
            "openai.base_url must start with http:// or https://, got `{base_url}`"
        )));
    }

    if config.openai.model.trim().is_empty() {
        errors.push(ConfigError::validation("openai.model must not be empty"));
    }

    if config.openai.max_tokens == 0 {
        errors.push(ConfigError::validation(
            "openai.max_tokens must be greater than 0",
        ));
    }

    let temperature = config.openai.temperature;
    if !(0.0..=2.0).contains(&temperature) {
        errors.push(ConfigError::validation(format!(
            "openai.temperature must be between 0.0 and 2.0, got {temperature}"
        )));
    }

    if config.openai.timeout_secs == 0 {
        errors.push(ConfigError::validation(
            "openai.timeout_secs must be greater than 0",
        ));
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::validation(
            "storage.database_path must not be empty",
        ));
    }

    if config.chat.daily_message_limit == 0 {
        errors.push(ConfigError::validation(
            "chat.daily_message_limit must be at least 1",
        ));
    }

    if config.chat.history_limit > MAX_HISTORY_LIMIT {
        errors.push(ConfigError::validation(format!(
            "chat.history_limit must be at most {MAX_HISTORY_LIMIT}, got {}",
            config.chat.history_limit
        )));
    }

    if config.chat.max_message_chars == 0 {
        errors.push(ConfigError::validation(
            "chat.max_message_chars must be greater than 0",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&SolaceConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_error() {
        let mut config = SolaceConfig::default();
        config.server.port = 0;
        config.chat.daily_message_limit = 0;
        config.openai.temperature = 3.5;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn short_jwt_secret_is_rejected() {
        let mut config = SolaceConfig::default();
        config.auth.jwt_secret = Some("short".into());
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].to_string().contains("auth.jwt_secret"));
    }

    #[test]
    fn history_limit_is_capped() {
        let mut config = SolaceConfig::default();
        config.chat.history_limit = MAX_HISTORY_LIMIT + 1;
        assert!(validate_config(&config).is_err());
        config.chat.history_limit = 0;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn base_url_needs_scheme() {
        let mut config = SolaceConfig::default();
        config.openai.base_url = "api.openai.com/v1".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].to_string().contains("openai.base_url"));
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let mut config = SolaceConfig::default();
        config.app.log_level = "verbose".into();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn parsed_toml_validates() {
        let toml_str = r#"
[auth]
jwt_secret = "0123456789abcdef0123456789abcdef"

[chat]
daily_message_limit = 0
"#;
        let config: SolaceConfig = toml::from_str(toml_str).unwrap();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("daily_message_limit"));
    }

    #[test]
    fn unknown_fields_fail_deserialization() {
        let result = toml::from_str::<SolaceConfig>("[chat]\nhistory = 5\n");
        assert!(result.is_err());
    }
}
