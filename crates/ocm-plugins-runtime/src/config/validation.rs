//! Configuration validation utilities.

use std::collections::HashSet;

use super::error::{ConfigError, ConfigResult};
use super::schema::OcmConfig;

/// Validates the entire configuration.
pub fn validate_config(config: &OcmConfig) -> ConfigResult<()> {
    validate_global(config)?;
    validate_entries(config)?;
    Ok(())
}

fn validate_global(config: &OcmConfig) -> ConfigResult<()> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.global.log_level.to_lowercase().as_str()) {
        return Err(ConfigError::validation(format!(
            "invalid log level: {}, valid values are: {:?}",
            config.global.log_level, valid_levels
        )));
    }

    if config.global.start_deadline_secs == 0 {
        return Err(ConfigError::validation("startDeadlineSecs must be greater than 0"));
    }

    if config.global.fallback_concurrency == 0 {
        return Err(ConfigError::validation("fallbackConcurrency must be greater than 0"));
    }

    Ok(())
}

fn validate_entries(config: &OcmConfig) -> ConfigResult<()> {
    let mut seen = HashSet::new();
    for entry in &config.config_entries {
        if !seen.insert(entry.ty.clone()) {
            return Err(ConfigError::DuplicateEntryType(entry.ty.to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_empty_config() {
        assert!(validate_config(&OcmConfig::default()).is_ok());
    }

    #[test]
    fn validate_invalid_log_level() {
        let mut config = OcmConfig::default();
        config.global.log_level = "verbose".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn validate_duplicate_entry_type() {
        use super::super::schema::ConfigEntry;

        let mut config = OcmConfig::default();
        config.config_entries = vec![
            ConfigEntry {
                ty: "credentials/v1".parse().unwrap(),
                value: serde_json::json!({}),
            },
            ConfigEntry {
                ty: "credentials/v1".parse().unwrap(),
                value: serde_json::json!({}),
            },
        ];

        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateEntryType(_)));
    }
}
