//! Configuration file loader.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::error::{ConfigError, ConfigResult};
use super::schema::OcmConfig;
use super::validation::validate_config;

const CONFIG_NAMES: &[&str] = &["ocm-plugins.yaml", "ocm-plugins.yml", ".ocm-plugins.yaml", ".ocm-plugins.yml"];

/// Searches standard paths for a host configuration file, parses it as YAML
/// with `${VAR}` / `${VAR:-default}` environment expansion, and validates it.
pub struct ConfigLoader {
    search_paths: Vec<PathBuf>,
}

impl ConfigLoader {
    /// Creates a loader with no search paths.
    pub fn new() -> Self {
        Self { search_paths: Vec::new() }
    }

    /// Adds a search path for configuration files.
    pub fn add_search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Adds the current directory to search paths.
    pub fn with_current_dir(self) -> Self {
        match std::env::current_dir() {
            Ok(cwd) => self.add_search_path(cwd),
            Err(_) => self,
        }
    }

    /// Adds the user config directory (via [`dirs::config_dir`]) to search
    /// paths, under an `ocm-plugins` subdirectory.
    pub fn with_user_config_dir(self) -> Self {
        match dirs::config_dir() {
            Some(dir) => self.add_search_path(dir.join("ocm-plugins")),
            None => self,
        }
    }

    /// Loads configuration from the first available source, falling back to
    /// `OcmConfig::default()` when no config file is found.
    pub fn load(&self) -> ConfigResult<OcmConfig> {
        if let Some(path) = self.find_config_file() {
            return self.load_from_file(&path);
        }
        info!("no configuration file found, using defaults");
        Ok(OcmConfig::default())
    }

    /// Loads configuration from a specific file.
    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> ConfigResult<OcmConfig> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading configuration");

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        self.load_from_str(&content)
    }

    /// Loads configuration from a YAML string.
    pub fn load_from_str(&self, yaml: &str) -> ConfigResult<OcmConfig> {
        let config = self.parse_yaml(yaml)?;
        validate_config(&config)?;
        Ok(config)
    }

    fn find_config_file(&self) -> Option<PathBuf> {
        for search_path in &self.search_paths {
            for name in CONFIG_NAMES {
                let path = search_path.join(name);
                debug!(path = %path.display(), "checking for config file");
                if path.exists() {
                    info!(path = %path.display(), "found configuration file");
                    return Some(path);
                }
            }
        }
        None
    }

    fn parse_yaml(&self, content: &str) -> ConfigResult<OcmConfig> {
        let expanded = expand_env_vars(content);
        serde_yaml::from_str(&expanded).map_err(ConfigError::from)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new().with_current_dir().with_user_config_dir()
    }
}

/// Expands `${VAR_NAME}` and `${VAR_NAME:-default}` references against the
/// process environment.
fn expand_env_vars(content: &str) -> String {
    let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(:-([^}]*))?\}").unwrap();

    let mut result = content.to_string();
    for cap in re.captures_iter(content) {
        let full_match = cap.get(0).unwrap().as_str();
        let var_name = cap.get(1).unwrap().as_str();
        let default_value = cap.get(3).map(|m| m.as_str());

        let value = std::env::var(var_name).ok().or_else(|| default_value.map(String::from)).unwrap_or_default();

        result = result.replace(full_match, &value);
    }
    result
}

/// Loads the host configuration using default search paths.
pub fn load_config() -> ConfigResult<OcmConfig> {
    ConfigLoader::default().load()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_empty_yaml() {
        let loader = ConfigLoader::new();
        let config = loader.load_from_str("").unwrap();
        assert!(config.config_entries.is_empty());
        assert_eq!(config.global.log_level, "info");
    }

    #[test]
    fn parse_minimal_config() {
        let yaml = "global:\n  logLevel: debug\n";
        let config = ConfigLoader::new().load_from_str(yaml).unwrap();
        assert_eq!(config.global.log_level, "debug");
    }

    #[test]
    fn parse_config_entries() {
        let yaml = "configEntries:\n  - type: credentials/v1\n    token: secret\n";
        let config = ConfigLoader::new().load_from_str(yaml).unwrap();
        assert_eq!(config.config_entries.len(), 1);
        assert_eq!(config.config_entries[0].ty.to_string(), "credentials/v1");
        assert_eq!(config.config_entries[0].value["token"], "secret");
    }

    #[test]
    fn env_var_expansion_with_default() {
        let yaml = "configEntries:\n  - type: credentials/v1\n    token: ${OCM_TEST_TOKEN:-fallback}\n";
        let config = ConfigLoader::new().load_from_str(yaml).unwrap();
        assert_eq!(config.config_entries[0].value["token"], "fallback");
    }

    #[test]
    fn missing_file_fails() {
        let err = ConfigLoader::new().load_from_file("/nonexistent/ocm-plugins.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }
}
