use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use anyhow::{Result, Context};
use thiserror::Error;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub http: HttpSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Accept header sent with every request
    #[serde(default = "default_accept")]
    pub accept: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            user_agent: default_user_agent(),
            accept: default_accept(),
        }
    }
}

fn default_timeout() -> u64 { 60 }
fn default_user_agent() -> String { format!("ldp_type_report/{}", env!("CARGO_PKG_VERSION")) }
fn default_accept() -> String { "text/turtle".to_string() }

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("http timeout must be greater than zero")]
    ZeroTimeout,
    #[error("http setting `{0}` must not be empty")]
    EmptySetting(&'static str),
}

impl Configuration {
    /// Load configuration from a YAML or JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = if path.extension().and_then(|s| s.to_str()) == Some("json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        } else {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?
        };

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.timeout == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.http.user_agent.trim().is_empty() {
            return Err(ConfigError::EmptySetting("user_agent"));
        }
        if self.http.accept.trim().is_empty() {
            return Err(ConfigError::EmptySetting("accept"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = Configuration::default();
        assert_eq!(config.http.timeout, 60);
        assert_eq!(config.http.accept, "text/turtle");
        assert!(config.http.user_agent.starts_with("ldp_type_report/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "http:\n  timeout: 5").unwrap();

        let config = Configuration::from_file(file.path()).unwrap();
        assert_eq!(config.http.timeout, 5);
        assert_eq!(config.http.accept, "text/turtle");
    }

    #[test]
    fn test_json_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"http": {{"accept": "application/n-triples"}}}}"#).unwrap();

        let config = Configuration::from_file(file.path()).unwrap();
        assert_eq!(config.http.accept, "application/n-triples");
        assert_eq!(config.http.timeout, 60);
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let mut config = Configuration::default();
        config.http.timeout = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroTimeout));

        let mut config = Configuration::default();
        config.http.accept = " ".to_string();
        assert_eq!(config.validate(), Err(ConfigError::EmptySetting("accept")));
    }
}
