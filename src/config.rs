//! Configuration management for the web monitor

use crate::errors::{MonitorError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/webmonitor/config.json";

const DEFAULT_INTERVAL_SECS: u64 = 600;
const DEFAULT_PORT: u16 = 8888;
const DEFAULT_SENDMAIL: &str = "/usr/sbin/sendmail";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Seconds between polling cycles
    #[serde(default = "default_interval")]
    pub interval: u64,

    /// Monitored services, in declaration order
    pub services: Vec<ServiceConfig>,

    /// Sender address for notification emails
    pub sender: String,

    /// Destination addresses for notification emails
    pub recipients: Vec<String>,

    /// Dashboard listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path to the sendmail binary used for email delivery
    #[serde(default = "default_sendmail")]
    pub sendmail: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceConfig {
    pub name: String,
    pub url: String,
}

fn default_interval() -> u64 {
    DEFAULT_INTERVAL_SECS
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_sendmail() -> PathBuf {
    PathBuf::from(DEFAULT_SENDMAIL)
}

impl Config {
    /// Read, parse and validate a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|e| {
            MonitorError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;

        Self::from_json(&data)
    }

    /// Parse and validate a configuration document
    pub fn from_json(data: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(data)?;
        config.validate().map_err(MonitorError::Config)?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.interval == 0 {
            return Err("interval must be greater than 0".to_string());
        }

        if self.sender.trim().is_empty() {
            return Err("sender cannot be empty".to_string());
        }

        for (index, service) in self.services.iter().enumerate() {
            if service.name.trim().is_empty() {
                return Err(format!("service #{} has an empty name", index));
            }
            if service.url.trim().is_empty() {
                return Err(format!("service '{}' has an empty url", service.name));
            }
        }

        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const VALID: &str = r#"{
        "services": [
            {"name": "A", "url": "http://a"},
            {"name": "B", "url": "http://b"}
        ],
        "sender": "monitor@example.com",
        "recipients": ["ops@example.com", "oncall@example.com"]
    }"#;

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_json(VALID).unwrap();

        assert_eq!(config.interval, 600);
        assert_eq!(config.interval(), Duration::from_secs(600));
        assert_eq!(config.port, 8888);
        assert_eq!(config.sendmail, PathBuf::from("/usr/sbin/sendmail"));
        assert_eq!(config.services.len(), 2);
        assert_eq!(config.services[0].name, "A");
        assert_eq!(config.services[1].url, "http://b");
        assert_eq!(config.recipients.len(), 2);
    }

    #[test]
    fn test_explicit_values_override_defaults() {
        let config = Config::from_json(
            r#"{
                "interval": 30,
                "port": 9000,
                "sendmail": "/usr/bin/msmtp",
                "services": [],
                "sender": "monitor@example.com",
                "recipients": []
            }"#,
        )
        .unwrap();

        assert_eq!(config.interval(), Duration::from_secs(30));
        assert_eq!(config.port, 9000);
        assert_eq!(config.sendmail, PathBuf::from("/usr/bin/msmtp"));
    }

    #[test]
    fn test_malformed_document_rejected() {
        let result = Config::from_json(r#"{"services": "not-a-list"}"#);
        assert!(matches!(result, Err(MonitorError::Json(_))));

        let result = Config::from_json("{ not json");
        assert!(matches!(result, Err(MonitorError::Json(_))));
    }

    #[test]
    fn test_validation_failures() {
        let result = Config::from_json(
            r#"{"interval": 0, "services": [], "sender": "a@b", "recipients": []}"#,
        );
        assert!(matches!(result, Err(MonitorError::Config(_))));

        let result = Config::from_json(r#"{"services": [], "sender": " ", "recipients": []}"#);
        assert!(matches!(result, Err(MonitorError::Config(_))));

        let result = Config::from_json(
            r#"{"services": [{"name": "A", "url": ""}], "sender": "a@b", "recipients": []}"#,
        );
        assert!(matches!(result, Err(MonitorError::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(VALID.as_bytes()).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.sender, "monitor@example.com");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(dir.path().join("absent.json"));

        assert!(matches!(result, Err(MonitorError::Config(_))));
    }
}
