//! Service and polling cycle data structures

use crate::config::ServiceConfig;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Classified availability of a service
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// No probe has completed yet
    Unknown,
    Up,
    Down,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Unknown => "unknown",
            Status::Up => "up",
            Status::Down => "down",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Service {
    pub name: String,
    pub url: String,
    pub status: Status,
}

impl Service {
    pub fn new(name: String, url: String) -> Self {
        Self {
            name,
            url,
            status: Status::Unknown,
        }
    }

    /// Copy of this service carrying a new status
    pub fn with_status(&self, status: Status) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }
}

impl From<&ServiceConfig> for Service {
    fn from(config: &ServiceConfig) -> Self {
        Service::new(config.name.clone(), config.url.clone())
    }
}

/// One scheduler tick: when it started and what changed
#[derive(Clone, Debug)]
pub struct PollingCycle {
    pub timestamp: DateTime<Local>,
    pub transitions: Vec<Service>,
}

impl PollingCycle {
    pub fn has_transitions(&self) -> bool {
        !self.transitions.is_empty()
    }
}
