//! Web Monitor Library
//!
//! Periodically probes a fixed list of HTTP services, tracks whether each is
//! up or down, reports status transitions to the console and by email, and
//! serves a small live dashboard of the current statuses.

pub mod config;
pub mod dashboard;
pub mod errors;
pub mod mailer;
pub mod monitor;
pub mod notifier;
pub mod prober;
pub mod registry;
pub mod scheduler;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{Config, ServiceConfig};
pub use errors::{MonitorError, Result};
pub use mailer::{MailMessage, Mailer, SendmailMailer};
pub use monitor::WebMonitor;
pub use notifier::{Console, Notifier, StdoutConsole};
pub use prober::{HttpProber, Prober};
pub use registry::{RegistrySnapshot, ServiceRegistry};
pub use scheduler::{Scheduler, detect_transitions};
pub use service::{PollingCycle, Service, Status};
