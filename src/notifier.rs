//! Rendering and dispatch of status-change notifications

use crate::config::Config;
use crate::mailer::{MailMessage, Mailer};
use crate::service::{PollingCycle, Service, Status};
use chrono::{DateTime, Local};
use owo_colors::OwoColorize;
use std::io::Write;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Terminal-like sink for human-readable output
pub trait Console: Send + Sync {
    /// Write text without a trailing newline
    fn write(&self, text: &str);

    fn write_line(&self, line: &str);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutConsole;

impl Console for StdoutConsole {
    fn write(&self, text: &str) {
        let mut stdout = std::io::stdout().lock();
        let _ = write!(stdout, "{}", text);
        let _ = stdout.flush();
    }

    fn write_line(&self, line: &str) {
        println!("{}", line);
    }
}

pub fn format_timestamp(timestamp: &DateTime<Local>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// One `[<timestamp>] <name> -> <status>` line per service
pub fn render_lines(services: &[Service], timestamp: &DateTime<Local>, colored: bool) -> Vec<String> {
    let timestamp = format_timestamp(timestamp);

    services
        .iter()
        .map(|service| {
            let status = if colored {
                paint_status(service.status)
            } else {
                service.status.to_string()
            };
            format!("[{}] {} -> {}", timestamp, service.name, status)
        })
        .collect()
}

fn paint_status(status: Status) -> String {
    match status {
        Status::Up => status.as_str().green().to_string(),
        _ => status.as_str().red().to_string(),
    }
}

/// Sends transition reports to the console and the mailer
pub struct Notifier {
    mailer: Arc<dyn Mailer>,
    console: Arc<dyn Console>,
    sender: String,
    recipients: Vec<String>,
}

impl Notifier {
    pub fn new(
        mailer: Arc<dyn Mailer>,
        console: Arc<dyn Console>,
        sender: String,
        recipients: Vec<String>,
    ) -> Self {
        Self {
            mailer,
            console,
            sender,
            recipients,
        }
    }

    pub fn from_config(config: &Config, mailer: Arc<dyn Mailer>, console: Arc<dyn Console>) -> Self {
        Self::new(
            mailer,
            console,
            config.sender.clone(),
            config.recipients.clone(),
        )
    }

    /// Email for a cycle's transitions
    pub fn message_for(&self, cycle: &PollingCycle) -> MailMessage {
        MailMessage {
            from: self.sender.clone(),
            to: self.recipients.join(", "),
            subject: format!("Web Monitor: Status change ({})", cycle.transitions.len()),
            text: render_lines(&cycle.transitions, &cycle.timestamp, false).join("\n"),
        }
    }

    /// Report a cycle's transitions. Does nothing when there are none.
    ///
    /// The email is sent from a detached task; delivery failures are only
    /// logged. The returned handle may be dropped.
    pub fn notify(&self, cycle: &PollingCycle) -> Option<JoinHandle<()>> {
        if !cycle.has_transitions() {
            return None;
        }

        for line in render_lines(&cycle.transitions, &cycle.timestamp, true) {
            self.console.write_line(&line);
        }

        let message = self.message_for(cycle);
        let mailer = Arc::clone(&self.mailer);

        Some(tokio::spawn(async move {
            match mailer.send(&message).await {
                Ok(()) => info!("Sent notification '{}' to {}", message.subject, message.to),
                Err(e) => error!("Failed to send notification '{}': {}", message.subject, e),
            }
        }))
    }
}
