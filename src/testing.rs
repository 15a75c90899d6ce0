//! In-memory doubles shared by unit tests

use crate::errors::{MonitorError, Result};
use crate::mailer::{MailMessage, Mailer};
use crate::notifier::Console;
use crate::prober::Prober;
use crate::service::Status;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Default)]
pub struct RecordingConsole {
    lines: Mutex<Vec<String>>,
}

impl RecordingConsole {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl Console for RecordingConsole {
    fn write(&self, text: &str) {
        self.lines.lock().unwrap().push(text.to_string());
    }

    fn write_line(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }
}

#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<MailMessage>>,
    attempts: AtomicUsize,
    fail: bool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &MailMessage) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(MonitorError::Notification("transport unavailable".to_string()));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// Prober answering from per-url scripts, one status per call.
/// The last scripted status repeats once the script runs out.
#[derive(Default)]
pub struct ScriptedProber {
    scripts: Mutex<HashMap<String, VecDeque<Status>>>,
    delays: HashMap<String, Duration>,
    completed: AtomicUsize,
    order: Mutex<Vec<String>>,
}

impl ScriptedProber {
    pub fn new(scripts: &[(&str, &[Status])]) -> Self {
        let scripts = scripts
            .iter()
            .map(|(url, statuses)| (url.to_string(), statuses.iter().copied().collect()))
            .collect();

        Self {
            scripts: Mutex::new(scripts),
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Urls in the order their probes finished
    pub fn completion_order(&self) -> Vec<String> {
        self.order.lock().unwrap().clone()
    }
}

#[async_trait]
impl Prober for ScriptedProber {
    async fn probe(&self, url: &str) -> Status {
        if let Some(delay) = self.delays.get(url) {
            tokio::time::sleep(*delay).await;
        }

        let status = {
            let mut scripts = self.scripts.lock().unwrap();
            match scripts.get_mut(url) {
                Some(script) if script.len() > 1 => script.pop_front().unwrap_or(Status::Down),
                Some(script) => script.front().copied().unwrap_or(Status::Down),
                None => Status::Down,
            }
        };

        self.order.lock().unwrap().push(url.to_string());
        self.completed.fetch_add(1, Ordering::SeqCst);
        status
    }
}
