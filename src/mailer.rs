//! Email delivery through the local sendmail binary

use crate::errors::{MonitorError, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// A rendered plain-text email
#[derive(Debug, Clone, PartialEq)]
pub struct MailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
}

impl MailMessage {
    /// RFC 5322 representation with headers and body
    pub fn to_rfc5322(&self) -> String {
        format!(
            "From: {}\r\nTo: {}\r\nSubject: {}\r\nContent-Type: text/plain; charset=utf-8\r\n\r\n{}\r\n",
            self.from,
            self.to,
            self.subject,
            self.text.replace('\n', "\r\n"),
        )
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &MailMessage) -> Result<()>;
}

/// Pipes messages to `sendmail -t -i`
#[derive(Debug, Clone)]
pub struct SendmailMailer {
    program: PathBuf,
}

impl SendmailMailer {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl Mailer for SendmailMailer {
    async fn send(&self, message: &MailMessage) -> Result<()> {
        debug!(
            "Sending '{}' to {} via {}",
            message.subject,
            message.to,
            self.program.display()
        );

        let mut child = Command::new(&self.program)
            .arg("-t")
            .arg("-i")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                MonitorError::Notification(format!(
                    "failed to start {}: {}",
                    self.program.display(),
                    e
                ))
            })?;

        // Feed stdin while draining stderr so neither pipe can stall the other
        let stdin = child.stdin.take();
        let payload = message.to_rfc5322();
        let write = async move {
            match stdin {
                Some(mut stdin) => stdin.write_all(payload.as_bytes()).await,
                None => Ok(()),
            }
        };

        let (written, output) = tokio::join!(write, child.wait_with_output());
        let output = output.map_err(|e| {
            MonitorError::Notification(format!("{} did not finish: {}", self.program.display(), e))
        })?;

        // A process that exits early breaks the pipe; its exit status says more
        if !output.status.success() {
            return Err(MonitorError::Notification(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        written.map_err(|e| {
            MonitorError::Notification(format!(
                "failed to write message to {}: {}",
                self.program.display(),
                e
            ))
        })
    }
}
