//! Web monitor orchestrating startup, the polling timer and the dashboard

use crate::config::Config;
use crate::dashboard;
use crate::errors::Result;
use crate::mailer::{Mailer, SendmailMailer};
use crate::notifier::{Console, Notifier, StdoutConsole, render_lines};
use crate::prober::{HttpProber, Prober};
use crate::registry::ServiceRegistry;
use crate::scheduler::Scheduler;
use crate::service::Service;

use owo_colors::OwoColorize;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{info, instrument};

/// Owns every long-lived piece of the monitor for one process
pub struct WebMonitor {
    config: Config,
    registry: Arc<ServiceRegistry>,
    scheduler: Arc<Scheduler>,
    console: Arc<dyn Console>,
    timer: Option<JoinHandle<()>>,
}

impl WebMonitor {
    /// Create a monitor that probes over HTTP and mails through sendmail
    pub fn new(config: Config) -> Result<Self> {
        let prober = Arc::new(HttpProber::new()?);
        let mailer = Arc::new(SendmailMailer::new(config.sendmail.clone()));

        Ok(Self::with_parts(config, prober, mailer, Arc::new(StdoutConsole)))
    }

    pub fn with_parts(
        config: Config,
        prober: Arc<dyn Prober>,
        mailer: Arc<dyn Mailer>,
        console: Arc<dyn Console>,
    ) -> Self {
        let registry = Arc::new(ServiceRegistry::new(
            config.services.iter().map(Service::from).collect(),
        ));
        let notifier = Arc::new(Notifier::from_config(&config, mailer, Arc::clone(&console)));
        let scheduler = Arc::new(Scheduler::new(Arc::clone(&registry), prober, notifier));

        Self {
            config,
            registry,
            scheduler,
            console,
            timer: None,
        }
    }

    pub fn registry(&self) -> &Arc<ServiceRegistry> {
        &self.registry
    }

    /// Run the first cycle and print every status, changed or not
    #[instrument(skip(self))]
    pub async fn initial_check(&self) {
        self.console.write(&format!(
            "Checking status of {} services... ",
            self.registry.len()
        ));

        let cycle = self.scheduler.run_cycle().await;
        self.console.write_line(&"done".blue().to_string());

        let snapshot = self.registry.snapshot().await;
        for line in render_lines(&snapshot.services, &cycle.timestamp, true) {
            self.console.write_line(&line);
        }
    }

    /// Start the periodic polling task with ticks every interval after
    /// `origin`. A running timer is left untouched.
    pub fn start_timer(&mut self, origin: Instant) {
        if self.timer.is_some() {
            return;
        }

        let scheduler = Arc::clone(&self.scheduler);
        let period = self.config.interval();
        self.timer = Some(tokio::spawn(async move {
            scheduler.run_periodic(origin, period).await;
        }));
    }

    pub fn stop_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    /// Full startup sequence; returns once the dashboard shuts down
    pub async fn start(&mut self) -> Result<()> {
        let origin = Instant::now();
        info!(
            "Starting web monitor v{} for {} services",
            env!("CARGO_PKG_VERSION"),
            self.registry.len()
        );

        self.initial_check().await;
        self.start_timer(origin);

        self.console.write("Starting web interface... ");
        let server = match dashboard::bind(Arc::clone(&self.registry), self.config.port) {
            Ok(server) => server,
            Err(e) => {
                self.stop_timer();
                return Err(e.into());
            }
        };
        self.console.write_line(&"done".blue().to_string());

        let result = server.await;

        info!("Shutting down web monitor");
        self.stop_timer();
        result.map_err(Into::into)
    }
}

impl Drop for WebMonitor {
    fn drop(&mut self) {
        self.stop_timer();
    }
}
