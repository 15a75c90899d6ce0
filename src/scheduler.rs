//! Polling cycles: concurrent probing, transition detection and the timer loop

use crate::notifier::Notifier;
use crate::prober::Prober;
use crate::registry::ServiceRegistry;
use crate::service::{PollingCycle, Service, Status};
use chrono::Local;
use futures::future::join_all;
use std::sync::Arc;
use tokio::time::{Duration, Instant, MissedTickBehavior, interval_at};
use tracing::{debug, info, instrument};

/// Services whose status changed, carrying their new status.
///
/// `before` and `after` are parallel slices in registry order. A service
/// still in [`Status::Unknown`] never yields a transition.
pub fn detect_transitions(before: &[Service], after: &[Status]) -> Vec<Service> {
    before
        .iter()
        .zip(after)
        .filter(|(service, status)| {
            service.status != Status::Unknown && service.status != **status
        })
        .map(|(service, status)| service.with_status(*status))
        .collect()
}

pub struct Scheduler {
    registry: Arc<ServiceRegistry>,
    prober: Arc<dyn Prober>,
    notifier: Arc<Notifier>,
}

impl Scheduler {
    pub fn new(
        registry: Arc<ServiceRegistry>,
        prober: Arc<dyn Prober>,
        notifier: Arc<Notifier>,
    ) -> Self {
        Self {
            registry,
            prober,
            notifier,
        }
    }

    pub fn registry(&self) -> &Arc<ServiceRegistry> {
        &self.registry
    }

    /// Probe every service, publish the results and return what changed
    #[instrument(skip(self), fields(services = self.registry.len()))]
    pub async fn run_cycle(&self) -> PollingCycle {
        let timestamp = Local::now();
        let before = self.registry.snapshot().await;

        let probes = before
            .services
            .iter()
            .map(|service| self.prober.probe(&service.url));
        let statuses: Vec<Status> = join_all(probes).await;

        let transitions = detect_transitions(&before.services, &statuses);

        let updated = before
            .services
            .iter()
            .zip(&statuses)
            .map(|(service, status)| service.with_status(*status))
            .collect();
        self.registry.publish(updated, timestamp).await;

        debug!(
            "Cycle at {} resolved {} statuses with {} transitions",
            timestamp,
            statuses.len(),
            transitions.len()
        );

        PollingCycle {
            timestamp,
            transitions,
        }
    }

    /// Run one cycle and hand its transitions to the notifier
    pub async fn run_and_notify(&self) -> PollingCycle {
        let cycle = self.run_cycle().await;
        // Delivery runs detached; the cycle never waits on it
        let _ = self.notifier.notify(&cycle);
        cycle
    }

    /// Run a cycle every `period`, the first one `period` after `origin`.
    ///
    /// Cycles never overlap. Ticks that elapse while a cycle is still
    /// running are skipped.
    pub async fn run_periodic(&self, origin: Instant, period: Duration) {
        info!("Polling {} services every {:?}", self.registry.len(), period);

        let mut ticker = interval_at(origin + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            let started = Instant::now();
            let cycle = self.run_and_notify().await;
            info!(
                "Polling cycle finished in {}ms with {} transitions",
                started.elapsed().as_millis(),
                cycle.transitions.len()
            );
        }
    }
}
