//! Registry of monitored services and their last-known status

use crate::service::Service;
use chrono::{DateTime, Local};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Immutable view of every service as of the last completed cycle
#[derive(Debug, Clone)]
pub struct RegistrySnapshot {
    pub services: Vec<Service>,
    pub last_check: Option<DateTime<Local>>,
}

/// Holds the fixed set of services. Readers get whole snapshots; the
/// scheduler replaces the snapshot once per cycle.
#[derive(Debug)]
pub struct ServiceRegistry {
    current: RwLock<Arc<RegistrySnapshot>>,
    len: usize,
}

impl ServiceRegistry {
    /// Create a registry over `services` in declaration order; nothing has
    /// been checked yet
    pub fn new(services: Vec<Service>) -> Self {
        let len = services.len();
        Self {
            current: RwLock::new(Arc::new(RegistrySnapshot {
                services,
                last_check: None,
            })),
            len,
        }
    }

    pub async fn snapshot(&self) -> Arc<RegistrySnapshot> {
        Arc::clone(&*self.current.read().await)
    }

    /// Replace the published snapshot. Only the scheduler calls this.
    pub async fn publish(&self, services: Vec<Service>, last_check: DateTime<Local>) {
        debug_assert_eq!(services.len(), self.len);

        let next = Arc::new(RegistrySnapshot {
            services,
            last_check: Some(last_check),
        });
        *self.current.write().await = next;
        debug!("Published registry snapshot with {} services", self.len);
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::Status;

    fn services() -> Vec<Service> {
        vec![
            Service::new("A".to_string(), "http://a".to_string()),
            Service::new("B".to_string(), "http://b".to_string()),
        ]
    }

    #[tokio::test]
    async fn test_initial_snapshot() {
        let registry = ServiceRegistry::new(services());

        let snapshot = registry.snapshot().await;
        assert_eq!(registry.len(), 2);
        assert!(!registry.is_empty());
        assert!(snapshot.last_check.is_none());
        assert!(snapshot.services.iter().all(|s| s.status == Status::Unknown));
    }

    #[tokio::test]
    async fn test_publish_replaces_snapshot() {
        let registry = ServiceRegistry::new(services());
        let before = registry.snapshot().await;

        let now = Local::now();
        let updated: Vec<Service> = before
            .services
            .iter()
            .map(|s| s.with_status(Status::Up))
            .collect();
        registry.publish(updated, now).await;

        let after = registry.snapshot().await;
        assert_eq!(after.last_check, Some(now));
        assert!(after.services.iter().all(|s| s.status == Status::Up));

        // Earlier readers keep their own view
        assert!(before.services.iter().all(|s| s.status == Status::Unknown));
        assert!(before.last_check.is_none());
    }

    #[tokio::test]
    async fn test_empty_registry() {
        let registry = ServiceRegistry::new(Vec::new());
        assert!(registry.is_empty());
        assert!(registry.snapshot().await.services.is_empty());
    }
}
