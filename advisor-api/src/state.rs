//! Application state shared across handlers

use advisor_core::{audit_catalog, CourseRecord, PolicyRule};
use advisor_storage::{load_snapshot, CatalogSource, InMemoryCatalogSource, Snapshot};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state
pub struct AppState {
    pub source: Arc<dyn CatalogSource>,
    snapshot: RwLock<Snapshot>,
}

impl AppState {
    /// Load the initial snapshot from `source`. Load failures leave the
    /// snapshot empty rather than failing startup.
    pub async fn load(source: Arc<dyn CatalogSource>) -> Self {
        let snapshot = load_snapshot(source.as_ref()).await;
        log_issues(&snapshot);
        Self {
            source,
            snapshot: RwLock::new(snapshot),
        }
    }

    /// State backed by an in-memory source holding the given tables
    pub async fn in_memory(courses: Vec<CourseRecord>, policies: Vec<PolicyRule>) -> Self {
        Self::load(Arc::new(InMemoryCatalogSource::with_data(courses, policies))).await
    }

    /// Current snapshot. Requests keep the snapshot they started with even
    /// if a reload swaps it mid-flight.
    pub async fn snapshot(&self) -> Snapshot {
        self.snapshot.read().await.clone()
    }

    /// Re-read the source and swap in the new snapshot
    pub async fn reload(&self) -> Snapshot {
        let fresh = load_snapshot(self.source.as_ref()).await;
        log_issues(&fresh);
        let mut current = self.snapshot.write().await;
        *current = fresh.clone();
        fresh
    }
}

fn log_issues(snapshot: &Snapshot) {
    for issue in audit_catalog(&snapshot.catalog, &snapshot.policies) {
        tracing::warn!("Catalog data quality: {}", issue);
    }
}
