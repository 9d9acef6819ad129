//! Storage layer for the course advisor
//!
//! Provides the course catalog and policy table to the engine.
//! Supports both in-memory (for development) and CSV file sources.

pub mod csv_file;
pub mod error;
pub mod memory;
pub mod traits;

pub use csv_file::CsvCatalogSource;
pub use error::StorageError;
pub use memory::InMemoryCatalogSource;
pub use traits::CatalogSource;

use advisor_core::{Catalog, PolicyTable};
use std::sync::Arc;

/// Immutable catalog and policy table shared by every engine built from it
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub catalog: Arc<Catalog>,
    pub policies: Arc<PolicyTable>,
}

/// Loads a snapshot, absorbing failures.
///
/// A source that cannot be read yields an empty catalog or an empty
/// policy table; the error is logged and never returned, so advising keeps
/// working (with an empty recommendation) while the data is fixed.
pub async fn load_snapshot(source: &dyn CatalogSource) -> Snapshot {
    let courses = source.load_courses().await.unwrap_or_else(|e| {
        tracing::error!("Failed to load courses from {}: {}", source.describe(), e);
        Vec::new()
    });
    let policies = source.load_policies().await.unwrap_or_else(|e| {
        tracing::error!("Failed to load policies from {}: {}", source.describe(), e);
        Vec::new()
    });

    tracing::info!(
        "Loaded {} courses and {} policies from {}",
        courses.len(),
        policies.len(),
        source.describe()
    );

    Snapshot {
        catalog: Arc::new(Catalog::new(courses)),
        policies: Arc::new(PolicyTable::new(policies)),
    }
}
