//! Storage traits defining the interface to catalog sources

use advisor_core::{CourseRecord, PolicyRule};
use async_trait::async_trait;

use crate::StorageError;

/// Source of the course catalog and policy table
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Load every course, in catalog order
    async fn load_courses(&self) -> Result<Vec<CourseRecord>, StorageError>;

    /// Load every policy row, in table order
    async fn load_policies(&self) -> Result<Vec<PolicyRule>, StorageError>;

    /// Short description used in logs
    fn describe(&self) -> String;
}
