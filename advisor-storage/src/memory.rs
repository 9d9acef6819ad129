//! In-memory catalog source for development and testing

use advisor_core::{CourseRecord, PolicyRule};
use async_trait::async_trait;
use parking_lot::RwLock;

use crate::{CatalogSource, StorageError};

/// In-memory catalog source for development and testing
pub struct InMemoryCatalogSource {
    courses: RwLock<Vec<CourseRecord>>,
    policies: RwLock<Vec<PolicyRule>>,
}

impl InMemoryCatalogSource {
    pub fn new() -> Self {
        Self::with_data(Vec::new(), Vec::new())
    }

    pub fn with_data(courses: Vec<CourseRecord>, policies: Vec<PolicyRule>) -> Self {
        Self {
            courses: RwLock::new(courses),
            policies: RwLock::new(policies),
        }
    }

    /// Replace the courses served by later loads
    pub fn set_courses(&self, courses: Vec<CourseRecord>) {
        *self.courses.write() = courses;
    }

    /// Replace the policy rows served by later loads
    pub fn set_policies(&self, policies: Vec<PolicyRule>) {
        *self.policies.write() = policies;
    }
}

impl Default for InMemoryCatalogSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogSource for InMemoryCatalogSource {
    async fn load_courses(&self) -> Result<Vec<CourseRecord>, StorageError> {
        Ok(self.courses.read().clone())
    }

    async fn load_policies(&self) -> Result<Vec<PolicyRule>, StorageError> {
        Ok(self.policies.read().clone())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
