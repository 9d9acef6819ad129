//! Core domain models for the course advisor
//!
//! This crate contains the shared data structures used across
//! the advising engine: CourseRecord, PolicyRule, StudentFact and
//! Recommendation, plus input validation and the catalog audit.

pub mod audit;
pub mod error;
pub mod models;
pub mod validation;

pub use audit::{audit_catalog, DataQualityIssue, Relation};
pub use error::CoreError;
pub use models::*;
pub use validation::{
    check_cgpa_range, split_code_list, validate_cgpa, validate_cgpa_value,
    validate_prerequisite_list, ValidationError,
};
