//! Rule-based course recommendation engine
//!
//! Resolves a student's credit ceiling from the policy table and runs the
//! eligibility rules (semester offered, prerequisites, credit
//! accumulation) over the catalog.

pub mod credit;
pub mod engine;
pub mod error;
pub mod rules;

pub use credit::{resolve_credit_limit, CreditLimit, DEFAULT_CREDIT_LIMIT};
pub use engine::{AdvisingEngine, EngineState};
pub use error::EngineError;
pub use rules::{
    accumulate_credits, available_courses, check_course, evaluate, offered_in, prerequisites_met,
};
