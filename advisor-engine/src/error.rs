//! Engine error types

use advisor_core::ValidationError;
use thiserror::Error;

use crate::EngineState;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Engine must be reset before declaring a fact (state: {0})")]
    NotReset(EngineState),

    #[error("A student fact is already declared; reset the engine first")]
    FactAlreadyDeclared,

    #[error("No student fact declared")]
    NoFactDeclared,

    #[error("Engine has not been run (state: {0})")]
    NotRun(EngineState),

    #[error("Invalid student fact: {0}")]
    InvalidFact(#[from] ValidationError),
}
