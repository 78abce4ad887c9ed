// backoffice/src/error.rs

//! Error types shared by the query and action layers.
//!
//! Validation failures are not errors here: they travel as
//! [`crate::action::ActionOutcome::Invalid`] values and never cross the
//! validation boundary as `Err`.

use std::time::Duration;
use thiserror::Error;

/// A store round-trip failed (connection, constraint or statement error).
#[derive(Debug, Error)]
pub enum DataAccessError {
  #[error("Database error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Timed out after {waited:?} waiting for one of {max_connections} store connections")]
  PoolTimeout { waited: Duration, max_connections: u32 },

  #[error("Store unavailable: {0}")]
  Unavailable(String),
}

/// Misconfiguration of an action pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
  #[error("Step not found: {step_name}")]
  StepNotFound { step_name: String },

  #[error("Handler missing for non-optional step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("Step '{step_name}' ran before '{missing}' was set in its context")]
  ContextIncomplete { step_name: String, missing: &'static str },
}

/// Failure raised inside a mutation pipeline. Caught at the mutation boundary and
/// turned into a generic [`crate::action::FormState`] message.
#[derive(Debug, Error)]
pub enum ActionError {
  #[error(transparent)]
  DataAccess(#[from] DataAccessError),

  #[error(transparent)]
  Pipeline(#[from] PipelineError),
}

pub type DataResult<T> = std::result::Result<T, DataAccessError>;
