// backoffice/src/action/mod.rs

//! Mutation flow: validate, write one row, announce the commit, redirect.
//!
//! Each mutation is a [`Pipeline`] of named steps over a shared
//! [`MutationCtx`]. [`RecordService`] runs them and converts any failure into an
//! [`ActionOutcome`], so nothing below this module's public API returns `Err`
//! for a rejected submission or a failed write.

pub mod context;
pub mod outcome;
pub mod pipeline;
pub mod service;
pub mod steps;

pub use context::{MutationCtx, Operation};
pub use outcome::{ActionOutcome, FormState};
pub use pipeline::{ContextData, Handler, Pipeline, PipelineResult, StepControl};
pub use service::RecordService;
