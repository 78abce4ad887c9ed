// backoffice/src/action/context.rs

//! State threaded through the mutation pipelines.

use std::fmt;

use super::outcome::ActionOutcome;
use crate::record::Record;
use crate::schema::FormFields;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
  Create,
  Update { id: i32 },
  Delete { id: i32 },
}

impl Operation {
  pub fn verb(&self) -> &'static str {
    match self {
      Operation::Create => "Create",
      Operation::Update { .. } => "Update",
      Operation::Delete { .. } => "Delete",
    }
  }

  pub fn target(&self) -> Option<i32> {
    match self {
      Operation::Create => None,
      Operation::Update { id } | Operation::Delete { id } => Some(*id),
    }
  }
}

impl fmt::Display for Operation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.target() {
      Some(id) => write!(f, "{} #{}", self.verb(), id),
      None => f.write_str(self.verb()),
    }
  }
}

pub struct MutationCtx<R: Record> {
  pub operation: Operation,
  /// Raw submitted values; empty for deletes.
  pub fields: FormFields,
  /// Set by the validation step.
  pub draft: Option<R::Draft>,
  /// Row returned by the store; `None` after an update that matched nothing.
  pub committed: Option<R>,
  pub rows_affected: u64,
  /// Set by whichever step decides how the action ends.
  pub outcome: Option<ActionOutcome>,
}

impl<R: Record> MutationCtx<R> {
  pub fn new(operation: Operation, fields: FormFields) -> Self {
    Self {
      operation,
      fields,
      draft: None,
      committed: None,
      rows_affected: 0,
      outcome: None,
    }
  }
}
