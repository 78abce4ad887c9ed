// backoffice/src/action/outcome.rs

use serde::Serialize;

use crate::record::RecordKind;
use crate::schema::FieldErrors;

/// What the form should show after a rejected submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormState {
  pub errors: FieldErrors,
  pub message: Option<String>,
}

impl FormState {
  pub fn message(message: impl Into<String>) -> Self {
    Self {
      errors: FieldErrors::new(),
      message: Some(message.into()),
    }
  }
}

/// Result of a mutation as seen by the presentation layer. Failures are
/// values here, never `Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
  /// Committed; navigate to `location`.
  Redirect { location: String },
  /// Rejected by the schema before any store access.
  Invalid(FormState),
  /// The store round-trip failed; the cause was logged, not exposed.
  Failed(FormState),
}

impl ActionOutcome {
  pub fn to_listing(kind: RecordKind) -> Self {
    ActionOutcome::Redirect {
      location: kind.listing_path().to_string(),
    }
  }

  pub fn is_redirect(&self) -> bool {
    matches!(self, ActionOutcome::Redirect { .. })
  }

  pub fn form_state(&self) -> Option<&FormState> {
    match self {
      ActionOutcome::Redirect { .. } => None,
      ActionOutcome::Invalid(state) | ActionOutcome::Failed(state) => Some(state),
    }
  }
}
