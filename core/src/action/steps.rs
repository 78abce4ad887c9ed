// backoffice/src/action/steps.rs

//! Step handlers shared by the create, update and delete pipelines.

use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::context::{MutationCtx, Operation};
use super::outcome::{ActionOutcome, FormState};
use super::pipeline::{ContextData, StepControl};
use crate::cache::{MutationCommitted, MutationKind, Revalidator};
use crate::error::{ActionError, PipelineError};
use crate::record::Record;
use crate::store::RecordStore;

fn incomplete(step_name: &str, missing: &'static str) -> ActionError {
  PipelineError::ContextIncomplete {
    step_name: step_name.to_string(),
    missing,
  }
  .into()
}

/// Runs the record kind's schema. On failure records an `Invalid` outcome and
/// stops the pipeline before any store access.
#[instrument(name = "step::validate_fields", skip_all, fields(kind = %R::KIND))]
pub async fn validate_fields<R: Record>(ctx_data: ContextData<MutationCtx<R>>) -> Result<StepControl, ActionError> {
  let mut guard = ctx_data.write();
  match R::validate(&guard.fields) {
    Ok(draft) => {
      guard.draft = Some(draft);
      Ok(StepControl::Continue)
    }
    Err(errors) => {
      debug!(fields = ?errors.fields().collect::<Vec<_>>(), "Submitted fields rejected.");
      let message = format!("Missing Fields. Failed to {} {}.", guard.operation.verb(), R::KIND.noun());
      guard.outcome = Some(ActionOutcome::Invalid(FormState {
        errors,
        message: Some(message),
      }));
      Ok(StepControl::Stop)
    }
  }
}

#[instrument(name = "step::insert_row", skip_all, fields(kind = %R::KIND))]
pub async fn insert_row<R: Record>(
  store: Arc<dyn RecordStore<R>>,
  ctx_data: ContextData<MutationCtx<R>>,
) -> Result<StepControl, ActionError> {
  let draft = ctx_data
    .read()
    .draft
    .clone()
    .ok_or_else(|| incomplete("insert_row", "draft"))?;

  let row = store.insert(&draft).await?;
  info!(id = row.id(), "Row created.");

  let mut guard = ctx_data.write();
  guard.committed = Some(row);
  guard.rows_affected = 1;
  Ok(StepControl::Continue)
}

#[instrument(name = "step::update_row", skip_all, fields(kind = %R::KIND))]
pub async fn update_row<R: Record>(
  store: Arc<dyn RecordStore<R>>,
  ctx_data: ContextData<MutationCtx<R>>,
) -> Result<StepControl, ActionError> {
  let (id, draft) = {
    let guard = ctx_data.read();
    let id = guard.operation.target().ok_or_else(|| incomplete("update_row", "target id"))?;
    let draft = guard.draft.clone().ok_or_else(|| incomplete("update_row", "draft"))?;
    (id, draft)
  };

  let updated = store.update(id, &draft).await?;
  if updated.is_some() {
    info!(id, "Row updated.");
  } else {
    // Zero rows matched. Reported as success, like the store does.
    warn!(id, "Update matched no row.");
  }

  let mut guard = ctx_data.write();
  guard.rows_affected = updated.is_some() as u64;
  guard.committed = updated;
  Ok(StepControl::Continue)
}

#[instrument(name = "step::delete_row", skip_all, fields(kind = %R::KIND))]
pub async fn delete_row<R: Record>(
  store: Arc<dyn RecordStore<R>>,
  ctx_data: ContextData<MutationCtx<R>>,
) -> Result<StepControl, ActionError> {
  let id = ctx_data
    .read()
    .operation
    .target()
    .ok_or_else(|| incomplete("delete_row", "target id"))?;

  let removed = store.delete(id).await?;
  if removed == 0 {
    warn!(id, "Delete matched no row.");
  } else {
    info!(id, "Row deleted.");
  }

  ctx_data.write().rows_affected = removed;
  Ok(StepControl::Continue)
}

/// Announces the committed mutation and points the caller back at the listing.
#[instrument(name = "step::revalidate_listing", skip_all, fields(kind = %R::KIND))]
pub async fn revalidate_listing<R: Record>(
  revalidator: Arc<dyn Revalidator>,
  ctx_data: ContextData<MutationCtx<R>>,
) -> Result<StepControl, ActionError> {
  let event = {
    let guard = ctx_data.read();
    let (mutation, id) = match guard.operation {
      Operation::Create => (MutationKind::Created, guard.committed.as_ref().map(R::id)),
      Operation::Update { id } => (MutationKind::Updated, (guard.rows_affected > 0).then_some(id)),
      Operation::Delete { id } => (MutationKind::Deleted, (guard.rows_affected > 0).then_some(id)),
    };
    MutationCommitted {
      kind: R::KIND,
      mutation,
      id,
    }
  };

  revalidator.revalidate(&event);
  ctx_data.write().outcome = Some(ActionOutcome::to_listing(R::KIND));
  Ok(StepControl::Continue)
}
