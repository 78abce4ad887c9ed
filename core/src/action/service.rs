// backoffice/src/action/service.rs

use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use super::context::{MutationCtx, Operation};
use super::outcome::{ActionOutcome, FormState};
use super::pipeline::{ContextData, Pipeline, PipelineResult};
use super::steps;
use crate::cache::Revalidator;
use crate::error::{ActionError, DataResult, PipelineError};
use crate::listing::{fetch_listing, ListingPage, ListingParams};
use crate::record::Record;
use crate::schema::FormFields;
use crate::store::RecordStore;

type MutationPipeline<R> = Pipeline<MutationCtx<R>, ActionError>;

/// Query and action entry points for one record kind.
pub struct RecordService<R: Record> {
  store: Arc<dyn RecordStore<R>>,
  create: MutationPipeline<R>,
  update: MutationPipeline<R>,
  delete: MutationPipeline<R>,
}

impl<R: Record> RecordService<R> {
  pub fn new(store: Arc<dyn RecordStore<R>>, revalidator: Arc<dyn Revalidator>) -> Result<Self, PipelineError> {
    let service = Self {
      create: create_pipeline(&store, &revalidator)?,
      update: update_pipeline(&store, &revalidator)?,
      delete: delete_pipeline(&store, &revalidator)?,
      store,
    };
    info!(kind = %R::KIND, "Record service ready.");
    Ok(service)
  }

  pub fn store(&self) -> &Arc<dyn RecordStore<R>> {
    &self.store
  }

  pub async fn listing(&self, params: &ListingParams) -> DataResult<ListingPage<R>> {
    fetch_listing(self.store.as_ref(), params).await
  }

  pub async fn find(&self, id: i32) -> DataResult<Option<R>> {
    self.store.fetch(id).await
  }

  #[instrument(name = "action::create", skip_all, fields(kind = %R::KIND))]
  pub async fn create(&self, fields: FormFields) -> ActionOutcome {
    self.execute(&self.create, MutationCtx::new(Operation::Create, fields)).await
  }

  /// Rewrites every mutable field of row `id`. An `id` that matches no row is
  /// still a redirect: the store reports zero rows and nothing else happens.
  #[instrument(name = "action::update", skip_all, fields(kind = %R::KIND, id = id))]
  pub async fn update(&self, id: i32, fields: FormFields) -> ActionOutcome {
    self.execute(&self.update, MutationCtx::new(Operation::Update { id }, fields)).await
  }

  #[instrument(name = "action::delete", skip_all, fields(kind = %R::KIND, id = id))]
  pub async fn delete(&self, id: i32) -> ActionOutcome {
    self
      .execute(&self.delete, MutationCtx::new(Operation::Delete { id }, FormFields::new()))
      .await
  }

  /// Mutation boundary: pipeline errors are logged and become a generic
  /// `Failed` outcome.
  async fn execute(&self, pipeline: &MutationPipeline<R>, ctx: MutationCtx<R>) -> ActionOutcome {
    let operation = ctx.operation;
    let ctx_data = ContextData::new(ctx);

    match pipeline.run(ctx_data.clone()).await {
      Ok(result) => {
        let outcome = ctx_data.write().outcome.take();
        match (result, outcome) {
          (_, Some(outcome)) => outcome,
          (PipelineResult::Completed, None) => ActionOutcome::to_listing(R::KIND),
          (PipelineResult::Stopped, None) => {
            warn!(%operation, "Pipeline stopped without an outcome.");
            ActionOutcome::Failed(generic_failure::<R>(operation))
          }
        }
      }
      Err(err) => {
        error!(%operation, kind = %R::KIND, error = %err, "Mutation failed.");
        ActionOutcome::Failed(generic_failure::<R>(operation))
      }
    }
  }
}

fn generic_failure<R: Record>(operation: Operation) -> FormState {
  FormState::message(format!("Database Error: Failed to {} {}.", operation.verb(), R::KIND.noun()))
}

fn create_pipeline<R: Record>(
  store: &Arc<dyn RecordStore<R>>,
  revalidator: &Arc<dyn Revalidator>,
) -> Result<MutationPipeline<R>, PipelineError> {
  let mut p = MutationPipeline::<R>::new(
    "create",
    &[("validate_fields", false), ("insert_row", false), ("revalidate_listing", false)],
  );
  p.on("validate_fields", steps::validate_fields::<R>)?;
  let store = store.clone();
  p.on("insert_row", move |ctx| steps::insert_row(store.clone(), ctx))?;
  let revalidator = revalidator.clone();
  p.on("revalidate_listing", move |ctx| steps::revalidate_listing(revalidator.clone(), ctx))?;
  Ok(p)
}

fn update_pipeline<R: Record>(
  store: &Arc<dyn RecordStore<R>>,
  revalidator: &Arc<dyn Revalidator>,
) -> Result<MutationPipeline<R>, PipelineError> {
  let mut p = MutationPipeline::<R>::new(
    "update",
    &[("validate_fields", false), ("update_row", false), ("revalidate_listing", false)],
  );
  p.on("validate_fields", steps::validate_fields::<R>)?;
  let store = store.clone();
  p.on("update_row", move |ctx| steps::update_row(store.clone(), ctx))?;
  let revalidator = revalidator.clone();
  p.on("revalidate_listing", move |ctx| steps::revalidate_listing(revalidator.clone(), ctx))?;
  Ok(p)
}

fn delete_pipeline<R: Record>(
  store: &Arc<dyn RecordStore<R>>,
  revalidator: &Arc<dyn Revalidator>,
) -> Result<MutationPipeline<R>, PipelineError> {
  let mut p = MutationPipeline::<R>::new("delete", &[("delete_row", false), ("revalidate_listing", false)]);
  let store = store.clone();
  p.on("delete_row", move |ctx| steps::delete_row(store.clone(), ctx))?;
  let revalidator = revalidator.clone();
  p.on("revalidate_listing", move |ctx| steps::revalidate_listing(revalidator.clone(), ctx))?;
  Ok(p)
}
