// backoffice_server/src/web/handlers/records.rs

//! Listing, form and mutation handlers, generic over the record kind.
//!
//! Routes mount these once per kind (see `web::routes`), so the customer,
//! product and user pages share one implementation.

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use askama::Template;
use backoffice::{ActionOutcome, FormFields, ListingCache, ListingParams, Record, RecordService};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::view_renderer::{render_error_page, render_page, see_other};
use crate::errors::AppError;
use crate::state::AppState;
use crate::views::{Chrome, FormMode, FormView, ListingView, RecordColumns, TableView};
use crate::web::session::Session;

/// The rendered table for `params`, from the cache when possible.
async fn cached_table<R: RecordColumns>(
  cache: &ListingCache,
  service: &RecordService<R>,
  params: &ListingParams,
) -> Result<Arc<str>, AppError> {
  let key = params.query_string();
  if let Some(hit) = cache.get(R::KIND, &key) {
    debug!(key = %key, "Listing cache hit.");
    return Ok(hit);
  }

  // Read before querying so a concurrent mutation makes this rendering stale.
  let generation = cache.generation(R::KIND);
  let page = service.listing(params).await?;
  let rendered: Arc<str> = TableView::new(&page).render()?.into();
  cache.insert(R::KIND, key, rendered.clone(), generation);
  Ok(rendered)
}

#[instrument(name = "handler::list_page", skip_all, fields(kind = %R::KIND))]
pub async fn list_page<R: RecordColumns>(
  app_state: web::Data<AppState>,
  service: web::Data<RecordService<R>>,
  session: Session,
  query: web::Query<ListingParams>,
) -> Result<HttpResponse, AppError> {
  let params = query.into_inner();
  let table_html = cached_table(&app_state.cache, &service, &params).await?;

  let chrome = Chrome::new(Some(R::KIND), &session, &app_state.config);
  render_page(StatusCode::OK, &ListingView::new::<R>(chrome, &params, table_html.to_string()))
}

/// Just the table, for the search box to swap in.
#[instrument(name = "handler::table_fragment", skip_all, fields(kind = %R::KIND))]
pub async fn table_fragment<R: RecordColumns>(
  app_state: web::Data<AppState>,
  service: web::Data<RecordService<R>>,
  query: web::Query<ListingParams>,
) -> Result<HttpResponse, AppError> {
  let table_html = cached_table(&app_state.cache, &service, &query).await?;
  Ok(
    HttpResponse::Ok()
      .content_type(actix_web::http::header::ContentType::html())
      .body(table_html.to_string()),
  )
}

#[instrument(name = "handler::create_form", skip_all, fields(kind = %R::KIND))]
pub async fn create_form<R: RecordColumns>(
  app_state: web::Data<AppState>,
  session: Session,
) -> Result<HttpResponse, AppError> {
  if let Some(redirect) = session.require_sign_in(&app_state.config) {
    return Ok(redirect);
  }
  let chrome = Chrome::new(Some(R::KIND), &session, &app_state.config);
  render_page(
    StatusCode::OK,
    &FormView::new::<R>(chrome, FormMode::Create, &FormFields::new(), None),
  )
}

#[instrument(name = "handler::create", skip_all, fields(kind = %R::KIND))]
pub async fn create<R: RecordColumns>(
  app_state: web::Data<AppState>,
  service: web::Data<RecordService<R>>,
  session: Session,
  form: web::Form<FormFields>,
) -> Result<HttpResponse, AppError> {
  if let Some(redirect) = session.require_sign_in(&app_state.config) {
    return Ok(redirect);
  }
  let fields = form.into_inner();
  let outcome = service.create(fields.clone()).await;
  respond_with_form::<R>(&app_state, &session, FormMode::Create, &fields, outcome)
}

#[instrument(name = "handler::edit_form", skip_all, fields(kind = %R::KIND, id = *path))]
pub async fn edit_form<R: RecordColumns>(
  app_state: web::Data<AppState>,
  service: web::Data<RecordService<R>>,
  session: Session,
  path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
  if let Some(redirect) = session.require_sign_in(&app_state.config) {
    return Ok(redirect);
  }
  let id = path.into_inner();
  let record = service.find(id).await?.ok_or_else(|| {
    warn!(id, "Edit requested for a missing row.");
    AppError::NotFound(format!("{} {} does not exist.", R::KIND.noun(), id))
  })?;

  let chrome = Chrome::new(Some(R::KIND), &session, &app_state.config);
  render_page(
    StatusCode::OK,
    &FormView::new::<R>(chrome, FormMode::Edit { id }, &record.to_fields(), None),
  )
}

#[instrument(name = "handler::update", skip_all, fields(kind = %R::KIND, id = *path))]
pub async fn update<R: RecordColumns>(
  app_state: web::Data<AppState>,
  service: web::Data<RecordService<R>>,
  session: Session,
  path: web::Path<i32>,
  form: web::Form<FormFields>,
) -> Result<HttpResponse, AppError> {
  if let Some(redirect) = session.require_sign_in(&app_state.config) {
    return Ok(redirect);
  }
  let id = path.into_inner();
  let fields = form.into_inner();
  let outcome = service.update(id, fields.clone()).await;
  respond_with_form::<R>(&app_state, &session, FormMode::Edit { id }, &fields, outcome)
}

#[instrument(name = "handler::delete", skip_all, fields(kind = %R::KIND, id = *path))]
pub async fn delete<R: RecordColumns>(
  app_state: web::Data<AppState>,
  service: web::Data<RecordService<R>>,
  session: Session,
  path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
  if let Some(redirect) = session.require_sign_in(&app_state.config) {
    return Ok(redirect);
  }
  match service.delete(path.into_inner()).await {
    ActionOutcome::Redirect { location } => Ok(see_other(&location)),
    ActionOutcome::Invalid(state) | ActionOutcome::Failed(state) => {
      let message = state.message.unwrap_or_else(|| format!("Failed to delete {}.", R::KIND.noun()));
      Ok(render_error_page(StatusCode::INTERNAL_SERVER_ERROR, "Delete failed", &message))
    }
  }
}

/// Redirect on success; otherwise re-render the submitted form with its
/// messages (422 for rejected input, 500 for a failed write).
fn respond_with_form<R: Record>(
  app_state: &AppState,
  session: &Session,
  mode: FormMode,
  fields: &FormFields,
  outcome: ActionOutcome,
) -> Result<HttpResponse, AppError> {
  let status = match &outcome {
    ActionOutcome::Redirect { location } => {
      info!(location = %location, "Mutation committed, redirecting.");
      return Ok(see_other(location));
    }
    ActionOutcome::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
    ActionOutcome::Failed(_) => StatusCode::INTERNAL_SERVER_ERROR,
  };
  let chrome = Chrome::new(Some(R::KIND), session, &app_state.config);
  render_page(status, &FormView::new::<R>(chrome, mode, fields, outcome.form_state()))
}
