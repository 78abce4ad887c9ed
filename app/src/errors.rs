// backoffice_server/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use backoffice::{DataAccessError, PipelineError};
use thiserror::Error;

use crate::web::handlers::view_renderer::render_error_page;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Data Access Error: {0}")]
  DataAccess(#[from] DataAccessError),

  #[error("Pipeline Setup Error: {0}")]
  Pipeline(#[from] PipelineError),

  #[error("Template Error: {0}")]
  Render(#[from] askama::Error),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<DataAccessError>() {
      Ok(data_err) => AppError::DataAccess(data_err),
      Err(err) => AppError::Internal(err.to_string()),
    }
  }
}

impl From<sqlx::Error> for AppError {
  fn from(err: sqlx::Error) -> Self {
    AppError::DataAccess(DataAccessError::Sqlx(err))
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    // The cause stays in the log; the page only gets a generic message.
    let (title, message) = match self {
      AppError::NotFound(m) => {
        tracing::warn!(application_error = %self, "Responding with not found");
        ("Not found", m.as_str())
      }
      AppError::DataAccess(_) => {
        tracing::error!(application_error = %self, "Responding with error");
        ("Something went wrong", "The records could not be loaded. Please try again.")
      }
      _ => {
        tracing::error!(application_error = %self, "Responding with error");
        ("Something went wrong", "An internal error occurred.")
      }
    };
    render_error_page(status, title, message)
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
