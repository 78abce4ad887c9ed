// backoffice_server/src/web/handlers/view_renderer.rs

//! Template rendering helpers shared by handlers and `AppError`.

use actix_web::http::header::{self, ContentType};
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use askama::Template;

use crate::errors::AppError;
use crate::views::ErrorView;

/// Renders `template` as an HTML response with `status`.
pub fn render_page<T: Template>(status: StatusCode, template: &T) -> Result<HttpResponse, AppError> {
  let html = template.render()?;
  Ok(HttpResponse::build(status).content_type(ContentType::html()).body(html))
}

/// Renders the error view, falling back to plain text if the template fails.
pub fn render_error_page(status: StatusCode, title: &str, message: &str) -> HttpResponse {
  match ErrorView::new(title, message).render() {
    Ok(html) => HttpResponse::build(status).content_type(ContentType::html()).body(html),
    Err(e) => {
      tracing::error!("Failed to render error view: {}", e);
      HttpResponse::build(status)
        .content_type(ContentType::plaintext())
        .body(message.to_string())
    }
  }
}

/// Post/redirect/get: send the browser to `location` with 303.
pub fn see_other(location: &str) -> HttpResponse {
  HttpResponse::SeeOther()
    .insert_header((header::LOCATION, location))
    .finish()
}
