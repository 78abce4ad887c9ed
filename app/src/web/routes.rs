// backoffice_server/src/web/routes.rs

use actix_web::web;
use backoffice::{Customer, Product, User};

use crate::views::RecordColumns;
use crate::web::handlers::{self, records};

/// Mounts the listing, form and mutation routes of one record kind under its
/// listing path.
fn record_routes<R: RecordColumns>(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope(R::KIND.listing_path())
      .route("", web::get().to(records::list_page::<R>))
      .route("", web::post().to(records::create::<R>))
      .route("/table", web::get().to(records::table_fragment::<R>))
      .route("/create", web::get().to(records::create_form::<R>))
      .route("/{id}/edit", web::get().to(records::edit_form::<R>))
      .route("/{id}/edit", web::post().to(records::update::<R>))
      .route("/{id}/delete", web::post().to(records::delete::<R>)),
  );
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .route("/", web::get().to(handlers::root_redirect))
    .route("/health", web::get().to(handlers::health_check));
  record_routes::<Customer>(cfg);
  record_routes::<Product>(cfg);
  record_routes::<User>(cfg);
}
