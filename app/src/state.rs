// backoffice_server/src/state.rs

use actix_web::web;
use backoffice::{Customer, ListingCache, PgStore, Product, RecordService, RecordStore, Revalidator, User};
use sqlx::PgPool;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::Result;

#[derive(Clone)]
pub struct AppState {
  pub config: Arc<AppConfig>,
  /// Rendered table fragments; every record service revalidates it.
  pub cache: Arc<ListingCache>,
}

impl AppState {
  pub fn new(config: Arc<AppConfig>) -> Self {
    let cache = Arc::new(ListingCache::with_limits(config.cache));
    Self { config, cache }
  }
}

/// One [`RecordService`] per record kind, shared with handlers as app data.
#[derive(Clone)]
pub struct Services {
  pub customers: web::Data<RecordService<Customer>>,
  pub products: web::Data<RecordService<Product>>,
  pub users: web::Data<RecordService<User>>,
}

impl Services {
  pub fn postgres(pool: PgPool, revalidator: Arc<dyn Revalidator>) -> Result<Self> {
    let store = Arc::new(PgStore::new(pool));
    Self::from_stores(store.clone(), store.clone(), store, revalidator)
  }

  pub fn from_stores(
    customers: Arc<dyn RecordStore<Customer>>,
    products: Arc<dyn RecordStore<Product>>,
    users: Arc<dyn RecordStore<User>>,
    revalidator: Arc<dyn Revalidator>,
  ) -> Result<Self> {
    Ok(Self {
      customers: web::Data::new(RecordService::new(customers, revalidator.clone())?),
      products: web::Data::new(RecordService::new(products, revalidator.clone())?),
      users: web::Data::new(RecordService::new(users, revalidator)?),
    })
  }

  pub fn register(&self, cfg: &mut web::ServiceConfig) {
    cfg
      .app_data(self.customers.clone())
      .app_data(self.products.clone())
      .app_data(self.users.clone());
  }
}
