// tests/mutation_tests.rs
mod common;

use backoffice::record::Customer;
use backoffice::{
  ActionOutcome, FormFields, ListingCache, ListingParams, MemoryStore, MutationCommitted, MutationKind, Product,
  ProductStatus, Record, RecordKind, RecordService, Revalidator, Revalidators,
};
use common::*;
use parking_lot::Mutex;
use serial_test::serial;
use std::sync::Arc;

/// Records every event it receives.
#[derive(Default)]
struct EventLog(Mutex<Vec<MutationCommitted>>);

impl Revalidator for EventLog {
  fn revalidate(&self, event: &MutationCommitted) {
    self.0.lock().push(event.clone());
  }
}

impl EventLog {
  fn events(&self) -> Vec<MutationCommitted> {
    self.0.lock().clone()
  }
}

fn customer_service(store: &Arc<MemoryStore<Customer>>, log: &Arc<EventLog>) -> RecordService<Customer> {
  RecordService::new(store.clone(), log.clone()).unwrap()
}

#[tokio::test]
#[serial]
async fn test_valid_create_inserts_one_row_and_redirects() {
  setup_tracing();
  let store = Arc::new(MemoryStore::<Customer>::new());
  let log = Arc::new(EventLog::default());
  let service = customer_service(&store, &log);

  let outcome = service
    .create(customer_form("Ada Lovelace", "ada", "ada@example.com"))
    .await;

  assert_eq!(
    outcome,
    ActionOutcome::Redirect {
      location: "/dashboard/customers".to_string()
    }
  );
  assert_eq!(store.len(), 1);
  let row = &store.rows()[0];
  assert_eq!(row.id, 1);
  assert_eq!(row.email, "ada@example.com");
  assert_eq!(
    log.events(),
    vec![MutationCommitted {
      kind: RecordKind::Customers,
      mutation: MutationKind::Created,
      id: Some(1),
    }]
  );
}

#[tokio::test]
#[serial]
async fn test_invalid_create_writes_nothing() {
  setup_tracing();
  let store = Arc::new(MemoryStore::<Customer>::new());
  let log = Arc::new(EventLog::default());
  let service = customer_service(&store, &log);

  let outcome = service.create(customer_form("", "ada", "not-an-email")).await;

  let state = match outcome {
    ActionOutcome::Invalid(state) => state,
    other => panic!("expected an invalid outcome, got {:?}", other),
  };
  assert_eq!(state.message.as_deref(), Some("Missing Fields. Failed to Create Customer."));
  assert_eq!(state.errors.messages("name"), ["Name is required.".to_string()]);
  assert_eq!(
    state.errors.messages("email"),
    ["Please enter a valid email address".to_string()]
  );
  assert!(!state.errors.contains("username"));
  assert!(store.is_empty());
  assert_eq!(store.gate_stats().acquired, 0);
  assert!(log.events().is_empty());
}

#[tokio::test]
#[serial]
async fn test_create_store_failure_becomes_generic_message() {
  setup_tracing();
  let store = Arc::new(MemoryStore::<Customer>::new());
  store.fail_writes(true);
  let log = Arc::new(EventLog::default());
  let service = customer_service(&store, &log);

  let outcome = service
    .create(customer_form("Ada Lovelace", "ada", "ada@example.com"))
    .await;

  let state = match outcome {
    ActionOutcome::Failed(state) => state,
    other => panic!("expected a failed outcome, got {:?}", other),
  };
  assert_eq!(state.message.as_deref(), Some("Database Error: Failed to Create Customer."));
  assert!(state.errors.is_empty());
  assert!(store.is_empty());
  assert!(log.events().is_empty());
}

#[tokio::test]
#[serial]
async fn test_update_rewrites_every_field() {
  setup_tracing();
  let store = Arc::new(MemoryStore::<Customer>::seeded(customer_drafts(3)));
  let log = Arc::new(EventLog::default());
  let service = customer_service(&store, &log);

  let outcome = service
    .update(2, customer_form("Grace Hopper", "grace", "grace@navy.mil"))
    .await;

  assert!(outcome.is_redirect());
  let row = service.find(2).await.unwrap().unwrap();
  assert_eq!(
    row,
    Customer {
      id: 2,
      name: "Grace Hopper".to_string(),
      username: "grace".to_string(),
      email: "grace@navy.mil".to_string(),
    }
  );
  assert_eq!(log.events()[0].mutation, MutationKind::Updated);
  assert_eq!(log.events()[0].id, Some(2));
}

#[tokio::test]
#[serial]
async fn test_update_of_missing_id_is_silent_success() {
  setup_tracing();
  let store = Arc::new(MemoryStore::<Customer>::seeded(customer_drafts(3)));
  let before = store.rows();
  let log = Arc::new(EventLog::default());
  let service = customer_service(&store, &log);

  let outcome = service
    .update(42, customer_form("Nobody", "nobody", "nobody@example.com"))
    .await;

  assert!(outcome.is_redirect());
  assert_eq!(store.rows(), before);
  assert_eq!(store.writes(), 0);
  // Invalidation is still announced, without a row id.
  assert_eq!(
    log.events(),
    vec![MutationCommitted {
      kind: RecordKind::Customers,
      mutation: MutationKind::Updated,
      id: None,
    }]
  );
}

#[tokio::test]
#[serial]
async fn test_invalid_update_names_the_update_verb() {
  setup_tracing();
  let store = Arc::new(MemoryStore::<Customer>::seeded(customer_drafts(1)));
  let log = Arc::new(EventLog::default());
  let service = customer_service(&store, &log);

  let outcome = service.update(1, FormFields::new()).await;

  let state = outcome.form_state().cloned().unwrap();
  assert_eq!(state.message.as_deref(), Some("Missing Fields. Failed to Update Customer."));
  assert_eq!(state.errors.len(), 3);
  assert_eq!(store.rows()[0].name, "Customer 001");
}

#[tokio::test]
#[serial]
async fn test_delete_existing_removes_exactly_one_row() {
  setup_tracing();
  let store = Arc::new(MemoryStore::<Customer>::seeded(customer_drafts(4)));
  let log = Arc::new(EventLog::default());
  let service = customer_service(&store, &log);

  let outcome = service.delete(3).await;

  assert!(outcome.is_redirect());
  assert_eq!(store.len(), 3);
  assert!(store.rows().iter().all(|c| c.id != 3));
  assert_eq!(log.events()[0].mutation, MutationKind::Deleted);
  assert_eq!(log.events()[0].id, Some(3));
}

#[tokio::test]
#[serial]
async fn test_delete_missing_is_silent_success() {
  setup_tracing();
  let store = Arc::new(MemoryStore::<Customer>::seeded(customer_drafts(2)));
  let log = Arc::new(EventLog::default());
  let service = customer_service(&store, &log);

  let outcome = service.delete(99).await;

  assert!(outcome.is_redirect());
  assert_eq!(store.len(), 2);
  assert_eq!(log.events().len(), 1);
}

#[tokio::test]
#[serial]
async fn test_delete_store_failure_keeps_the_row() {
  setup_tracing();
  let store = Arc::new(MemoryStore::<Customer>::seeded(customer_drafts(2)));
  store.fail_writes(true);
  let log = Arc::new(EventLog::default());
  let service = customer_service(&store, &log);

  let outcome = service.delete(1).await;

  let state = outcome.form_state().cloned().unwrap();
  assert_eq!(state.message.as_deref(), Some("Database Error: Failed to Delete Customer."));
  assert_eq!(store.len(), 2);
}

#[tokio::test]
#[serial]
async fn test_product_create_parses_typed_fields() {
  setup_tracing();
  let store = Arc::new(MemoryStore::<Product>::new());
  let cache = cache();
  let service = RecordService::<Product>::new(store.clone(), cache.clone()).unwrap();

  let outcome = service.create(product_form()).await;

  assert_eq!(outcome, ActionOutcome::to_listing(RecordKind::Products));
  let row = &store.rows()[0];
  assert_eq!(row.status, ProductStatus::Inactive);
  assert_eq!(row.price, "45.50");
  assert_eq!(row.stock, 3);
  assert_eq!(row.to_fields().get("available_at"), "2024-05-01T08:00");
}

#[tokio::test]
#[serial]
async fn test_product_rejects_negative_stock_and_unknown_status() {
  setup_tracing();
  let store = Arc::new(MemoryStore::<Product>::new());
  let service = RecordService::<Product>::new(store.clone(), cache()).unwrap();

  let fields = product_form().with("stock", "-2").with("status", "discontinued");
  let outcome = service.create(fields).await;

  let state = outcome.form_state().cloned().unwrap();
  assert!(state.errors.contains("stock"));
  assert!(state.errors.contains("status"));
  assert_eq!(state.message.as_deref(), Some("Missing Fields. Failed to Create Product."));
  assert!(store.is_empty());
}

#[tokio::test]
#[serial]
async fn test_product_price_must_fit_the_price_column() {
  setup_tracing();
  let store = Arc::new(MemoryStore::<Product>::new());
  let service = RecordService::<Product>::new(store.clone(), cache()).unwrap();

  for price in ["١٢", "123456789", "1234567890.99"] {
    let outcome = service.create(product_form().with("price", price)).await;
    let state = outcome.form_state().cloned().unwrap();
    assert!(state.errors.contains("price"), "{price} should be rejected inline");
  }
  assert!(store.is_empty());
}

#[tokio::test]
#[serial]
async fn test_mutation_drops_cached_listing_of_its_kind_only() {
  setup_tracing();
  let store = Arc::new(MemoryStore::<Customer>::seeded(customer_drafts(2)));
  let cache = Arc::new(ListingCache::new());
  let log = Arc::new(EventLog::default());
  let fan_out = Arc::new(Revalidators::new().with(cache.clone()).with(log.clone()));
  let service = RecordService::<Customer>::new(store.clone(), fan_out).unwrap();

  let key = ListingParams::default().query_string();
  let generation = cache.generation(RecordKind::Customers);
  assert!(cache.insert(RecordKind::Customers, key.clone(), "<table/>", generation));
  let products_generation = cache.generation(RecordKind::Products);
  assert!(cache.insert(RecordKind::Products, key.clone(), "<table/>", products_generation));

  let outcome = service.delete(1).await;

  assert!(outcome.is_redirect());
  assert!(cache.get(RecordKind::Customers, &key).is_none());
  assert!(cache.get(RecordKind::Products, &key).is_some());
  assert_eq!(log.events().len(), 1);
}
