// tests/common/mod.rs
#![allow(dead_code)]

use backoffice::record::{CustomerDraft, ProductDraft, UserDraft};
use backoffice::{FormFields, ListingCache, ProductStatus};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::Level;

// --- Tracing (once per test binary) ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Fixtures ---
pub fn customer_draft(name: &str) -> CustomerDraft {
  let handle = name.to_lowercase().replace(' ', ".");
  CustomerDraft {
    name: name.to_string(),
    username: handle.clone(),
    email: format!("{}@example.com", handle),
  }
}

pub fn customer_drafts(count: usize) -> Vec<CustomerDraft> {
  (1..=count).map(|n| customer_draft(&format!("Customer {:03}", n))).collect()
}

pub fn user_drafts(count: usize) -> Vec<UserDraft> {
  (1..=count)
    .map(|n| UserDraft {
      name: format!("User {:03}", n),
      username: format!("user{}", n),
      email: format!("user{}@example.com", n),
    })
    .collect()
}

pub fn product_draft(name: &str) -> ProductDraft {
  ProductDraft {
    image_url: format!("https://cdn.example.com/{}.png", name.to_lowercase()),
    name: name.to_string(),
    status: ProductStatus::Active,
    price: "19.99".to_string(),
    stock: 12,
    available_at: NaiveDate::from_ymd_opt(2024, 3, 1)
      .and_then(|d| d.and_hms_opt(9, 30, 0))
      .unwrap(),
  }
}

pub fn customer_form(name: &str, username: &str, email: &str) -> FormFields {
  FormFields::new()
    .with("name", name)
    .with("username", username)
    .with("email", email)
}

pub fn product_form() -> FormFields {
  FormFields::new()
    .with("name", "Desk Lamp")
    .with("status", "inactive")
    .with("image_url", "https://cdn.example.com/lamp.png")
    .with("price", "45.50")
    .with("stock", "3")
    .with("available_at", "2024-05-01T08:00")
}

pub fn cache() -> Arc<ListingCache> {
  Arc::new(ListingCache::new())
}
