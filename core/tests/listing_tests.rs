// tests/listing_tests.rs
mod common;

use backoffice::record::Customer;
use backoffice::{fetch_listing, ListingParams, MemoryStore, Product, User, SEARCH_LIMIT};
use common::*;
use serial_test::serial;

#[tokio::test]
#[serial]
async fn test_first_page_has_next_offset_and_total() {
  setup_tracing();
  let store = MemoryStore::<Customer>::seeded(customer_drafts(12));

  let page = fetch_listing(&store, &ListingParams::default()).await.unwrap();

  assert_eq!(page.rows.len(), 5);
  assert_eq!(page.rows.first().map(|c| c.id), Some(1));
  assert_eq!(page.next_offset, Some(5));
  assert_eq!(page.total, Some(12));
  assert_eq!(page.previous_offset(), None);
  assert_eq!(page.shown_range(), Some((1, 5)));
}

#[tokio::test]
#[serial]
async fn test_partial_last_page_has_no_next_offset() {
  setup_tracing();
  let store = MemoryStore::<Customer>::seeded(customer_drafts(12));

  let page = fetch_listing(&store, &ListingParams::new("", 10)).await.unwrap();

  assert_eq!(page.rows.iter().map(|c| c.id).collect::<Vec<_>>(), vec![11, 12]);
  assert_eq!(page.next_offset, None);
  assert_eq!(page.total, Some(12));
  assert_eq!(page.previous_offset(), Some(5));
}

#[tokio::test]
#[serial]
async fn test_exactly_full_last_page_still_reports_next_offset() {
  setup_tracing();
  let store = MemoryStore::<Customer>::seeded(customer_drafts(10));

  let page = fetch_listing(&store, &ListingParams::new("", 5)).await.unwrap();
  assert_eq!(page.rows.len(), 5);
  assert_eq!(page.next_offset, Some(10));

  let beyond = fetch_listing(&store, &ListingParams::new("", 10)).await.unwrap();
  assert!(beyond.rows.is_empty());
  assert_eq!(beyond.next_offset, None);
  assert_eq!(beyond.shown_range(), None);
}

#[tokio::test]
#[serial]
async fn test_offset_past_end_returns_empty_page() {
  setup_tracing();
  let store = MemoryStore::<Customer>::seeded(customer_drafts(3));

  let page = fetch_listing(&store, &ListingParams::new("", 500)).await.unwrap();

  assert!(page.rows.is_empty());
  assert_eq!(page.next_offset, None);
  assert_eq!(page.total, Some(3));
}

#[tokio::test]
#[serial]
async fn test_negative_and_garbage_offsets_mean_first_page() {
  setup_tracing();
  let store = MemoryStore::<Customer>::seeded(customer_drafts(7));

  let negative = fetch_listing(&store, &ListingParams::new("", -15)).await.unwrap();
  let garbage = ListingParams {
    q: None,
    offset: Some("ten".to_string()),
  };
  let garbage = fetch_listing(&store, &garbage).await.unwrap();

  assert_eq!(negative.offset, 0);
  assert_eq!(negative.rows.first().map(|c| c.id), Some(1));
  assert_eq!(negative, garbage);
}

#[tokio::test]
#[serial]
async fn test_search_matches_name_case_insensitively() {
  setup_tracing();
  let store = MemoryStore::<Customer>::seeded(vec![
    customer_draft("Ada Lovelace"),
    customer_draft("Grace Hopper"),
    customer_draft("ADAM Smith"),
    customer_draft("Alan Turing"),
  ]);

  let page = fetch_listing(&store, &ListingParams::new("ada", 0)).await.unwrap();

  let names: Vec<_> = page.rows.iter().map(|c| c.name.as_str()).collect();
  assert_eq!(names, vec!["Ada Lovelace", "ADAM Smith"]);
  assert_eq!(page.next_offset, None);
  assert_eq!(page.total, None);
  assert!(page.is_search());
}

#[tokio::test]
#[serial]
async fn test_search_ignores_offset_and_caps_at_limit() {
  setup_tracing();
  let store = MemoryStore::<Customer>::seeded(customer_drafts(130));

  let page = fetch_listing(&store, &ListingParams::new("Customer", 40)).await.unwrap();

  assert_eq!(page.rows.len() as i64, SEARCH_LIMIT);
  assert_eq!(page.offset, 0);
  assert_eq!(page.next_offset, None);
  assert_eq!(page.total, None);
}

#[tokio::test]
#[serial]
async fn test_search_without_matches_is_empty() {
  setup_tracing();
  let store = MemoryStore::<Product>::seeded(vec![product_draft("Kettle"), product_draft("Toaster")]);

  let page = fetch_listing(&store, &ListingParams::new("blender", 0)).await.unwrap();

  assert!(page.rows.is_empty());
  assert_eq!(page.next_offset, None);
}

#[tokio::test]
#[serial]
async fn test_same_params_give_same_page_without_writes() {
  setup_tracing();
  let store = MemoryStore::<Customer>::seeded(customer_drafts(9));
  let params = ListingParams::new("", 5);

  let first = fetch_listing(&store, &params).await.unwrap();
  let second = fetch_listing(&store, &params).await.unwrap();

  assert_eq!(first, second);
}

#[tokio::test]
#[serial]
async fn test_users_page_holds_twenty_rows() {
  setup_tracing();
  let store = MemoryStore::<User>::seeded(user_drafts(25));

  let page = fetch_listing(&store, &ListingParams::default()).await.unwrap();

  assert_eq!(page.rows.len(), 20);
  assert_eq!(page.page_size, 20);
  assert_eq!(page.next_offset, Some(20));
}

#[tokio::test]
#[serial]
async fn test_store_error_propagates_without_partial_result() {
  setup_tracing();
  let store = MemoryStore::<Customer>::seeded(customer_drafts(4));
  store.fail_reads(true);

  let result = fetch_listing(&store, &ListingParams::default()).await;

  assert!(result.is_err());
  assert_eq!(store.gate_stats().in_use, 0);
}
