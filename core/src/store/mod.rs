// backoffice/src/store/mod.rs

//! Relational store access. Each method is one parameterized statement
//! (except [`RecordStore::page_with_total`], which is two on one connection)
//! and holds its connection only for the duration of the call.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::{PgRecord, PgStore};

use async_trait::async_trait;

use crate::error::DataResult;
use crate::record::Record;

#[async_trait]
pub trait RecordStore<R: Record>: Send + Sync {
  /// Rows whose name contains `keyword`, ignoring case; at most `limit` rows.
  async fn search(&self, keyword: &str, limit: i64) -> DataResult<Vec<R>>;

  /// Rows ordered by id ascending.
  async fn page(&self, limit: i64, offset: i64) -> DataResult<Vec<R>>;

  async fn count(&self) -> DataResult<i64>;

  /// A page plus the unfiltered row count. The two statements commit
  /// independently; the count may already reflect a later mutation.
  async fn page_with_total(&self, limit: i64, offset: i64) -> DataResult<(Vec<R>, i64)> {
    let rows = self.page(limit, offset).await?;
    let total = self.count().await?;
    Ok((rows, total))
  }

  async fn fetch(&self, id: i32) -> DataResult<Option<R>>;

  /// Inserts a row; the store assigns its id.
  async fn insert(&self, draft: &R::Draft) -> DataResult<R>;

  /// Rewrites every mutable field of row `id`. `None` when no row matched.
  async fn update(&self, id: i32, draft: &R::Draft) -> DataResult<Option<R>>;

  /// Rows removed (0 or 1).
  async fn delete(&self, id: i32) -> DataResult<u64>;
}

/// Wraps a raw keyword into an ILIKE substring pattern, escaping LIKE
/// metacharacters so `%` and `_` typed into the search box match literally.
pub fn contains_pattern(keyword: &str) -> String {
  let mut pattern = String::with_capacity(keyword.len() + 2);
  pattern.push('%');
  for c in keyword.chars() {
    if matches!(c, '%' | '_' | '\\') {
      pattern.push('\\');
    }
    pattern.push(c);
  }
  pattern.push('%');
  pattern
}

#[cfg(test)]
mod tests {
  use super::contains_pattern;

  #[test]
  fn pattern_escapes_wildcards() {
    assert_eq!(contains_pattern("ada"), "%ada%");
    assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
  }
}
