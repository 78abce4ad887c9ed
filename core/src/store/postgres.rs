// backoffice/src/store/postgres.rs

//! PostgreSQL implementation of [`RecordStore`].

use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgArguments, PgPool, PgRow};
use sqlx::query::QueryAs;
use sqlx::{FromRow, Postgres};
use tracing::{debug, error};

use super::{contains_pattern, RecordStore};
use crate::error::DataResult;
use crate::record::{Customer, Product, Record, User};

pub type PgQueryAs<'q, R> = QueryAs<'q, Postgres, R, PgArguments>;

/// SQL a record kind needs beyond its table name.
pub trait PgRecord: Record + for<'r> FromRow<'r, PgRow> {
  /// Select list, with the casts that map store types onto the record's fields.
  const COLUMNS: &'static str;

  /// `INSERT ... RETURNING`, draft bound as `$1..$n`.
  const INSERT_SQL: &'static str;

  /// `UPDATE ... WHERE id = $n+1 RETURNING`, draft bound as `$1..$n`.
  const UPDATE_SQL: &'static str;

  fn bind_draft<'q>(query: PgQueryAs<'q, Self>, draft: &'q Self::Draft) -> PgQueryAs<'q, Self>;
}

impl PgRecord for Customer {
  const COLUMNS: &'static str = "id, name, username, email";
  const INSERT_SQL: &'static str =
    "INSERT INTO clients (name, username, email) VALUES ($1, $2, $3) RETURNING id, name, username, email";
  const UPDATE_SQL: &'static str =
    "UPDATE clients SET name = $1, username = $2, email = $3 WHERE id = $4 RETURNING id, name, username, email";

  fn bind_draft<'q>(query: PgQueryAs<'q, Self>, draft: &'q Self::Draft) -> PgQueryAs<'q, Self> {
    query.bind(&draft.name).bind(&draft.username).bind(&draft.email)
  }
}

impl PgRecord for User {
  const COLUMNS: &'static str = "id, name, username, email";
  const INSERT_SQL: &'static str =
    "INSERT INTO users (name, username, email) VALUES ($1, $2, $3) RETURNING id, name, username, email";
  const UPDATE_SQL: &'static str =
    "UPDATE users SET name = $1, username = $2, email = $3 WHERE id = $4 RETURNING id, name, username, email";

  fn bind_draft<'q>(query: PgQueryAs<'q, Self>, draft: &'q Self::Draft) -> PgQueryAs<'q, Self> {
    query.bind(&draft.name).bind(&draft.username).bind(&draft.email)
  }
}

impl PgRecord for Product {
  const COLUMNS: &'static str = "id, image_url, name, status, price::TEXT AS price, stock, available_at";
  const INSERT_SQL: &'static str = "INSERT INTO products (image_url, name, status, price, stock, available_at) \
     VALUES ($1, $2, $3, $4::NUMERIC, $5, $6) \
     RETURNING id, image_url, name, status, price::TEXT AS price, stock, available_at";
  const UPDATE_SQL: &'static str = "UPDATE products SET image_url = $1, name = $2, status = $3, price = $4::NUMERIC, \
     stock = $5, available_at = $6 WHERE id = $7 \
     RETURNING id, image_url, name, status, price::TEXT AS price, stock, available_at";

  fn bind_draft<'q>(query: PgQueryAs<'q, Self>, draft: &'q Self::Draft) -> PgQueryAs<'q, Self> {
    query
      .bind(&draft.image_url)
      .bind(&draft.name)
      .bind(draft.status)
      .bind(&draft.price)
      .bind(draft.stock)
      .bind(draft.available_at)
  }
}

/// Store backed by a shared `PgPool`. Each call checks out one connection and
/// returns it when the `PoolConnection` guard drops.
#[derive(Debug, Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  pub fn pool(&self) -> &PgPool {
    &self.pool
  }

  async fn acquire(&self) -> DataResult<PoolConnection<Postgres>> {
    self.pool.acquire().await.map_err(|e| {
      error!(error = %e, "Failed to check out a store connection.");
      e.into()
    })
  }
}

#[async_trait]
impl<R: PgRecord> RecordStore<R> for PgStore {
  async fn search(&self, keyword: &str, limit: i64) -> DataResult<Vec<R>> {
    let sql = format!("SELECT {} FROM {} WHERE name ILIKE $1 LIMIT $2", R::COLUMNS, R::KIND.table());
    let mut conn = self.acquire().await?;
    let rows = sqlx::query_as::<_, R>(&sql)
      .bind(contains_pattern(keyword))
      .bind(limit)
      .fetch_all(&mut *conn)
      .await?;
    debug!(table = R::KIND.table(), matched = rows.len(), "Search query finished.");
    Ok(rows)
  }

  async fn page(&self, limit: i64, offset: i64) -> DataResult<Vec<R>> {
    let sql = format!("SELECT {} FROM {} ORDER BY id LIMIT $1 OFFSET $2", R::COLUMNS, R::KIND.table());
    let mut conn = self.acquire().await?;
    let rows = sqlx::query_as::<_, R>(&sql).bind(limit).bind(offset).fetch_all(&mut *conn).await?;
    Ok(rows)
  }

  async fn count(&self) -> DataResult<i64> {
    let sql = format!("SELECT COUNT(*) FROM {}", R::KIND.table());
    let mut conn = self.acquire().await?;
    let total = sqlx::query_scalar::<_, i64>(&sql).fetch_one(&mut *conn).await?;
    Ok(total)
  }

  async fn page_with_total(&self, limit: i64, offset: i64) -> DataResult<(Vec<R>, i64)> {
    let table = R::KIND.table();
    let page_sql = format!("SELECT {} FROM {} ORDER BY id LIMIT $1 OFFSET $2", R::COLUMNS, table);
    let count_sql = format!("SELECT COUNT(*) FROM {}", table);

    let mut conn = self.acquire().await?;
    let rows = sqlx::query_as::<_, R>(&page_sql)
      .bind(limit)
      .bind(offset)
      .fetch_all(&mut *conn)
      .await?;
    let total = sqlx::query_scalar::<_, i64>(&count_sql).fetch_one(&mut *conn).await?;
    debug!(table, offset, rows = rows.len(), total, "Page query finished.");
    Ok((rows, total))
  }

  async fn fetch(&self, id: i32) -> DataResult<Option<R>> {
    let sql = format!("SELECT {} FROM {} WHERE id = $1", R::COLUMNS, R::KIND.table());
    let mut conn = self.acquire().await?;
    let row = sqlx::query_as::<_, R>(&sql).bind(id).fetch_optional(&mut *conn).await?;
    Ok(row)
  }

  async fn insert(&self, draft: &R::Draft) -> DataResult<R> {
    let mut conn = self.acquire().await?;
    let row = R::bind_draft(sqlx::query_as::<_, R>(R::INSERT_SQL), draft)
      .fetch_one(&mut *conn)
      .await?;
    Ok(row)
  }

  async fn update(&self, id: i32, draft: &R::Draft) -> DataResult<Option<R>> {
    let mut conn = self.acquire().await?;
    let row = R::bind_draft(sqlx::query_as::<_, R>(R::UPDATE_SQL), draft)
      .bind(id)
      .fetch_optional(&mut *conn)
      .await?;
    Ok(row)
  }

  async fn delete(&self, id: i32) -> DataResult<u64> {
    let sql = format!("DELETE FROM {} WHERE id = $1", R::KIND.table());
    let mut conn = self.acquire().await?;
    let result = sqlx::query(&sql).bind(id).execute(&mut *conn).await?;
    Ok(result.rows_affected())
  }
}
