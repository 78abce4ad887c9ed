// backoffice/src/store/memory.rs

//! In-process [`RecordStore`] used by tests and local demos.
//!
//! Rows live in a `BTreeMap` keyed by id, so listing order matches
//! `ORDER BY id`. Every call checks out a [`GateLease`](crate::pool::GateLease)
//! from a [`ConnectionGate`] first, which makes connection discipline visible
//! through [`MemoryStore::gate_stats`].

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

use super::RecordStore;
use crate::error::{DataAccessError, DataResult};
use crate::pool::{ConnectionGate, GateStats, PoolSettings};
use crate::record::Record;

#[derive(Debug)]
struct Table<R> {
  rows: BTreeMap<i32, R>,
  next_id: i32,
}

#[derive(Debug)]
pub struct MemoryStore<R: Record> {
  table: Mutex<Table<R>>,
  gate: ConnectionGate,
  latency: Option<Duration>,
  fail_reads: AtomicBool,
  fail_writes: AtomicBool,
  writes: AtomicU64,
}

impl<R: Record> MemoryStore<R> {
  pub fn new() -> Self {
    Self::with_settings(PoolSettings::default())
  }

  pub fn with_settings(settings: PoolSettings) -> Self {
    Self {
      table: Mutex::new(Table {
        rows: BTreeMap::new(),
        next_id: 1,
      }),
      gate: ConnectionGate::new(settings),
      latency: None,
      fail_reads: AtomicBool::new(false),
      fail_writes: AtomicBool::new(false),
      writes: AtomicU64::new(0),
    }
  }

  /// Holds each checked-out connection for `latency` before answering.
  pub fn with_latency(mut self, latency: Duration) -> Self {
    self.latency = Some(latency);
    self
  }

  /// Seeds rows through the draft path so ids are assigned as the store would.
  pub fn seeded(drafts: impl IntoIterator<Item = R::Draft>) -> Self {
    Self::new().with_rows(drafts)
  }

  pub fn with_rows(self, drafts: impl IntoIterator<Item = R::Draft>) -> Self {
    {
      let mut table = self.table.lock();
      for draft in drafts {
        let id = table.next_id;
        table.next_id += 1;
        table.rows.insert(id, R::materialize(id, &draft));
      }
    }
    self
  }

  /// Makes every subsequent read fail as if the store were unreachable.
  pub fn fail_reads(&self, fail: bool) {
    self.fail_reads.store(fail, Ordering::SeqCst);
  }

  /// Makes every subsequent write fail as if a constraint were violated.
  pub fn fail_writes(&self, fail: bool) {
    self.fail_writes.store(fail, Ordering::SeqCst);
  }

  /// Successful writes that changed at least one row.
  pub fn writes(&self) -> u64 {
    self.writes.load(Ordering::SeqCst)
  }

  pub fn len(&self) -> usize {
    self.table.lock().rows.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn rows(&self) -> Vec<R> {
    self.table.lock().rows.values().cloned().collect()
  }

  pub fn gate_stats(&self) -> GateStats {
    self.gate.stats()
  }

  async fn hold(&self) {
    if let Some(latency) = self.latency {
      tokio::time::sleep(latency).await;
    }
  }

  fn check_read(&self) -> DataResult<()> {
    if self.fail_reads.load(Ordering::SeqCst) {
      return Err(DataAccessError::Unavailable(format!("{} is unreachable", R::KIND.table())));
    }
    Ok(())
  }

  fn check_write(&self) -> DataResult<()> {
    if self.fail_writes.load(Ordering::SeqCst) {
      return Err(DataAccessError::Unavailable(format!(
        "write to {} violated a constraint",
        R::KIND.table()
      )));
    }
    Ok(())
  }
}

impl<R: Record> Default for MemoryStore<R> {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl<R: Record> RecordStore<R> for MemoryStore<R> {
  async fn search(&self, keyword: &str, limit: i64) -> DataResult<Vec<R>> {
    let _lease = self.gate.acquire().await?;
    self.hold().await;
    self.check_read()?;
    let needle = keyword.to_lowercase();
    let table = self.table.lock();
    Ok(
      table
        .rows
        .values()
        .filter(|r| r.name().to_lowercase().contains(&needle))
        .take(limit.max(0) as usize)
        .cloned()
        .collect(),
    )
  }

  async fn page(&self, limit: i64, offset: i64) -> DataResult<Vec<R>> {
    let _lease = self.gate.acquire().await?;
    self.hold().await;
    self.check_read()?;
    let table = self.table.lock();
    Ok(
      table
        .rows
        .values()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .cloned()
        .collect(),
    )
  }

  async fn count(&self) -> DataResult<i64> {
    let _lease = self.gate.acquire().await?;
    self.hold().await;
    self.check_read()?;
    Ok(self.table.lock().rows.len() as i64)
  }

  async fn fetch(&self, id: i32) -> DataResult<Option<R>> {
    let _lease = self.gate.acquire().await?;
    self.hold().await;
    self.check_read()?;
    Ok(self.table.lock().rows.get(&id).cloned())
  }

  async fn insert(&self, draft: &R::Draft) -> DataResult<R> {
    let _lease = self.gate.acquire().await?;
    self.hold().await;
    self.check_write()?;
    let row = {
      let mut table = self.table.lock();
      let id = table.next_id;
      table.next_id += 1;
      let row = R::materialize(id, draft);
      table.rows.insert(id, row.clone());
      row
    };
    self.writes.fetch_add(1, Ordering::SeqCst);
    debug!(table = R::KIND.table(), id = row.id(), "Row inserted.");
    Ok(row)
  }

  async fn update(&self, id: i32, draft: &R::Draft) -> DataResult<Option<R>> {
    let _lease = self.gate.acquire().await?;
    self.hold().await;
    self.check_write()?;
    let updated = {
      let mut table = self.table.lock();
      match table.rows.get_mut(&id) {
        Some(slot) => {
          *slot = R::materialize(id, draft);
          Some(slot.clone())
        }
        None => None,
      }
    };
    if updated.is_some() {
      self.writes.fetch_add(1, Ordering::SeqCst);
    }
    Ok(updated)
  }

  async fn delete(&self, id: i32) -> DataResult<u64> {
    let _lease = self.gate.acquire().await?;
    self.hold().await;
    self.check_write()?;
    let removed = self.table.lock().rows.remove(&id).is_some();
    if removed {
      self.writes.fetch_add(1, Ordering::SeqCst);
    }
    Ok(removed as u64)
  }
}
