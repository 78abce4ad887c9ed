// backoffice/src/pool.rs

//! Bounded store connections.
//!
//! Every store operation holds a connection for the span of one call and gives
//! it back when the guard drops, whether the call succeeded or failed. The
//! Postgres store gets this from `sqlx::pool::PoolConnection`; the in-memory
//! store uses [`ConnectionGate`], which enforces the same bound and exposes
//! counters so the discipline can be observed.

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, info, instrument, warn};

use crate::error::{DataAccessError, DataResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
  pub max_connections: u32,
  /// Idle connections are closed after this long.
  pub idle_timeout: Duration,
  /// Upper bound on waiting for a free connection.
  pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
  fn default() -> Self {
    Self {
      max_connections: 10,
      idle_timeout: Duration::from_secs(30),
      acquire_timeout: Duration::from_secs(2),
    }
  }
}

impl PoolSettings {
  pub fn pg_options(&self) -> PgPoolOptions {
    PgPoolOptions::new()
      .max_connections(self.max_connections)
      .idle_timeout(Some(self.idle_timeout))
      .acquire_timeout(self.acquire_timeout)
  }

  #[instrument(name = "pool::connect", skip(self, database_url), fields(max = self.max_connections))]
  pub async fn connect(&self, database_url: &str) -> DataResult<PgPool> {
    let pool = self.pg_options().connect(database_url).await?;
    info!("Store connection pool ready.");
    Ok(pool)
  }
}

#[derive(Debug, Default)]
struct GateCounters {
  in_use: AtomicU32,
  peak: AtomicU32,
  acquired: AtomicU64,
  released: AtomicU64,
}

/// A semaphore-bounded stand-in for a connection pool.
#[derive(Debug, Clone)]
pub struct ConnectionGate {
  permits: Arc<Semaphore>,
  counters: Arc<GateCounters>,
  settings: PoolSettings,
}

/// One checked-out connection. Returned to the gate on drop.
#[derive(Debug)]
pub struct GateLease {
  _permit: OwnedSemaphorePermit,
  counters: Arc<GateCounters>,
}

impl Drop for GateLease {
  fn drop(&mut self) {
    self.counters.in_use.fetch_sub(1, Ordering::SeqCst);
    self.counters.released.fetch_add(1, Ordering::SeqCst);
  }
}

/// Point-in-time view of a gate's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateStats {
  pub in_use: u32,
  pub peak: u32,
  pub acquired: u64,
  pub released: u64,
}

impl ConnectionGate {
  pub fn new(settings: PoolSettings) -> Self {
    Self {
      permits: Arc::new(Semaphore::new(settings.max_connections as usize)),
      counters: Arc::new(GateCounters::default()),
      settings,
    }
  }

  pub fn settings(&self) -> PoolSettings {
    self.settings
  }

  pub async fn acquire(&self) -> DataResult<GateLease> {
    let permit = match tokio::time::timeout(self.settings.acquire_timeout, self.permits.clone().acquire_owned()).await {
      Ok(Ok(permit)) => permit,
      Ok(Err(_closed)) => return Err(DataAccessError::Unavailable("connection gate closed".to_string())),
      Err(_elapsed) => {
        warn!(max = self.settings.max_connections, "Timed out waiting for a store connection.");
        return Err(DataAccessError::PoolTimeout {
          waited: self.settings.acquire_timeout,
          max_connections: self.settings.max_connections,
        });
      }
    };

    let now_in_use = self.counters.in_use.fetch_add(1, Ordering::SeqCst) + 1;
    self.counters.peak.fetch_max(now_in_use, Ordering::SeqCst);
    self.counters.acquired.fetch_add(1, Ordering::SeqCst);
    debug!(in_use = now_in_use, "Connection checked out.");

    Ok(GateLease {
      _permit: permit,
      counters: self.counters.clone(),
    })
  }

  pub fn stats(&self) -> GateStats {
    GateStats {
      in_use: self.counters.in_use.load(Ordering::SeqCst),
      peak: self.counters.peak.load(Ordering::SeqCst),
      acquired: self.counters.acquired.load(Ordering::SeqCst),
      released: self.counters.released.load(Ordering::SeqCst),
    }
  }
}

impl Default for ConnectionGate {
  fn default() -> Self {
    Self::new(PoolSettings::default())
  }
}
