// backoffice/src/cache.rs

//! Memoized listing renderings and their invalidation.
//!
//! A committed mutation is announced as a [`MutationCommitted`] event. Any
//! [`Revalidator`] receiving it must treat every rendering keyed by that
//! kind's listing path as stale.

use parking_lot::RwLock;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::record::RecordKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
  Created,
  Updated,
  Deleted,
}

/// "A mutation for record kind K has committed."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationCommitted {
  pub kind: RecordKind,
  pub mutation: MutationKind,
  /// Row the mutation targeted; `None` for an update or delete that matched nothing.
  pub id: Option<i32>,
}

impl MutationCommitted {
  /// Listing path whose renderings are now stale.
  pub fn path(&self) -> &'static str {
    self.kind.listing_path()
  }
}

pub trait Revalidator: Send + Sync {
  fn revalidate(&self, event: &MutationCommitted);
}

/// Fans one event out to several listeners.
#[derive(Default, Clone)]
pub struct Revalidators(Vec<Arc<dyn Revalidator>>);

impl Revalidators {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with(mut self, listener: Arc<dyn Revalidator>) -> Self {
    self.0.push(listener);
    self
  }
}

impl Revalidator for Revalidators {
  fn revalidate(&self, event: &MutationCommitted) {
    for listener in &self.0 {
      listener.revalidate(event);
    }
  }
}

/// Bounds on what one kind may hold. A search box keyed cache grows with
/// whatever visitors type, so both size and age are capped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheLimits {
  /// Renderings kept per kind; the oldest is evicted first.
  pub capacity: usize,
  /// Age after which a rendering is a miss, so writes from other processes
  /// show up without a local mutation.
  pub ttl: Duration,
}

impl Default for CacheLimits {
  fn default() -> Self {
    Self {
      capacity: 64,
      ttl: Duration::from_secs(30),
    }
  }
}

#[derive(Debug)]
struct CachedPage {
  rendered: Arc<str>,
  stored_at: Instant,
}

#[derive(Debug, Default)]
struct KindEntries {
  generation: u64,
  pages: HashMap<String, CachedPage>,
  /// Keys in insertion order, oldest at the front.
  order: VecDeque<String>,
}

impl KindEntries {
  fn store(&mut self, key: String, rendered: Arc<str>, capacity: usize) -> usize {
    if self.pages.contains_key(&key) {
      self.order.retain(|k| k != &key);
    }
    self.order.push_back(key.clone());
    self.pages.insert(
      key,
      CachedPage {
        rendered,
        stored_at: Instant::now(),
      },
    );

    let mut evicted = 0;
    while self.pages.len() > capacity {
      let Some(oldest) = self.order.pop_front() else { break };
      self.pages.remove(&oldest);
      evicted += 1;
    }
    evicted
  }

  fn clear(&mut self) -> usize {
    let dropped = self.pages.len();
    self.pages.clear();
    self.order.clear();
    dropped
  }
}

/// Rendered listing fragments keyed by record kind and canonical query string.
#[derive(Debug, Default)]
pub struct ListingCache {
  limits: CacheLimits,
  entries: RwLock<HashMap<RecordKind, KindEntries>>,
  hits: AtomicU64,
  misses: AtomicU64,
}

impl ListingCache {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_limits(limits: CacheLimits) -> Self {
    Self {
      limits,
      ..Self::default()
    }
  }

  pub fn limits(&self) -> CacheLimits {
    self.limits
  }

  /// A live rendering for `key`; expired ones count as misses.
  pub fn get(&self, kind: RecordKind, key: &str) -> Option<Arc<str>> {
    let found = self
      .entries
      .read()
      .get(&kind)
      .and_then(|entries| entries.pages.get(key))
      .filter(|page| page.stored_at.elapsed() < self.limits.ttl)
      .map(|page| page.rendered.clone());
    match &found {
      Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
      None => self.misses.fetch_add(1, Ordering::Relaxed),
    };
    found
  }

  /// Current invalidation generation of `kind`. Read it before querying the
  /// store and hand it back to [`ListingCache::insert`].
  pub fn generation(&self, kind: RecordKind) -> u64 {
    self.entries.read().get(&kind).map_or(0, |e| e.generation)
  }

  /// Stores a rendering produced while `generation` was current. Dropped (and
  /// `false` returned) if the kind was invalidated in the meantime. Evicts the
  /// kind's oldest renderings beyond [`CacheLimits::capacity`].
  pub fn insert(&self, kind: RecordKind, key: impl Into<String>, rendered: impl Into<Arc<str>>, generation: u64) -> bool {
    if self.limits.capacity == 0 {
      return false;
    }
    let mut entries = self.entries.write();
    let slot = entries.entry(kind).or_default();
    if slot.generation != generation {
      debug!(%kind, "Discarding rendering computed before the last invalidation.");
      return false;
    }
    let evicted = slot.store(key.into(), rendered.into(), self.limits.capacity);
    if evicted > 0 {
      debug!(%kind, evicted, "Evicted oldest listing renderings.");
    }
    true
  }

  /// Drops every rendering of `kind`; returns how many were dropped.
  pub fn invalidate(&self, kind: RecordKind) -> usize {
    let mut entries = self.entries.write();
    let slot = entries.entry(kind).or_default();
    slot.generation += 1;
    slot.clear()
  }

  pub fn len(&self, kind: RecordKind) -> usize {
    self.entries.read().get(&kind).map_or(0, |e| e.pages.len())
  }

  pub fn hits(&self) -> u64 {
    self.hits.load(Ordering::Relaxed)
  }

  pub fn misses(&self) -> u64 {
    self.misses.load(Ordering::Relaxed)
  }
}

impl Revalidator for ListingCache {
  fn revalidate(&self, event: &MutationCommitted) {
    let dropped = self.invalidate(event.kind);
    info!(path = event.path(), mutation = ?event.mutation, dropped, "Listing renderings invalidated.");
  }
}
