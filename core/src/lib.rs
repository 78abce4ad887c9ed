// backoffice/src/lib.rs

//! Backoffice: record listing and mutation core for the admin dashboard.
//!
//! The crate is split the same way a request flows through it:
//!  - [`listing`] answers "show me page N / rows matching q" for one record kind.
//!  - [`action`] validates a submitted form, writes one row and reports where the
//!    browser should go next.
//!  - [`store`] hides the relational store behind [`RecordStore`], with a Postgres
//!    implementation and an in-memory one.
//!  - [`cache`] carries the "this listing changed" signal to whoever memoizes it.
//!
//! Record kinds ([`Customer`], [`Product`], [`User`]) describe themselves through
//! the [`Record`] trait: table, listing path, page size and validation schema.

pub mod action;
pub mod cache;
pub mod error;
pub mod listing;
pub mod pool;
pub mod record;
pub mod schema;
pub mod store;

// --- Re-exports for the public API ---

pub use crate::action::{ActionOutcome, FormState, Operation, RecordService};
pub use crate::cache::{CacheLimits, ListingCache, MutationCommitted, MutationKind, Revalidator, Revalidators};
pub use crate::error::{ActionError, DataAccessError, DataResult, PipelineError};
pub use crate::listing::{fetch_listing, ListingPage, ListingParams, SEARCH_LIMIT};
pub use crate::pool::{ConnectionGate, GateLease, GateStats, PoolSettings};
pub use crate::record::{Customer, Product, ProductStatus, Record, RecordKind, User};
pub use crate::schema::{FieldErrors, FormFields, Schema};
pub use crate::store::{MemoryStore, PgStore, RecordStore};
