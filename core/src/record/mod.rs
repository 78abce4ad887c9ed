// backoffice/src/record/mod.rs

//! Record kinds served by the dashboard.

pub mod customer;
pub mod product;
pub mod user;

pub use customer::{Customer, CustomerDraft};
pub use product::{Product, ProductDraft, ProductStatus};
pub use user::{User, UserDraft};

use crate::schema::{FieldErrors, FormFields, Schema};
use serde::Serialize;
use std::fmt;

/// Identifies a listing: its table, path and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
  Customers,
  Products,
  Users,
}

impl RecordKind {
  pub const ALL: [RecordKind; 3] = [RecordKind::Customers, RecordKind::Products, RecordKind::Users];

  pub fn table(&self) -> &'static str {
    match self {
      RecordKind::Customers => "clients",
      RecordKind::Products => "products",
      RecordKind::Users => "users",
    }
  }

  /// Path of the listing view; also the key under which its renderings are cached.
  pub fn listing_path(&self) -> &'static str {
    match self {
      RecordKind::Customers => "/dashboard/customers",
      RecordKind::Products => "/dashboard/products",
      RecordKind::Users => "/users",
    }
  }

  pub fn page_size(&self) -> i64 {
    match self {
      RecordKind::Customers | RecordKind::Products => 5,
      RecordKind::Users => 20,
    }
  }

  /// Singular noun used in user-facing messages.
  pub fn noun(&self) -> &'static str {
    match self {
      RecordKind::Customers => "Customer",
      RecordKind::Products => "Product",
      RecordKind::Users => "User",
    }
  }

  pub fn title(&self) -> &'static str {
    match self {
      RecordKind::Customers => "Customers",
      RecordKind::Products => "Products",
      RecordKind::Users => "Users",
    }
  }
}

impl fmt::Display for RecordKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.table())
  }
}

/// A flat row of one record kind plus the validated payload that creates or
/// overwrites it.
pub trait Record: Clone + fmt::Debug + Send + Sync + Unpin + 'static {
  /// Every mutable field, validated and typed.
  type Draft: Clone + fmt::Debug + Send + Sync + 'static;

  const KIND: RecordKind;

  fn id(&self) -> i32;

  fn name(&self) -> &str;

  fn schema() -> &'static Schema;

  /// Builds the typed draft from fields that already passed [`Record::schema`].
  fn parse_draft(fields: &FormFields) -> Result<Self::Draft, FieldErrors>;

  /// The row a store holds after writing `draft` under `id`.
  fn materialize(id: i32, draft: &Self::Draft) -> Self;

  /// Current values as form fields, for prefilling the edit form.
  fn to_fields(&self) -> FormFields;

  /// Schema check followed by typing. Never touches a store.
  fn validate(fields: &FormFields) -> Result<Self::Draft, FieldErrors> {
    Self::schema().validate(fields)?;
    Self::parse_draft(fields)
  }
}
