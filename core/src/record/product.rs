// backoffice/src/record/product.rs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type as SqlxType};
use std::fmt;
use std::str::FromStr;

use super::{Record, RecordKind};
use crate::schema::{parse_timestamp, FieldErrors, FieldFormat, FieldRule, FormFields, Schema};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
  Active,
  Inactive,
  Archived,
}

impl ProductStatus {
  pub const CHOICES: &'static [&'static str] = &["active", "inactive", "archived"];

  pub fn as_str(&self) -> &'static str {
    match self {
      ProductStatus::Active => "active",
      ProductStatus::Inactive => "inactive",
      ProductStatus::Archived => "archived",
    }
  }
}

impl fmt::Display for ProductStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for ProductStatus {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "active" => Ok(ProductStatus::Active),
      "inactive" => Ok(ProductStatus::Inactive),
      "archived" => Ok(ProductStatus::Archived),
      other => Err(format!("unknown product status '{}'", other)),
    }
  }
}

/// `price` is NUMERIC in the store and travels as its decimal text so no
/// precision is lost on the way through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Product {
  pub id: i32,
  pub image_url: String,
  pub name: String,
  pub status: ProductStatus,
  pub price: String,
  pub stock: i32,
  pub available_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
  pub image_url: String,
  pub name: String,
  pub status: ProductStatus,
  pub price: String,
  pub stock: i32,
  pub available_at: NaiveDateTime,
}

static PRODUCT_RULES: &[FieldRule] = &[
  FieldRule::required_text("name", "Name", "Name is required."),
  FieldRule {
    field: "status",
    label: "Status",
    required: Some("Please select a product status."),
    format: FieldFormat::OneOf(ProductStatus::CHOICES),
    invalid: "Please select a product status.",
  },
  FieldRule::required_text("image_url", "Image URL", "Image URL is required."),
  FieldRule {
    field: "price",
    label: "Price",
    required: Some("Price is required."),
    format: FieldFormat::Money,
    invalid: "Please enter a price greater than or equal to 0.",
  },
  FieldRule {
    field: "stock",
    label: "Stock",
    required: Some("Stock is required."),
    format: FieldFormat::Count,
    invalid: "Stock must be a whole number.",
  },
  FieldRule {
    field: "available_at",
    label: "Available at",
    required: Some("Availability date is required."),
    format: FieldFormat::Timestamp,
    invalid: "Please enter a valid availability date.",
  },
];

static PRODUCT_SCHEMA: Schema = Schema::new(PRODUCT_RULES);

impl Record for Product {
  type Draft = ProductDraft;

  const KIND: RecordKind = RecordKind::Products;

  fn id(&self) -> i32 {
    self.id
  }

  fn name(&self) -> &str {
    &self.name
  }

  fn schema() -> &'static Schema {
    &PRODUCT_SCHEMA
  }

  fn parse_draft(fields: &FormFields) -> Result<ProductDraft, FieldErrors> {
    let mut errors = FieldErrors::new();
    let status = fields.get("status").parse::<ProductStatus>().map_err(|e| errors.push("status", e)).ok();
    let stock = fields.get("stock").parse::<i32>().map_err(|e| errors.push("stock", e.to_string())).ok();
    let available_at = parse_timestamp(fields.get("available_at"));
    if available_at.is_none() {
      errors.push("available_at", "Please enter a valid availability date.");
    }

    match (status, stock, available_at) {
      (Some(status), Some(stock), Some(available_at)) => Ok(ProductDraft {
        image_url: fields.get("image_url").to_string(),
        name: fields.get("name").to_string(),
        status,
        price: fields.get("price").to_string(),
        stock,
        available_at,
      }),
      _ => Err(errors),
    }
  }

  fn materialize(id: i32, draft: &ProductDraft) -> Self {
    Product {
      id,
      image_url: draft.image_url.clone(),
      name: draft.name.clone(),
      status: draft.status,
      price: draft.price.clone(),
      stock: draft.stock,
      available_at: draft.available_at,
    }
  }

  fn to_fields(&self) -> FormFields {
    FormFields::new()
      .with("name", &self.name)
      .with("status", self.status.as_str())
      .with("image_url", &self.image_url)
      .with("price", &self.price)
      .with("stock", self.stock.to_string())
      .with("available_at", self.available_at.format("%Y-%m-%dT%H:%M").to_string())
  }
}
