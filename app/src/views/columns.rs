// backoffice_server/src/views/columns.rs

//! How each record kind appears as a table row.

use backoffice::{Customer, Product, Record, User};

pub const CELL_TEXT: &str = "text";
pub const CELL_IMAGE: &str = "image";
pub const CELL_BADGE: &str = "badge";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
  /// One of the `CELL_*` constants; picks the markup in the table template.
  pub kind: &'static str,
  pub text: String,
}

impl Cell {
  pub fn text(text: impl Into<String>) -> Self {
    Self {
      kind: CELL_TEXT,
      text: text.into(),
    }
  }

  pub fn image(url: impl Into<String>) -> Self {
    Self {
      kind: CELL_IMAGE,
      text: url.into(),
    }
  }

  pub fn badge(text: impl Into<String>) -> Self {
    Self {
      kind: CELL_BADGE,
      text: text.into(),
    }
  }
}

pub trait RecordColumns: Record {
  const HEADERS: &'static [&'static str];

  fn cells(&self) -> Vec<Cell>;
}

impl RecordColumns for Customer {
  const HEADERS: &'static [&'static str] = &["Name", "Email", "Username", "Id"];

  fn cells(&self) -> Vec<Cell> {
    vec![
      Cell::text(&self.name),
      Cell::text(&self.email),
      Cell::text(&self.username),
      Cell::text(self.id.to_string()),
    ]
  }
}

impl RecordColumns for User {
  const HEADERS: &'static [&'static str] = &["Name", "Email", "Username"];

  fn cells(&self) -> Vec<Cell> {
    vec![Cell::text(&self.name), Cell::text(&self.email), Cell::text(&self.username)]
  }
}

impl RecordColumns for Product {
  const HEADERS: &'static [&'static str] = &["Image", "Name", "Status", "Price", "Stock", "Available at"];

  fn cells(&self) -> Vec<Cell> {
    vec![
      Cell::image(&self.image_url),
      Cell::text(&self.name),
      Cell::badge(self.status.as_str()),
      Cell::text(format!("${}", self.price)),
      Cell::text(self.stock.to_string()),
      Cell::text(self.available_at.format("%Y-%m-%d").to_string()),
    ]
  }
}
