// backoffice/src/record/customer.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{Record, RecordKind};
use crate::schema::{FieldErrors, FieldFormat, FieldRule, FormFields, Schema};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Customer {
  pub id: i32,
  pub name: String,
  pub username: String,
  pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerDraft {
  pub name: String,
  pub username: String,
  pub email: String,
}

/// Rules shared by customers and users: both are `(name, username, email)` rows.
pub(crate) static CONTACT_RULES: &[FieldRule] = &[
  FieldRule::required_text("name", "Name", "Name is required."),
  FieldRule::required_text("username", "Username", "Username is required."),
  FieldRule {
    field: "email",
    label: "Email",
    required: None,
    format: FieldFormat::Email,
    invalid: "Please enter a valid email address",
  },
];

static CUSTOMER_SCHEMA: Schema = Schema::new(CONTACT_RULES);

impl Record for Customer {
  type Draft = CustomerDraft;

  const KIND: RecordKind = RecordKind::Customers;

  fn id(&self) -> i32 {
    self.id
  }

  fn name(&self) -> &str {
    &self.name
  }

  fn schema() -> &'static Schema {
    &CUSTOMER_SCHEMA
  }

  fn parse_draft(fields: &FormFields) -> Result<CustomerDraft, FieldErrors> {
    Ok(CustomerDraft {
      name: fields.get("name").to_string(),
      username: fields.get("username").to_string(),
      email: fields.get("email").to_string(),
    })
  }

  fn materialize(id: i32, draft: &CustomerDraft) -> Self {
    Customer {
      id,
      name: draft.name.clone(),
      username: draft.username.clone(),
      email: draft.email.clone(),
    }
  }

  fn to_fields(&self) -> FormFields {
    FormFields::new()
      .with("name", &self.name)
      .with("username", &self.username)
      .with("email", &self.email)
  }
}
