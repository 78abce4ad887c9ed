// backoffice/src/record/user.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::customer::CONTACT_RULES;
use super::{Record, RecordKind};
use crate::schema::{FieldErrors, FormFields, Schema};

/// A dashboard user row. Same shape as a customer, kept in its own table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
  pub id: i32,
  pub name: String,
  pub username: String,
  pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
  pub name: String,
  pub username: String,
  pub email: String,
}

static USER_SCHEMA: Schema = Schema::new(CONTACT_RULES);

impl Record for User {
  type Draft = UserDraft;

  const KIND: RecordKind = RecordKind::Users;

  fn id(&self) -> i32 {
    self.id
  }

  fn name(&self) -> &str {
    &self.name
  }

  fn schema() -> &'static Schema {
    &USER_SCHEMA
  }

  fn parse_draft(fields: &FormFields) -> Result<UserDraft, FieldErrors> {
    Ok(UserDraft {
      name: fields.get("name").to_string(),
      username: fields.get("username").to_string(),
      email: fields.get("email").to_string(),
    })
  }

  fn materialize(id: i32, draft: &UserDraft) -> Self {
    User {
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
