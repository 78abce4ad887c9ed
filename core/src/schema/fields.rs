// backoffice/src/schema/fields.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw field values exactly as submitted by a form. Missing fields read as "".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormFields(BTreeMap<String, String>);

impl FormFields {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, field: &str) -> &str {
    self.0.get(field).map(String::as_str).unwrap_or("")
  }

  pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
    self.0.insert(field.into(), value.into());
  }

  pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
    self.set(field, value);
    self
  }
}

impl From<BTreeMap<String, String>> for FormFields {
  fn from(map: BTreeMap<String, String>) -> Self {
    Self(map)
  }
}

impl From<std::collections::HashMap<String, String>> for FormFields {
  fn from(map: std::collections::HashMap<String, String>) -> Self {
    Self(map.into_iter().collect())
  }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormFields {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
  }
}

/// Human-readable messages keyed by field name. A field may carry several.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push(&mut self, field: &str, message: impl Into<String>) {
    self.0.entry(field.to_string()).or_default().push(message.into());
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  /// Messages for `field`, empty when the field is valid.
  pub fn messages(&self, field: &str) -> &[String] {
    self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
  }

  pub fn contains(&self, field: &str) -> bool {
    self.0.contains_key(field)
  }

  pub fn fields(&self) -> impl Iterator<Item = &str> {
    self.0.keys().map(String::as_str)
  }
}
