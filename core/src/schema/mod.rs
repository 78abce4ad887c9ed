// backoffice/src/schema/mod.rs

//! Declarative field validation.
//!
//! Each record kind owns exactly one [`Schema`], a static list of
//! [`FieldRule`]s. Create and update run the same schema; there is no
//! per-call-site validation logic.

mod fields;

pub use fields::{FieldErrors, FormFields};

use chrono::{DateTime, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"^[A-Za-z0-9_'+\-]+(\.[A-Za-z0-9_'+\-]+)*@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
    .expect("email pattern is valid")
});

// ASCII digits only, sized for a NUMERIC(10,2) column.
static DECIMAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{1,8}(\.[0-9]{1,2})?$").expect("decimal pattern is valid"));

/// Shape a non-empty value must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFormat {
  /// Any text.
  Text,
  Email,
  /// Non-negative decimal with at most eight whole and two fraction digits.
  Money,
  /// Non-negative whole number that fits in an `i32`.
  Count,
  OneOf(&'static [&'static str]),
  /// RFC 3339, or the `YYYY-MM-DDTHH:MM[:SS]` form a `datetime-local` input submits.
  Timestamp,
}

impl FieldFormat {
  pub fn accepts(&self, value: &str) -> bool {
    match self {
      FieldFormat::Text => true,
      FieldFormat::Email => EMAIL_RE.is_match(value),
      FieldFormat::Money => DECIMAL_RE.is_match(value),
      FieldFormat::Count => value.bytes().all(|b| b.is_ascii_digit()) && value.parse::<i32>().is_ok(),
      FieldFormat::OneOf(choices) => choices.contains(&value),
      FieldFormat::Timestamp => parse_timestamp(value).is_some(),
    }
  }
}

/// One validation rule: `field -> {required, format}`.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
  pub field: &'static str,
  pub label: &'static str,
  /// Message reported for an empty value. `None` lets the format decide,
  /// which is how `email` rejects "" with its format message.
  pub required: Option<&'static str>,
  pub format: FieldFormat,
  /// Message reported when the format rejects the value.
  pub invalid: &'static str,
}

impl FieldRule {
  pub const fn required_text(field: &'static str, label: &'static str, message: &'static str) -> Self {
    Self {
      field,
      label,
      required: Some(message),
      format: FieldFormat::Text,
      invalid: message,
    }
  }

  fn check(&self, value: &str, errors: &mut FieldErrors) {
    if value.is_empty() {
      if let Some(message) = self.required {
        errors.push(self.field, message);
        return;
      }
    }
    if !self.format.accepts(value) {
      errors.push(self.field, self.invalid);
    }
  }
}

#[derive(Debug)]
pub struct Schema {
  pub rules: &'static [FieldRule],
}

impl Schema {
  pub const fn new(rules: &'static [FieldRule]) -> Self {
    Self { rules }
  }

  /// Checks every rule and collects all failures; never touches a store.
  pub fn validate(&self, fields: &FormFields) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    for rule in self.rules {
      rule.check(fields.get(rule.field), &mut errors);
    }
    if errors.is_empty() {
      Ok(())
    } else {
      Err(errors)
    }
  }
}

pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
  if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
    return Some(dt.naive_utc());
  }
  ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

#[cfg(test)]
mod tests {
  use super::*;

  static RULES: &[FieldRule] = &[
    FieldRule::required_text("name", "Name", "Name is required."),
    FieldRule {
      field: "email",
      label: "Email",
      required: None,
      format: FieldFormat::Email,
      invalid: "Please enter a valid email address",
    },
    FieldRule {
      field: "stock",
      label: "Stock",
      required: Some("Stock is required."),
      format: FieldFormat::Count,
      invalid: "Stock must be a whole number.",
    },
  ];
  static SCHEMA: Schema = Schema::new(RULES);

  #[test]
  fn collects_every_failing_field() {
    let errors = SCHEMA.validate(&FormFields::new()).unwrap_err();
    assert_eq!(errors.messages("name"), ["Name is required."]);
    assert_eq!(errors.messages("email"), ["Please enter a valid email address"]);
    assert_eq!(errors.messages("stock"), ["Stock is required."]);
  }

  #[test]
  fn accepts_well_formed_fields() {
    let fields = FormFields::new()
      .with("name", "Ada")
      .with("email", "ada@example.com")
      .with("stock", "12");
    assert!(SCHEMA.validate(&fields).is_ok());
  }

  #[test]
  fn email_grammar() {
    for ok in ["ada@example.com", "a.b+c@mail.example.org", "o'neil@ex-ample.io"] {
      assert!(FieldFormat::Email.accepts(ok), "{ok} should be accepted");
    }
    for bad in ["", "ada", "ada@", "@example.com", ".ada@example.com", "ada..b@example.com", "ada@example", "ada@example.c"] {
      assert!(!FieldFormat::Email.accepts(bad), "{bad} should be rejected");
    }
  }

  #[test]
  fn money_and_count_formats() {
    assert!(FieldFormat::Money.accepts("19.99"));
    assert!(FieldFormat::Money.accepts("0"));
    assert!(!FieldFormat::Money.accepts("-1"));
    assert!(!FieldFormat::Money.accepts("1.999"));
    assert!(FieldFormat::Money.accepts("12345678.99"));
    assert!(!FieldFormat::Money.accepts("123456789"));
    assert!(!FieldFormat::Money.accepts("1234567890.99"));
    assert!(!FieldFormat::Money.accepts("١٢"));
    assert!(!FieldFormat::Money.accepts("12.٥"));
    assert!(FieldFormat::Count.accepts("0"));
    assert!(!FieldFormat::Count.accepts("-3"));
    assert!(!FieldFormat::Count.accepts("99999999999"));
  }

  #[test]
  fn timestamp_forms() {
    assert!(parse_timestamp("2024-05-01T10:30").is_some());
    assert!(parse_timestamp("2024-05-01T10:30:15").is_some());
    assert!(parse_timestamp("2024-05-01T10:30:15Z").is_some());
    assert!(parse_timestamp("yesterday").is_none());
  }
}
