// backoffice_server/src/views/form.rs

use askama::Template;
use backoffice::schema::{FieldFormat, FieldRule};
use backoffice::{FormFields, FormState, Record};

use super::layout::Chrome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
  Create,
  Edit { id: i32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceView {
  pub value: &'static str,
  pub selected: bool,
}

#[derive(Debug, Clone)]
pub struct InputView {
  pub name: &'static str,
  pub label: &'static str,
  /// HTML input type, or `select` for a closed set of choices.
  pub input_type: &'static str,
  pub value: String,
  pub choices: Vec<ChoiceView>,
  pub errors: Vec<String>,
}

impl InputView {
  fn from_rule(rule: &FieldRule, fields: &FormFields, state: Option<&FormState>) -> Self {
    let value = fields.get(rule.field).to_string();
    let (input_type, choices) = match rule.format {
      FieldFormat::Text if rule.field.ends_with("_url") => ("url", Vec::new()),
      FieldFormat::Text | FieldFormat::Money => ("text", Vec::new()),
      FieldFormat::Email => ("email", Vec::new()),
      FieldFormat::Count => ("number", Vec::new()),
      FieldFormat::Timestamp => ("datetime-local", Vec::new()),
      FieldFormat::OneOf(options) => (
        "select",
        options
          .iter()
          .map(|option| ChoiceView {
            value: *option,
            selected: *option == value,
          })
          .collect(),
      ),
    };
    Self {
      name: rule.field,
      label: rule.label,
      input_type,
      choices,
      errors: state.map(|s| s.errors.messages(rule.field).to_vec()).unwrap_or_default(),
      value,
    }
  }
}

#[derive(Template)]
#[template(path = "form.html")]
pub struct FormView {
  pub chrome: Chrome,
  pub title: String,
  pub action: String,
  pub submit_label: &'static str,
  pub cancel_href: &'static str,
  pub inputs: Vec<InputView>,
  pub message: Option<String>,
}

impl FormView {
  /// One input per schema rule, prefilled from `fields`, annotated with the
  /// errors of a rejected submission.
  pub fn new<R: Record>(chrome: Chrome, mode: FormMode, fields: &FormFields, state: Option<&FormState>) -> Self {
    let path = R::KIND.listing_path();
    let (title, action, submit_label) = match mode {
      FormMode::Create => (format!("Create {}", R::KIND.noun()), path.to_string(), "Create"),
      FormMode::Edit { id } => (format!("Edit {}", R::KIND.noun()), format!("{}/{}/edit", path, id), "Save"),
    };
    Self {
      chrome,
      title,
      action,
      submit_label,
      cancel_href: path,
      inputs: R::schema()
        .rules
        .iter()
        .map(|rule| InputView::from_rule(rule, fields, state))
        .collect(),
      message: state.and_then(|s| s.message.clone()),
    }
  }
}
