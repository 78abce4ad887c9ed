// backoffice_server/src/views/error.rs

use askama::Template;

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorView {
  pub title: String,
  pub message: String,
}

impl ErrorView {
  pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
    Self {
      title: title.into(),
      message: message.into(),
    }
  }
}
