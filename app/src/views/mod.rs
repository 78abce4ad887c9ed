// backoffice_server/src/views/mod.rs

//! View models rendered by askama templates under `templates/`.
//!
//! Handlers build one of these from core types and never assemble HTML
//! themselves.

pub mod columns;
pub mod error;
pub mod form;
pub mod layout;
pub mod listing;

pub use columns::RecordColumns;
pub use error::ErrorView;
pub use form::{FormMode, FormView};
pub use layout::Chrome;
pub use listing::{ListingView, TableView};
