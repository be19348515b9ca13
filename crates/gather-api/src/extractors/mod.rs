//! Axum extractors for request handling
//!
//! Custom extractors for authentication, validation, and typed parameters.

mod auth;
mod path;
mod query;
mod validated;

pub use auth::AuthUser;
pub use path::{AttachPath, CodePath, EventIdPath, EventTaskPath};
pub use query::ApiQuery;
pub use validated::{OptionalValidatedJson, ValidatedJson};
