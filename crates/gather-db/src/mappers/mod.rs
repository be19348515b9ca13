//! Entity to model mappers
//!
//! - `TryFrom<Model> for Entity`: convert database rows to domain objects,
//!   re-validating stored codes and roles
//! - `*Columns` structs: flatten entity data for binding

mod assignment;
mod event;
mod membership;
mod task;

pub use event::EventColumns;
pub use task::TaskColumns;

use chrono::{DateTime, Utc};
use gather_core::error::DomainError;
use gather_core::value_objects::{JoinCode, TimeWindow};

pub(crate) fn stored_code(column: &str, raw: &str) -> Result<JoinCode, DomainError> {
    JoinCode::parse(raw)
        .map_err(|_| DomainError::DatabaseError(format!("malformed code in {column}: {raw:?}")))
}

pub(crate) fn stored_optional_code(
    column: &str,
    raw: Option<&str>,
) -> Result<Option<JoinCode>, DomainError> {
    raw.map(|code| stored_code(column, code)).transpose()
}

pub(crate) fn window_from_columns(
    starts_at: Option<DateTime<Utc>>,
    ends_at: Option<DateTime<Utc>>,
) -> Option<TimeWindow> {
    match (starts_at, ends_at) {
        (Some(start), Some(end)) => Some(TimeWindow { start, end }),
        _ => None,
    }
}

pub(crate) fn window_to_columns(
    window: Option<&TimeWindow>,
) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    window.map_or((None, None), |w| (Some(w.start), Some(w.end)))
}
