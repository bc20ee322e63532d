pub mod event;
pub mod lock;

use crate::errors::{AppError, AppResult};

/// Partition component shared by both keyed tables.
pub const USER_ID: &str = "user_id";
/// Sort component shared by both keyed tables.
pub const EVENT_DATE: &str = "event_date";

/// Key components must be present and not blank. The value is kept as given.
pub(crate) fn require_key(field: &str, value: &str) -> AppResult<String> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidRecord(format!(
            "missing required field '{field}'"
        )));
    }
    Ok(value.to_string())
}
