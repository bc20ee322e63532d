use super::{EVENT_DATE, USER_ID, require_key};
use crate::db::table::TableSchema;
use crate::errors::{AppError, AppResult};
use rusqlite::Row;
use serde::Serialize;

/// Hours as logged. Stored as text so values round-trip unchanged; a
/// non-empty value must be a finite, non-negative number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Hours(String);

impl Hours {
    pub fn parse(raw: &str) -> AppResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }

        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() && v >= 0.0 => Ok(Self(trimmed.to_string())),
            _ => Err(AppError::InvalidHours(raw.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Hours a user logged for one date.
///
/// Keyed by (user_id, event_date); a second event on the same key
/// replaces the first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub user_id: String,    // ⇔ events.user_id (partition key)
    pub event_date: String, // ⇔ events.event_date (sort key)
    pub user_name: String,
    pub reason: String,
    pub hours: Hours,
}

impl Event {
    pub fn new(
        user_id: &str,
        event_date: &str,
        user_name: &str,
        reason: &str,
        hours: &str,
    ) -> AppResult<Self> {
        Ok(Self {
            user_id: require_key(USER_ID, user_id)?,
            event_date: require_key(EVENT_DATE, event_date)?,
            user_name: user_name.to_string(),
            reason: reason.to_string(),
            hours: Hours::parse(hours)?,
        })
    }
}

impl TableSchema for Event {
    const TABLE: &'static str = "events";
    const PARTITION_KEY: &'static str = USER_ID;
    const SORT_KEY: &'static str = EVENT_DATE;
    const ATTRIBUTES: &'static [&'static str] = &["user_name", "reason", "hours"];

    fn partition_key(&self) -> &str {
        &self.user_id
    }

    fn sort_key(&self) -> &str {
        &self.event_date
    }

    fn attribute_values(&self) -> Vec<&str> {
        vec![
            self.user_name.as_str(),
            self.reason.as_str(),
            self.hours.as_str(),
        ]
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            user_id: row.get(USER_ID)?,
            event_date: row.get(EVENT_DATE)?,
            user_name: row.get("user_name")?,
            reason: row.get("reason")?,
            // already validated on the way in
            hours: Hours(row.get("hours")?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hours_accept_decimals_and_blank() {
        assert_eq!(Hours::parse("8").unwrap().as_str(), "8");
        assert_eq!(Hours::parse(" 7.5 ").unwrap().as_str(), "7.5");
        assert_eq!(Hours::parse("").unwrap().as_str(), "");
    }

    #[test]
    fn hours_reject_garbage() {
        for raw in ["eight", "-1", "NaN", "inf", "None"] {
            assert!(
                matches!(Hours::parse(raw), Err(AppError::InvalidHours(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn event_requires_both_key_fields() {
        assert!(Event::new("", "2024-01-01", "A", "PTO", "8").is_err());
        assert!(Event::new("alice", "  ", "A", "PTO", "8").is_err());
        assert!(Event::new("alice", "2024-01-01", "", "", "").is_ok());
    }

    #[test]
    fn event_serializes_schema_fields_only() {
        let ev = Event::new("alice", "2024-03-01", "Alice", "PTO", "8").unwrap();
        let json = serde_json::to_value(&ev).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "user_id": "alice",
                "event_date": "2024-03-01",
                "user_name": "Alice",
                "reason": "PTO",
                "hours": "8",
            })
        );
    }
}
