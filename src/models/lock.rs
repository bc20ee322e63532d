use super::{EVENT_DATE, USER_ID, require_key};
use crate::db::table::TableSchema;
use crate::errors::AppResult;
use rusqlite::Row;
use serde::Serialize;

/// Marks (user_id, event_date) as closed. Presence is the whole state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lock {
    pub user_id: String,
    pub event_date: String,
}

impl Lock {
    pub fn new(user_id: &str, event_date: &str) -> AppResult<Self> {
        Ok(Self {
            user_id: require_key(USER_ID, user_id)?,
            event_date: require_key(EVENT_DATE, event_date)?,
        })
    }
}

impl TableSchema for Lock {
    const TABLE: &'static str = "locks";
    const PARTITION_KEY: &'static str = USER_ID;
    const SORT_KEY: &'static str = EVENT_DATE;
    const ATTRIBUTES: &'static [&'static str] = &[];

    fn partition_key(&self) -> &str {
        &self.user_id
    }

    fn sort_key(&self) -> &str {
        &self.event_date
    }

    fn attribute_values(&self) -> Vec<&str> {
        Vec::new()
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            user_id: row.get(USER_ID)?,
            event_date: row.get(EVENT_DATE)?,
        })
    }
}
