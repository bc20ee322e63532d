//! Query facade: the externally invoked ledger operations.
//!
//! Every operation returns serializable JSON and never an `Err`. Absence
//! becomes `{}` and store faults become `{"status": "ERROR", "error": ..}`,
//! so callers inspect the payload shape to detect failure.

use crate::core::events::EventStore;
use crate::core::input::RecordInput;
use crate::core::locks::LockStore;
use crate::db::pool::DbPool;
use crate::db::table::{BulkDelete, Lookup};
use crate::errors::{AppError, AppResult};
use crate::models::event::Event;
use crate::models::lock::Lock;
use crate::models::{EVENT_DATE, USER_ID};
use rusqlite::Connection;
use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::debug;

pub const STATUS_OK: &str = "OK";
pub const STATUS_ERROR: &str = "ERROR";
pub const STATUS_NOT_FOUND: &str = "NOT FOUND";

pub struct Ledger<'c> {
    events: EventStore<'c>,
    locks: LockStore<'c>,
}

impl<'c> Ledger<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self {
            events: EventStore::new(conn),
            locks: LockStore::new(conn),
        }
    }

    pub fn from_pool(pool: &'c DbPool) -> Self {
        Self::new(&pool.conn)
    }

    // ---------------------------
    // Users
    // ---------------------------

    pub fn list_users(&self) -> Value {
        listing("list_users", self.events.list_users())
    }

    pub fn user_exists(&self, user_id: &str) -> Value {
        match self.events.user_exists(user_id) {
            Ok(true) => json!({"message": format!("{user_id} exists"), "status": STATUS_OK}),
            Ok(false) => json!({
                "message": format!("{user_id} does not exist"),
                "status": STATUS_NOT_FOUND,
            }),
            Err(e) => failure("user_exists", e),
        }
    }

    // ---------------------------
    // Events
    // ---------------------------

    pub fn list_all_events(&self) -> Value {
        listing("list_all_events", self.events.list_all_events())
    }

    pub fn list_events_by_user(&self, user_id: &str) -> Value {
        listing("list_events_by_user", self.events.list_events_by_user(user_id))
    }

    pub fn list_events_by_date(&self, event_date: &str) -> Value {
        listing(
            "list_events_by_date",
            self.events.list_events_by_date(event_date),
        )
    }

    pub fn list_events_by_user_and_date_range(
        &self,
        user_id: &str,
        start_date: &str,
        end_date: &str,
    ) -> Value {
        listing(
            "list_events_by_user_and_date_range",
            self.events
                .list_events_by_user_and_date_range(user_id, start_date, end_date),
        )
    }

    pub fn get_event(&self, user_id: &str, event_date: &str) -> Value {
        found_or_empty("get_event", self.events.get_event(user_id, event_date))
    }

    /// Create or overwrite an event. Locks on the same key are not checked.
    pub fn create_event(&self, record: impl Into<RecordInput>) -> Value {
        let result = record.into().into_fields().and_then(|f| {
            let event = Event::new(
                &f.text(USER_ID),
                &f.text(EVENT_DATE),
                &f.text("user_name"),
                &f.text("reason"),
                &f.text("hours"),
            )?;
            self.events.create_event(&event)
        });
        status("create_event", result)
    }

    pub fn delete_event(&self, user_id: &str, event_date: &str) -> Value {
        status(
            "delete_event",
            self.events.delete_event(user_id, event_date).map(|_| ()),
        )
    }

    pub fn delete_all_events_by_user(&self, user_id: &str) -> Value {
        bulk(
            "delete_all_events_by_user",
            "user_id",
            user_id,
            self.events.delete_all_events_by_user(user_id),
        )
    }

    pub fn delete_all_events_by_date(&self, event_date: &str) -> Value {
        bulk(
            "delete_all_events_by_date",
            "date",
            event_date,
            self.events.delete_all_events_by_date(event_date),
        )
    }

    // ---------------------------
    // Locks
    // ---------------------------

    pub fn list_all_locks(&self) -> Value {
        listing("list_all_locks", self.locks.list_all_locks())
    }

    pub fn list_locks_by_user(&self, user_id: &str) -> Value {
        listing("list_locks_by_user", self.locks.list_locks_by_user(user_id))
    }

    pub fn list_locks_by_date(&self, event_date: &str) -> Value {
        listing(
            "list_locks_by_date",
            self.locks.list_locks_by_date(event_date),
        )
    }

    pub fn get_lock(&self, user_id: &str, event_date: &str) -> Value {
        found_or_empty("get_lock", self.locks.get_lock(user_id, event_date))
    }

    pub fn is_locked(&self, user_id: &str, event_date: &str) -> Value {
        match self.locks.is_locked(user_id, event_date) {
            Ok(locked) => json!({
                "user_id": user_id,
                "event_date": event_date,
                "locked": locked,
                "status": STATUS_OK,
            }),
            Err(e) => failure("is_locked", e),
        }
    }

    pub fn create_lock(&self, record: impl Into<RecordInput>) -> Value {
        let result = record.into().into_fields().and_then(|f| {
            let lock = Lock::new(&f.text(USER_ID), &f.text(EVENT_DATE))?;
            self.locks.create_lock(&lock)
        });
        status("create_lock", result)
    }

    pub fn delete_lock(&self, user_id: &str, event_date: &str) -> Value {
        status(
            "delete_lock",
            self.locks.delete_lock(user_id, event_date).map(|_| ()),
        )
    }

    pub fn delete_all_locks_by_user(&self, user_id: &str) -> Value {
        bulk(
            "delete_all_locks_by_user",
            "user_id",
            user_id,
            self.locks.delete_all_locks_by_user(user_id),
        )
    }

    pub fn delete_all_locks_by_date(&self, event_date: &str) -> Value {
        bulk(
            "delete_all_locks_by_date",
            "date",
            event_date,
            self.locks.delete_all_locks_by_date(event_date),
        )
    }
}

fn failure(operation: &str, err: AppError) -> Value {
    debug!(operation, error = %err, "ledger operation failed");
    json!({"status": STATUS_ERROR, "error": err.to_string()})
}

fn status(operation: &str, result: AppResult<()>) -> Value {
    match result {
        Ok(()) => json!({"status": STATUS_OK}),
        Err(e) => failure(operation, e),
    }
}

fn listing<T: Serialize>(operation: &str, result: AppResult<Vec<T>>) -> Value {
    match result.and_then(|items| Ok(serde_json::to_value(items)?)) {
        Ok(v) => v,
        Err(e) => failure(operation, e),
    }
}

fn found_or_empty<T: Serialize>(operation: &str, result: AppResult<Lookup<T>>) -> Value {
    let value = result.and_then(|lookup| match lookup {
        Lookup::Found(record) => Ok(serde_json::to_value(record)?),
        Lookup::NotFound => Ok(Value::Object(Map::new())),
    });

    match value {
        Ok(v) => v,
        Err(e) => failure(operation, e),
    }
}

/// A pass that faulted before removing anything is an error. One that
/// faulted part way shows up only as a lower count.
fn bulk(operation: &str, scope_key: &str, scope: &str, outcome: BulkDelete) -> Value {
    if let Some(e) = outcome.interrupted
        && outcome.count == 0
    {
        return failure(operation, e);
    }

    let mut body = Map::new();
    body.insert("method".into(), json!("DELETE"));
    body.insert(scope_key.into(), json!(scope));
    body.insert("count".into(), json!(outcome.count));
    body.insert("status".into(), json!(STATUS_OK));
    Value::Object(body)
}
