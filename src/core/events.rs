use crate::db::log::audit;
use crate::db::table::{BulkDelete, Filter, KeyedTable, Lookup};
use crate::errors::AppResult;
use crate::models::event::Event;
use crate::models::{EVENT_DATE, USER_ID};
use rusqlite::Connection;
use std::collections::HashSet;

/// Event ledger on top of the `events` keyed table.
pub struct EventStore<'c> {
    conn: &'c Connection,
    table: KeyedTable<'c, Event>,
}

impl<'c> EventStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self {
            conn,
            table: KeyedTable::new(conn),
        }
    }

    /// Insert or overwrite the event at its key. Lock state is not consulted.
    pub fn create_event(&self, event: &Event) -> AppResult<()> {
        self.table.put(event)?;
        audit(
            self.conn,
            "add",
            "event",
            &format!(
                "{} {} hours={} reason={}",
                event.user_id,
                event.event_date,
                event.hours.as_str(),
                event.reason
            ),
        );
        Ok(())
    }

    pub fn get_event(&self, user_id: &str, event_date: &str) -> AppResult<Lookup<Event>> {
        self.table.get(user_id, event_date)
    }

    pub fn list_all_events(&self) -> AppResult<Vec<Event>> {
        self.table.scan(None)?.collect()
    }

    pub fn list_events_by_user(&self, user_id: &str) -> AppResult<Vec<Event>> {
        self.table.scan(Some(Filter::eq(USER_ID, user_id)))?.collect()
    }

    pub fn list_events_by_date(&self, event_date: &str) -> AppResult<Vec<Event>> {
        self.table
            .scan(Some(Filter::eq(EVENT_DATE, event_date)))?
            .collect()
    }

    /// Events of one user with `start <= event_date <= end`, compared as text.
    pub fn list_events_by_user_and_date_range(
        &self,
        user_id: &str,
        start_date: &str,
        end_date: &str,
    ) -> AppResult<Vec<Event>> {
        let filter = Filter::eq(USER_ID, user_id).and(Filter::between(
            EVENT_DATE, start_date, end_date,
        ));
        self.table.scan(Some(filter))?.collect()
    }

    /// Idempotent; returns whether an event was actually removed.
    pub fn delete_event(&self, user_id: &str, event_date: &str) -> AppResult<bool> {
        let removed = self.table.delete(user_id, event_date)?;
        if removed {
            audit(self.conn, "del", "event", &format!("{user_id} {event_date}"));
        }
        Ok(removed)
    }

    pub fn delete_all_events_by_user(&self, user_id: &str) -> BulkDelete {
        let outcome = self.table.delete_matching(Filter::eq(USER_ID, user_id));
        self.audit_bulk(&outcome, &format!("user {user_id}"));
        outcome
    }

    pub fn delete_all_events_by_date(&self, event_date: &str) -> BulkDelete {
        let outcome = self
            .table
            .delete_matching(Filter::eq(EVENT_DATE, event_date));
        self.audit_bulk(&outcome, &format!("date {event_date}"));
        outcome
    }

    /// Distinct user ids in first-seen order. Users exist only through
    /// their events.
    pub fn list_users(&self) -> AppResult<Vec<String>> {
        let mut seen = HashSet::new();
        let mut users = Vec::new();

        self.table.scan(None)?.try_for_each(|event| {
            if seen.insert(event.user_id.clone()) {
                users.push(event.user_id);
            }
            Ok(())
        })?;

        Ok(users)
    }

    pub fn user_exists(&self, user_id: &str) -> AppResult<bool> {
        self.table.exists(Filter::eq(USER_ID, user_id))
    }

    fn audit_bulk(&self, outcome: &BulkDelete, scope: &str) {
        if outcome.count > 0 {
            let suffix = if outcome.is_complete() { "" } else { " (interrupted)" };
            audit(
                self.conn,
                "del",
                "events",
                &format!("{} events for {scope}{suffix}", outcome.count),
            );
        }
    }
}
