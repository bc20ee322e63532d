use crate::db::log::audit;
use crate::db::table::{BulkDelete, Filter, KeyedTable, Lookup};
use crate::errors::AppResult;
use crate::models::lock::Lock;
use crate::models::{EVENT_DATE, USER_ID};
use rusqlite::Connection;

/// Lock registry on top of the `locks` keyed table.
pub struct LockStore<'c> {
    conn: &'c Connection,
    table: KeyedTable<'c, Lock>,
}

impl<'c> LockStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self {
            conn,
            table: KeyedTable::new(conn),
        }
    }

    pub fn create_lock(&self, lock: &Lock) -> AppResult<()> {
        self.table.put(lock)?;
        audit(
            self.conn,
            "lock",
            "lock",
            &format!("{} {}", lock.user_id, lock.event_date),
        );
        Ok(())
    }

    pub fn get_lock(&self, user_id: &str, event_date: &str) -> AppResult<Lookup<Lock>> {
        self.table.get(user_id, event_date)
    }

    pub fn is_locked(&self, user_id: &str, event_date: &str) -> AppResult<bool> {
        Ok(self.get_lock(user_id, event_date)?.is_found())
    }

    pub fn list_all_locks(&self) -> AppResult<Vec<Lock>> {
        self.table.scan(None)?.collect()
    }

    pub fn list_locks_by_user(&self, user_id: &str) -> AppResult<Vec<Lock>> {
        self.table.scan(Some(Filter::eq(USER_ID, user_id)))?.collect()
    }

    pub fn list_locks_by_date(&self, event_date: &str) -> AppResult<Vec<Lock>> {
        self.table
            .scan(Some(Filter::eq(EVENT_DATE, event_date)))?
            .collect()
    }

    pub fn delete_lock(&self, user_id: &str, event_date: &str) -> AppResult<bool> {
        let removed = self.table.delete(user_id, event_date)?;
        if removed {
            audit(self.conn, "unlock", "lock", &format!("{user_id} {event_date}"));
        }
        Ok(removed)
    }

    pub fn delete_all_locks_by_user(&self, user_id: &str) -> BulkDelete {
        let outcome = self.table.delete_matching(Filter::eq(USER_ID, user_id));
        self.audit_bulk(&outcome, &format!("user {user_id}"));
        outcome
    }

    pub fn delete_all_locks_by_date(&self, event_date: &str) -> BulkDelete {
        let outcome = self
            .table
            .delete_matching(Filter::eq(EVENT_DATE, event_date));
        self.audit_bulk(&outcome, &format!("date {event_date}"));
        outcome
    }

    fn audit_bulk(&self, outcome: &BulkDelete, scope: &str) {
        if outcome.count > 0 {
            let suffix = if outcome.is_complete() { "" } else { " (interrupted)" };
            audit(
                self.conn,
                "unlock",
                "locks",
                &format!("{} locks for {scope}{suffix}", outcome.count),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::DbPool;

    fn lock(store: &LockStore, user: &str, date: &str) {
        store.create_lock(&Lock::new(user, date).unwrap()).unwrap();
    }

    #[test]
    fn lock_is_present_until_deleted() {
        let pool = DbPool::in_memory().unwrap();
        let store = LockStore::new(&pool.conn);

        assert!(!store.is_locked("u1", "2024-01-01").unwrap());
        lock(&store, "u1", "2024-01-01");
        // relocking is an overwrite, not a duplicate
        lock(&store, "u1", "2024-01-01");

        assert!(store.is_locked("u1", "2024-01-01").unwrap());
        assert_eq!(store.list_all_locks().unwrap().len(), 1);

        assert!(store.delete_lock("u1", "2024-01-01").unwrap());
        assert!(!store.delete_lock("u1", "2024-01-01").unwrap());
        assert_eq!(store.get_lock("u1", "2024-01-01").unwrap(), Lookup::NotFound);
    }

    #[test]
    fn list_by_date_only_returns_that_date() {
        let pool = DbPool::in_memory().unwrap();
        let store = LockStore::new(&pool.conn);

        lock(&store, "u1", "2024-01-01");
        lock(&store, "u2", "2024-01-01");
        lock(&store, "u1", "2024-01-02");

        let locks = store.list_locks_by_date("2024-01-01").unwrap();
        assert_eq!(locks.len(), 2);
        assert!(locks.iter().all(|l| l.event_date == "2024-01-01"));
        assert_eq!(store.list_locks_by_user("u1").unwrap().len(), 2);
    }

    #[test]
    fn bulk_unlock_by_user_and_date() {
        let pool = DbPool::in_memory().unwrap();
        let store = LockStore::new(&pool.conn);

        lock(&store, "u1", "2024-01-01");
        lock(&store, "u1", "2024-01-02");
        lock(&store, "u2", "2024-01-02");

        assert_eq!(store.delete_all_locks_by_date("2024-01-02").count, 2);
        assert_eq!(store.delete_all_locks_by_user("u1").count, 1);
        assert!(store.list_all_locks().unwrap().is_empty());
        assert_eq!(store.delete_all_locks_by_user("u1").count, 0);
    }
}
