use crate::errors::AppResult;
use rusqlite::Connection;
use tracing::debug;

/// Ledger schema. Both keyed tables use the composite primary key
/// (user_id, event_date); rowid order is the scan order.
const SCHEMA_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS events (
        user_id     TEXT NOT NULL,
        event_date  TEXT NOT NULL,
        user_name   TEXT NOT NULL DEFAULT '',
        reason      TEXT NOT NULL DEFAULT '',
        hours       TEXT NOT NULL DEFAULT '',
        PRIMARY KEY (user_id, event_date)
    );

    CREATE INDEX IF NOT EXISTS idx_events_date ON events(event_date);

    CREATE TABLE IF NOT EXISTS locks (
        user_id     TEXT NOT NULL,
        event_date  TEXT NOT NULL,
        PRIMARY KEY (user_id, event_date)
    );

    CREATE INDEX IF NOT EXISTS idx_locks_date ON locks(event_date);

    CREATE TABLE IF NOT EXISTS log (
        id        INTEGER PRIMARY KEY AUTOINCREMENT,
        date      TEXT NOT NULL,
        operation TEXT NOT NULL,
        target    TEXT DEFAULT '',
        message   TEXT NOT NULL
    );
"#;

/// Initialize the database.
/// Every statement is idempotent, so this runs on each open.
pub fn init_db(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    debug!("ledger schema ensured");
    Ok(())
}
