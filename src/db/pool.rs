//! SQLite handle shared by the event and lock stores.
//!
//! The pool owns the connection; stores only borrow it, so the caller
//! decides how long the handle lives.

use crate::db::initialize::init_db;
use crate::errors::AppResult;
use crate::utils::path::expand_tilde;
use rusqlite::Connection;

pub struct DbPool {
    pub conn: Connection,
}

impl DbPool {
    /// Open (or create) the database at `path` and make sure the ledger
    /// tables exist.
    pub fn new(path: &str) -> AppResult<Self> {
        let conn = Connection::open(expand_tilde(path))?;
        init_db(&conn)?;
        Ok(Self { conn })
    }

    /// Private in-memory database.
    pub fn in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory()?;
        init_db(&conn)?;
        Ok(Self { conn })
    }
}
