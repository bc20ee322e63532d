//! Unified application error type.
//! The ledger, the config layer and the CLI all return AppError so the
//! facade has a single place to turn failures into payloads.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Backing store
    // ---------------------------
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] rusqlite::Error),

    #[error("Unknown attribute '{attribute}' for table {table}")]
    UnknownAttribute {
        table: &'static str,
        attribute: &'static str,
    },

    // ---------------------------
    // Input validation
    // ---------------------------
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Invalid hours value: {0}")]
    InvalidHours(String),

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,
}

pub type AppResult<T> = Result<T, AppError>;
