//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.

use std::fmt;
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
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid sleep quality: {0} (expected a value between 0 and 5)")]
    InvalidQuality(i32),

    // ---------------------------
    // Logic errors
    // ---------------------------
    #[error("No night found with id {0}")]
    NightNotFound(i64),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type AppResult<T> = Result<T, AppError>;

/// A failed call against the persistence collaborator.
///
/// Cloneable so it can be carried by a `UiEvent` to whoever renders errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Persistence error during {operation}: {message}")]
pub struct PersistenceError {
    pub operation: &'static str,
    pub message: String,
}

impl PersistenceError {
    pub fn new(operation: &'static str, cause: impl fmt::Display) -> Self {
        Self {
            operation,
            message: cause.to_string(),
        }
    }
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;
