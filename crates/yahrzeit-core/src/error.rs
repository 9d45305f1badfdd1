//! Core error types for yahrzeit-core.
//!
//! This module defines the error hierarchy using thiserror. Conversion
//! failures are kept separate from the storage and configuration errors so
//! the scheduler can report them per entry instead of failing a whole batch.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for yahrzeit-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Hebrew calendar conversion errors
    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// No entry stored under the requested id
    #[error("No yahrzeit entry with id {id}")]
    NotFound { id: i64 },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while converting between the Gregorian and Hebrew calendars.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    /// The day/month/year triple does not name a real day of the Hebrew calendar.
    #[error("Invalid Hebrew date {day} {month} {year}: {reason}")]
    InvalidHebrewDate {
        year: i32,
        month: String,
        day: u8,
        reason: String,
    },

    /// A stored month number or a month name could not be recognised.
    #[error("Unknown Hebrew month: {0}")]
    UnknownMonth(String),

    /// The calendar library could not perform the conversion.
    #[error("Hebrew calendar unavailable: {0}")]
    ConverterUnavailable(String),
}

impl ConversionError {
    /// Failures that are a property of one stored date rather than of the library.
    pub fn is_invalid_date(&self) -> bool {
        matches!(
            self,
            ConversionError::InvalidHebrewDate { .. } | ConversionError::UnknownMonth(_)
        )
    }
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Home/data directory could not be prepared
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A required text field was empty
    #[error("'{field}' must not be empty")]
    EmptyField { field: String },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(DatabaseError::from(err))
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
