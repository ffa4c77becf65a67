/*!
 * Error types for the cliptrans application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when calling a translation engine
#[derive(Error, Debug)]
pub enum EngineError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors that can occur when reading or writing the OS clipboard
#[derive(Error, Debug)]
pub enum ClipboardError {
    /// The platform clipboard could not be opened
    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),

    /// Error reading the clipboard contents
    #[error("Failed to read clipboard: {0}")]
    ReadFailed(String),

    /// Error writing to the clipboard
    #[error("Failed to write clipboard: {0}")]
    WriteFailed(String),
}

/// Errors that can occur during a monitored translation cycle
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the engine API
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Error from clipboard access
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation (settings or ledger persistence)
    #[error("File error: {0}")]
    File(String),

    /// Invalid or incomplete configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from an engine
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Error from clipboard access
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
