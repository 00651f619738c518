//! # Error Types
//!
//! This module defines error types used throughout the chekprint library.
//!
//! Rendering absorbs missing fields, unencodable characters, and unknown
//! template tags with deterministic fallbacks. The only failure a render
//! call reports is a [`StructuralError`]: the caller asked for a layout that
//! cannot exist.

use thiserror::Error;

use crate::transport::TransportError;

/// Caller contract violations detected before rendering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    /// Page width must be between 1 and 255 columns.
    #[error("page width must be between 1 and 255 columns, got {0}")]
    PageWidth(i64),

    /// Feed line count must be between 0 and 255.
    #[error("feed line count must be between 0 and 255, got {0}")]
    FeedLineCount(i64),
}

/// Main error type for chekprint operations
#[derive(Debug, Error)]
pub enum ChekError {
    /// Document settings describe an impossible layout
    #[error("Structural error: {0}")]
    Structural(#[from] StructuralError),

    /// Input document could not be parsed
    #[error("Invalid document: {0}")]
    Document(#[from] serde_json::Error),

    /// Transport-level errors (connection, I/O, busy channel)
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
