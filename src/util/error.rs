//! Error types for the PCD library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for PCD operations.
#[derive(Error, Debug)]
pub enum Error {
    /// File does not exist or cannot be accessed
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Structurally unusable header (no DATA line, missing FIELDS/SIZE/TYPE, ...)
    #[error("Invalid PCD header: {0}")]
    InvalidHeader(String),

    /// SIZE/TYPE pair with no storage representation
    #[error("Unsupported field type: SIZE {size} with TYPE {code:?}")]
    UnsupportedField { size: usize, code: String },

    /// Body bytes do not match what the header declares
    #[error("Invalid PCD body: {0}")]
    InvalidBody(String),

    /// Compressed body is malformed or does not expand to the declared length
    #[error("Decompression failed: {0}")]
    Decompress(String),

    /// A required field is absent from storage
    #[error("can not find {0:?} field in pcd file")]
    MissingField(String),

    /// Slice input with the wrong element count for its geometric role
    #[error("Shape mismatch: expected {expected}, got {actual} elements")]
    ShapeMismatch { expected: &'static str, actual: usize },

    /// Transform with no inverse
    #[error("Singular transform cannot be inverted")]
    SingularTransform,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid-header error from a message.
    pub fn header(msg: impl Into<String>) -> Self {
        Self::InvalidHeader(msg.into())
    }

    /// Create an invalid-body error from a message.
    pub fn body(msg: impl Into<String>) -> Self {
        Self::InvalidBody(msg.into())
    }
}

/// Result type alias for PCD operations.
pub type Result<T> = std::result::Result<T, Error>;
