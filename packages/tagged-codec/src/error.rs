//! Error types for tagged-codec

use std::fmt;
use thiserror::Error;

/// Failure categories callers can branch on
///
/// Shared with `compiler-config`, which adds `SchemaShape` failures on top of
/// the codec's own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Encode-time: the value cannot be faithfully reconstructed
    ValueKind,
    /// Decode-time: a `$type` identifier is not registered
    TypeResolution,
    /// Version shim: the input matches no known configuration layout
    SchemaShape,
    /// A tagged node or one of its fields has the wrong form
    Payload,
    /// The text is not valid JSON
    Syntax,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ValueKind => "value_kind",
            ErrorKind::TypeResolution => "type_resolution",
            ErrorKind::SchemaShape => "schema_shape",
            ErrorKind::Payload => "payload",
            ErrorKind::Syntax => "syntax",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Codec error type
#[derive(Debug, Error)]
pub enum CodecError {
    /// Value outside the encodable universe
    #[error("Cannot encode value of type '{type_name}': {reason}")]
    ValueKind { type_name: String, reason: String },

    /// `$type` did not resolve in the registry
    #[error("Cannot resolve type '{type_path}': not registered")]
    TypeResolution { type_path: String },

    /// Tagged node structure is invalid
    #[error("Malformed tagged node: {reason}")]
    MalformedNode { reason: String },

    /// A field could not be rebuilt
    #[error("Invalid field '{field}' for '{type_path}': {reason}")]
    Field {
        type_path: String,
        field: String,
        reason: String,
    },

    /// JSON syntax error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CodecError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodecError::ValueKind { .. } => ErrorKind::ValueKind,
            CodecError::TypeResolution { .. } => ErrorKind::TypeResolution,
            CodecError::MalformedNode { .. } | CodecError::Field { .. } => ErrorKind::Payload,
            CodecError::Json(_) => ErrorKind::Syntax,
        }
    }

    pub fn value_kind(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ValueKind {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    pub fn type_resolution(type_path: impl Into<String>) -> Self {
        Self::TypeResolution {
            type_path: type_path.into(),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedNode {
            reason: reason.into(),
        }
    }

    pub fn field(
        type_path: impl Into<String>,
        field: impl Into<String>,
        reason: impl ToString,
    ) -> Self {
        Self::Field {
            type_path: type_path.into(),
            field: field.into(),
            reason: reason.to_string(),
        }
    }

    /// Unknown attribute or keyword for a type
    pub fn unknown_field(type_path: impl Into<String>, field: impl Into<String>) -> Self {
        Self::field(type_path, field, "no such field")
    }
}

/// Result type alias
pub type CodecResult<T> = std::result::Result<T, CodecError>;
