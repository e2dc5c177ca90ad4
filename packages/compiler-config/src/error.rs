//! Configuration error types

use tagged_codec::{CodecError, ErrorKind};
use thiserror::Error;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Encode/decode failure from the codec
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Input matches no known configuration layout
    #[error("Unrecognised configuration layout: {reason}")]
    SchemaShape { reason: String },

    /// Decoded root is some other registered type
    #[error("Expected a '{expected}' root, found '{found}'")]
    UnexpectedRoot { expected: String, found: String },
}

impl ConfigError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConfigError::Codec(err) => err.kind(),
            ConfigError::SchemaShape { .. } | ConfigError::UnexpectedRoot { .. } => {
                ErrorKind::SchemaShape
            },
        }
    }

    pub fn schema_shape(reason: impl Into<String>) -> Self {
        Self::SchemaShape {
            reason: reason.into(),
        }
    }

    pub fn unexpected_root(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::UnexpectedRoot {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Codec(CodecError::from(err))
    }
}

/// Configuration result type
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
