//! Error types for code generation.

use crate::target::TargetLanguage;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for code generation operations.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Schema parsing error.
    #[error("schema parse error: {0}")]
    Parse(#[from] recgen_schema::ParseError),

    /// Malformed or inconsistent IR.
    #[error("schema error: {0}")]
    Schema(#[from] recgen_schema::SchemaError),

    /// A field type has no spelling in the target language.
    #[error("unsupported type '{type_name}' for field '{field}' in record '{record}' ({target})")]
    UnsupportedType {
        /// Record name.
        record: String,
        /// Field name.
        field: String,
        /// Schema spelling of the type.
        type_name: String,
        /// Target language.
        target: TargetLanguage,
    },

    /// Storage failure while finalizing an artifact.
    #[error("failed to write '{}': {source}", path.display())]
    Write {
        /// Artifact path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Formatting into the output buffer failed.
    #[error("format error: {0}")]
    Format(#[from] std::fmt::Error),

    /// Code generation error.
    #[error("generation error: {message}")]
    Generation {
        /// Error message.
        message: String,
    },
}

impl CodegenError {
    /// Creates a generation error with the given message.
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }

    /// Creates a write error for the given path.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_type_message() {
        let err = CodegenError::UnsupportedType {
            record: "Order".to_string(),
            field: "owner".to_string(),
            type_name: "Person".to_string(),
            target: TargetLanguage::Cpp,
        };
        assert_eq!(
            err.to_string(),
            "unsupported type 'Person' for field 'owner' in record 'Order' (cpp)"
        );
    }

    #[test]
    fn test_write_error_names_path() {
        let err = CodegenError::write(
            "/out/Person.h",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/out/Person.h"));
    }
}
