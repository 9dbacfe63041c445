//! Error types for schema loading and validation.

use thiserror::Error;

/// Error type for schema parsing operations.
#[derive(Debug, Error)]
pub enum ParseError {
    /// XML parsing error.
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Missing required attribute.
    #[error("missing required attribute '{attribute}' on element '{element}'")]
    MissingAttribute {
        /// Element name.
        element: String,
        /// Attribute name.
        attribute: String,
    },

    /// Invalid attribute value.
    #[error("invalid value '{value}' for attribute '{attribute}' on element '{element}'")]
    InvalidAttribute {
        /// Element name.
        element: String,
        /// Attribute name.
        attribute: String,
        /// Invalid value.
        value: String,
    },

    /// Unknown element encountered.
    #[error("unknown element '{element}' in context '{context}'")]
    UnknownElement {
        /// Element name.
        element: String,
        /// Parent context.
        context: String,
    },

    /// Invalid schema structure.
    #[error("invalid schema structure: {message}")]
    InvalidStructure {
        /// Error message.
        message: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 decoding error.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Error type for malformed or inconsistent IR.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Parsing error.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Two records share a name.
    #[error("duplicate record '{record}'")]
    DuplicateRecord {
        /// Record name.
        record: String,
    },

    /// Two fields of one record share a name.
    #[error("duplicate field '{field}' in record '{record}'")]
    DuplicateField {
        /// Record name.
        record: String,
        /// Field name.
        field: String,
    },

    /// A record or field name is not a valid identifier.
    #[error("invalid identifier '{name}' in record '{record}'")]
    InvalidIdentifier {
        /// Record name.
        record: String,
        /// Offending name.
        name: String,
    },

    /// A record declares no fields.
    #[error("record '{record}' declares no fields")]
    EmptyRecord {
        /// Record name.
        record: String,
    },

    /// A field's flags and type cannot be combined.
    #[error("field '{field}' in record '{record}' cannot be resolved: {reason}")]
    UnresolvableField {
        /// Record name.
        record: String,
        /// Field name.
        field: String,
        /// Why the combination is rejected.
        reason: String,
    },

    /// A declared default does not fit the field type.
    #[error(
        "invalid default {value} for field '{field}' of type '{type_name}' in record '{record}'"
    )]
    InvalidDefault {
        /// Record name.
        record: String,
        /// Field name.
        field: String,
        /// Field type.
        type_name: String,
        /// Offending value.
        value: String,
    },
}

impl ParseError {
    /// Creates a missing attribute error.
    pub fn missing_attr(element: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            element: element.into(),
            attribute: attribute.into(),
        }
    }

    /// Creates an invalid attribute error.
    pub fn invalid_attr(
        element: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::InvalidAttribute {
            element: element.into(),
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Creates an unknown element error.
    pub fn unknown_element(element: impl Into<String>, context: impl Into<String>) -> Self {
        Self::UnknownElement {
            element: element.into(),
            context: context.into(),
        }
    }
}

impl SchemaError {
    /// Creates an unresolvable field error.
    pub fn unresolvable(
        record: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::UnresolvableField {
            record: record.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Returns the record the error refers to, if any.
    #[must_use]
    pub fn record(&self) -> Option<&str> {
        match self {
            Self::Parse(_) => None,
            Self::DuplicateRecord { record }
            | Self::DuplicateField { record, .. }
            | Self::InvalidIdentifier { record, .. }
            | Self::EmptyRecord { record }
            | Self::UnresolvableField { record, .. }
            | Self::InvalidDefault { record, .. } => Some(record),
        }
    }
}
