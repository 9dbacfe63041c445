//! # RecGen Schema
//!
//! Record schema IR, loader and validation.
//!
//! This crate provides:
//! - The intermediate representation consumed by code generation
//! - XML schema loading into that representation
//! - Validation of names and field flag combinations

pub mod error;
pub mod ir;
pub mod parser;
pub mod types;
pub mod validation;

pub use error::{ParseError, SchemaError};
pub use ir::{Field, Record, SchemaSet, capitalize_first, is_identifier, to_snake_case};
pub use parser::{parse_schema, parse_schema_file};
pub use types::{FieldType, Literal, Mutability, Optionality, PrimitiveType};
pub use validation::{validate_record, validate_schema_set};

/// Parses and validates a record schema string.
///
/// # Errors
/// Returns `SchemaError` if parsing or validation fails.
pub fn load_schema(xml: &str, source: &str) -> Result<SchemaSet, SchemaError> {
    let set = parse_schema(xml, source)?;
    validate_schema_set(&set)?;
    Ok(set)
}

/// Parses and validates a record schema file.
///
/// # Errors
/// Returns `SchemaError` if reading, parsing or validation fails.
pub fn load_schema_file(path: &std::path::Path) -> Result<SchemaSet, SchemaError> {
    let set = parse_schema_file(path)?;
    validate_schema_set(&set)?;
    Ok(set)
}
