//! Schema validation utilities.
//!
//! The emission core only accepts IR that passed [`validate_schema_set`]:
//! unique, well-formed names and flag combinations the constructor
//! synthesizer can resolve.

use crate::error::SchemaError;
use crate::ir::{Field, Record, SchemaSet, is_identifier};
use crate::types::Literal;
use std::collections::HashSet;

/// Validates a schema set for correctness.
///
/// # Errors
/// Returns the first `SchemaError` found, in record declaration order.
pub fn validate_schema_set(set: &SchemaSet) -> Result<(), SchemaError> {
    let mut seen_names = HashSet::new();

    for record in set {
        if !seen_names.insert(record.name.as_str()) {
            return Err(SchemaError::DuplicateRecord {
                record: record.name.clone(),
            });
        }
        validate_record(record)?;
    }

    Ok(())
}

/// Validates a single record.
///
/// # Errors
/// Returns `SchemaError` naming the record and field at fault.
pub fn validate_record(record: &Record) -> Result<(), SchemaError> {
    if !is_identifier(&record.name) {
        return Err(SchemaError::InvalidIdentifier {
            record: record.name.clone(),
            name: record.name.clone(),
        });
    }

    if record.fields.is_empty() {
        return Err(SchemaError::EmptyRecord {
            record: record.name.clone(),
        });
    }

    let mut seen_fields = HashSet::new();
    for field in &record.fields {
        if !is_identifier(&field.name) {
            return Err(SchemaError::InvalidIdentifier {
                record: record.name.clone(),
                name: field.name.clone(),
            });
        }

        if !seen_fields.insert(field.name.as_str()) {
            return Err(SchemaError::DuplicateField {
                record: record.name.clone(),
                field: field.name.clone(),
            });
        }

        validate_field(record, field)?;
    }

    Ok(())
}

/// Validates the flag, type and default combination of a field.
fn validate_field(record: &Record, field: &Field) -> Result<(), SchemaError> {
    if field.is_optional() && !field.ty.is_optional() {
        return Err(SchemaError::unresolvable(
            &record.name,
            &field.name,
            format!(
                "optional presence requires an optional type, found '{}'",
                field.ty
            ),
        ));
    }

    let Some(default) = &field.default else {
        return Ok(());
    };

    if !field.ty.accepts(default) {
        return Err(SchemaError::InvalidDefault {
            record: record.name.clone(),
            field: field.name.clone(),
            type_name: field.ty.to_string(),
            value: format!("{default:?}"),
        });
    }

    // The required-only constructor always leaves optional fields absent.
    if field.is_optional() && *default != Literal::Absent {
        return Err(SchemaError::unresolvable(
            &record.name,
            &field.name,
            "an optional field can only default to absent",
        ));
    }

    Ok(())
}
