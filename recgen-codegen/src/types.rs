//! Mapping of schema field types onto target language spellings.
//!
//! Every backend supplies a [`TypeVocabulary`]: a table of primitive spellings
//! plus the target's value-or-absent container. [`map_type`] walks a
//! [`FieldType`] through that table and collects the imports the spelling
//! needs along the way.

use crate::error::CodegenError;
use crate::target::TargetLanguage;
use recgen_schema::{Field, FieldType, PrimitiveType, Record};
use std::collections::BTreeSet;
use std::fmt;

/// A module, header or package a generated type spelling depends on.
///
/// The path is target specific: `cstdint` for a C++ header, `typing.Optional`
/// for a Python name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Import(String);

impl Import {
    /// Creates an import for the given path.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Returns the import path.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Import {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A concrete type spelling in a target language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpelling {
    /// Type as written in the target language.
    pub text: String,
    /// Imports the spelling requires.
    pub imports: BTreeSet<Import>,
    /// True for plain scalars that are passed by value.
    pub trivial: bool,
}

impl TypeSpelling {
    /// Creates a spelling with no imports.
    #[must_use]
    pub fn new(text: impl Into<String>, trivial: bool) -> Self {
        Self {
            text: text.into(),
            imports: BTreeSet::new(),
            trivial,
        }
    }

    /// Adds a required import.
    #[must_use]
    pub fn with_import(mut self, import: impl Into<String>) -> Self {
        self.imports.insert(Import::new(import));
        self
    }
}

impl fmt::Display for TypeSpelling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A target language's table of type spellings.
pub trait TypeVocabulary {
    /// Returns the spelling of a primitive, or `None` if the target lacks one.
    fn primitive(&self, prim: PrimitiveType) -> Option<TypeSpelling>;

    /// Wraps a spelling in the target's value-or-absent container.
    fn optional(&self, inner: &TypeSpelling) -> TypeSpelling;
}

/// A field type with no spelling in a vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedType {
    /// Schema spelling of the offending type.
    pub type_name: String,
}

/// Maps a field type through a vocabulary.
///
/// # Errors
/// Returns `UnsupportedType` for named types, nested optionals and
/// primitives the vocabulary does not spell.
pub fn map_type<V: TypeVocabulary + ?Sized>(
    vocabulary: &V,
    ty: &FieldType,
) -> Result<TypeSpelling, UnsupportedType> {
    let unsupported = || UnsupportedType {
        type_name: ty.to_string(),
    };

    match ty {
        FieldType::Primitive(prim) => vocabulary.primitive(*prim).ok_or_else(unsupported),
        FieldType::Optional(inner) => match inner.as_ref() {
            FieldType::Primitive(prim) => {
                let inner = vocabulary.primitive(*prim).ok_or_else(unsupported)?;
                Ok(vocabulary.optional(&inner))
            }
            _ => Err(unsupported()),
        },
        FieldType::Named(_) => Err(unsupported()),
    }
}

/// Maps the type of a record field, attributing failures to the field.
///
/// # Errors
/// Returns `CodegenError::UnsupportedType` naming the record, field and target.
pub fn map_field<V: TypeVocabulary + ?Sized>(
    vocabulary: &V,
    target: TargetLanguage,
    record: &Record,
    field: &Field,
) -> Result<TypeSpelling, CodegenError> {
    map_type(vocabulary, &field.ty).map_err(|err| CodegenError::UnsupportedType {
        record: record.name.clone(),
        field: field.name.clone(),
        type_name: err.type_name,
        target,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Tiny;

    impl TypeVocabulary for Tiny {
        fn primitive(&self, prim: PrimitiveType) -> Option<TypeSpelling> {
            match prim {
                PrimitiveType::Int32 => Some(TypeSpelling::new("i32", true)),
                PrimitiveType::String => Some(TypeSpelling::new("str", false).with_import("text")),
                _ => None,
            }
        }

        fn optional(&self, inner: &TypeSpelling) -> TypeSpelling {
            let mut spelling = TypeSpelling::new(format!("maybe[{inner}]"), inner.trivial);
            spelling.imports = inner.imports.clone();
            spelling.with_import("maybe")
        }
    }

    #[test]
    fn test_map_primitive() {
        let spelling = map_type(&Tiny, &FieldType::parse("int32")).expect("Failed to map");
        assert_eq!(spelling.text, "i32");
        assert!(spelling.trivial);
        assert!(spelling.imports.is_empty());
    }

    #[test]
    fn test_map_optional_collects_imports() {
        let spelling =
            map_type(&Tiny, &FieldType::parse("optional<string>")).expect("Failed to map");
        assert_eq!(spelling.text, "maybe[str]");
        assert!(!spelling.trivial);
        let imports: Vec<_> = spelling.imports.iter().map(Import::as_str).collect();
        assert_eq!(imports, vec!["maybe", "text"]);
    }

    #[test]
    fn test_map_unsupported() {
        let err = map_type(&Tiny, &FieldType::parse("double")).unwrap_err();
        assert_eq!(err.type_name, "double");

        let err = map_type(&Tiny, &FieldType::parse("Address")).unwrap_err();
        assert_eq!(err.type_name, "Address");

        let nested = FieldType::optional(FieldType::parse("optional<int32>"));
        let err = map_type(&Tiny, &nested).unwrap_err();
        assert_eq!(err.type_name, "optional<optional<int32>>");
    }

    #[test]
    fn test_map_field_names_record_and_field() {
        let record = Record::new("Order", "order.xml")
            .with_field(Field::new("owner", FieldType::parse("Person")));
        let err = map_field(&Tiny, TargetLanguage::Kotlin, &record, &record.fields[0]).unwrap_err();

        match err {
            CodegenError::UnsupportedType {
                record,
                field,
                type_name,
                target,
            } => {
                assert_eq!(record, "Order");
                assert_eq!(field, "owner");
                assert_eq!(type_name, "Person");
                assert_eq!(target, TargetLanguage::Kotlin);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
