//! Intermediate representation for code generation.
//!
//! A [`SchemaSet`] holds every [`Record`] loaded for a run. Records own their
//! [`Field`]s in declaration order; that order is the member order and the
//! constructor parameter order of every generated type.

use crate::types::{FieldType, Literal, Mutability, Optionality};

/// A named, typed member of a record.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Field name.
    pub name: String,
    /// Semantic type.
    pub ty: FieldType,
    /// Mutability flag.
    pub mutability: Mutability,
    /// Optionality flag.
    pub optionality: Optionality,
    /// Declared default value.
    pub default: Option<Literal>,
}

impl Field {
    /// Creates a required, mutable field.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            mutability: Mutability::Mutable,
            optionality: Optionality::Required,
            default: None,
        }
    }

    /// Marks the field immutable.
    #[must_use]
    pub fn immutable(mut self) -> Self {
        self.mutability = Mutability::Immutable;
        self
    }

    /// Marks the field optional, wrapping its type in an optional if needed.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optionality = Optionality::Optional;
        if !self.ty.is_optional() {
            self.ty = FieldType::optional(self.ty);
        }
        self
    }

    /// Sets the declared default value.
    #[must_use]
    pub fn with_default(mut self, default: Literal) -> Self {
        self.default = Some(default);
        self
    }

    /// Returns true if the field may be reassigned after construction.
    #[must_use]
    pub fn is_mutable(&self) -> bool {
        self.mutability == Mutability::Mutable
    }

    /// Returns true if the required-only constructor may leave the field absent.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.optionality == Optionality::Optional
    }

    /// Returns the value the field takes when no constructor argument supplies it.
    ///
    /// That is the declared default, or absent for optional types.
    #[must_use]
    pub fn usable_default(&self) -> Option<Literal> {
        match (&self.default, &self.ty) {
            (Some(literal), _) => Some(literal.clone()),
            (None, FieldType::Optional(_)) => Some(Literal::Absent),
            (None, _) => None,
        }
    }
}

/// A named collection of fields describing one generated value type.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Record name.
    pub name: String,
    /// Label of the schema the record was loaded from.
    pub source: String,
    /// Fields in declaration order.
    pub fields: Vec<Field>,
}

impl Record {
    /// Creates an empty record.
    #[must_use]
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            fields: Vec::new(),
        }
    }

    /// Adds a field to the record.
    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Adds a field, builder style.
    #[must_use]
    pub fn with_field(mut self, field: Field) -> Self {
        self.add_field(field);
        self
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns the required fields in declaration order.
    pub fn required_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| !f.is_optional())
    }

    /// Returns the optional fields in declaration order.
    pub fn optional_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.is_optional())
    }

    /// Returns true if any field is optional.
    #[must_use]
    pub fn has_optional_fields(&self) -> bool {
        self.fields.iter().any(Field::is_optional)
    }
}

/// The records loaded for one generation run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaSet {
    /// Records in load order.
    pub records: Vec<Record>,
}

impl SchemaSet {
    /// Creates an empty schema set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record to the set.
    pub fn add_record(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Moves every record of `other` into this set.
    pub fn extend(&mut self, other: SchemaSet) {
        self.records.extend(other.records);
    }

    /// Looks up a record by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.name == name)
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the set holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over the records in load order.
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }
}

impl FromIterator<Record> for SchemaSet {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SchemaSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Returns true if `name` is a valid identifier in every target language.
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Converts a string to snake_case.
#[must_use]
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() && i > 0 {
            result.push('_');
        }
        result.push(c.to_ascii_lowercase());
    }
    result
}

/// Upper-cases the first character, leaving the rest untouched.
#[must_use]
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().chain(chars).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PrimitiveType;

    fn person() -> Record {
        Record::new("Person", "person.xml")
            .with_field(Field::new("name", FieldType::Primitive(PrimitiveType::String)))
            .with_field(Field::new("age", FieldType::Primitive(PrimitiveType::Int32)))
            .with_field(
                Field::new("nickname", FieldType::Primitive(PrimitiveType::String)).optional(),
            )
            .with_field(Field::new(
                "isLegalToDrink",
                FieldType::Primitive(PrimitiveType::Bool),
            ))
    }

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("isLegalToDrink"), "is_legal_to_drink");
        assert_eq!(to_snake_case("name"), "name");
    }

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("isTrue"), "IsTrue");
        assert_eq!(capitalize_first("x"), "X");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("isLegalToDrink"));
        assert!(is_identifier("_private2"));
        assert!(!is_identifier("2fast"));
        assert!(!is_identifier("with space"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn test_field_optional_wraps_type() {
        let field = Field::new("nickname", FieldType::Primitive(PrimitiveType::String)).optional();
        assert!(field.is_optional());
        assert_eq!(field.ty, FieldType::parse("optional<string>"));

        let already = Field::new("nickname", FieldType::parse("optional<string>")).optional();
        assert_eq!(already.ty, FieldType::parse("optional<string>"));
    }

    #[test]
    fn test_field_usable_default() {
        let meow = Field::new("meow", FieldType::Primitive(PrimitiveType::Int64)).immutable();
        assert_eq!(meow.usable_default(), None);

        let meow = meow.with_default(Literal::Int(3));
        assert_eq!(meow.usable_default(), Some(Literal::Int(3)));

        let nickname = Field::new("nickname", FieldType::parse("string")).optional();
        assert_eq!(nickname.usable_default(), Some(Literal::Absent));
    }

    #[test]
    fn test_record_partition_preserves_order() {
        let record = person();
        let required: Vec<_> = record.required_fields().map(|f| f.name.as_str()).collect();
        let optional: Vec<_> = record.optional_fields().map(|f| f.name.as_str()).collect();

        assert_eq!(required, vec!["name", "age", "isLegalToDrink"]);
        assert_eq!(optional, vec!["nickname"]);
        assert!(record.has_optional_fields());
    }

    #[test]
    fn test_record_field_lookup() {
        let record = person();
        assert!(record.field("age").is_some());
        assert!(record.field("height").is_none());
    }

    #[test]
    fn test_schema_set_lookup() {
        let set: SchemaSet = vec![person(), Record::new("Empty", "empty.xml")]
            .into_iter()
            .collect();

        assert_eq!(set.len(), 2);
        assert!(set.get("Person").is_some());
        assert!(set.get("Nobody").is_none());
        assert_eq!(set.iter().count(), 2);
    }
}
