//! Constructor synthesis.
//!
//! Decides which constructors a record gets, which fields each one takes as
//! parameters, and how every other field is initialized. The decision is
//! purely a function of the record; backends only spell it out.

use recgen_schema::{Field, Literal, Record, SchemaError, validate_record};

/// The role a constructor plays in a record's constructor set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstructorKind {
    /// No parameters; every field takes its default.
    Default,
    /// Required fields only; optional fields start absent.
    Minimal,
    /// Every field, in a record that also has a minimal constructor.
    Full,
    /// Every field, in a record without optional fields.
    AllFields,
}

/// How a constructor initializes one field.
#[derive(Debug, Clone, PartialEq)]
pub enum Initializer {
    /// From the constructor parameter of the same name.
    Param,
    /// From a literal: the declared default, or absent.
    Value(Literal),
    /// From the zero value of the field type.
    Zero,
}

/// A field paired with its initializer.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInit<'a> {
    /// The field being initialized.
    pub field: &'a Field,
    /// How it is initialized.
    pub init: Initializer,
}

/// One synthesized constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorSpec<'a> {
    /// Constructor role.
    pub kind: ConstructorKind,
    /// Whether implicit conversion through this constructor is disabled.
    pub explicit: bool,
    /// Initializers for every field, in declaration order.
    pub inits: Vec<FieldInit<'a>>,
}

impl<'a> ConstructorSpec<'a> {
    /// Returns the parameter fields in declaration order.
    pub fn params(&self) -> impl Iterator<Item = &'a Field> + '_ {
        self.inits
            .iter()
            .filter(|i| i.init == Initializer::Param)
            .map(|i| i.field)
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.params().count()
    }

    /// Returns true if the constructor takes exactly one argument and permits
    /// implicit conversion from it.
    #[must_use]
    pub fn is_converting(&self) -> bool {
        !self.explicit && self.arity() == 1
    }

    fn from_fields(
        kind: ConstructorKind,
        explicit: bool,
        record: &'a Record,
        init: impl Fn(&'a Field) -> Initializer,
    ) -> Self {
        Self {
            kind,
            explicit,
            inits: record
                .fields
                .iter()
                .map(|field| FieldInit {
                    field,
                    init: init(field),
                })
                .collect(),
        }
    }
}

/// The constructors synthesized for one record.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorSet<'a> {
    /// The no-argument constructor, when the record admits one.
    pub default: Option<ConstructorSpec<'a>>,
    /// Parameterized constructors: `[AllFields]` or `[Minimal, Full]`.
    pub parameterized: Vec<ConstructorSpec<'a>>,
}

impl<'a> ConstructorSet<'a> {
    /// Iterates over every constructor in rendering order.
    pub fn iter(&self) -> impl Iterator<Item = &ConstructorSpec<'a>> {
        self.default.iter().chain(self.parameterized.iter())
    }

    /// Returns the constructor of the given kind.
    #[must_use]
    pub fn get(&self, kind: ConstructorKind) -> Option<&ConstructorSpec<'a>> {
        self.iter().find(|c| c.kind == kind)
    }

    /// Returns the constructor taking every field.
    #[must_use]
    pub fn all_fields(&self) -> Option<&ConstructorSpec<'a>> {
        self.parameterized
            .iter()
            .find(|c| matches!(c.kind, ConstructorKind::Full | ConstructorKind::AllFields))
    }

    /// Returns true if some constructor can be called with no arguments.
    #[must_use]
    pub fn has_nullary(&self) -> bool {
        self.iter().any(|c| c.arity() == 0)
    }
}

/// Synthesizes the constructor set of a record.
///
/// # Errors
/// Returns `SchemaError` if the record is malformed.
pub fn synthesize(record: &Record) -> Result<ConstructorSet<'_>, SchemaError> {
    validate_record(record)?;

    let parameterized = if record.has_optional_fields() {
        vec![
            ConstructorSpec::from_fields(ConstructorKind::Minimal, true, record, |field| {
                if field.is_optional() {
                    Initializer::Value(Literal::Absent)
                } else {
                    Initializer::Param
                }
            }),
            ConstructorSpec::from_fields(ConstructorKind::Full, false, record, |_| {
                Initializer::Param
            }),
        ]
    } else {
        vec![ConstructorSpec::from_fields(
            ConstructorKind::AllFields,
            false,
            record,
            |_| Initializer::Param,
        )]
    };

    let default = synthesize_default(record);
    if default.is_none() {
        tracing::debug!(
            record = %record.name,
            "no default constructor: immutable field without a usable default"
        );
    }

    Ok(ConstructorSet {
        default,
        parameterized,
    })
}

fn synthesize_default(record: &Record) -> Option<ConstructorSpec<'_>> {
    if record.required_fields().next().is_none() {
        // the nullary minimal constructor already covers this
        return None;
    }

    let blocked = record
        .fields
        .iter()
        .any(|f| !f.is_mutable() && f.usable_default().is_none());
    if blocked {
        return None;
    }

    Some(ConstructorSpec::from_fields(
        ConstructorKind::Default,
        false,
        record,
        |field| match field.usable_default() {
            Some(literal) => Initializer::Value(literal),
            None => Initializer::Zero,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use recgen_schema::FieldType;

    fn foo() -> Record {
        Record::new("Foo", "foo.xml")
            .with_field(Field::new("meow", FieldType::parse("int64")).immutable())
            .with_field(Field::new("hello", FieldType::parse("string")))
            .with_field(Field::new("isTrue", FieldType::parse("bool")))
    }

    fn person() -> Record {
        Record::new("Person", "person.xml")
            .with_field(Field::new("name", FieldType::parse("string")))
            .with_field(Field::new("age", FieldType::parse("int32")))
            .with_field(Field::new("nickname", FieldType::parse("string")).optional())
            .with_field(Field::new("isLegalToDrink", FieldType::parse("bool")))
    }

    fn names<'a>(spec: &ConstructorSpec<'a>) -> Vec<&'a str> {
        spec.params().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_no_optional_fields_single_all_fields() {
        let record = foo();
        let set = synthesize(&record).expect("Failed to synthesize");

        assert_eq!(set.parameterized.len(), 1);
        let all = &set.parameterized[0];
        assert_eq!(all.kind, ConstructorKind::AllFields);
        assert!(!all.explicit);
        assert_eq!(names(all), vec!["meow", "hello", "isTrue"]);
    }

    #[test]
    fn test_immutable_without_default_suppresses_default() {
        let record = foo();
        let set = synthesize(&record).expect("Failed to synthesize");
        assert!(set.default.is_none());
        assert!(!set.has_nullary());
    }

    #[test]
    fn test_immutable_with_default_allows_default() {
        let record = Record::new("Foo", "foo.xml")
            .with_field(
                Field::new("meow", FieldType::parse("int64"))
                    .immutable()
                    .with_default(Literal::Int(9)),
            )
            .with_field(Field::new("hello", FieldType::parse("string")));
        let set = synthesize(&record).expect("Failed to synthesize");

        let default = set.default.as_ref().expect("default constructor");
        assert_eq!(default.arity(), 0);
        assert_eq!(default.inits[0].init, Initializer::Value(Literal::Int(9)));
        assert_eq!(default.inits[1].init, Initializer::Zero);
    }

    #[test]
    fn test_optional_fields_minimal_and_full() {
        let record = person();
        let set = synthesize(&record).expect("Failed to synthesize");

        assert_eq!(set.parameterized.len(), 2);
        let minimal = set.get(ConstructorKind::Minimal).expect("minimal");
        let full = set.get(ConstructorKind::Full).expect("full");

        assert!(minimal.explicit);
        assert!(!full.explicit);
        assert_eq!(names(minimal), vec!["name", "age", "isLegalToDrink"]);
        assert_eq!(names(full), vec!["name", "age", "nickname", "isLegalToDrink"]);
        assert_eq!(minimal.inits[2].init, Initializer::Value(Literal::Absent));
        assert!(set.default.is_some());
    }

    #[test]
    fn test_all_optional_minimal_is_nullary() {
        let record = Record::new("Tags", "tags.xml")
            .with_field(Field::new("primary", FieldType::parse("string")).optional())
            .with_field(Field::new("secondary", FieldType::parse("string")).optional());
        let set = synthesize(&record).expect("Failed to synthesize");

        assert!(set.default.is_none());
        let minimal = set.get(ConstructorKind::Minimal).expect("minimal");
        assert_eq!(minimal.arity(), 0);
        assert!(set.has_nullary());
        assert_eq!(set.iter().count(), 2);
    }

    #[test]
    fn test_single_field_all_fields_is_converting() {
        let record = Record::new("Id", "id.xml")
            .with_field(Field::new("value", FieldType::parse("uint64")).immutable());
        let set = synthesize(&record).expect("Failed to synthesize");
        assert!(set.all_fields().expect("all fields").is_converting());
    }

    #[test]
    fn test_immutable_optional_joins_minimal_split() {
        let record = Record::new("Badge", "badge.xml")
            .with_field(Field::new("id", FieldType::parse("int32")).immutable())
            .with_field(
                Field::new("label", FieldType::parse("string"))
                    .immutable()
                    .optional(),
            );
        let set = synthesize(&record).expect("Failed to synthesize");

        let minimal = set.get(ConstructorKind::Minimal).expect("minimal");
        assert_eq!(names(minimal), vec!["id"]);
        assert!(set.default.is_none());
    }

    #[test]
    fn test_empty_record_rejected() {
        let record = Record::new("Nothing", "nothing.xml");
        assert!(matches!(
            synthesize(&record),
            Err(SchemaError::EmptyRecord { .. })
        ));
    }

    #[test]
    fn test_iteration_order() {
        let record = person();
        let set = synthesize(&record).expect("Failed to synthesize");
        let kinds: Vec<_> = set.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ConstructorKind::Default,
                ConstructorKind::Minimal,
                ConstructorKind::Full
            ]
        );
    }
}
