//! Field type definitions.
//!
//! This module contains the data structures describing a field's semantic
//! type, its mutability and optionality flags, and declared default values.

use std::fmt;

/// Primitive field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveType {
    /// Signed 8-bit integer.
    Int8,
    /// Signed 16-bit integer.
    Int16,
    /// Signed 32-bit integer.
    Int32,
    /// Signed 64-bit integer.
    Int64,
    /// Unsigned 8-bit integer.
    Uint8,
    /// Unsigned 16-bit integer.
    Uint16,
    /// Unsigned 32-bit integer.
    Uint32,
    /// Unsigned 64-bit integer.
    Uint64,
    /// 32-bit floating point.
    Float,
    /// 64-bit floating point.
    Double,
    /// Boolean.
    Bool,
    /// Single character.
    Char,
    /// Text string.
    String,
}

impl PrimitiveType {
    /// Every primitive, in schema declaration order.
    pub const ALL: [Self; 13] = [
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::Uint8,
        Self::Uint16,
        Self::Uint32,
        Self::Uint64,
        Self::Float,
        Self::Double,
        Self::Bool,
        Self::Char,
        Self::String,
    ];

    /// Returns the schema type name.
    #[must_use]
    pub const fn schema_name(&self) -> &'static str {
        match self {
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Float => "float",
            Self::Double => "double",
            Self::Bool => "bool",
            Self::Char => "char",
            Self::String => "string",
        }
    }

    /// Parses a primitive type from its schema name.
    #[must_use]
    pub fn from_schema_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.schema_name() == name)
    }

    /// Returns true if this is a signed integer type.
    #[must_use]
    pub const fn is_signed(&self) -> bool {
        matches!(self, Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64)
    }

    /// Returns true if this is an unsigned integer type.
    #[must_use]
    pub const fn is_unsigned(&self) -> bool {
        matches!(
            self,
            Self::Uint8 | Self::Uint16 | Self::Uint32 | Self::Uint64
        )
    }

    /// Returns true if this is a floating point type.
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Self::Float | Self::Double)
    }

    /// Returns true if values of this type are plain scalars that are cheap
    /// to copy.
    #[must_use]
    pub const fn is_trivial(&self) -> bool {
        !matches!(self, Self::String)
    }

    /// Returns true if the literal can be stored in a field of this type.
    #[must_use]
    pub fn accepts(&self, literal: &Literal) -> bool {
        match (self, literal) {
            (Self::Int8, Literal::Int(v)) => i8::try_from(*v).is_ok(),
            (Self::Int16, Literal::Int(v)) => i16::try_from(*v).is_ok(),
            (Self::Int32, Literal::Int(v)) => i32::try_from(*v).is_ok(),
            (Self::Int64, Literal::Int(_)) => true,
            (Self::Uint8, Literal::Uint(v)) => u8::try_from(*v).is_ok(),
            (Self::Uint16, Literal::Uint(v)) => u16::try_from(*v).is_ok(),
            (Self::Uint32, Literal::Uint(v)) => u32::try_from(*v).is_ok(),
            (Self::Uint64, Literal::Uint(_)) => true,
            (Self::Float, Literal::Float(v)) => (*v as f32).is_finite(),
            (Self::Double, Literal::Float(v)) => v.is_finite(),
            (Self::Bool, Literal::Bool(_)) => true,
            (Self::Char, Literal::Char(_)) => true,
            (Self::String, Literal::Str(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.schema_name())
    }
}

/// Semantic type of a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// A primitive type.
    Primitive(PrimitiveType),
    /// A value that may be absent.
    Optional(Box<FieldType>),
    /// A type name that is not part of the primitive set.
    Named(String),
}

impl FieldType {
    /// Creates an optional type wrapping `inner`.
    #[must_use]
    pub fn optional(inner: FieldType) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// Parses a schema type spelling such as `int32` or `optional<string>`.
    #[must_use]
    pub fn parse(spelling: &str) -> Self {
        let spelling = spelling.trim();
        if let Some(inner) = spelling
            .strip_prefix("optional<")
            .and_then(|rest| rest.strip_suffix('>'))
        {
            return Self::optional(Self::parse(inner));
        }
        match PrimitiveType::from_schema_name(spelling) {
            Some(prim) => Self::Primitive(prim),
            None => Self::Named(spelling.to_string()),
        }
    }

    /// Returns true if this is an optional type.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        matches!(self, Self::Optional(_))
    }

    /// Returns the type with one optional layer removed.
    #[must_use]
    pub fn value_type(&self) -> &FieldType {
        match self {
            Self::Optional(inner) => inner,
            other => other,
        }
    }

    /// Returns the primitive type, if this is a primitive.
    #[must_use]
    pub const fn primitive(&self) -> Option<PrimitiveType> {
        match self {
            Self::Primitive(prim) => Some(*prim),
            _ => None,
        }
    }

    /// Returns true if values of this type are plain scalars.
    ///
    /// An optional is trivial when its value type is.
    #[must_use]
    pub fn is_trivial(&self) -> bool {
        match self {
            Self::Primitive(prim) => prim.is_trivial(),
            Self::Optional(inner) => inner.is_trivial(),
            Self::Named(_) => false,
        }
    }

    /// Returns true if the literal can be stored in a field of this type.
    #[must_use]
    pub fn accepts(&self, literal: &Literal) -> bool {
        match self {
            Self::Optional(inner) => matches!(literal, Literal::Absent) || inner.accepts(literal),
            Self::Primitive(prim) => prim.accepts(literal),
            Self::Named(_) => false,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(prim) => write!(f, "{prim}"),
            Self::Optional(inner) => write!(f, "optional<{inner}>"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// Whether a field may be reassigned after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mutability {
    /// Initialized once at construction, never reassigned.
    Immutable,
    /// Freely reassignable.
    #[default]
    Mutable,
}

impl Mutability {
    /// Parses mutability from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "immutable" | "const" => Some(Self::Immutable),
            "mutable" | "mut" => Some(Self::Mutable),
            _ => None,
        }
    }
}

/// Whether a field must be supplied at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Optionality {
    /// Supplied by every parameterized constructor.
    #[default]
    Required,
    /// May be left absent by the required-only constructor.
    Optional,
}

impl Optionality {
    /// Parses optionality from a schema `presence` value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "required" => Some(Self::Required),
            "optional" => Some(Self::Optional),
            _ => None,
        }
    }
}

/// A declared default value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    Uint(u64),
    /// Floating point.
    Float(f64),
    /// Boolean.
    Bool(bool),
    /// Character.
    Char(char),
    /// Text.
    Str(String),
    /// The absent value of an optional type.
    Absent,
}

impl Literal {
    /// Parses a literal for a field of the given type.
    ///
    /// Returns `None` if the text does not denote a value of that type.
    #[must_use]
    pub fn parse(text: &str, ty: &FieldType) -> Option<Self> {
        match ty {
            FieldType::Optional(inner) => match text.trim() {
                "absent" | "null" | "none" => Some(Self::Absent),
                _ => Self::parse(text, inner),
            },
            FieldType::Primitive(prim) => {
                let literal = Self::parse_primitive(text, *prim)?;
                prim.accepts(&literal).then_some(literal)
            }
            FieldType::Named(_) => None,
        }
    }

    fn parse_primitive(text: &str, prim: PrimitiveType) -> Option<Self> {
        if prim == PrimitiveType::String {
            return Some(Self::Str(text.to_string()));
        }

        let text = text.trim();
        if prim.is_signed() {
            text.parse().ok().map(Self::Int)
        } else if prim.is_unsigned() {
            text.parse().ok().map(Self::Uint)
        } else if prim.is_float() {
            text.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Self::Float)
        } else if prim == PrimitiveType::Bool {
            match text {
                "true" => Some(Self::Bool(true)),
                "false" => Some(Self::Bool(false)),
                _ => None,
            }
        } else {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(Self::Char(c)),
                _ => None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_from_schema_name() {
        assert_eq!(
            PrimitiveType::from_schema_name("int64"),
            Some(PrimitiveType::Int64)
        );
        assert_eq!(
            PrimitiveType::from_schema_name("string"),
            Some(PrimitiveType::String)
        );
        assert_eq!(PrimitiveType::from_schema_name("int128"), None);
    }

    #[test]
    fn test_primitive_names_round_trip() {
        for prim in PrimitiveType::ALL {
            assert_eq!(PrimitiveType::from_schema_name(prim.schema_name()), Some(prim));
        }
    }

    #[test]
    fn test_field_type_parse() {
        assert_eq!(
            FieldType::parse("bool"),
            FieldType::Primitive(PrimitiveType::Bool)
        );
        assert_eq!(
            FieldType::parse("optional<string>"),
            FieldType::optional(FieldType::Primitive(PrimitiveType::String))
        );
        assert_eq!(
            FieldType::parse("Address"),
            FieldType::Named("Address".to_string())
        );
    }

    #[test]
    fn test_field_type_display() {
        let ty = FieldType::parse("optional<int32>");
        assert_eq!(ty.to_string(), "optional<int32>");
    }

    #[test]
    fn test_field_type_trivial() {
        assert!(FieldType::parse("int32").is_trivial());
        assert!(FieldType::parse("optional<bool>").is_trivial());
        assert!(!FieldType::parse("string").is_trivial());
        assert!(!FieldType::parse("optional<string>").is_trivial());
    }

    #[test]
    fn test_mutability_parse() {
        assert_eq!(Mutability::parse("immutable"), Some(Mutability::Immutable));
        assert_eq!(Mutability::parse("MUTABLE"), Some(Mutability::Mutable));
        assert_eq!(Mutability::parse("frozen"), None);
        assert_eq!(Mutability::default(), Mutability::Mutable);
    }

    #[test]
    fn test_optionality_parse() {
        assert_eq!(Optionality::parse("optional"), Some(Optionality::Optional));
        assert_eq!(Optionality::parse("required"), Some(Optionality::Required));
        assert_eq!(Optionality::parse("constant"), None);
        assert_eq!(Optionality::default(), Optionality::Required);
    }

    #[test]
    fn test_literal_parse_integers() {
        let int8 = FieldType::parse("int8");
        assert_eq!(Literal::parse("-12", &int8), Some(Literal::Int(-12)));
        assert_eq!(Literal::parse("300", &int8), None);

        let uint16 = FieldType::parse("uint16");
        assert_eq!(Literal::parse("65535", &uint16), Some(Literal::Uint(65535)));
        assert_eq!(Literal::parse("-1", &uint16), None);
    }

    #[test]
    fn test_literal_parse_other_primitives() {
        assert_eq!(
            Literal::parse("true", &FieldType::parse("bool")),
            Some(Literal::Bool(true))
        );
        assert_eq!(
            Literal::parse("1.5", &FieldType::parse("double")),
            Some(Literal::Float(1.5))
        );
        assert_eq!(
            Literal::parse("x", &FieldType::parse("char")),
            Some(Literal::Char('x'))
        );
        assert_eq!(Literal::parse("xy", &FieldType::parse("char")), None);
        assert_eq!(
            Literal::parse(" hi ", &FieldType::parse("string")),
            Some(Literal::Str(" hi ".to_string()))
        );
    }

    #[test]
    fn test_literal_parse_optional() {
        let ty = FieldType::parse("optional<int32>");
        assert_eq!(Literal::parse("absent", &ty), Some(Literal::Absent));
        assert_eq!(Literal::parse("7", &ty), Some(Literal::Int(7)));
        assert_eq!(Literal::parse("absent", &FieldType::parse("int32")), None);
    }

    #[test]
    fn test_field_type_accepts() {
        let ty = FieldType::parse("optional<string>");
        assert!(ty.accepts(&Literal::Absent));
        assert!(ty.accepts(&Literal::Str("x".to_string())));
        assert!(!ty.accepts(&Literal::Int(1)));
        assert!(!FieldType::parse("Address").accepts(&Literal::Absent));

        let double = FieldType::parse("optional<double>");
        assert!(double.accepts(&Literal::Float(0.5)));
        assert!(!double.accepts(&Literal::Float(f64::INFINITY)));
        assert!(!double.accepts(&Literal::Float(f64::NAN)));
    }
}
