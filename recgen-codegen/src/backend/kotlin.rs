//! Kotlin source rendering.
//!
//! A record becomes a `data class`. The primary constructor declares every
//! property, `val` for init-once storage and `var` otherwise, which also
//! gives each property its getter and, for `var`, its setter. Minimal and
//! default constructors are secondary constructors delegating to it. Copy,
//! equality and string conversion come with the data class.

use super::{RecordUnit, RenderOptions, Renderer, banner, float_text};
use crate::constructors::{ConstructorKind, ConstructorSpec, Initializer};
use crate::error::CodegenError;
use crate::members::Storage;
use crate::target::TargetLanguage;
use crate::types::{TypeSpelling, TypeVocabulary};
use recgen_schema::{FieldType, Literal, PrimitiveType};
use std::fmt::Write;

const HARD_KEYWORDS: &[&str] = &[
    "as", "break", "class", "continue", "do", "else", "false", "for", "fun", "if", "in",
    "interface", "is", "null", "object", "package", "return", "super", "this", "throw", "true",
    "try", "typealias", "typeof", "val", "var", "when", "while",
];

/// Renders records as Kotlin data classes.
#[derive(Debug, Clone, Default)]
pub struct KotlinRenderer {
    options: RenderOptions,
}

impl KotlinRenderer {
    /// Creates a Kotlin renderer.
    #[must_use]
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    fn write_secondary(
        &self,
        out: &mut String,
        unit: &RecordUnit<'_>,
        ctor: &ConstructorSpec<'_>,
    ) -> Result<(), CodegenError> {
        let ind = self.options.indent();

        let params = ctor
            .params()
            .map(|field| -> Result<String, CodegenError> {
                Ok(format!("{}: {}", ident(&field.name), unit.type_of(field)?))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let args: Vec<_> = ctor
            .inits
            .iter()
            .map(|init| match &init.init {
                Initializer::Param => ident(&init.field.name),
                Initializer::Value(literal) => literal_text(literal, &init.field.ty),
                Initializer::Zero => zero_text(&init.field.ty),
            })
            .collect();

        let head = format!("{ind}constructor({}) : this(", params.join(", "));
        let line = format!("{head}{})", args.join(", "));
        if self.options.fits(&line) {
            writeln!(out, "{line}")?;
        } else {
            writeln!(out, "{head}")?;
            let last = args.len().saturating_sub(1);
            for (i, arg) in args.iter().enumerate() {
                let sep = if i == last { "" } else { "," };
                writeln!(out, "{ind}{ind}{arg}{sep}")?;
            }
            writeln!(out, "{ind})")?;
        }
        Ok(())
    }
}

impl TypeVocabulary for KotlinRenderer {
    fn primitive(&self, prim: PrimitiveType) -> Option<TypeSpelling> {
        let text = match prim {
            PrimitiveType::Int8 => "Byte",
            PrimitiveType::Int16 => "Short",
            PrimitiveType::Int32 => "Int",
            PrimitiveType::Int64 => "Long",
            PrimitiveType::Uint8 => "UByte",
            PrimitiveType::Uint16 => "UShort",
            PrimitiveType::Uint32 => "UInt",
            PrimitiveType::Uint64 => "ULong",
            PrimitiveType::Float => "Float",
            PrimitiveType::Double => "Double",
            PrimitiveType::Bool => "Boolean",
            PrimitiveType::Char => "Char",
            PrimitiveType::String => "String",
        };
        Some(TypeSpelling::new(text, prim.is_trivial()))
    }

    fn optional(&self, inner: &TypeSpelling) -> TypeSpelling {
        let mut spelling = TypeSpelling::new(format!("{inner}?"), inner.trivial);
        spelling.imports = inner.imports.clone();
        spelling
    }
}

impl Renderer for KotlinRenderer {
    fn target(&self) -> TargetLanguage {
        TargetLanguage::Kotlin
    }

    fn render_unit(&self, unit: &RecordUnit<'_>) -> Result<String, CodegenError> {
        let ind = self.options.indent();
        let mut out = banner("//", unit.record);
        writeln!(out)?;
        for import in &unit.imports {
            writeln!(out, "import {import}")?;
        }
        if !unit.imports.is_empty() {
            writeln!(out)?;
        }

        writeln!(out, "data class {}(", ident(unit.name()))?;
        let last = unit.members.slots.len().saturating_sub(1);
        for (i, slot) in unit.members.slots.iter().enumerate() {
            let keyword = match slot.storage {
                Storage::InitOnce => "val",
                Storage::Reassignable => "var",
            };
            let sep = if i == last { "" } else { "," };
            writeln!(
                out,
                "{ind}{keyword} {}: {}{sep}",
                ident(&slot.field.name),
                unit.type_of(slot.field)?
            )?;
        }

        let secondary: Vec<_> = unit
            .constructors
            .iter()
            .filter(|c| matches!(c.kind, ConstructorKind::Default | ConstructorKind::Minimal))
            .collect();
        if secondary.is_empty() {
            writeln!(out, ")")?;
            return Ok(out);
        }

        writeln!(out, ") {{")?;
        for (i, ctor) in secondary.iter().enumerate() {
            if i > 0 {
                writeln!(out)?;
            }
            self.write_secondary(&mut out, unit, ctor)?;
        }
        writeln!(out, "}}")?;
        Ok(out)
    }
}

/// Escapes hard keywords with backticks.
fn ident(name: &str) -> String {
    if HARD_KEYWORDS.contains(&name) {
        format!("`{name}`")
    } else {
        name.to_string()
    }
}

fn quote(text: &str, quote: char) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push(quote);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '$' => out.push_str("\\$"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

fn literal_text(literal: &Literal, ty: &FieldType) -> String {
    let prim = ty.value_type().primitive();
    match literal {
        Literal::Absent => "null".to_string(),
        Literal::Int(v) if *v == i64::MIN => "Long.MIN_VALUE".to_string(),
        Literal::Int(v) if prim == Some(PrimitiveType::Int64) => format!("{v}L"),
        Literal::Int(v) => v.to_string(),
        Literal::Uint(v) if prim == Some(PrimitiveType::Uint64) => format!("{v}uL"),
        Literal::Uint(v) => format!("{v}u"),
        Literal::Float(v) if prim == Some(PrimitiveType::Float) => format!("{}f", float_text(*v)),
        Literal::Float(v) => float_text(*v),
        Literal::Bool(v) => v.to_string(),
        Literal::Char(c) => quote(&c.to_string(), '\''),
        Literal::Str(s) => quote(s, '"'),
    }
}

fn zero_text(ty: &FieldType) -> String {
    let zero = match ty {
        FieldType::Optional(_) | FieldType::Named(_) => "null",
        FieldType::Primitive(prim) => match prim {
            PrimitiveType::Int64 => "0L",
            PrimitiveType::Uint8 | PrimitiveType::Uint16 | PrimitiveType::Uint32 => "0u",
            PrimitiveType::Uint64 => "0uL",
            PrimitiveType::Float => "0.0f",
            PrimitiveType::Double => "0.0",
            PrimitiveType::Bool => "false",
            PrimitiveType::Char => "'\\u0000'",
            PrimitiveType::String => "\"\"",
            _ => "0",
        },
    };
    zero.to_string()
}

#[cfg(test)]
mod tests {
    use super::super::{fixtures, render};
    use super::*;
    use recgen_schema::{Field, Record};

    fn kotlin(record: &Record) -> String {
        render(record, &KotlinRenderer::default()).expect("Failed to render")
    }

    #[test]
    fn test_foo_data_class() {
        let out = kotlin(&fixtures::foo());
        let expected = "// This file has been generated from class.xml\n\
                        \n\
                        data class Foo(\n\
                        \tval meow: Long,\n\
                        \tvar hello: String,\n\
                        \tvar isTrue: Boolean\n\
                        )\n";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_person_secondary_constructors() {
        let out = kotlin(&fixtures::person());

        assert!(out.contains("\tvar nickname: String?,\n"));
        assert!(out.contains(") {\n\tconstructor() : this(\"\", 0, null, false)\n\n"));
        assert!(out.contains(
            "\tconstructor(name: String, age: Int, isLegalToDrink: Boolean) : this(name, age, null, isLegalToDrink)\n}\n"
        ));
    }

    #[test]
    fn test_defaults_and_zero_values() {
        let out = kotlin(&fixtures::settings());
        assert!(out.contains("\tval retries: UByte,\n"));
        assert!(out.contains("\tconstructor() : this(3u, \"say \\\"hi\\\"\", 0.0f)\n"));
    }

    #[test]
    fn test_long_delegation_wraps() {
        let renderer = KotlinRenderer::new(RenderOptions::new().max_line_width(40));
        let out = render(&fixtures::person(), &renderer).expect("Failed to render");
        assert!(out.contains(": this(\n\t\tname,\n\t\tage,\n\t\tnull,\n\t\tisLegalToDrink\n\t)\n"));
    }

    #[test]
    fn test_keywords_escaped() {
        let record = Record::new("Route", "route.xml")
            .with_field(Field::new("when", FieldType::parse("int64")))
            .with_field(Field::new("via", FieldType::parse("string")).optional());
        let out = kotlin(&record);

        assert!(out.contains("\tvar `when`: Long,\n"));
        assert!(out.contains("constructor(`when`: Long) : this(`when`, null)"));
    }

    #[test]
    fn test_literal_text() {
        assert_eq!(literal_text(&Literal::Int(-4), &FieldType::parse("int64")), "-4L");
        assert_eq!(literal_text(&Literal::Uint(9), &FieldType::parse("uint64")), "9uL");
        assert_eq!(
            literal_text(&Literal::Str("$x".to_string()), &FieldType::parse("string")),
            "\"\\$x\""
        );
        assert_eq!(literal_text(&Literal::Char('\0'), &FieldType::parse("char")), "'\\u0000'");
        assert_eq!(literal_text(&Literal::Absent, &FieldType::parse("optional<int8>")), "null");
    }
}
