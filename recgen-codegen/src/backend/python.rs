//! Python 3 module rendering.
//!
//! Records become `__slots__` classes. The full (or all-fields) constructor is
//! `__init__`; the minimal and default constructors are the classmethods
//! `with_required` and `default`. Fields are stored as `_name` slots behind
//! properties, and only mutable fields get a property setter.

use super::{
    RecordUnit, RenderOptions, Renderer, banner, float_text, quote_text, reject_clashes,
    reject_reserved,
};
use crate::constructors::{ConstructorKind, ConstructorSpec, Initializer};
use crate::error::CodegenError;
use crate::members::SpecialMember;
use crate::target::TargetLanguage;
use crate::types::{TypeSpelling, TypeVocabulary};
use recgen_schema::{FieldType, Literal, PrimitiveType};
use std::collections::BTreeMap;
use std::fmt::Write;

const RESERVED: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield", "default", "with_required", "cls", "self", "value",
];

/// Renders records as Python modules.
#[derive(Debug, Clone, Default)]
pub struct PythonRenderer {
    options: RenderOptions,
}

impl PythonRenderer {
    /// Creates a Python renderer.
    #[must_use]
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    fn write_imports(&self, out: &mut String, unit: &RecordUnit<'_>) -> Result<(), CodegenError> {
        let mut modules: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for import in &unit.imports {
            match import.as_str().rsplit_once('.') {
                Some((module, name)) => modules.entry(module).or_default().push(name),
                None => {
                    modules.entry(import.as_str()).or_default();
                }
            }
        }

        for (module, names) in &modules {
            if names.is_empty() {
                writeln!(out, "import {module}")?;
            } else {
                writeln!(out, "from {module} import {}", names.join(", "))?;
            }
        }
        if !modules.is_empty() {
            writeln!(out)?;
        }
        Ok(())
    }

    fn params(
        &self,
        unit: &RecordUnit<'_>,
        ctor: &ConstructorSpec<'_>,
    ) -> Result<String, CodegenError> {
        let mut params = String::new();
        for field in ctor.params() {
            write!(params, ", {}: {}", field.name, unit.type_of(field)?)?;
        }
        Ok(params)
    }

    fn write_constructor(
        &self,
        out: &mut String,
        unit: &RecordUnit<'_>,
        ctor: &ConstructorSpec<'_>,
    ) -> Result<(), CodegenError> {
        let ind = self.options.indent();
        let name = unit.name();
        let params = self.params(unit, ctor)?;

        match ctor.kind {
            ConstructorKind::Full | ConstructorKind::AllFields => {
                writeln!(out, "{ind}def __init__(self{params}):")?;
                for field in ctor.params() {
                    writeln!(out, "{ind}{ind}self._{0} = {0}", field.name)?;
                }
            }
            ConstructorKind::Default | ConstructorKind::Minimal => {
                let method = if ctor.kind == ConstructorKind::Default {
                    "default"
                } else {
                    "with_required"
                };
                let args = ctor
                    .inits
                    .iter()
                    .map(|init| match &init.init {
                        Initializer::Param => init.field.name.clone(),
                        Initializer::Value(literal) => literal_text(literal),
                        Initializer::Zero => zero_text(&init.field.ty),
                    })
                    .collect::<Vec<_>>();

                writeln!(out, "{ind}@classmethod")?;
                writeln!(out, "{ind}def {method}(cls{params}) -> '{name}':")?;
                writeln!(out, "{ind}{ind}return cls({})", args.join(", "))?;
            }
        }
        writeln!(out)?;
        Ok(())
    }

    fn write_value_semantics(
        &self,
        out: &mut String,
        unit: &RecordUnit<'_>,
    ) -> Result<(), CodegenError> {
        let ind = self.options.indent();
        let name = unit.name();
        let own: Vec<_> = unit.record.fields.iter().map(|f| format!("self._{}", f.name)).collect();

        for member in unit.members.special_members {
            // moves, assignment and destruction are intrinsic to Python references
            if *member == SpecialMember::CopyConstructor {
                writeln!(out, "{ind}def __copy__(self) -> '{name}':")?;
                writeln!(out, "{ind}{ind}return type(self)({})", own.join(", "))?;
                writeln!(out)?;
            }
        }

        let theirs: Vec<_> = unit
            .record
            .fields
            .iter()
            .map(|f| format!("other._{}", f.name))
            .collect();
        writeln!(out, "{ind}def __eq__(self, other: object) -> bool:")?;
        writeln!(out, "{ind}{ind}if not isinstance(other, {name}):")?;
        writeln!(out, "{ind}{ind}{ind}return NotImplemented")?;
        writeln!(out, "{ind}{ind}return {} == {}", py_tuple(&own), py_tuple(&theirs))?;
        writeln!(out)?;

        let shown: Vec<_> = unit
            .record
            .fields
            .iter()
            .map(|f| format!("{0}={{self._{0}!r}}", f.name))
            .collect();
        writeln!(out, "{ind}def __repr__(self) -> str:")?;
        writeln!(out, "{ind}{ind}return f'{name}({})'", shown.join(", "))?;
        Ok(())
    }

    fn write_accessors(&self, out: &mut String, unit: &RecordUnit<'_>) -> Result<(), CodegenError> {
        let ind = self.options.indent();
        for slot in &unit.members.slots {
            let field = &slot.field.name;
            let ty = unit.type_of(slot.field)?;

            writeln!(out)?;
            writeln!(out, "{ind}@property")?;
            writeln!(out, "{ind}def {field}(self) -> {ty}:")?;
            writeln!(out, "{ind}{ind}return self._{field}")?;

            if slot.accessor.setter {
                writeln!(out)?;
                writeln!(out, "{ind}@{field}.setter")?;
                writeln!(out, "{ind}def {field}(self, value: {ty}) -> None:")?;
                writeln!(out, "{ind}{ind}self._{field} = value")?;
            }
        }
        Ok(())
    }
}

impl TypeVocabulary for PythonRenderer {
    fn primitive(&self, prim: PrimitiveType) -> Option<TypeSpelling> {
        let text = match prim {
            PrimitiveType::Float | PrimitiveType::Double => "float",
            PrimitiveType::Bool => "bool",
            PrimitiveType::Char | PrimitiveType::String => "str",
            _ => "int",
        };
        Some(TypeSpelling::new(text, prim.is_trivial()))
    }

    fn optional(&self, inner: &TypeSpelling) -> TypeSpelling {
        let mut spelling = TypeSpelling::new(format!("Optional[{inner}]"), inner.trivial);
        spelling.imports = inner.imports.clone();
        spelling.with_import("typing.Optional")
    }
}

impl Renderer for PythonRenderer {
    fn target(&self) -> TargetLanguage {
        TargetLanguage::Python
    }

    fn render_unit(&self, unit: &RecordUnit<'_>) -> Result<String, CodegenError> {
        reject_reserved(unit, self.target(), RESERVED)?;
        reject_clashes(unit, self.target(), class_names(unit))?;

        let ind = self.options.indent();
        let mut out = banner("#", unit.record);
        writeln!(out)?;
        self.write_imports(&mut out, unit)?;
        writeln!(out)?;

        let slots: Vec<_> = unit
            .record
            .fields
            .iter()
            .map(|f| format!("'_{}'", f.name))
            .collect();
        writeln!(out, "class {}:", unit.name())?;
        writeln!(out, "{ind}__slots__ = {}", py_tuple(&slots))?;
        writeln!(out)?;

        for ctor in unit.constructors.iter() {
            self.write_constructor(&mut out, unit, ctor)?;
        }
        self.write_value_semantics(&mut out, unit)?;
        self.write_accessors(&mut out, unit)?;

        Ok(out)
    }
}

/// Attribute names of the class: methods, slots and properties.
fn class_names(unit: &RecordUnit<'_>) -> Vec<String> {
    let mut names: Vec<String> = [
        "__init__",
        "__copy__",
        "__eq__",
        "__repr__",
        "default",
        "with_required",
    ]
    .map(String::from)
    .into();
    for field in &unit.record.fields {
        names.push(format!("_{}", field.name));
        names.push(field.name.clone());
    }
    names
}

/// Formats items as a Python tuple, keeping the trailing comma of a 1-tuple.
fn py_tuple(items: &[String]) -> String {
    match items {
        [single] => format!("({single},)"),
        _ => format!("({})", items.join(", ")),
    }
}

fn literal_text(literal: &Literal) -> String {
    match literal {
        Literal::Int(v) => v.to_string(),
        Literal::Uint(v) => v.to_string(),
        Literal::Float(v) => float_text(*v),
        Literal::Bool(true) => "True".to_string(),
        Literal::Bool(false) => "False".to_string(),
        Literal::Char(c) => quote_text(&c.to_string(), '\''),
        Literal::Str(s) => quote_text(s, '\''),
        Literal::Absent => "None".to_string(),
    }
}

fn zero_text(ty: &FieldType) -> String {
    let zero = match ty {
        FieldType::Optional(_) | FieldType::Named(_) => "None",
        FieldType::Primitive(prim) => match prim {
            PrimitiveType::Float | PrimitiveType::Double => "0.0",
            PrimitiveType::Bool => "False",
            PrimitiveType::Char => "'\\0'",
            PrimitiveType::String => "''",
            _ => "0",
        },
    };
    zero.to_string()
}
