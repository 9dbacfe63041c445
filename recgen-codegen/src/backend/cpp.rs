//! C++17 header rendering.

use super::{
    RecordUnit, RenderOptions, Renderer, banner, float_text, quote_text, reject_clashes,
    reject_reserved,
};
use crate::constructors::{ConstructorKind, ConstructorSpec, Initializer};
use crate::error::CodegenError;
use crate::members::{SpecialMember, Storage};
use crate::target::TargetLanguage;
use crate::types::{TypeSpelling, TypeVocabulary};
use recgen_schema::{FieldType, Literal, PrimitiveType, capitalize_first};
use std::fmt::Write;

const RESERVED: &[&str] = &[
    "alignas", "alignof", "and", "asm", "auto", "bool", "break", "case", "catch", "char",
    "class", "const", "constexpr", "const_cast", "continue", "decltype", "default", "delete",
    "do", "double", "dynamic_cast", "else", "enum", "explicit", "export", "extern", "false",
    "float", "for", "friend", "goto", "if", "inline", "int", "long", "mutable", "namespace",
    "new", "noexcept", "not", "nullptr", "operator", "or", "private", "protected", "public",
    "register", "reinterpret_cast", "return", "short", "signed", "sizeof", "static",
    "static_assert", "static_cast", "struct", "switch", "template", "this", "throw", "true",
    "try", "typedef", "typeid", "typename", "union", "unsigned", "using", "virtual", "void",
    "volatile", "while", "xor",
];

/// Renders records as C++ header files.
#[derive(Debug, Clone, Default)]
pub struct CppRenderer {
    options: RenderOptions,
}

impl CppRenderer {
    /// Creates a C++ renderer.
    #[must_use]
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    fn write_members(&self, out: &mut String, unit: &RecordUnit<'_>) -> Result<(), CodegenError> {
        let ind = self.options.indent();
        writeln!(out, "private:")?;
        for slot in &unit.members.slots {
            let field = slot.field;
            let ty = unit.type_of(field)?;
            let qualifier = match slot.storage {
                Storage::InitOnce => "const ",
                Storage::Reassignable => "",
            };
            let initializer = match field.usable_default() {
                Some(literal) => format!(" = {}", literal_text(&literal, &field.ty)),
                None if slot.storage == Storage::Reassignable => "{}".to_string(),
                None => String::new(),
            };
            writeln!(out, "{ind}{qualifier}{ty} {}{initializer};", field.name)?;
        }
        Ok(())
    }

    fn write_constructor(
        &self,
        out: &mut String,
        unit: &RecordUnit<'_>,
        ctor: &ConstructorSpec<'_>,
    ) -> Result<(), CodegenError> {
        let ind = self.options.indent();
        let name = unit.name();

        if ctor.kind == ConstructorKind::Default {
            // members carry their defaults as in-class initializers
            writeln!(out, "{ind}{name}() = default;")?;
            return Ok(());
        }

        let explicit = if ctor.explicit { "explicit " } else { "" };
        let params = ctor
            .params()
            .map(|field| -> Result<String, CodegenError> {
                Ok(format!("{} {}", unit.type_of(field)?, field.name))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let signature = format!("{ind}{explicit}{name}({})", params.join(", "));
        if params.is_empty() || self.options.fits(&signature) {
            writeln!(out, "{signature}")?;
        } else {
            writeln!(out, "{ind}{explicit}{name}(")?;
            let last = params.len().saturating_sub(1);
            for (i, param) in params.iter().enumerate() {
                let sep = if i == last { ")" } else { "," };
                writeln!(out, "{ind}{ind}{param}{sep}")?;
            }
        }

        let inits = ctor
            .inits
            .iter()
            .map(|init| -> Result<String, CodegenError> {
                let value = match &init.init {
                    Initializer::Param if unit.type_of(init.field)?.trivial => {
                        init.field.name.clone()
                    }
                    Initializer::Param => format!("std::move({})", init.field.name),
                    Initializer::Value(literal) => literal_text(literal, &init.field.ty),
                    Initializer::Zero => String::new(),
                };
                Ok(format!("{}({value})", init.field.name))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let single = format!("{ind}{ind}: {} {{}}", inits.join(", "));
        if self.options.fits(&single) {
            writeln!(out, "{single}")?;
        } else {
            for (i, init) in inits.iter().enumerate() {
                let lead = if i == 0 { ':' } else { ',' };
                writeln!(out, "{ind}{ind}{lead} {init}")?;
            }
            writeln!(out, "{ind}{{}}")?;
        }
        Ok(())
    }

    fn write_special_member(
        &self,
        out: &mut String,
        name: &str,
        member: SpecialMember,
    ) -> Result<(), CodegenError> {
        let ind = self.options.indent();
        match member {
            SpecialMember::CopyConstructor => {
                writeln!(out, "{ind}{name}(const {name}& other) = default;")?
            }
            SpecialMember::MoveConstructor => {
                writeln!(out, "{ind}{name}({name}&& other) noexcept = default;")?
            }
            SpecialMember::CopyAssign => {
                writeln!(out, "{ind}{name}& operator=(const {name}& other) = default;")?
            }
            SpecialMember::MoveAssign => {
                writeln!(out, "{ind}{name}& operator=({name}&& other) noexcept = default;")?
            }
            SpecialMember::Destructor => writeln!(out, "{ind}~{name}() = default;")?,
        }
        Ok(())
    }

    fn write_accessors(&self, out: &mut String, unit: &RecordUnit<'_>) -> Result<(), CodegenError> {
        let ind = self.options.indent();
        for slot in &unit.members.slots {
            let field = slot.field;
            let ty = unit.type_of(field)?;
            let suffix = capitalize_first(&field.name);

            writeln!(
                out,
                "{ind}{ty} get{suffix}() const {{ return {}; }}",
                field.name
            )?;
            if slot.accessor.setter {
                let param = if slot.accessor.setter_by_reference {
                    format!("const {ty}& value")
                } else {
                    format!("{ty} value")
                };
                writeln!(
                    out,
                    "{ind}void set{suffix}({param}) {{ {} = value; }}",
                    field.name
                )?;
            }
        }
        Ok(())
    }
}

impl TypeVocabulary for CppRenderer {
    fn primitive(&self, prim: PrimitiveType) -> Option<TypeSpelling> {
        let fixed = |text: &str| TypeSpelling::new(text, true).with_import("cstdint");
        let spelling = match prim {
            PrimitiveType::Int8 => fixed("int8_t"),
            PrimitiveType::Int16 => fixed("int16_t"),
            PrimitiveType::Int32 => fixed("int32_t"),
            PrimitiveType::Int64 => fixed("int64_t"),
            PrimitiveType::Uint8 => fixed("uint8_t"),
            PrimitiveType::Uint16 => fixed("uint16_t"),
            PrimitiveType::Uint32 => fixed("uint32_t"),
            PrimitiveType::Uint64 => fixed("uint64_t"),
            PrimitiveType::Float => TypeSpelling::new("float", true),
            PrimitiveType::Double => TypeSpelling::new("double", true),
            PrimitiveType::Bool => TypeSpelling::new("bool", true),
            PrimitiveType::Char => TypeSpelling::new("char", true),
            PrimitiveType::String => TypeSpelling::new("std::string", false).with_import("string"),
        };
        Some(spelling)
    }

    fn optional(&self, inner: &TypeSpelling) -> TypeSpelling {
        let mut spelling = TypeSpelling::new(format!("std::optional<{inner}>"), inner.trivial);
        spelling.imports = inner.imports.clone();
        spelling.with_import("optional")
    }
}

impl Renderer for CppRenderer {
    fn target(&self) -> TargetLanguage {
        TargetLanguage::Cpp
    }

    fn render_unit(&self, unit: &RecordUnit<'_>) -> Result<String, CodegenError> {
        reject_reserved(unit, self.target(), RESERVED)?;
        reject_clashes(unit, self.target(), class_scope_names(unit))?;

        let name = unit.name();
        let guard = format!("{}_H", name.to_uppercase());
        let mut out = banner("//", unit.record);

        writeln!(out, "#ifndef {guard}")?;
        writeln!(out, "#define {guard}")?;
        writeln!(out)?;

        let mut includes: Vec<&str> = unit.imports.iter().map(|i| i.as_str()).collect();
        let mut moves = false;
        for field in &unit.record.fields {
            moves |= !unit.type_of(field)?.trivial;
        }
        if moves {
            includes.push("utility");
            includes.sort_unstable();
        }
        if !includes.is_empty() {
            for include in includes {
                writeln!(out, "#include <{include}>")?;
            }
            writeln!(out)?;
        }

        writeln!(out, "class {name} {{")?;
        self.write_members(&mut out, unit)?;
        writeln!(out, "public:")?;

        for ctor in unit.constructors.iter() {
            self.write_constructor(&mut out, unit, ctor)?;
        }
        writeln!(out)?;

        for member in unit.members.special_members {
            self.write_special_member(&mut out, name, *member)?;
        }
        writeln!(out)?;

        self.write_accessors(&mut out, unit)?;
        writeln!(out, "}};")?;
        writeln!(out)?;
        writeln!(out, "#endif // {guard}")?;

        Ok(out)
    }
}

/// Names declared in the class scope: the class itself, members and accessors.
fn class_scope_names(unit: &RecordUnit<'_>) -> Vec<String> {
    let mut names = vec![unit.name().to_string()];
    for slot in &unit.members.slots {
        let suffix = capitalize_first(&slot.field.name);
        names.push(slot.field.name.clone());
        names.push(format!("get{suffix}"));
        if slot.accessor.setter {
            names.push(format!("set{suffix}"));
        }
    }
    names
}

/// Spells a literal for a field of the given type.
fn literal_text(literal: &Literal, ty: &FieldType) -> String {
    let prim = ty.value_type().primitive();
    match literal {
        Literal::Absent => "std::nullopt".to_string(),
        Literal::Int(v) if *v == i64::MIN => "INT64_MIN".to_string(),
        Literal::Int(v) if prim == Some(PrimitiveType::Int64) => format!("{v}LL"),
        Literal::Int(v) => v.to_string(),
        Literal::Uint(v) if prim == Some(PrimitiveType::Uint64) => format!("{v}ULL"),
        Literal::Uint(v) => format!("{v}U"),
        Literal::Float(v) if prim == Some(PrimitiveType::Float) => format!("{}f", float_text(*v)),
        Literal::Float(v) => float_text(*v),
        Literal::Bool(v) => v.to_string(),
        Literal::Char(c) => quote_text(&c.to_string(), '\''),
        Literal::Str(s) => quote_text(s, '"'),
    }
}
