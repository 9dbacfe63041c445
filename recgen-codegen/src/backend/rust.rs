//! Rust module rendering.
//!
//! Unlike the text backends, Rust output is built as a token stream with
//! `quote` and pretty-printed through `syn` and `prettyplease`, so the
//! result is always syntactically valid and consistently formatted.

use super::{RecordUnit, Renderer, banner, reject_clashes};
use crate::constructors::{ConstructorKind, ConstructorSpec, Initializer};
use crate::error::CodegenError;
use crate::target::TargetLanguage;
use crate::types::{TypeSpelling, TypeVocabulary};
use proc_macro2::{Ident, Literal as LitToken, Span, TokenStream};
use quote::{format_ident, quote};
use recgen_schema::{FieldType, Literal, PrimitiveType, to_snake_case};

/// Identifiers that cannot be written as raw identifiers.
const NON_RAW: &[&str] = &["self", "Self", "super", "crate", "_"];

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut",
    "pub", "ref", "return", "static", "struct", "trait", "true", "type", "unsafe", "use",
    "where", "while", "abstract", "become", "box", "do", "final", "gen", "macro", "override",
    "priv", "try", "typeof", "unsized", "virtual", "yield",
];

/// Renders records as Rust modules.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustRenderer;

impl RustRenderer {
    /// Creates a Rust renderer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn constructor(
        &self,
        unit: &RecordUnit<'_>,
        record: &Ident,
        ctor: &ConstructorSpec<'_>,
    ) -> Result<TokenStream, CodegenError> {
        let params = ctor
            .params()
            .map(|field| -> Result<TokenStream, CodegenError> {
                let name = field_ident(&field.name);
                let ty = type_tokens(unit.type_of(field)?)?;
                Ok(quote! { #name: #ty })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let inits = ctor.inits.iter().map(|init| {
            let name = field_ident(&init.field.name);
            match &init.init {
                Initializer::Param => quote! { #name },
                Initializer::Value(literal) => {
                    let value = literal_tokens(literal, &init.field.ty);
                    quote! { #name: #value }
                }
                Initializer::Zero => quote! { #name: Default::default() },
            }
        });

        let body = quote! { Self { #(#inits),* } };
        let tokens = match ctor.kind {
            ConstructorKind::Default => quote! {
                impl Default for #record {
                    fn default() -> Self {
                        #body
                    }
                }
            },
            ConstructorKind::Minimal | ConstructorKind::AllFields => quote! {
                #[must_use]
                pub fn new(#(#params),*) -> Self {
                    #body
                }
            },
            ConstructorKind::Full => quote! {
                #[must_use]
                pub fn with_all(#(#params),*) -> Self {
                    #body
                }
            },
        };
        Ok(tokens)
    }

    fn conversion(
        &self,
        unit: &RecordUnit<'_>,
        record: &Ident,
        ctor: &ConstructorSpec<'_>,
    ) -> Result<Option<TokenStream>, CodegenError> {
        if !ctor.is_converting() {
            return Ok(None);
        }
        let Some(field) = ctor.params().next() else {
            return Ok(None);
        };

        let ty = type_tokens(unit.type_of(field)?)?;
        let call = match ctor.kind {
            ConstructorKind::Full => quote! { Self::with_all(value) },
            _ => quote! { Self::new(value) },
        };
        Ok(Some(quote! {
            impl From<#ty> for #record {
                fn from(value: #ty) -> Self {
                    #call
                }
            }
        }))
    }

    fn accessors(&self, unit: &RecordUnit<'_>) -> Result<Vec<TokenStream>, CodegenError> {
        let mut accessors = Vec::with_capacity(unit.members.slots.len());
        for slot in &unit.members.slots {
            let name = field_ident(&slot.field.name);
            let spelling = unit.type_of(slot.field)?;
            let ty = type_tokens(spelling)?;

            let read = if spelling.trivial {
                quote! { self.#name }
            } else {
                quote! { self.#name.clone() }
            };
            accessors.push(quote! {
                #[must_use]
                pub fn #name(&self) -> #ty {
                    #read
                }
            });

            if slot.accessor.setter {
                let setter = format_ident!("set_{}", to_snake_case(&slot.field.name));
                accessors.push(quote! {
                    pub fn #setter(&mut self, value: #ty) {
                        self.#name = value;
                    }
                });
            }
        }
        Ok(accessors)
    }
}

impl TypeVocabulary for RustRenderer {
    fn primitive(&self, prim: PrimitiveType) -> Option<TypeSpelling> {
        let text = match prim {
            PrimitiveType::Int8 => "i8",
            PrimitiveType::Int16 => "i16",
            PrimitiveType::Int32 => "i32",
            PrimitiveType::Int64 => "i64",
            PrimitiveType::Uint8 => "u8",
            PrimitiveType::Uint16 => "u16",
            PrimitiveType::Uint32 => "u32",
            PrimitiveType::Uint64 => "u64",
            PrimitiveType::Float => "f32",
            PrimitiveType::Double => "f64",
            PrimitiveType::Bool => "bool",
            PrimitiveType::Char => "char",
            PrimitiveType::String => "String",
        };
        Some(TypeSpelling::new(text, prim.is_trivial()))
    }

    fn optional(&self, inner: &TypeSpelling) -> TypeSpelling {
        let mut spelling = TypeSpelling::new(format!("Option<{inner}>"), inner.trivial);
        spelling.imports = inner.imports.clone();
        spelling
    }
}

impl Renderer for RustRenderer {
    fn target(&self) -> TargetLanguage {
        TargetLanguage::Rust
    }

    fn render_unit(&self, unit: &RecordUnit<'_>) -> Result<String, CodegenError> {
        reject_clashes(unit, self.target(), method_names(unit))?;
        let record = escaped_ident(unit.name());

        let mut fields = Vec::with_capacity(unit.members.slots.len());
        for slot in &unit.members.slots {
            let name = field_ident(&slot.field.name);
            let ty = type_tokens(unit.type_of(slot.field)?)?;
            fields.push(quote! { #name: #ty });
        }

        let mut default_impl = None;
        let mut constructors = Vec::new();
        let mut conversions = Vec::new();
        for ctor in unit.constructors.iter() {
            let tokens = self.constructor(unit, &record, ctor)?;
            if ctor.kind == ConstructorKind::Default {
                default_impl = Some(tokens);
            } else {
                constructors.push(tokens);
            }
            conversions.extend(self.conversion(unit, &record, ctor)?);
        }
        let accessors = self.accessors(unit)?;

        let tokens = quote! {
            #[derive(Debug, Clone, PartialEq)]
            pub struct #record {
                #(#fields),*
            }

            #default_impl

            impl #record {
                #(#constructors)*

                #(#accessors)*
            }

            #(#conversions)*
        };

        let file: syn::File = syn::parse2(tokens).map_err(|e| {
            CodegenError::generation(format!("invalid Rust for '{}': {e}", unit.name()))
        })?;

        let mut out = banner("//", unit.record);
        out.push('\n');
        out.push_str(&prettyplease::unparse(&file));
        Ok(out)
    }
}

/// Names of the inherent methods: constructors, getters and setters.
fn method_names(unit: &RecordUnit<'_>) -> Vec<String> {
    let mut names = vec!["new".to_string(), "with_all".to_string()];
    for slot in &unit.members.slots {
        names.push(field_ident(&slot.field.name).to_string());
        if slot.accessor.setter {
            names.push(format!("set_{}", to_snake_case(&slot.field.name)));
        }
    }
    names
}

/// Creates the identifier for a field, escaping keywords.
fn field_ident(name: &str) -> Ident {
    escaped_ident(&to_snake_case(name))
}

fn escaped_ident(name: &str) -> Ident {
    if NON_RAW.contains(&name) {
        format_ident!("{}_", name)
    } else if KEYWORDS.contains(&name) {
        Ident::new_raw(name, Span::call_site())
    } else {
        Ident::new(name, Span::call_site())
    }
}

fn type_tokens(spelling: &TypeSpelling) -> Result<syn::Type, CodegenError> {
    syn::parse_str(&spelling.text)
        .map_err(|e| CodegenError::generation(format!("invalid Rust type '{spelling}': {e}")))
}

fn literal_tokens(literal: &Literal, ty: &FieldType) -> TokenStream {
    let value = match literal {
        Literal::Absent => return quote! { None },
        Literal::Int(v) if *v < 0 => {
            let magnitude = LitToken::u64_unsuffixed(v.unsigned_abs());
            quote! { -#magnitude }
        }
        Literal::Int(v) => {
            let lit = LitToken::i64_unsuffixed(*v);
            quote! { #lit }
        }
        Literal::Uint(v) => {
            let lit = LitToken::u64_unsuffixed(*v);
            quote! { #lit }
        }
        Literal::Float(v) if ty.value_type().primitive() == Some(PrimitiveType::Float) => {
            let lit = LitToken::f32_unsuffixed(*v as f32);
            quote! { #lit }
        }
        Literal::Float(v) => {
            let lit = LitToken::f64_unsuffixed(*v);
            quote! { #lit }
        }
        Literal::Bool(v) => quote! { #v },
        Literal::Char(c) => {
            let lit = LitToken::character(*c);
            quote! { #lit }
        }
        Literal::Str(s) => {
            let lit = LitToken::string(s);
            quote! { String::from(#lit) }
        }
    };

    if ty.is_optional() {
        quote! { Some(#value) }
    } else {
        value
    }
}
