//! # RecGen Codegen
//!
//! Value-type class generation from record schemas.
//!
//! This crate provides:
//! - Type mapping from schema types onto target language spellings
//! - Constructor synthesis and member planning shared by every backend
//! - Renderers for C++, Kotlin, Python and Rust
//! - An emission driver that writes all artifacts or none

pub mod backend;
pub mod constructors;
pub mod driver;
pub mod error;
pub mod members;
pub mod target;
pub mod types;

pub use backend::{RecordUnit, RenderOptions, Renderer, render, renderer_for};
pub use constructors::{ConstructorKind, ConstructorSet, ConstructorSpec, Initializer, synthesize};
pub use driver::{
    Emitter, EmitterBuilder, RenderedArtifact, WrittenArtifact, artifact_name, write_artifacts,
};
pub use error::CodegenError;
pub use members::{Accessor, MemberPlan, MemberSlot, SpecialMember, Storage, plan_members};
pub use target::TargetLanguage;
pub use types::{Import, TypeSpelling, TypeVocabulary, map_field, map_type};

use recgen_schema::SchemaSet;
use std::path::Path;

/// Renders every record of a schema set for a target and writes the
/// artifacts to `out_dir`, using default layout options.
///
/// # Arguments
/// * `set` - Records to generate
/// * `out_dir` - Output directory, created if missing
/// * `target` - Target language
///
/// # Errors
/// Returns `CodegenError` if any record fails to render or any artifact
/// fails to write. Nothing is written in that case.
pub fn emit(
    set: &SchemaSet,
    out_dir: &Path,
    target: TargetLanguage,
) -> Result<Vec<WrittenArtifact>, CodegenError> {
    Emitter::new(target).emit(set, out_dir)
}

/// Generates source text for every record of a schema string.
///
/// # Arguments
/// * `xml` - Record schema content
/// * `target` - Target language
///
/// # Returns
/// The rendered artifacts, in record order.
///
/// # Errors
/// Returns `CodegenError` if parsing, validation or rendering fails.
pub fn generate_from_xml(
    xml: &str,
    target: TargetLanguage,
) -> Result<Vec<RenderedArtifact>, CodegenError> {
    let set = recgen_schema::parse_schema(xml, "<memory>")?;
    Emitter::new(target).render_all(&set)
}

/// Generates source text for every record of a schema file.
///
/// # Errors
/// Returns `CodegenError` if reading, parsing, validation or rendering fails.
pub fn generate_from_file(
    path: &Path,
    target: TargetLanguage,
) -> Result<Vec<RenderedArtifact>, CodegenError> {
    let set = recgen_schema::parse_schema_file(path)?;
    Emitter::new(target).render_all(&set)
}
