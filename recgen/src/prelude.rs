//! Prelude module for convenient imports.
//!
//! ```ignore
//! use recgen::prelude::*;
//! ```

// Schema types
pub use recgen_schema::{
    Field, FieldType, Literal, Mutability, Optionality, PrimitiveType, Record, SchemaSet,
};
pub use recgen_schema::{load_schema, load_schema_file, validate_schema_set};

// Generation types
pub use recgen_codegen::{
    CodegenError, Emitter, EmitterBuilder, RenderOptions, RenderedArtifact, Renderer,
    TargetLanguage, WrittenArtifact, write_artifacts,
};
