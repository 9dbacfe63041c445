//! # RecGen
//!
//! Schema-driven generator of value-type classes.
//!
//! A record schema lists named, typed fields together with their mutability,
//! presence and defaults. RecGen turns each record into a class for C++,
//! Kotlin, Python or Rust carrying the right constructors, accessors and
//! value semantics for that language.
//!
//! ## Quick Start
//!
//! ```ignore
//! use recgen::prelude::*;
//!
//! let set = load_schema_file(Path::new("person.xml"))?;
//! let written = Emitter::builder()
//!     .target(TargetLanguage::Cpp)
//!     .build()
//!     .emit(&set, Path::new("generated"))?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`schema`] - Record IR, XML loading and validation
//! - [`codegen`] - Type mapping, constructor synthesis, renderers and emission
//! - [`cli`] - The `recgen` command line driver

pub mod cli;
pub mod prelude;

/// Record IR, XML loading and validation.
pub mod schema {
    pub use recgen_schema::*;
}

/// Type mapping, constructor synthesis, renderers and emission.
pub mod codegen {
    pub use recgen_codegen::*;
}

pub use recgen_codegen::{CodegenError, Emitter, EmitterBuilder, TargetLanguage};
pub use recgen_schema::{ParseError, SchemaError, SchemaSet};
