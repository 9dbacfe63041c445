//! Emission driver.
//!
//! Renders every record of a [`SchemaSet`] into memory first and only then
//! touches the output directory. Files are staged in a temporary directory
//! next to their destination, synced, and renamed into place; if a rename
//! or the final directory sync fails, artifacts already moved are rolled
//! back so a failed run leaves the output directory as it found it.

use crate::backend::{RenderOptions, Renderer, render, renderer_for};
use crate::error::CodegenError;
use crate::target::TargetLanguage;
use rayon::prelude::*;
use recgen_schema::{Record, SchemaSet, validate_schema_set};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// A rendered file held in memory until it is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifact {
    /// Name of the record it was rendered from.
    pub record: String,
    /// Target language.
    pub target: TargetLanguage,
    /// File name within the output directory.
    pub file_name: String,
    /// Source text.
    pub contents: String,
}

/// A file written to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenArtifact {
    /// Name of the record it was rendered from.
    pub record: String,
    /// Target language.
    pub target: TargetLanguage,
    /// Final path.
    pub path: PathBuf,
    /// Size in bytes.
    pub bytes: usize,
}

/// Returns the artifact file name of a record: `<RecordName>.<ext>`.
#[must_use]
pub fn artifact_name(record: &Record, target: TargetLanguage) -> String {
    format!("{}.{}", record.name, target.extension())
}

/// Builder for an [`Emitter`].
#[derive(Debug, Clone)]
pub struct EmitterBuilder {
    target: TargetLanguage,
    options: RenderOptions,
    parallel: bool,
}

impl EmitterBuilder {
    /// Creates a builder for C++ output with default layout, rendering in
    /// parallel.
    #[must_use]
    pub fn new() -> Self {
        Self {
            target: TargetLanguage::Cpp,
            options: RenderOptions::new(),
            parallel: true,
        }
    }

    /// Sets the target language.
    #[must_use]
    pub fn target(mut self, target: TargetLanguage) -> Self {
        self.target = target;
        self
    }

    /// Indents with the given number of spaces instead of tabs.
    #[must_use]
    pub fn indent(mut self, width: usize) -> Self {
        self.options = self.options.indent_width(width);
        self
    }

    /// Sets the width past which long constructs are wrapped.
    #[must_use]
    pub fn max_line_width(mut self, width: usize) -> Self {
        self.options = self.options.max_line_width(width);
        self
    }

    /// Enables or disables parallel rendering of records.
    #[must_use]
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Builds the emitter.
    #[must_use]
    pub fn build(self) -> Emitter {
        Emitter {
            target: self.target,
            renderer: renderer_for(self.target, &self.options),
            parallel: self.parallel,
        }
    }
}

impl Default for EmitterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders schema sets for one target language and writes the results.
pub struct Emitter {
    target: TargetLanguage,
    renderer: Box<dyn Renderer>,
    parallel: bool,
}

impl Emitter {
    /// Returns a builder with default settings.
    #[must_use]
    pub fn builder() -> EmitterBuilder {
        EmitterBuilder::new()
    }

    /// Creates an emitter for the target with default settings.
    #[must_use]
    pub fn new(target: TargetLanguage) -> Self {
        EmitterBuilder::new().target(target).build()
    }

    /// Returns the target language.
    #[must_use]
    pub fn target(&self) -> TargetLanguage {
        self.target
    }

    /// Renders one record into memory.
    ///
    /// # Errors
    /// Returns `CodegenError` if the record is malformed or uses a type the
    /// target cannot express.
    pub fn render_record(&self, record: &Record) -> Result<RenderedArtifact, CodegenError> {
        let contents = render(record, self.renderer.as_ref())?;
        Ok(RenderedArtifact {
            record: record.name.clone(),
            target: self.target,
            file_name: artifact_name(record, self.target),
            contents,
        })
    }

    /// Validates the set and renders every record into memory, in record
    /// order.
    ///
    /// # Errors
    /// Returns the first `CodegenError` encountered; nothing is rendered
    /// partially.
    pub fn render_all(&self, set: &SchemaSet) -> Result<Vec<RenderedArtifact>, CodegenError> {
        validate_schema_set(set)?;

        if self.parallel {
            set.records
                .par_iter()
                .map(|record| self.render_record(record))
                .collect()
        } else {
            set.iter().map(|record| self.render_record(record)).collect()
        }
    }

    /// Renders every record and writes the artifacts to `out_dir`.
    ///
    /// # Errors
    /// Returns `CodegenError` if rendering or writing fails. On failure no
    /// artifact is left in `out_dir`.
    pub fn emit(
        &self,
        set: &SchemaSet,
        out_dir: &Path,
    ) -> Result<Vec<WrittenArtifact>, CodegenError> {
        let artifacts = self.render_all(set)?;
        write_artifacts(out_dir, &artifacts)
    }
}

impl std::fmt::Debug for Emitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter")
            .field("target", &self.target)
            .field("parallel", &self.parallel)
            .finish()
    }
}

/// A destination that was replaced, kept so it can be restored.
struct Placed {
    dest: PathBuf,
    backup: Option<PathBuf>,
}

/// Writes rendered artifacts into `out_dir` all-or-nothing.
///
/// # Errors
/// Returns `CodegenError::Write` naming the file that could not be staged or
/// moved into place, or `CodegenError::Generation` if two artifacts share a
/// file name.
pub fn write_artifacts(
    out_dir: &Path,
    artifacts: &[RenderedArtifact],
) -> Result<Vec<WrittenArtifact>, CodegenError> {
    let mut seen = HashSet::with_capacity(artifacts.len());
    for artifact in artifacts {
        if !seen.insert(artifact.file_name.as_str()) {
            return Err(CodegenError::generation(format!(
                "more than one artifact named '{}'",
                artifact.file_name
            )));
        }
    }
    if artifacts.is_empty() {
        return Ok(Vec::new());
    }

    fs::create_dir_all(out_dir).map_err(|e| CodegenError::write(out_dir, e))?;
    let staging = tempfile::Builder::new()
        .prefix(".recgen-")
        .tempdir_in(out_dir)
        .map_err(|e| CodegenError::write(out_dir, e))?;
    tracing::debug!(staging = %staging.path().display(), "staging artifacts");

    for artifact in artifacts {
        stage_file(&staging.path().join(&artifact.file_name), &artifact.contents)?;
    }

    commit(staging.path(), out_dir, artifacts, sync_dir)?;

    Ok(artifacts
        .iter()
        .map(|artifact| {
            let path = out_dir.join(&artifact.file_name);
            tracing::info!(
                record = %artifact.record,
                target = %artifact.target,
                path = %path.display(),
                "wrote artifact"
            );
            WrittenArtifact {
                record: artifact.record.clone(),
                target: artifact.target,
                path,
                bytes: artifact.contents.len(),
            }
        })
        .collect())
}

/// Moves every staged artifact into `out_dir` and makes the renames durable.
///
/// If a move or the final directory sync fails, every file already moved is
/// removed and the files it replaced are restored. This runs while the
/// staging directory, which holds those backups, is still alive.
fn commit<S>(
    staging: &Path,
    out_dir: &Path,
    artifacts: &[RenderedArtifact],
    sync: S,
) -> Result<(), CodegenError>
where
    S: FnOnce(&Path) -> Result<(), CodegenError>,
{
    let mut placed: Vec<Placed> = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        match place(staging, out_dir, &artifact.file_name) {
            Ok(entry) => placed.push(entry),
            Err(err) => {
                tracing::error!(
                    file = %artifact.file_name,
                    error = %err,
                    "rolling back emitted artifacts"
                );
                roll_back(&placed);
                return Err(err);
            }
        }
    }

    if let Err(err) = sync(out_dir) {
        tracing::error!(error = %err, "rolling back emitted artifacts");
        roll_back(&placed);
        return Err(err);
    }
    Ok(())
}

fn stage_file(path: &Path, contents: &str) -> Result<(), CodegenError> {
    let mut file = File::create(path).map_err(|e| CodegenError::write(path, e))?;
    file.write_all(contents.as_bytes())
        .map_err(|e| CodegenError::write(path, e))?;
    file.sync_all().map_err(|e| CodegenError::write(path, e))
}

fn place(staging: &Path, out_dir: &Path, file_name: &str) -> Result<Placed, CodegenError> {
    let staged = staging.join(file_name);
    let dest = out_dir.join(file_name);

    if dest.is_dir() {
        let in_the_way = std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            "a directory occupies the artifact path",
        );
        return Err(CodegenError::write(&dest, in_the_way));
    }

    let backup = if dest.exists() {
        let backup = staging.join(format!("{file_name}.previous"));
        fs::rename(&dest, &backup).map_err(|e| CodegenError::write(&dest, e))?;
        Some(backup)
    } else {
        None
    };

    if let Err(e) = fs::rename(&staged, &dest) {
        if let Some(backup) = &backup {
            let _ = fs::rename(backup, &dest);
        }
        return Err(CodegenError::write(&dest, e));
    }
    Ok(Placed { dest, backup })
}

fn roll_back(placed: &[Placed]) {
    for entry in placed.iter().rev() {
        let _ = fs::remove_file(&entry.dest);
        if let Some(backup) = &entry.backup {
            let _ = fs::rename(backup, &entry.dest);
        }
    }
}

#[cfg(unix)]
fn sync_dir(path: &Path) -> Result<(), CodegenError> {
    File::open(path)
        .and_then(|dir| dir.sync_all())
        .map_err(|e| CodegenError::write(path, e))
}

#[cfg(not(unix))]
fn sync_dir(_path: &Path) -> Result<(), CodegenError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use recgen_schema::{Field, FieldType};
    use tempfile::TempDir;

    fn person() -> Record {
        Record::new("Person", "person.xml")
            .with_field(Field::new("name", FieldType::parse("string")))
            .with_field(Field::new("age", FieldType::parse("int32")))
            .with_field(Field::new("nickname", FieldType::parse("string")).optional())
            .with_field(Field::new("isLegalToDrink", FieldType::parse("bool")))
    }

    fn foo() -> Record {
        Record::new("Foo", "class.xml")
            .with_field(Field::new("meow", FieldType::parse("int64")).immutable())
            .with_field(Field::new("hello", FieldType::parse("string")))
            .with_field(Field::new("isTrue", FieldType::parse("bool")))
    }

    fn broken() -> Record {
        Record::new("Order", "order.xml")
            .with_field(Field::new("owner", FieldType::parse("Customer")))
    }

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(dir)
            .expect("Failed to read dir")
            .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_artifact_name() {
        assert_eq!(artifact_name(&person(), TargetLanguage::Cpp), "Person.h");
        assert_eq!(artifact_name(&person(), TargetLanguage::Kotlin), "Person.kt");
        assert_eq!(artifact_name(&person(), TargetLanguage::Python), "Person.py");
        assert_eq!(artifact_name(&person(), TargetLanguage::Rust), "Person.rs");
    }

    #[test]
    fn test_emit_writes_one_file_per_record() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let set: SchemaSet = vec![person(), foo()].into_iter().collect();

        let written = Emitter::new(TargetLanguage::Cpp)
            .emit(&set, dir.path())
            .expect("Failed to emit");

        assert_eq!(written.len(), 2);
        assert_eq!(written[0].path, dir.path().join("Person.h"));
        assert_eq!(file_names(dir.path()), vec!["Foo.h", "Person.h"]);

        let contents = fs::read_to_string(dir.path().join("Person.h")).expect("Failed to read");
        assert_eq!(contents.len(), written[0].bytes);
        assert!(contents.contains("class Person {"));
    }

    #[test]
    fn test_nothing_written_when_a_record_fails() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let set: SchemaSet = vec![person(), broken(), foo()].into_iter().collect();

        let err = Emitter::new(TargetLanguage::Python)
            .emit(&set, dir.path())
            .unwrap_err();

        assert!(matches!(err, CodegenError::UnsupportedType { .. }));
        assert!(file_names(dir.path()).is_empty());
    }

    #[test]
    fn test_invalid_set_rejected_before_rendering() {
        let set: SchemaSet = vec![person(), person()].into_iter().collect();
        let err = Emitter::new(TargetLanguage::Kotlin).render_all(&set).unwrap_err();
        assert!(matches!(err, CodegenError::Schema(_)));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let set: SchemaSet = vec![person(), foo()].into_iter().collect();
        for target in TargetLanguage::ALL {
            let parallel = Emitter::builder()
                .target(target)
                .build()
                .render_all(&set)
                .expect("Failed to render");
            let sequential = Emitter::builder()
                .target(target)
                .parallel(false)
                .build()
                .render_all(&set)
                .expect("Failed to render");

            assert_eq!(parallel, sequential);
            assert_eq!(parallel[0].record, "Person");
            assert_eq!(parallel[1].record, "Foo");
        }
    }

    #[test]
    fn test_builder_layout_options() {
        let set: SchemaSet = vec![person()].into_iter().collect();
        let artifacts = Emitter::builder()
            .target(TargetLanguage::Cpp)
            .indent(2)
            .max_line_width(40)
            .build()
            .render_all(&set)
            .expect("Failed to render");

        assert!(artifacts[0].contents.contains("\n  Person(\n    std::string name,\n"));
    }

    #[test]
    fn test_emit_replaces_existing_files() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(dir.path().join("Foo.rs"), "stale").expect("Failed to write");
        let set: SchemaSet = vec![foo()].into_iter().collect();

        Emitter::new(TargetLanguage::Rust)
            .emit(&set, dir.path())
            .expect("Failed to emit");

        let contents = fs::read_to_string(dir.path().join("Foo.rs")).expect("Failed to read");
        assert!(contents.contains("pub struct Foo"));
        assert_eq!(file_names(dir.path()), vec!["Foo.rs"]);
    }

    #[test]
    fn test_emit_creates_missing_out_dir() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let out = dir.path().join("nested").join("out");
        let set: SchemaSet = vec![foo()].into_iter().collect();

        Emitter::new(TargetLanguage::Kotlin)
            .emit(&set, &out)
            .expect("Failed to emit");
        assert!(out.join("Foo.kt").exists());
    }

    #[test]
    fn test_duplicate_artifact_names_rejected() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let artifact = RenderedArtifact {
            record: "Foo".to_string(),
            target: TargetLanguage::Cpp,
            file_name: "Foo.h".to_string(),
            contents: String::new(),
        };

        let err = write_artifacts(dir.path(), &[artifact.clone(), artifact]).unwrap_err();
        assert!(matches!(err, CodegenError::Generation { .. }));
        assert!(file_names(dir.path()).is_empty());
    }

    #[test]
    fn test_failed_placement_rolls_back() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(dir.path().join("A.h"), "previous").expect("Failed to write");
        // a directory in the way makes placing the second artifact fail
        fs::create_dir(dir.path().join("B.h")).expect("Failed to create dir");
        fs::write(dir.path().join("B.h").join("keep"), "x").expect("Failed to write");

        let artifacts = vec![
            RenderedArtifact {
                record: "A".to_string(),
                target: TargetLanguage::Cpp,
                file_name: "A.h".to_string(),
                contents: "a".to_string(),
            },
            RenderedArtifact {
                record: "B".to_string(),
                target: TargetLanguage::Cpp,
                file_name: "B.h".to_string(),
                contents: "b".to_string(),
            },
        ];

        let err = write_artifacts(dir.path(), &artifacts).unwrap_err();
        assert!(matches!(err, CodegenError::Write { ref path, .. } if path.ends_with("B.h")));

        let restored = fs::read_to_string(dir.path().join("A.h")).expect("Failed to read");
        assert_eq!(restored, "previous");
        assert!(dir.path().join("B.h").join("keep").exists());
        assert_eq!(file_names(dir.path()), vec!["A.h", "B.h"]);
    }

    #[test]
    fn test_failed_directory_sync_rolls_back() {
        let out = TempDir::new().expect("Failed to create temp dir");
        fs::write(out.path().join("A.h"), "previous").expect("Failed to write");
        let staging = tempfile::Builder::new()
            .prefix(".recgen-")
            .tempdir_in(out.path())
            .expect("Failed to create staging dir");

        let artifacts: Vec<_> = ["A", "B"]
            .iter()
            .map(|name| RenderedArtifact {
                record: (*name).to_string(),
                target: TargetLanguage::Cpp,
                file_name: format!("{name}.h"),
                contents: "new".to_string(),
            })
            .collect();
        for artifact in &artifacts {
            stage_file(&staging.path().join(&artifact.file_name), &artifact.contents)
                .expect("Failed to stage");
        }

        let err = commit(staging.path(), out.path(), &artifacts, |dir| {
            Err(CodegenError::write(dir, std::io::Error::other("sync failed")))
        })
        .unwrap_err();
        assert!(matches!(err, CodegenError::Write { .. }));

        let restored = fs::read_to_string(out.path().join("A.h")).expect("Failed to read");
        assert_eq!(restored, "previous");
        assert!(!out.path().join("B.h").exists());
    }
}
