//! Command line driver.
//!
//! Resolves input files and directories into schema files, loads them into a
//! single [`SchemaSet`], renders every requested target and writes all
//! artifacts in one batch.

use anyhow::{Context, Result, bail};
use clap::Parser;
use recgen_codegen::{Emitter, TargetLanguage, WrittenArtifact, write_artifacts};
use recgen_schema::{SchemaSet, load_schema_file};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Generate value-type classes from record schemas.
#[derive(Parser, Debug, Clone)]
#[command(name = "recgen", version, about, long_about = None)]
pub struct Cli {
    /// Schema files, or directories to scan for schema files
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Languages to generate (cpp, kotlin, python, rust)
    #[arg(short, long = "target", required = true, num_args = 1..)]
    pub targets: Vec<TargetLanguage>,

    /// Output directory
    #[arg(short, long, default_value = "./recgen_output")]
    pub output: PathBuf,

    /// Scan directories recursively
    #[arg(short, long)]
    pub recursive: bool,

    /// Maximum directory depth when scanning recursively
    #[arg(short, long, default_value_t = 3)]
    pub depth: usize,

    /// Extension of schema files found in directories
    #[arg(long, default_value = "xml")]
    pub extension: String,

    /// Render records one at a time instead of in parallel
    #[arg(long)]
    pub sequential: bool,

    /// Indent with this many spaces instead of tabs
    #[arg(long)]
    pub indent_width: Option<usize>,

    /// Wrap long constructs past this width
    #[arg(long, default_value_t = recgen_codegen::backend::DEFAULT_MAX_LINE_WIDTH)]
    pub max_line_width: usize,
}

/// Runs the generator with parsed arguments.
///
/// # Errors
/// Returns an error if an input cannot be resolved or loaded, or if any
/// target fails to render or write. Nothing is written in that case.
pub fn run(cli: &Cli) -> Result<Vec<WrittenArtifact>> {
    let files = collect_inputs(&cli.inputs, cli.recursive, cli.depth, &cli.extension)?;
    if files.is_empty() {
        bail!("no schema files with extension '{}' found", cli.extension);
    }
    tracing::info!(files = files.len(), "loading schemas");

    let set = load_all(&files)?;

    let mut artifacts = Vec::new();
    for target in dedup_targets(&cli.targets) {
        let mut builder = Emitter::builder()
            .target(target)
            .max_line_width(cli.max_line_width)
            .parallel(!cli.sequential);
        if let Some(width) = cli.indent_width {
            builder = builder.indent(width);
        }
        let rendered = builder
            .build()
            .render_all(&set)
            .with_context(|| format!("failed to generate {target} sources"))?;
        artifacts.extend(rendered);
    }

    let written = write_artifacts(&cli.output, &artifacts)
        .with_context(|| format!("failed to write to '{}'", cli.output.display()))?;
    tracing::info!(
        artifacts = written.len(),
        output = %cli.output.display(),
        "generation complete"
    );
    Ok(written)
}

/// Resolves inputs into the list of schema files to load.
///
/// Files are taken as given. Directories contribute the files carrying
/// `extension`; subdirectories are entered only when `recursive` is set, at
/// most `depth` levels deep counting the input directory itself. Symbolic
/// links inside directories are skipped.
///
/// # Errors
/// Returns an error if an input does not exist, a directory cannot be read,
/// or a recursive scan goes deeper than `depth`.
pub fn collect_inputs(
    inputs: &[PathBuf],
    recursive: bool,
    depth: usize,
    extension: &str,
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_file() {
            files.push(input.clone());
        } else if input.is_dir() {
            scan_dir(input, recursive, depth, extension, &mut files)?;
        } else {
            bail!("input '{}' does not exist", input.display());
        }
    }

    // the same file named twice, directly or through a directory, loads once
    let mut seen = HashSet::with_capacity(files.len());
    let mut unique = Vec::with_capacity(files.len());
    for file in files {
        let canonical = fs::canonicalize(&file)
            .with_context(|| format!("failed to resolve '{}'", file.display()))?;
        if seen.insert(canonical) {
            unique.push(file);
        }
    }
    Ok(unique)
}

fn scan_dir(
    dir: &Path,
    recursive: bool,
    depth: usize,
    extension: &str,
    files: &mut Vec<PathBuf>,
) -> Result<()> {
    if depth == 0 {
        bail!("maximum directory depth exceeded at '{}'", dir.display());
    }

    let mut entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read directory '{}'", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("failed to read directory '{}'", dir.display()))?;
    entries.sort();

    for path in entries {
        let metadata = fs::symlink_metadata(&path)
            .with_context(|| format!("failed to inspect '{}'", path.display()))?;

        if metadata.file_type().is_symlink() {
            tracing::warn!(path = %path.display(), "skipping symlink");
        } else if metadata.is_dir() {
            if recursive {
                scan_dir(&path, recursive, depth - 1, extension, files)?;
            }
        } else if path.extension().is_some_and(|ext| ext == extension) {
            files.push(path);
        }
    }
    Ok(())
}

fn load_all(files: &[PathBuf]) -> Result<SchemaSet> {
    let mut set = SchemaSet::new();
    for file in files {
        let loaded = load_schema_file(file)
            .with_context(|| format!("failed to load '{}'", file.display()))?;
        tracing::debug!(path = %file.display(), records = loaded.len(), "loaded schema");
        set.extend(loaded);
    }
    Ok(set)
}

fn dedup_targets(targets: &[TargetLanguage]) -> Vec<TargetLanguage> {
    let mut unique = Vec::with_capacity(targets.len());
    for target in targets {
        if !unique.contains(target) {
            unique.push(*target);
        }
    }
    unique
}
