//! Converting pages on disk: resolving the paired code-behind and output
//! paths, running the pipeline per file, and keeping a batch going when
//! individual files fail.

use crate::assemble;
use crate::codebehind::{self, CodeBehind, EventTable, FieldSet};
use crate::config::{Config, MARKUP_EXTENSION};
use crate::helpers;
use crate::transform;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Progress events emitted while converting a batch.
#[derive(Debug, Clone)]
pub enum ConvertProgress {
    Started { total: usize },
    /// The code-behind exists but could not be read; converted without it.
    CodeBehindWarning { path: PathBuf, error: String },
    Converted {
        input: PathBuf,
        output: PathBuf,
        fields: usize,
        events: usize,
    },
    /// Dry run: the document that would have been written.
    Rendered { input: PathBuf, output: PathBuf, content: String },
    Failed(ConversionError),
    Finished {
        converted: usize,
        failed: usize,
        duration_seconds: f64,
    },
}

pub trait ConvertReporter: Send + Sync {
    fn report(&self, progress: ConvertProgress);
}

pub struct NoopReporter;

impl ConvertReporter for NoopReporter {
    fn report(&self, _progress: ConvertProgress) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionErrorKind {
    UnsupportedExtension,
    ReadFailure(String),
    WriteFailure(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionError {
    pub path: PathBuf,
    pub kind: ConversionErrorKind,
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let path = self.path.display();
        match &self.kind {
            ConversionErrorKind::UnsupportedExtension => {
                write!(f, "Skipping {path}: not a .{MARKUP_EXTENSION} file")
            }
            ConversionErrorKind::ReadFailure(e) => write!(f, "Could not read {path}: {e}"),
            ConversionErrorKind::WriteFailure(e) => write!(f, "Could not write {path}: {e}"),
        }
    }
}

impl std::error::Error for ConversionError {}

/// The output of one page conversion.
#[derive(Debug, Clone)]
pub struct ConversionResult {
    pub output_text: String,
    pub fields: FieldSet,
    pub events: EventTable,
}

/// Converts page markup and its optional code-behind text. Pure: no I/O.
pub fn convert_source(
    markup: &str,
    code_behind: Option<&str>,
    route: &str,
    config: &Config,
) -> ConversionResult {
    let CodeBehind { events, fields } = code_behind.map(codebehind::extract).unwrap_or_default();
    let mut fields: FieldSet = fields.into_iter().collect();

    let document = transform::transform(markup, &events, &mut fields, &config.wrapper_tags);
    let output_text = assemble::assemble(&document.to_string(), &fields, &events, route, config);

    ConversionResult {
        output_text,
        fields,
        events,
    }
}

pub fn code_behind_path(input: &Path, config: &Config) -> PathBuf {
    input.with_file_name(format!(
        "{}.{}",
        helpers::file_stem(input),
        config.code_behind_extension
    ))
}

pub fn output_path(input: &Path, config: &Config) -> PathBuf {
    let stem = helpers::file_stem(input);
    let stem = if config.capitalize_file_name {
        helpers::capitalize_first(&stem)
    } else {
        stem
    };
    input.with_file_name(format!("{stem}.{}", config.output_extension))
}

fn read_code_behind<R: ConvertReporter>(path: &Path, reporter: &R) -> Option<String> {
    if !path.exists() {
        log::debug!("No code-behind at {}", path.display());
        return None;
    }
    match fs::read_to_string(path) {
        Ok(contents) => Some(contents),
        Err(e) => {
            reporter.report(ConvertProgress::CodeBehindWarning {
                path: path.to_path_buf(),
                error: e.to_string(),
            });
            None
        }
    }
}

/// Converts one page and writes (or, on a dry run, renders) the result.
/// Returns the output path.
pub fn convert_file<R: ConvertReporter>(
    input: &Path,
    config: &Config,
    dry_run: bool,
    reporter: &R,
) -> Result<PathBuf, ConversionError> {
    if !helpers::has_extension(input, MARKUP_EXTENSION) {
        return Err(ConversionError {
            path: input.to_path_buf(),
            kind: ConversionErrorKind::UnsupportedExtension,
        });
    }

    let markup = fs::read_to_string(input).map_err(|e| ConversionError {
        path: input.to_path_buf(),
        kind: ConversionErrorKind::ReadFailure(e.to_string()),
    })?;
    let code_behind = read_code_behind(&code_behind_path(input, config), reporter);

    let route = assemble::route_for(input);
    let result = convert_source(&markup, code_behind.as_deref(), &route, config);
    let output = output_path(input, config);

    if dry_run {
        reporter.report(ConvertProgress::Rendered {
            input: input.to_path_buf(),
            output: output.clone(),
            content: result.output_text,
        });
        return Ok(output);
    }

    fs::write(&output, &result.output_text).map_err(|e| ConversionError {
        path: output.clone(),
        kind: ConversionErrorKind::WriteFailure(e.to_string()),
    })?;

    reporter.report(ConvertProgress::Converted {
        input: input.to_path_buf(),
        output: output.clone(),
        fields: result.fields.len(),
        events: result.events.len(),
    });
    Ok(output)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub converted: usize,
    pub failed: usize,
}

/// Converts every input in order. A failing file is reported and skipped.
pub fn convert_files<R: ConvertReporter>(
    inputs: &[PathBuf],
    config: &Config,
    dry_run: bool,
    reporter: &R,
) -> BatchSummary {
    let start = Instant::now();
    let mut summary = BatchSummary::default();
    reporter.report(ConvertProgress::Started { total: inputs.len() });

    for input in inputs {
        match convert_file(input, config, dry_run, reporter) {
            Ok(_) => summary.converted += 1,
            Err(e) => {
                log::debug!("Conversion failed: {e}");
                summary.failed += 1;
                reporter.report(ConvertProgress::Failed(e));
            }
        }
    }

    reporter.report(ConvertProgress::Finished {
        converted: summary.converted,
        failed: summary.failed,
        duration_seconds: start.elapsed().as_secs_f64(),
    });
    summary
}

/// Expands directories into the `.aspx` files below them, sorted. Other
/// paths are passed through untouched so that missing files get reported.
pub fn collect_inputs(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut inputs = Vec::new();
    for path in paths {
        if path.is_dir() {
            collect_dir(path, &mut inputs);
        } else {
            inputs.push(path.clone());
        }
    }
    inputs
}

fn collect_dir(dir: &Path, inputs: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("Could not read directory {}: {}", dir.display(), e);
            return;
        }
    };
    let mut paths = entries
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .collect::<Vec<_>>();
    paths.sort();
    for path in paths {
        if path.is_dir() {
            collect_dir(&path, inputs);
        } else if helpers::has_extension(&path, MARKUP_EXTENSION) {
            inputs.push(path);
        }
    }
}
