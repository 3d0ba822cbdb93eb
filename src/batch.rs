//! Purpose: Convert every `.lang` or `.json` file in a directory, one file at a time.
//! Exports: `Direction`, `BatchOptions`, `FileOutcome`, `FileReport`, `BatchReport`,
//! `scan`, `target_path`, `should_write`, `convert_file`, `convert_dir`, `convert_path`.
//! Role: File-system glue around `convert`; owns discovery, overwrite policy, and I/O.
//! Invariants: One file's failure is recorded and never stops the remaining files.
//! Invariants: Files are processed in sorted path order; output is a function of each input.
//! Invariants: `.lang` sources of 8 bytes or fewer are skipped and produce no output file.
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::convert;
use crate::core::error::{Error, ErrorKind};
use crate::core::flatten::UnsupportedValuePolicy;
use crate::core::header::LANG_HEADER_LEN;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    LangToJson,
    JsonToLang,
}

impl Direction {
    pub fn source_extension(self) -> &'static str {
        match self {
            Direction::LangToJson => "lang",
            Direction::JsonToLang => "json",
        }
    }

    pub fn target_extension(self) -> &'static str {
        match self {
            Direction::LangToJson => "json",
            Direction::JsonToLang => "lang",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct BatchOptions {
    pub overwrite: bool,
    pub policy: UnsupportedValuePolicy,
}

#[derive(Debug)]
pub enum FileOutcome {
    Converted {
        target: PathBuf,
        entries: usize,
        skipped_values: usize,
    },
    SkippedExisting {
        target: PathBuf,
    },
    SkippedPartial,
    Failed(Error),
}

#[derive(Debug)]
pub struct FileReport {
    pub source: PathBuf,
    pub outcome: FileOutcome,
}

#[derive(Debug)]
pub struct BatchReport {
    pub direction: Direction,
    pub files: Vec<FileReport>,
}

impl BatchReport {
    pub fn converted(&self) -> impl Iterator<Item = &FileReport> {
        self.files
            .iter()
            .filter(|file| matches!(file.outcome, FileOutcome::Converted { .. }))
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Path, &Error)> {
        self.files.iter().filter_map(|file| match &file.outcome {
            FileOutcome::Failed(err) => Some((file.source.as_path(), err)),
            _ => None,
        })
    }

    pub fn first_failure(&self) -> Option<&Error> {
        self.failures().next().map(|(_, err)| err)
    }
}

/// Regular files directly inside `dir` with the direction's source extension, sorted.
pub fn scan(dir: &Path, direction: Direction) -> Result<Vec<PathBuf>, Error> {
    let read_dir = fs::read_dir(dir).map_err(|err| io_error(err, dir, "failed to read directory"))?;
    let mut files = Vec::new();
    for item in read_dir {
        let item = item.map_err(|err| io_error(err, dir, "failed to read directory entry"))?;
        let path = item.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|ext| ext.to_str()) == Some(direction.source_extension()) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Sibling of `source` named by everything before the first `.` plus the target extension.
pub fn target_path(source: &Path, direction: Direction) -> PathBuf {
    let name = source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = name.split('.').next().unwrap_or_default();
    source.with_file_name(format!("{stem}.{}", direction.target_extension()))
}

pub fn should_write(target: &Path, overwrite: bool) -> bool {
    overwrite || !target.exists()
}

/// Converts one file. Errors are captured in the outcome so callers can keep going.
pub fn convert_file(source: &Path, direction: Direction, options: BatchOptions) -> FileOutcome {
    let target = target_path(source, direction);
    if !should_write(&target, options.overwrite) {
        info!(source = %source.display(), target = %target.display(), "target exists; skipping");
        return FileOutcome::SkippedExisting { target };
    }
    match try_convert_file(source, &target, direction, options) {
        Ok(outcome) => outcome,
        Err(err) => {
            let err = err.with_path(source);
            warn!(source = %source.display(), error = %err, "conversion failed");
            FileOutcome::Failed(err)
        }
    }
}

fn try_convert_file(
    source: &Path,
    target: &Path,
    direction: Direction,
    options: BatchOptions,
) -> Result<FileOutcome, Error> {
    let bytes = fs::read(source).map_err(|err| io_error(err, source, "failed to read source"))?;
    let (output, entries, skipped_values) = match direction {
        Direction::LangToJson => {
            if bytes.len() <= LANG_HEADER_LEN {
                info!(source = %source.display(), len = bytes.len(), "partial lang file; skipping");
                return Ok(FileOutcome::SkippedPartial);
            }
            let tree = convert::lang_to_tree(&bytes)?;
            let entries = tree.root().leaf_count();
            (tree.render().into_bytes(), entries, 0)
        }
        Direction::JsonToLang => {
            let lang = convert::json_bytes_to_lang(&bytes, options.policy)?;
            (lang.bytes, lang.entry_count, lang.skipped.len())
        }
    };
    fs::write(target, output).map_err(|err| io_error(err, target, "failed to write target"))?;
    info!(
        source = %source.display(),
        target = %target.display(),
        entries,
        skipped_values,
        "converted"
    );
    Ok(FileOutcome::Converted {
        target: target.to_path_buf(),
        entries,
        skipped_values,
    })
}

pub fn convert_dir(
    dir: &Path,
    direction: Direction,
    options: BatchOptions,
) -> Result<BatchReport, Error> {
    let files = scan(dir, direction)?
        .into_iter()
        .map(|source| {
            let outcome = convert_file(&source, direction, options);
            FileReport { source, outcome }
        })
        .collect();
    Ok(BatchReport { direction, files })
}

/// Runs a directory batch, or converts `path` alone when it names a file.
pub fn convert_path(
    path: &Path,
    direction: Direction,
    options: BatchOptions,
) -> Result<BatchReport, Error> {
    if path.is_dir() {
        return convert_dir(path, direction, options);
    }
    if !path.exists() {
        return Err(Error::new(ErrorKind::NotFound)
            .with_message("path does not exist")
            .with_path(path));
    }
    if path.extension().and_then(|ext| ext.to_str()) != Some(direction.source_extension()) {
        return Err(Error::new(ErrorKind::Usage)
            .with_message(format!(
                "expected a .{} file or a directory",
                direction.source_extension()
            ))
            .with_path(path));
    }
    let outcome = convert_file(path, direction, options);
    Ok(BatchReport {
        direction,
        files: vec![FileReport {
            source: path.to_path_buf(),
            outcome,
        }],
    })
}

fn io_error(err: std::io::Error, path: &Path, message: &str) -> Error {
    let kind = match err.kind() {
        std::io::ErrorKind::NotFound => ErrorKind::NotFound,
        _ => ErrorKind::Io,
    };
    Error::new(kind)
        .with_message(message)
        .with_path(path)
        .with_source(err)
}
