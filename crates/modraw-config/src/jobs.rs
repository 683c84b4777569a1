//! File job resolution.
//!
//! Turns the `--input`/`--output` pair into an ordered list of
//! (input file, output file) jobs. Three input forms are accepted:
//!
//! - a single capture file,
//! - `@list.txt`: one path per line, `#` comments and blank lines skipped,
//!   relative paths resolved against the list file's folder,
//! - a folder: every `.modraw` file in it, sorted by name.
//!
//! The last two are batch mode, where the output must be an existing folder.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use modraw_common::format::CAPTURE_EXTENSION;

use crate::validate::{ValidationError, ValidationResult};

/// One validated (input, output) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileJob {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// The shape of the `--input` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSpec {
    File(PathBuf),
    List(PathBuf),
    Folder(PathBuf),
}

impl InputSpec {
    pub fn parse(raw: &str) -> Self {
        if let Some(list) = raw.strip_prefix('@') {
            return InputSpec::List(PathBuf::from(list));
        }
        let path = PathBuf::from(raw);
        if path.is_dir() {
            InputSpec::Folder(path)
        } else {
            InputSpec::File(path)
        }
    }

    pub fn is_batch(&self) -> bool {
        !matches!(self, InputSpec::File(_))
    }

    /// Input files in replay order.
    fn input_files(&self) -> ValidationResult<Vec<PathBuf>> {
        match self {
            InputSpec::File(path) => Ok(vec![path.clone()]),
            InputSpec::List(list) => read_list_file(list),
            InputSpec::Folder(dir) => scan_folder(dir),
        }
    }
}

fn has_capture_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(CAPTURE_EXTENSION))
}

fn read_list_file(list: &Path) -> ValidationResult<Vec<PathBuf>> {
    if !list.exists() {
        return Err(ValidationError::ListFileMissing(list.to_path_buf()));
    }
    if list.is_dir() {
        return Err(ValidationError::ListFileIsFolder(list.to_path_buf()));
    }
    let content = std::fs::read_to_string(list).map_err(|source| ValidationError::Unreadable {
        path: list.to_path_buf(),
        source,
    })?;
    let base = list.parent().unwrap_or_else(|| Path::new(""));

    let files: Vec<PathBuf> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| {
            let path = Path::new(line);
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                base.join(path)
            }
        })
        .collect();

    if files.is_empty() {
        return Err(ValidationError::EmptyList(list.to_path_buf()));
    }
    Ok(files)
}

fn scan_folder(dir: &Path) -> ValidationResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|source| ValidationError::Unreadable {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| ValidationError::Unreadable {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if has_capture_extension(&path) {
            files.push(path);
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(ValidationError::EmptyFolder(dir.to_path_buf()));
    }
    Ok(files)
}

fn output_for(input: &Path, output: &Path, output_is_dir: bool) -> PathBuf {
    match (output_is_dir, input.file_name()) {
        (true, Some(name)) => output.join(name),
        _ => output.to_path_buf(),
    }
}

/// Resolve and validate the job list.
///
/// Every input must exist and be a file; the output must be a folder in batch
/// mode, or a folder or `.modraw` path otherwise.
pub fn resolve_jobs(input: &InputSpec, output: &Path) -> ValidationResult<Vec<FileJob>> {
    let output_is_dir = output.is_dir();
    if input.is_batch() {
        if !output.exists() {
            return Err(ValidationError::OutputFolderMissing(output.to_path_buf()));
        }
        if !output_is_dir {
            return Err(ValidationError::OutputNotFolder(output.to_path_buf()));
        }
    } else if !output_is_dir && !has_capture_extension(output) {
        return Err(ValidationError::OutputNotCapture(output.to_path_buf()));
    }

    let files = input.input_files()?;
    let mut jobs = Vec::with_capacity(files.len());
    for file in files {
        if !file.exists() {
            return Err(ValidationError::InputMissing(file));
        }
        if file.is_dir() {
            return Err(ValidationError::InputIsFolder(file));
        }
        let job = FileJob {
            output: output_for(&file, output, output_is_dir),
            input: file,
        };
        debug!(input = %job.input.display(), output = %job.output.display(), "resolved job");
        jobs.push(job);
    }
    Ok(jobs)
}
