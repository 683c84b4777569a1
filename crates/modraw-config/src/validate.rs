//! Validation errors for configuration and job resolution.

use std::path::PathBuf;
use thiserror::Error;

/// Result of a validation step.
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

/// Everything that can be wrong with user-supplied configuration.
///
/// All of these are reported before any input file is opened.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("the time multiplier needs to be a strictly positive number, got {0}")]
    InvalidSpeed(f64),

    #[error("input list file doesn't exist: '{}'", .0.display())]
    ListFileMissing(PathBuf),

    #[error("input list file can't be a folder: '{}'", .0.display())]
    ListFileIsFolder(PathBuf),

    #[error("input list file needs to contain at least one element: '{}'", .0.display())]
    EmptyList(PathBuf),

    #[error("input folder needs to contain at least one .modraw file: '{}'", .0.display())]
    EmptyFolder(PathBuf),

    #[error("input file doesn't exist: '{}'", .0.display())]
    InputMissing(PathBuf),

    #[error("input can't be a folder here: '{}'", .0.display())]
    InputIsFolder(PathBuf),

    #[error("output folder for batch mode doesn't exist: '{}'", .0.display())]
    OutputFolderMissing(PathBuf),

    #[error("output in batch mode needs to be a folder not a file: '{}'", .0.display())]
    OutputNotFolder(PathBuf),

    #[error("output needs to be a folder or a .modraw file: '{}'", .0.display())]
    OutputNotCapture(PathBuf),

    #[error("can't read '{}': {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{}': {source}", path.display())]
    InvalidConfigFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl From<ValidationError> for modraw_common::Error {
    fn from(err: ValidationError) -> Self {
        modraw_common::Error::Config(err.to_string())
    }
}
