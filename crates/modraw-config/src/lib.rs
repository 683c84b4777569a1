//! modraw-sim configuration loading and validation.
//!
//! This crate provides:
//! - `ReplayConfig`: speed multiplier, date reconstruction mode, verbosity
//! - Config resolution (CLI → env → config file → defaults)
//! - File job resolution from a single file, a folder, or an `@list` file

pub mod jobs;
pub mod replay;
pub mod validate;

pub use jobs::{resolve_jobs, FileJob, InputSpec};
pub use replay::{DateMode, ReplayConfig, ReplayOverrides, SPEED_ENV_VAR};
pub use validate::{ValidationError, ValidationResult};
