//! modraw-sim common types and errors.
//!
//! This crate provides foundational pieces shared across the modraw crates:
//! - The unified error type and its stable error codes
//! - Byte literals of the `.modraw` capture format

pub mod error;
pub mod format;

pub use error::{Error, Result};
