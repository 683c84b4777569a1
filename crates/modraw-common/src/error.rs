//! Error types for modraw-sim.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for modraw-sim operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for modraw-sim.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    // Capture format errors (20-29)
    #[error("malformed header at line {line}: {reason}")]
    MalformedHeader { line: usize, reason: String },

    #[error("missing start-of-mission packet: {0}")]
    MissingStartPacket(String),

    #[error("packet at byte {offset} carries no timestamp")]
    UnsequencedPacket { offset: usize },

    /// Raised by the byte cursor when the buffer is exhausted. Framing treats
    /// it as the end of the stream; it should never reach a user.
    #[error("end of input")]
    EndOfInput,

    // I/O errors (60-69)
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Context wrapper
    #[error("{}: {source}", path.display())]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Build an I/O error tagged with the offending path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Attach the input file a failure happened in.
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        Error::InFile {
            path: path.into(),
            source: Box::new(self),
        }
    }

    /// The error with any file context peeled off.
    pub fn root(&self) -> &Error {
        match self {
            Error::InFile { source, .. } => source.root(),
            other => other,
        }
    }

    /// Returns the error code for this error type.
    /// Used for detailed error reporting in JSON output.
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::MalformedHeader { .. } => 20,
            Error::MissingStartPacket(_) => 21,
            Error::UnsequencedPacket { .. } => 22,
            Error::EndOfInput => 23,
            Error::Io { .. } => 60,
            Error::InFile { source, .. } => source.code(),
        }
    }

    /// True for violations of the capture format.
    pub fn is_format_error(&self) -> bool {
        matches!(self.code(), 20..=29)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_file_keeps_inner_code() {
        let err = Error::UnsequencedPacket { offset: 12 }.in_file("a.modraw");
        assert_eq!(err.code(), 22);
        assert!(err.is_format_error());
        assert!(matches!(err.root(), Error::UnsequencedPacket { offset: 12 }));
    }

    #[test]
    fn test_io_message_names_path() {
        let err = Error::io(
            "/tmp/out.modraw",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/tmp/out.modraw"));
        assert!(msg.contains("denied"));
        assert!(!err.is_format_error());
    }

    #[test]
    fn test_header_message() {
        let err = Error::MalformedHeader {
            line: 3,
            reason: "expected start marker".to_string(),
        };
        assert_eq!(err.to_string(), "malformed header at line 3: expected start marker");
    }
}
