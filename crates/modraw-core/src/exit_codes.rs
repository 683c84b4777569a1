//! Exit codes for modraw-sim.
//!
//! Exit codes communicate the outcome without requiring output parsing.
//! Scripts driving a replay rig rely on them; keep them stable.

use modraw_common::Error;

/// Exit codes for modraw-sim runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Every file replayed
    Clean = 0,

    /// Command-line usage error (reported by clap)
    Usage = 2,

    /// Configuration or job resolution error
    ConfigError = 10,

    /// Capture file violates the format
    FormatError = 11,

    /// I/O error
    IoError = 13,

    /// Internal/unknown error
    InternalError = 99,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Check if this exit code indicates success.
    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Clean)
    }

    /// Check if this exit code indicates an error requiring attention.
    pub fn is_error(self) -> bool {
        (self as i32) >= 10
    }

    /// Map a failure to its exit code.
    pub fn from_error(err: &Error) -> Self {
        match err.root() {
            Error::Config(_) => ExitCode::ConfigError,
            Error::Io { .. } => ExitCode::IoError,
            e if e.is_format_error() => ExitCode::FormatError,
            _ => ExitCode::InternalError,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(ExitCode::Clean.as_i32(), 0);
        assert_eq!(ExitCode::Usage.as_i32(), 2);
        assert_eq!(ExitCode::ConfigError.as_i32(), 10);
        assert_eq!(ExitCode::FormatError.as_i32(), 11);
        assert_eq!(ExitCode::IoError.as_i32(), 13);
        assert_eq!(i32::from(ExitCode::InternalError), 99);
    }

    #[test]
    fn test_from_error_sees_through_file_context() {
        let err = Error::MissingStartPacket("empty".into()).in_file("a.modraw");
        assert_eq!(ExitCode::from_error(&err), ExitCode::FormatError);

        let io = Error::io("b.modraw", std::io::ErrorKind::PermissionDenied.into());
        assert_eq!(ExitCode::from_error(&io.in_file("b.modraw")), ExitCode::IoError);

        assert_eq!(
            ExitCode::from_error(&Error::Config("bad".into())),
            ExitCode::ConfigError
        );
        assert_eq!(ExitCode::from_error(&Error::EndOfInput), ExitCode::FormatError);
    }

    #[test]
    fn test_success_and_error() {
        assert!(ExitCode::Clean.is_success());
        assert!(!ExitCode::Usage.is_success());
        assert!(!ExitCode::Usage.is_error());
        assert!(ExitCode::FormatError.is_error());
    }
}
