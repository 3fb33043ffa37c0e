//! Exit codes for the CLI tool.

use svndump_rewrite::Error;

/// Exit code constants
pub const SUCCESS: i32 = 0;
/// Fatal error occurred
pub const FATAL_ERROR: i32 = 2;
/// Input is not a valid dump
pub const BAD_DUMP: i32 = 3;
/// Rule file could not be used
pub const BAD_CONFIG: i32 = 4;
/// I/O error
pub const IO_ERROR: i32 = 5;
/// Ctrl+C (128 + SIGINT)
pub const USER_INTERRUPT: i32 = 130;

/// Exit code enum for structured handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success,
    FatalError,
    BadDump,
    BadConfig,
    IoError,
}

impl ExitCode {
    /// Returns the numeric exit code
    pub fn code(self) -> i32 {
        match self {
            Self::Success => SUCCESS,
            Self::FatalError => FATAL_ERROR,
            Self::BadDump => BAD_DUMP,
            Self::BadConfig => BAD_CONFIG,
            Self::IoError => IO_ERROR,
        }
    }
}

/// Converts a library error to an exit code
pub fn error_to_exit_code(error: &Error) -> ExitCode {
    if error.is_config_error() {
        return ExitCode::BadConfig;
    }
    if error.is_format_error() || error.is_truncation() {
        return ExitCode::BadDump;
    }
    match error {
        Error::Io(_) => ExitCode::IoError,
        Error::ResourceLimitExceeded(_) => ExitCode::FatalError,
        // Future error variants - required by #[non_exhaustive]
        _ => ExitCode::FatalError,
    }
}
