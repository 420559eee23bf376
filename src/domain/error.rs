//! Error types for the file system logger.
//!
//! [`FsLoggerError`] separates what disables an interceptor (bad
//! configuration) from what only loses a single line (I/O, closed writer).

use thiserror::Error;

/// The main error type for file system logger operations.
///
/// The variants follow the three failure classes an interceptor has to tell
/// apart: configuration problems that prevent a writer from being built, I/O
/// failures while appending or rotating, and writes against a writer that has
/// already been closed.
///
/// # Examples
///
/// ```
/// use zosconnect_fslogger::FsLoggerError;
///
/// fn validate_directory() -> Result<(), FsLoggerError> {
///     Err(FsLoggerError::Config("log directory path does not exist: /missing".to_string()))
/// }
///
/// assert!(validate_directory().is_err());
/// ```
#[derive(Debug, Error)]
pub enum FsLoggerError {
    /// Configuration is invalid or refers to an unusable log directory.
    ///
    /// Raised while constructing a writer or parsing interceptor configuration.
    /// The owning interceptor stays inactive until the configuration is fixed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Appending or flushing a line, or opening the next file during rotation,
    /// failed.
    ///
    /// Also returned when a configuration file cannot be read. A permission
    /// failure while `open` creates the first file is reported as
    /// [`Config`](Self::Config) instead.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A write was attempted after the writer was closed.
    #[error("rolling file writer is closed")]
    Closed,

    /// The writer's lock was poisoned by a thread that panicked mid-write.
    #[error("writer lock poisoned: {0}")]
    Poisoned(String),
}

/// A specialized `Result` type for file system logger operations.
pub type Result<T> = std::result::Result<T, FsLoggerError>;
