//! Rotating file writer with size-based rotation and per-identity retention.
//!
//! This module provides a thread-safe writer that appends newline-terminated
//! lines to a timestamped log file, starts a new file whenever the next line
//! would push the current one past a size threshold, and keeps at most a
//! fixed number of files for its identity in the target directory.

use std::borrow::Cow;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

use crate::domain::{FsLoggerError, Result};

use super::naming::{file_timestamp_now, log_file_name, parse_log_file_name, FileSequence};

/// Default maximum file size before rotation (10 MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Default number of files retained per identity.
pub const DEFAULT_MAX_FILE_COUNT: usize = 10;

/// Thread-safe rotating file writer.
///
/// # Thread Safety
///
/// All mutable state sits behind one `Mutex`. The size check, a possible
/// rotation, the append, the flush and the byte counter update run as a single
/// critical section, so concurrent callers never interleave a rotation with a
/// write and every line lands whole in exactly one file.
///
/// # Rotation Strategy
///
/// 1. Compute the UTF-8 length of the newline-terminated line
/// 2. If `bytes_written + len > max_file_size`, rotate:
///    - Flush and close the current file
///    - Delete this identity's oldest files until `max_file_count - 1` remain
///    - Open `zosconnect-<identity>-<YYYYMMDD>-<HHMMSS>[-<n>].log`
/// 3. Append and flush the line, then add its length to the counter
///
/// A line longer than `max_file_size` is never split; it is written whole into
/// a freshly rotated file.
///
/// The byte counter only tracks what this writer appended; it is never
/// re-derived from filesystem metadata.
///
/// # Example
///
/// ```rust,no_run
/// use zosconnect_fslogger::RollingFileWriter;
///
/// let writer = RollingFileWriter::open("api1", "/var/log/zosconnect", 10 * 1024 * 1024, 10)?;
/// writer.write_line(r#"{"timestamp":"2009-02-13T23:31:30.000Z","request":{},"response":{}}"#)?;
/// writer.close()?;
/// # Ok::<(), zosconnect_fslogger::FsLoggerError>(())
/// ```
pub struct RollingFileWriter {
    identity: String,
    directory: PathBuf,
    max_file_size: u64,
    max_file_count: usize,
    state: Mutex<WriterState>,
}

#[derive(Debug, Default)]
struct WriterState {
    /// `None` after a failed rotation; the next write retries it.
    current: Option<ActiveFile>,
    closed: bool,
}

#[derive(Debug)]
struct ActiveFile {
    file: File,
    path: PathBuf,
    bytes_written: u64,
}

impl RollingFileWriter {
    /// Validates the configuration and opens the first log file.
    ///
    /// # Errors
    ///
    /// Returns [`FsLoggerError::Config`] if:
    /// - `identity` is empty or contains a path separator
    /// - `max_file_size` or `max_file_count` is zero
    /// - `directory` does not exist or is not a directory
    /// - the first file cannot be created for lack of permission
    ///
    /// Returns [`FsLoggerError::Io`] if the first file cannot be created for
    /// any other reason.
    pub fn open(
        identity: impl Into<String>,
        directory: impl Into<PathBuf>,
        max_file_size: u64,
        max_file_count: usize,
    ) -> Result<Self> {
        let identity = identity.into();
        let directory = directory.into();

        if identity.is_empty() {
            return Err(FsLoggerError::Config("writer identity must not be empty".to_string()));
        }
        if identity.contains(['/', '\\']) {
            return Err(FsLoggerError::Config(format!(
                "writer identity must not contain path separators: {identity}"
            )));
        }
        if max_file_size == 0 {
            return Err(FsLoggerError::Config("maxFileSize must be greater than zero".to_string()));
        }
        if max_file_count == 0 {
            return Err(FsLoggerError::Config("maxFileCount must be greater than zero".to_string()));
        }
        validate_directory(&directory)?;

        let mut state = WriterState::default();
        let files = FileSet {
            identity: &identity,
            directory: &directory,
            max_file_count,
        };
        files.rotate(&mut state).map_err(|error| match error {
            FsLoggerError::Io(io_error) if io_error.kind() == io::ErrorKind::PermissionDenied => {
                FsLoggerError::Config(format!(
                    "log directory is not writable: {}: {io_error}",
                    directory.display()
                ))
            }
            other => other,
        })?;

        tracing::debug!(
            identity = %identity,
            directory = %directory.display(),
            max_file_size,
            max_file_count,
            "rolling file writer opened"
        );
        Ok(Self {
            identity,
            directory,
            max_file_size,
            max_file_count,
            state: Mutex::new(state),
        })
    }

    /// Appends one line, rotating first if it would overflow the current file.
    ///
    /// A trailing newline is added when `line` does not already end with one.
    /// The line is flushed before returning.
    ///
    /// # Errors
    ///
    /// - [`FsLoggerError::Closed`] after [`close`](Self::close)
    /// - [`FsLoggerError::Io`] if opening a new file or appending fails
    /// - [`FsLoggerError::Poisoned`] if another thread panicked mid-write
    pub fn write_line(&self, line: &str) -> Result<()> {
        let mut state = self.lock()?;
        if state.closed {
            return Err(FsLoggerError::Closed);
        }

        let entry: Cow<'_, str> = if line.ends_with('\n') {
            Cow::Borrowed(line)
        } else {
            Cow::Owned(format!("{line}\n"))
        };
        let entry_len = entry.len() as u64;

        let needs_rotation = state
            .current
            .as_ref()
            .map_or(true, |active| active.bytes_written + entry_len > self.max_file_size);
        if needs_rotation {
            self.files().rotate(&mut state)?;
        }

        let active = state
            .current
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "no log file open"))?;
        active.file.write_all(entry.as_bytes())?;
        active.file.flush()?;
        active.bytes_written += entry_len;
        drop(state);

        Ok(())
    }

    /// Flushes and releases the current file. Idempotent.
    ///
    /// Every later [`write_line`](Self::write_line) fails with
    /// [`FsLoggerError::Closed`]; a closed writer cannot be reopened.
    ///
    /// # Errors
    ///
    /// Returns [`FsLoggerError::Io`] if the final flush fails. The writer is
    /// closed regardless.
    pub fn close(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.closed {
            return Ok(());
        }
        state.closed = true;

        if let Some(mut active) = state.current.take() {
            active.file.flush()?;
            tracing::debug!(
                identity = %self.identity,
                path = %active.path.display(),
                "rolling file writer closed"
            );
        }
        Ok(())
    }

    /// Lists this writer's log files in the directory, oldest first.
    ///
    /// Files are ordered by modification time, then by the timestamp and
    /// counter in their names.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    pub fn log_files(&self) -> Result<Vec<PathBuf>> {
        self.files().list()
    }

    #[must_use]
    pub fn identity(&self) -> &str {
        &self.identity
    }

    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    #[must_use]
    pub const fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    #[must_use]
    pub const fn max_file_count(&self) -> usize {
        self.max_file_count
    }

    /// Path of the file currently being appended to.
    #[must_use]
    pub fn current_file(&self) -> Option<PathBuf> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .current
            .as_ref()
            .map(|active| active.path.clone())
    }

    /// Bytes appended to the current file since it was opened.
    #[must_use]
    pub fn current_file_size(&self) -> u64 {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .current
            .as_ref()
            .map_or(0, |active| active.bytes_written)
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).closed
    }

    fn lock(&self) -> Result<MutexGuard<'_, WriterState>> {
        self.state
            .lock()
            .map_err(|e| FsLoggerError::Poisoned(e.to_string()))
    }

    fn files(&self) -> FileSet<'_> {
        FileSet {
            identity: &self.identity,
            directory: &self.directory,
            max_file_count: self.max_file_count,
        }
    }
}

/// One identity's log files in the target directory.
struct FileSet<'a> {
    identity: &'a str,
    directory: &'a Path,
    max_file_count: usize,
}

impl FileSet<'_> {
    fn list(&self) -> Result<Vec<PathBuf>> {
        let mut files: Vec<(SystemTime, FileSequence, PathBuf)> = fs::read_dir(self.directory)?
            .filter_map(std::result::Result::ok)
            .filter(|entry| entry.file_type().is_ok_and(|kind| kind.is_file()))
            .filter_map(|entry| {
                let sequence = parse_log_file_name(self.identity, entry.file_name().to_str()?)?;
                let modified = entry
                    .metadata()
                    .and_then(|metadata| metadata.modified())
                    .unwrap_or(SystemTime::UNIX_EPOCH);
                Some((modified, sequence, entry.path()))
            })
            .collect();

        files.sort();
        Ok(files.into_iter().map(|(_, _, path)| path).collect())
    }

    /// Closes the current file, prunes old files and opens a new one.
    ///
    /// Close and cleanup failures are logged and do not fail the rotation; only
    /// failing to open the new file does.
    fn rotate(&self, state: &mut WriterState) -> Result<()> {
        let _span = tracing::debug_span!("rotate_log_file", identity = %self.identity).entered();

        if let Some(mut previous) = state.current.take() {
            if let Err(error) = previous.file.flush() {
                tracing::warn!(
                    path = %previous.path.display(),
                    error = %error,
                    "failed to flush log file before rotation"
                );
            }
            tracing::debug!(
                path = %previous.path.display(),
                bytes = previous.bytes_written,
                "closed log file"
            );
        }

        self.remove_oldest();

        let path = self.next_path();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        tracing::info!(identity = %self.identity, path = %path.display(), "created new log file");

        state.current = Some(ActiveFile {
            file,
            path,
            bytes_written: 0,
        });
        Ok(())
    }

    /// Deletes the oldest files so that, counting the file about to be
    /// created, no more than `max_file_count` remain.
    ///
    /// Files that fail to delete are skipped and retried on the next rotation.
    fn remove_oldest(&self) {
        let files = match self.list() {
            Ok(files) => files,
            Err(error) => {
                tracing::warn!(
                    directory = %self.directory.display(),
                    error = %error,
                    "failed to list log files for cleanup"
                );
                return;
            }
        };

        if files.len() < self.max_file_count {
            return;
        }

        let excess = files.len() + 1 - self.max_file_count;
        for old_file in files.iter().take(excess) {
            match fs::remove_file(old_file) {
                Ok(()) => {
                    tracing::info!(path = %old_file.display(), "deleted old log file");
                }
                Err(error) => {
                    tracing::warn!(
                        path = %old_file.display(),
                        error = %error,
                        "failed to delete old log file"
                    );
                }
            }
        }
    }

    /// First free file name for the current second.
    fn next_path(&self) -> PathBuf {
        let timestamp = file_timestamp_now();
        let mut path = self
            .directory
            .join(log_file_name(self.identity, &timestamp, None));

        let mut counter = 1;
        while path.exists() {
            path = self
                .directory
                .join(log_file_name(self.identity, &timestamp, Some(counter)));
            counter += 1;
        }
        path
    }
}

fn validate_directory(directory: &Path) -> Result<()> {
    let metadata = fs::metadata(directory).map_err(|error| {
        if error.kind() == io::ErrorKind::NotFound {
            FsLoggerError::Config(format!(
                "log directory path does not exist: {}",
                directory.display()
            ))
        } else {
            FsLoggerError::Config(format!(
                "log directory cannot be accessed: {}: {error}",
                directory.display()
            ))
        }
    })?;

    if !metadata.is_dir() {
        return Err(FsLoggerError::Config(format!(
            "log directory path is not a directory: {}",
            directory.display()
        )));
    }
    Ok(())
}

impl std::fmt::Debug for RollingFileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RollingFileWriter")
            .field("identity", &self.identity)
            .field("directory", &self.directory)
            .field("max_file_size", &self.max_file_size)
            .field("max_file_count", &self.max_file_count)
            .finish_non_exhaustive()
    }
}
