//! Size- and count-bounded rotating log files.
//!
//! - [`rolling`]: the thread-safe [`RollingFileWriter`]
//! - [`naming`]: file name construction and identity matching

pub mod naming;
pub mod rolling;

pub use rolling::{RollingFileWriter, DEFAULT_MAX_FILE_COUNT, DEFAULT_MAX_FILE_SIZE};
