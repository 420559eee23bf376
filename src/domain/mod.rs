//! Domain layer shared by the record model, the writer and the interceptors.
//!
//! - [`error`]: Error types and result aliases

pub mod error;

pub use error::{FsLoggerError, Result};
