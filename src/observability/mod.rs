//! Diagnostic logging for the logger itself.
//!
//! Library code only emits `tracing` events; the host decides where they go.
//! Hosts without a subscriber of their own can call [`init_tracing`] to get
//! human-readable output on stderr.
//!
//! # Configuration
//!
//! The level is resolved from:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. the `traceLevel` interceptor setting
//! 3. Default: `"info"`

mod init;

pub use init::init_tracing;
