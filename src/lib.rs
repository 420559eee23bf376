//! zosconnect-fslogger: file system logging for API gateway interceptors.
//!
//! The crate provides:
//! - Structured log entries for inbound API provider requests and outbound
//!   API requester calls, serialized as single-line JSON
//! - A thread-safe writer appending those lines to size-bounded files, rotating
//!   to a new file and pruning the oldest ones to keep a bounded file count
//! - Header whitelisting and optional body capture
//! - Interceptors wiring the above into the gateway's request lifecycle

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Interceptors (interceptor/)                        │  ← Gateway hooks
//! │  - Provider / requester capture points              │
//! │  - Activate / modify / deactivate lifecycle         │
//! └─────────────────────────────────────────────────────┘
//!                 │                          │
//! ┌───────────────────────────┐   ┌───────────────────────────┐
//! │ Records (record/)         │   │ Writer (writer/)          │
//! │ - Provider / requester    │   │ - Size-bounded files      │
//! │ - Header whitelists       │   │ - Count-bounded retention │
//! │ - JSON serialization      │   │ - File naming             │
//! └───────────────────────────┘   └───────────────────────────┘
//!                 │                          │
//! ┌─────────────────────────────────────────────────────┐
//! │  Configuration (config) & errors (domain/error)     │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional
//! │  - tracing subscriber on stderr                     │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`interceptor`]: provider and requester interceptors
//! - [`record`]: log entry types and their JSON form
//! - [`writer`]: rotating NDJSON file writer
//! - [`config`]: interceptor settings
//! - [`domain`]: error types
//! - [`observability`]: `tracing` subscriber setup
//!
//! # Output
//!
//! Each completed request produces exactly one line in
//! `<logDirectory>/zosconnect-<id>-<YYYYMMDD>-<HHMMSS>[-n].log`:
//!
//! ```json
//! {"timestamp":"2024-03-01T10:15:30.123Z","requestId":42,"user":"admin","request":{"uri":"/api/v1/customers","method":"GET","size":0},"response":{"statusCode":200,"size":512}}
//! ```
//!
//! Optional members are omitted rather than written as `null`, and nested
//! groups such as `sor`, `endpoint`, `cics` and `ims` only appear when at least
//! one of their members is set.
//!
//! # Examples
//!
//! ## Writing lines directly
//!
//! ```rust,no_run
//! use zosconnect_fslogger::{ProviderLogEntry, RollingFileWriter};
//!
//! let writer = RollingFileWriter::open("api1", "/var/log/zosconnect", 10 * 1024 * 1024, 10)?;
//!
//! let mut entry = ProviderLogEntry::new();
//! entry.set_uri("/api/v1/customers");
//! entry.set_method("GET");
//! entry.set_status_code(200);
//! writer.write_line(&entry.to_json())?;
//!
//! writer.close()?;
//! # Ok::<(), zosconnect_fslogger::FsLoggerError>(())
//! ```
//!
//! ## Interceptor lifecycle
//!
//! ```rust,no_run
//! use std::collections::BTreeMap;
//! use zosconnect_fslogger::interceptor::{ProviderRequest, ProviderResponse};
//! use zosconnect_fslogger::{InterceptorConfig, ProviderInterceptor, RequestState};
//!
//! let mut properties = BTreeMap::new();
//! properties.insert("id".to_string(), "api1".to_string());
//! properties.insert("logDirectory".to_string(), "/var/log/zosconnect".to_string());
//! properties.insert("requestHeaders".to_string(), "Content-Type".to_string());
//!
//! let config = InterceptorConfig::from_properties(&properties)?;
//! zosconnect_fslogger::observability::init_tracing(config.trace_level.as_deref());
//! let mut interceptor = ProviderInterceptor::activate(config);
//!
//! let mut state = RequestState::new();
//! interceptor.pre_invoke(&mut state, &ProviderRequest::default());
//! interceptor.post_invoke(&mut state, &ProviderResponse { status_code: Some(204), ..Default::default() });
//!
//! interceptor.deactivate();
//! # Ok::<(), zosconnect_fslogger::FsLoggerError>(())
//! ```
//!
//! # Concurrency
//!
//! One [`RollingFileWriter`] may be shared by any number of threads. The size
//! check, rotation, append and flush of a line happen under a single lock, so
//! lines never interleave and no file grows past its limit because of a
//! concurrent write. Interceptors hold no per-request state of their own; each
//! request carries its entry in a [`RequestState`].

pub mod config;
pub mod domain;
pub mod interceptor;
pub mod observability;
pub mod record;
pub mod writer;

pub use config::InterceptorConfig;
pub use domain::{FsLoggerError, Result};
pub use interceptor::{ProviderInterceptor, RequestState, RequesterInterceptor};
pub use record::{HeaderWhitelist, ProviderLogEntry, RequesterLogEntry};
pub use writer::RollingFileWriter;
