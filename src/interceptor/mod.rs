//! Gateway interceptors that feed log entries to a rolling file writer.
//!
//! Each interceptor instance owns one [`RollingFileWriter`] built from its
//! [`InterceptorConfig`]. The gateway calls the capture points of an
//! interceptor in lifecycle order for every request, passing a
//! [`RequestState`] it keeps for that request only. The last capture point
//! serializes the entry and writes it as one line.
//!
//! Capture points never fail: an interceptor whose writer could not be built
//! ignores every call, and write failures are reported through `tracing` only,
//! so logging problems never disturb the request itself.
//!
//! - [`provider`]: [`ProviderInterceptor`] for inbound API requests
//! - [`requester`]: [`RequesterInterceptor`] for outbound backend calls
//! - [`exchange`]: data the gateway supplies at each capture point

pub mod exchange;
pub mod provider;
pub mod requester;

pub use exchange::{
    EndpointInvocation, ProviderRequest, ProviderResponse, RequesterRequest, RequesterResponse,
    SorInvocation,
};
pub use provider::ProviderInterceptor;
pub use requester::RequesterInterceptor;

use crate::config::InterceptorConfig;
use crate::record::{HeaderWhitelist, MessageCapture};
use crate::writer::RollingFileWriter;

/// Per-request slot holding the entry an interceptor is building.
///
/// The gateway creates one per request and interceptor, and passes it to
/// every capture point of that request.
#[derive(Debug, Clone)]
pub struct RequestState<E> {
    entry: Option<E>,
}

impl<E> Default for RequestState<E> {
    fn default() -> Self {
        Self { entry: None }
    }
}

impl<E> RequestState<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The entry in progress, if the first capture point has run.
    #[must_use]
    pub const fn entry(&self) -> Option<&E> {
        self.entry.as_ref()
    }

    fn entry_mut(&mut self) -> Option<&mut E> {
        self.entry.as_mut()
    }

    fn begin(&mut self, entry: E) {
        self.entry = Some(entry);
    }

    fn finish(&mut self) -> Option<E> {
        self.entry.take()
    }
}

/// Configuration, header whitelists and writer shared by both interceptor kinds.
#[derive(Debug)]
struct LoggerCore {
    kind: &'static str,
    config: InterceptorConfig,
    request_headers: HeaderWhitelist,
    response_headers: HeaderWhitelist,
    writer: Option<RollingFileWriter>,
    /// Set by `deactivate`; a deactivated core is never rebuilt.
    deactivated: bool,
}

impl LoggerCore {
    fn activate(kind: &'static str, config: InterceptorConfig) -> Self {
        let mut core = Self {
            kind,
            request_headers: config.request_header_whitelist(),
            response_headers: config.response_header_whitelist(),
            config,
            writer: None,
            deactivated: false,
        };
        tracing::info!(interceptor = %core.name(), "activated");
        core.writer = core.open_writer();
        core
    }

    /// Applies new settings, rebuilding the writer only when its directory,
    /// limits or identity changed, or when activation failed to build one.
    ///
    /// After [`deactivate`](Self::deactivate) the settings are stored but no
    /// writer is opened.
    fn modify(&mut self, config: InterceptorConfig) {
        tracing::info!(interceptor = %self.name(), "modified");
        let reinit = !self.deactivated
            && (self.writer.is_none() || self.config.needs_writer_reinit(&config));

        self.request_headers = config.request_header_whitelist();
        self.response_headers = config.response_header_whitelist();
        self.config = config;

        if reinit {
            self.close_writer();
            self.writer = self.open_writer();
            if self.writer.is_some() {
                tracing::info!(interceptor = %self.name(), "reinitialized with new configuration");
            }
        }
    }

    fn deactivate(&mut self) {
        tracing::info!(interceptor = %self.name(), "deactivated");
        self.deactivated = true;
        self.close_writer();
    }

    fn open_writer(&self) -> Option<RollingFileWriter> {
        let config = &self.config;
        match RollingFileWriter::open(
            config.id.clone(),
            config.log_directory.clone(),
            config.max_file_size,
            config.max_file_count,
        ) {
            Ok(writer) => {
                tracing::info!(
                    interceptor = %self.name(),
                    log_directory = %config.log_directory.display(),
                    max_file_size = config.max_file_size,
                    max_file_count = config.max_file_count,
                    request_headers = %config.request_headers,
                    response_headers = %config.response_headers,
                    include_body = config.include_body,
                    "file system logger initialized"
                );
                Some(writer)
            }
            Err(error) => {
                tracing::error!(
                    interceptor = %self.name(),
                    error = %error,
                    "failed to initialize file handler, logging disabled"
                );
                None
            }
        }
    }

    fn close_writer(&mut self) {
        if let Some(writer) = self.writer.take() {
            if let Err(error) = writer.close() {
                tracing::error!(interceptor = %self.name(), error = %error, "failed to close file handler");
            }
        }
    }

    fn name(&self) -> String {
        format!("{}{}", self.kind, self.config.id)
    }

    const fn is_active(&self) -> bool {
        self.writer.is_some()
    }

    fn capture_request(
        &self,
        message: &mut MessageCapture,
        headers: &[(String, String)],
        payload: Option<&str>,
    ) {
        self.capture(message, &self.request_headers, headers, payload);
    }

    fn capture_response(
        &self,
        message: &mut MessageCapture,
        headers: &[(String, String)],
        payload: Option<&str>,
    ) {
        self.capture(message, &self.response_headers, headers, payload);
    }

    fn capture(
        &self,
        message: &mut MessageCapture,
        whitelist: &HeaderWhitelist,
        headers: &[(String, String)],
        payload: Option<&str>,
    ) {
        let captured = whitelist.capture(headers.iter().map(|(name, value)| (name, value)));
        if !captured.is_empty() {
            message.set_headers(captured);
        }
        if let Some(payload) = payload {
            message.record_payload(payload, self.config.include_body);
        }
    }

    fn write(&self, line: &str, capture_point: &'static str) {
        let Some(writer) = &self.writer else {
            return;
        };
        if let Err(error) = writer.write_line(line) {
            tracing::error!(
                interceptor = %self.name(),
                capture_point,
                error = %error,
                "failed to write log entry"
            );
        }
    }
}
