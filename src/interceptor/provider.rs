//! Interceptor for inbound API provider requests.

use crate::config::InterceptorConfig;
use crate::record::ProviderLogEntry;
use crate::writer::RollingFileWriter;

use super::exchange::{ProviderRequest, ProviderResponse, SorInvocation};
use super::{LoggerCore, RequestState};

/// Logs every API provider request as one [`ProviderLogEntry`] line.
///
/// Capture points, in the order the gateway calls them:
///
/// 1. [`pre_invoke`](Self::pre_invoke): request line, identity, headers, body
/// 2. [`pre_sor_invoke`](Self::pre_sor_invoke): system of record
/// 3. [`post_sor_invoke`](Self::post_sor_invoke): updated SoR identifier
/// 4. [`post_invoke`](Self::post_invoke): response, then the line is written
///
/// # Example
///
/// ```rust,no_run
/// use zosconnect_fslogger::interceptor::{ProviderInterceptor, ProviderRequest, ProviderResponse, RequestState};
/// use zosconnect_fslogger::InterceptorConfig;
///
/// let interceptor = ProviderInterceptor::activate(InterceptorConfig::new("api1", "/var/log/zosconnect"));
///
/// let mut state = RequestState::new();
/// interceptor.pre_invoke(&mut state, &ProviderRequest {
///     uri: Some("/api/v1/customers".to_string()),
///     method: Some("GET".to_string()),
///     ..Default::default()
/// });
/// interceptor.post_invoke(&mut state, &ProviderResponse {
///     status_code: Some(200),
///     ..Default::default()
/// });
/// ```
#[derive(Debug)]
pub struct ProviderInterceptor {
    core: LoggerCore,
}

impl ProviderInterceptor {
    /// Applies `config` and builds the writer.
    ///
    /// If the writer cannot be built the failure is logged and the interceptor
    /// stays inactive: every capture point becomes a no-op until a
    /// [`modify`](Self::modify) succeeds.
    #[must_use]
    pub fn activate(config: InterceptorConfig) -> Self {
        Self {
            core: LoggerCore::activate("FileSystemLoggerProviderInterceptor", config),
        }
    }

    /// Applies new settings; see [`InterceptorConfig::needs_writer_reinit`].
    pub fn modify(&mut self, config: InterceptorConfig) {
        self.core.modify(config);
    }

    /// Closes the writer. Later capture points are ignored, and a later
    /// [`modify`](Self::modify) does not reopen it.
    pub fn deactivate(&mut self) {
        self.core.deactivate();
    }

    #[must_use]
    pub fn name(&self) -> String {
        self.core.name()
    }

    #[must_use]
    pub const fn sequence(&self) -> i32 {
        self.core.config.sequence
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.core.is_active()
    }

    #[must_use]
    pub const fn config(&self) -> &InterceptorConfig {
        &self.core.config
    }

    #[must_use]
    pub const fn writer(&self) -> Option<&RollingFileWriter> {
        self.core.writer.as_ref()
    }

    /// Starts the entry for a new request.
    pub fn pre_invoke(&self, state: &mut RequestState<ProviderLogEntry>, request: &ProviderRequest) {
        if !self.is_active() {
            return;
        }

        let mut entry = ProviderLogEntry::new();
        if let Some(request_id) = request.request_id {
            entry.set_request_id(request_id);
        }
        if let Some(uri) = &request.uri {
            entry.set_uri(uri.as_str());
        }
        if let Some(method) = &request.method {
            entry.set_method(method.as_str());
        }
        if let Some(query_string) = &request.query_string {
            entry.set_query_string(query_string.as_str());
        }
        if let Some(user) = &request.user {
            entry.set_user(user.as_str());
        }
        if let Some(mapped_user) = &request.mapped_user {
            entry.set_mapped_user(mapped_user.as_str());
        }
        self.core.capture_request(
            entry.request_mut(),
            &request.headers,
            request.payload.as_deref(),
        );

        state.begin(entry);
    }

    /// Records the system of record about to be invoked.
    pub fn pre_sor_invoke(&self, state: &mut RequestState<ProviderLogEntry>, sor: &SorInvocation) {
        if !self.is_active() {
            return;
        }
        let Some(entry) = state.entry_mut() else {
            return;
        };

        if let Some(identifier) = &sor.identifier {
            entry.set_sor_identifier(identifier.as_str());
        }
        if let Some(resource) = &sor.resource {
            entry.set_sor_resource(resource.as_str());
        }
        if let Some(reference) = &sor.reference {
            entry.set_sor_reference(reference.as_str());
        }
    }

    /// Updates the SoR identifier once the system of record has responded.
    pub fn post_sor_invoke(&self, state: &mut RequestState<ProviderLogEntry>, sor: &SorInvocation) {
        if !self.is_active() {
            return;
        }
        let Some(entry) = state.entry_mut() else {
            return;
        };

        if let Some(identifier) = &sor.identifier {
            entry.set_sor_identifier(identifier.as_str());
        }
    }

    /// Completes the entry with the response and writes it.
    pub fn post_invoke(&self, state: &mut RequestState<ProviderLogEntry>, response: &ProviderResponse) {
        if !self.is_active() {
            return;
        }
        let Some(mut entry) = state.finish() else {
            return;
        };

        if let Some(status_code) = response.status_code {
            entry.set_status_code(status_code);
        }
        if let Some(timed_out) = response.timed_out {
            entry.set_timed_out(timed_out);
        }
        self.core.capture_response(
            entry.response_mut(),
            &response.headers,
            response.payload.as_deref(),
        );

        self.core.write(&entry.to_json(), "post_invoke");
    }
}
