//! Interceptor for outbound API requester calls.

use crate::config::InterceptorConfig;
use crate::record::RequesterLogEntry;
use crate::writer::RollingFileWriter;

use super::exchange::{EndpointInvocation, RequesterRequest, RequesterResponse};
use super::{LoggerCore, RequestState};

/// Logs every API requester call as one [`RequesterLogEntry`] line.
///
/// Capture points, in the order the gateway calls them:
///
/// 1. [`pre_invoke`](Self::pre_invoke): calling application, headers, body
/// 2. [`pre_endpoint_invoke`](Self::pre_endpoint_invoke): backend endpoint
/// 3. [`post_endpoint_invoke`](Self::post_endpoint_invoke): endpoint status
/// 4. [`post_invoke`](Self::post_invoke): response, then the line is written
#[derive(Debug)]
pub struct RequesterInterceptor {
    core: LoggerCore,
}

impl RequesterInterceptor {
    /// Applies `config` and builds the writer.
    ///
    /// A writer that cannot be built leaves the interceptor inactive.
    #[must_use]
    pub fn activate(config: InterceptorConfig) -> Self {
        Self {
            core: LoggerCore::activate("FileSystemLoggerRequesterInterceptor", config),
        }
    }

    pub fn modify(&mut self, config: InterceptorConfig) {
        self.core.modify(config);
    }

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

    /// Starts the entry for a new outbound call.
    ///
    /// CICS and IMS details are copied only when `request_type` names that
    /// family.
    pub fn pre_invoke(&self, state: &mut RequestState<RequesterLogEntry>, request: &RequesterRequest) {
        if !self.is_active() {
            return;
        }

        let mut entry = RequesterLogEntry::new();
        if let Some(request_id) = request.request_id {
            entry.set_request_id(request_id);
        }
        if let Some(user) = &request.user {
            entry.set_user(user.as_str());
        }
        if let Some(mapped_user) = &request.mapped_user {
            entry.set_mapped_user(mapped_user.as_str());
        }

        if let Some(request_type) = &request.request_type {
            entry.set_request_type(request_type);
        }
        if let Some(cics) = entry.cics_mut() {
            cics.clone_from(&request.cics);
        }
        if let Some(ims) = entry.ims_mut() {
            ims.clone_from(&request.ims);
        }

        let mvs = entry.mvs_mut();
        mvs.jobname.clone_from(&request.jobname);
        mvs.jobid.clone_from(&request.jobid);
        mvs.sysname.clone_from(&request.sysname);

        self.core.capture_request(
            entry.request_mut(),
            &request.headers,
            request.payload.as_deref(),
        );

        state.begin(entry);
    }

    /// Records the backend endpoint about to be called.
    pub fn pre_endpoint_invoke(
        &self,
        state: &mut RequestState<RequesterLogEntry>,
        endpoint: &EndpointInvocation,
    ) {
        if !self.is_active() {
            return;
        }
        let Some(entry) = state.entry_mut() else {
            return;
        };

        let details = entry.endpoint_mut();
        details.host.clone_from(&endpoint.host);
        details.port = endpoint.port;
        details.method.clone_from(&endpoint.method);
        details.path.clone_from(&endpoint.full_path);
        details.query_string.clone_from(&endpoint.query_string);
    }

    /// Records the HTTP status returned by the endpoint.
    pub fn post_endpoint_invoke(
        &self,
        state: &mut RequestState<RequesterLogEntry>,
        status_code: Option<u16>,
    ) {
        if !self.is_active() {
            return;
        }
        let Some(entry) = state.entry_mut() else {
            return;
        };

        if let Some(status_code) = status_code {
            entry.set_status_code(status_code);
        }
    }

    /// Completes the entry with the response and writes it.
    pub fn post_invoke(
        &self,
        state: &mut RequestState<RequesterLogEntry>,
        response: &RequesterResponse,
    ) {
        if !self.is_active() {
            return;
        }
        let Some(mut entry) = state.finish() else {
            return;
        };

        self.core.capture_response(
            entry.response_mut(),
            &response.headers,
            response.payload.as_deref(),
        );

        self.core.write(&entry.to_json(), "post_invoke");
    }
}
