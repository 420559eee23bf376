//! Data supplied by the gateway at each capture point.
//!
//! These are plain snapshots of what the gateway knows at a given point in a
//! request's lifecycle. Headers are passed in the order the gateway reports
//! them; payloads are `None` when no body was observed.

use crate::record::{CicsDetails, ImsDetails};

/// Inbound API request, available before the provider invokes the backend.
#[derive(Debug, Clone, Default)]
pub struct ProviderRequest {
    pub request_id: Option<u64>,
    pub uri: Option<String>,
    pub method: Option<String>,
    pub query_string: Option<String>,
    /// Authenticated principal name.
    pub user: Option<String>,
    /// Identity the principal was mapped to for the system of record.
    pub mapped_user: Option<String>,
    pub headers: Vec<(String, String)>,
    pub payload: Option<String>,
}

/// System of record the provider request is routed to.
#[derive(Debug, Clone, Default)]
pub struct SorInvocation {
    pub identifier: Option<String>,
    pub resource: Option<String>,
    pub reference: Option<String>,
}

/// Outcome of an API provider request.
#[derive(Debug, Clone, Default)]
pub struct ProviderResponse {
    pub status_code: Option<u16>,
    pub timed_out: Option<bool>,
    pub headers: Vec<(String, String)>,
    pub payload: Option<String>,
}

/// Outbound API requester call, available before the endpoint is contacted.
#[derive(Debug, Clone, Default)]
pub struct RequesterRequest {
    pub request_id: Option<u64>,
    /// Application family discriminant, e.g. `"CICS"` or `"IMS"`.
    pub request_type: Option<String>,
    pub jobname: Option<String>,
    pub jobid: Option<String>,
    pub sysname: Option<String>,
    /// Only consulted when `request_type` is `"CICS"`.
    pub cics: CicsDetails,
    /// Only consulted when `request_type` is `"IMS"`.
    pub ims: ImsDetails,
    pub user: Option<String>,
    pub mapped_user: Option<String>,
    pub headers: Vec<(String, String)>,
    pub payload: Option<String>,
}

/// Backend endpoint about to be called.
#[derive(Debug, Clone, Default)]
pub struct EndpointInvocation {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub method: Option<String>,
    pub full_path: Option<String>,
    pub query_string: Option<String>,
}

/// Response returned to the calling application.
#[derive(Debug, Clone, Default)]
pub struct RequesterResponse {
    pub headers: Vec<(String, String)>,
    pub payload: Option<String>,
}
