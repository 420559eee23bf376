//! Log entry for an outbound API requester call to a backend endpoint.
//!
//! The application family issuing the call (CICS, IMS, or anything else) is
//! modelled by [`RequestType`]. Family-specific details live inside the
//! matching variant, so a CICS-typed entry has nowhere to store IMS details
//! and the serialized `request` object can only ever carry the sub-object of
//! the family that was declared.

use chrono::Utc;
use std::fmt;

use super::json::{format_timestamp, JsonObject};
use super::message::MessageCapture;

/// Discriminant string for CICS requests.
pub const CICS_REQUEST_TYPE: &str = "CICS";

/// Discriminant string for IMS requests.
pub const IMS_REQUEST_TYPE: &str = "IMS";

/// CICS region details for a CICS-originated call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CicsDetails {
    pub applid: Option<String>,
    pub task_number: Option<u32>,
    pub transid: Option<String>,
}

impl CicsDetails {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.applid.is_none() && self.task_number.is_none() && self.transid.is_none()
    }

    fn write_members(&self, object: &mut JsonObject<'_>) {
        object.opt_string("applid", self.applid.as_deref());
        object.opt_number("taskNumber", self.task_number);
        object.opt_string("transid", self.transid.as_deref());
    }
}

/// IMS region details for an IMS-originated call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImsDetails {
    pub identifier: Option<String>,
    pub region_id: Option<u32>,
    pub transname: Option<String>,
    pub appname: Option<String>,
    pub psbname: Option<String>,
}

impl ImsDetails {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.identifier.is_none()
            && self.region_id.is_none()
            && self.transname.is_none()
            && self.appname.is_none()
            && self.psbname.is_none()
    }

    fn write_members(&self, object: &mut JsonObject<'_>) {
        object.opt_string("identifier", self.identifier.as_deref());
        object.opt_number("regionId", self.region_id);
        object.opt_string("transname", self.transname.as_deref());
        object.opt_string("appname", self.appname.as_deref());
        object.opt_string("psbname", self.psbname.as_deref());
    }
}

/// Application family that issued the outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestType {
    Cics(CicsDetails),
    Ims(ImsDetails),
    /// Any other application type, carried verbatim.
    Other(String),
}

impl RequestType {
    /// Maps a discriminant string onto a variant with empty details.
    ///
    /// Matching is exact: `"CICS"` and `"IMS"` select their families, every
    /// other value (including differently-cased ones) becomes [`RequestType::Other`].
    #[must_use]
    pub fn from_discriminant(value: &str) -> Self {
        match value {
            CICS_REQUEST_TYPE => Self::Cics(CicsDetails::default()),
            IMS_REQUEST_TYPE => Self::Ims(ImsDetails::default()),
            other => Self::Other(other.to_owned()),
        }
    }

    /// The discriminant string written as `requestType`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Cics(_) => CICS_REQUEST_TYPE,
            Self::Ims(_) => IMS_REQUEST_TYPE,
            Self::Other(value) => value,
        }
    }

    fn write_details(&self, object: &mut JsonObject<'_>) {
        match self {
            Self::Cics(cics) if !cics.is_empty() => {
                object.object("cics", |group| cics.write_members(group));
            }
            Self::Ims(ims) if !ims.is_empty() => {
                object.object("ims", |group| ims.write_members(group));
            }
            _ => {}
        }
    }
}

/// Job and system identifiers of the address space issuing the call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MvsDetails {
    pub jobname: Option<String>,
    pub jobid: Option<String>,
    pub sysname: Option<String>,
}

/// Backend endpoint the call was sent to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointDetails {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub method: Option<String>,
    pub path: Option<String>,
    pub query_string: Option<String>,
}

impl EndpointDetails {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.host.is_none()
            && self.port.is_none()
            && self.method.is_none()
            && self.path.is_none()
            && self.query_string.is_none()
    }
}

/// Structured record of one API requester call cycle.
///
/// Top-level members, in output order: `timestamp`, `requestId`, `user`,
/// `mappedUser`, `request`, `endpoint`, `response`. The `request` object
/// carries `requestType`, the MVS identifiers, the family sub-object (`cics`
/// or `ims`), then `headers`, `body` and `size`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequesterLogEntry {
    timestamp: i64,
    request_id: Option<u64>,
    user: Option<String>,
    mapped_user: Option<String>,
    request_type: Option<RequestType>,
    mvs: MvsDetails,
    request: MessageCapture,
    endpoint: EndpointDetails,
    status_code: Option<u16>,
    response: MessageCapture,
}

impl Default for RequesterLogEntry {
    fn default() -> Self {
        Self::with_timestamp(0)
    }
}

impl RequesterLogEntry {
    /// Creates an entry stamped with the current time.
    #[must_use]
    pub fn new() -> Self {
        Self::with_timestamp(Utc::now().timestamp_millis())
    }

    /// Creates an entry stamped with `epoch_millis`.
    #[must_use]
    pub fn with_timestamp(epoch_millis: i64) -> Self {
        Self {
            timestamp: epoch_millis,
            request_id: None,
            user: None,
            mapped_user: None,
            request_type: None,
            mvs: MvsDetails::default(),
            request: MessageCapture::default(),
            endpoint: EndpointDetails::default(),
            status_code: None,
            response: MessageCapture::default(),
        }
    }

    pub fn set_timestamp(&mut self, epoch_millis: i64) {
        self.timestamp = epoch_millis;
    }

    pub fn set_request_id(&mut self, request_id: u64) {
        self.request_id = Some(request_id);
    }

    pub fn set_user(&mut self, user: impl Into<String>) {
        self.user = Some(user.into());
    }

    pub fn set_mapped_user(&mut self, mapped_user: impl Into<String>) {
        self.mapped_user = Some(mapped_user.into());
    }

    /// Declares the application family from its discriminant string.
    ///
    /// Re-declaring the same family keeps the details already captured;
    /// switching families discards them.
    pub fn set_request_type(&mut self, discriminant: &str) {
        if self.request_type().is_some_and(|current| current == discriminant) {
            return;
        }
        self.request_type = Some(RequestType::from_discriminant(discriminant));
    }

    /// The declared discriminant string, if any.
    #[must_use]
    pub fn request_type(&self) -> Option<&str> {
        self.request_type.as_ref().map(RequestType::as_str)
    }

    /// CICS details, available only on a CICS-typed entry.
    pub fn cics_mut(&mut self) -> Option<&mut CicsDetails> {
        match &mut self.request_type {
            Some(RequestType::Cics(cics)) => Some(cics),
            _ => None,
        }
    }

    /// IMS details, available only on an IMS-typed entry.
    pub fn ims_mut(&mut self) -> Option<&mut ImsDetails> {
        match &mut self.request_type {
            Some(RequestType::Ims(ims)) => Some(ims),
            _ => None,
        }
    }

    pub fn mvs_mut(&mut self) -> &mut MvsDetails {
        &mut self.mvs
    }

    pub fn endpoint_mut(&mut self) -> &mut EndpointDetails {
        &mut self.endpoint
    }

    /// Request headers, body and size.
    pub fn request_mut(&mut self) -> &mut MessageCapture {
        &mut self.request
    }

    /// Response headers, body and size.
    pub fn response_mut(&mut self) -> &mut MessageCapture {
        &mut self.response
    }

    pub fn set_status_code(&mut self, status_code: u16) {
        self.status_code = Some(status_code);
    }

    #[must_use]
    pub const fn timestamp(&self) -> i64 {
        self.timestamp
    }

    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    #[must_use]
    pub const fn endpoint(&self) -> &EndpointDetails {
        &self.endpoint
    }

    /// Serializes the entry as a single JSON object without a trailing newline.
    #[must_use]
    pub fn to_json(&self) -> String {
        JsonObject::render(|root| {
            root.string("timestamp", &format_timestamp(self.timestamp));
            root.opt_number("requestId", self.request_id);
            root.opt_string("user", self.user.as_deref());
            root.opt_string("mappedUser", self.mapped_user.as_deref());

            root.object("request", |request| {
                request.opt_string("requestType", self.request_type());
                request.opt_string("jobname", self.mvs.jobname.as_deref());
                request.opt_string("jobid", self.mvs.jobid.as_deref());
                request.opt_string("sysname", self.mvs.sysname.as_deref());
                if let Some(request_type) = &self.request_type {
                    request_type.write_details(request);
                }
                self.request.write_members(request);
            });

            if !self.endpoint.is_empty() {
                root.object("endpoint", |endpoint| {
                    endpoint.opt_string("host", self.endpoint.host.as_deref());
                    endpoint.opt_number("port", self.endpoint.port);
                    endpoint.opt_string("method", self.endpoint.method.as_deref());
                    endpoint.opt_string("path", self.endpoint.path.as_deref());
                    endpoint.opt_string("queryString", self.endpoint.query_string.as_deref());
                });
            }

            root.object("response", |response| {
                response.opt_number("statusCode", self.status_code);
                self.response.write_members(response);
            });
        })
    }
}

impl fmt::Display for RequesterLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json())
    }
}
