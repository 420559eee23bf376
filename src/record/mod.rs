//! Structured log entries and their JSON serialization.
//!
//! One entry is created per request/response cycle, filled in additively by
//! the capture points of a single in-flight request, serialized once, and
//! handed to the writer as one line.
//!
//! # Modules
//!
//! - [`provider`]: inbound API request entries ([`ProviderLogEntry`])
//! - [`requester`]: outbound backend call entries ([`RequesterLogEntry`])
//! - [`headers`]: case-insensitive header whitelisting and ordered capture
//! - `message`: headers, body and size for one side of an exchange
//! - `json`: the JSON writer both entry types serialize through

pub mod headers;
mod json;
mod message;
pub mod provider;
pub mod requester;

pub use headers::{CapturedHeaders, HeaderWhitelist};
pub use json::{format_timestamp, write_escaped};
pub use message::MessageCapture;
pub use provider::{ProviderLogEntry, SorDetails};
pub use requester::{
    CicsDetails, EndpointDetails, ImsDetails, MvsDetails, RequestType, RequesterLogEntry,
};
