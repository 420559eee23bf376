//! Headers, body and size captured for one side of an exchange.

use super::headers::CapturedHeaders;
use super::json::JsonObject;

/// Payload details for a request or a response.
///
/// The body is optional and stored only when body inclusion is enabled; the
/// size is recorded whenever a payload was observed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageCapture {
    headers: CapturedHeaders,
    body: Option<String>,
    size: Option<u64>,
}

impl MessageCapture {
    pub fn set_headers(&mut self, headers: CapturedHeaders) {
        self.headers = headers;
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = Some(body.into());
    }

    pub fn set_size(&mut self, size: u64) {
        self.size = Some(size);
    }

    /// Records an observed payload.
    ///
    /// The UTF-8 byte length is always kept; the text itself only when
    /// `include_body` is set.
    pub fn record_payload(&mut self, payload: &str, include_body: bool) {
        self.size = Some(payload.len() as u64);
        if include_body {
            self.body = Some(payload.to_owned());
        }
    }

    #[must_use]
    pub const fn headers(&self) -> &CapturedHeaders {
        &self.headers
    }

    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    #[must_use]
    pub const fn size(&self) -> Option<u64> {
        self.size
    }

    /// Writes `headers`, `body` and `size` members, each only when present.
    pub(crate) fn write_members(&self, object: &mut JsonObject<'_>) {
        object.headers("headers", &self.headers);
        object.opt_string("body", self.body.as_deref());
        object.opt_number("size", self.size);
    }
}
