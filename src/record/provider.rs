//! Log entry for an inbound API provider request.

use chrono::Utc;
use std::fmt;

use super::json::{format_timestamp, JsonObject};
use super::message::MessageCapture;

/// System of record the API request was routed to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SorDetails {
    pub identifier: Option<String>,
    pub resource: Option<String>,
    pub reference: Option<String>,
}

impl SorDetails {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.identifier.is_none() && self.resource.is_none() && self.reference.is_none()
    }
}

/// Structured record of one API provider request/response cycle.
///
/// Built up across the provider capture points and serialized once with
/// [`ProviderLogEntry::to_json`]:
///
/// ```json
/// {"timestamp":"2009-02-13T23:31:30.000Z","requestId":7,"user":"alice",
///  "request":{"uri":"/api/v1/customers","method":"GET","size":0},
///  "sor":{"identifier":"CICS01"},
///  "response":{"statusCode":200,"timedOut":true}}
/// ```
///
/// Every member except `timestamp`, `request` and `response` is omitted when
/// unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderLogEntry {
    timestamp: i64,
    request_id: Option<u64>,
    user: Option<String>,
    mapped_user: Option<String>,
    uri: Option<String>,
    method: Option<String>,
    query_string: Option<String>,
    request: MessageCapture,
    sor: SorDetails,
    status_code: Option<u16>,
    response: MessageCapture,
    timed_out: bool,
}

impl Default for ProviderLogEntry {
    fn default() -> Self {
        Self::with_timestamp(0)
    }
}

impl ProviderLogEntry {
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
            uri: None,
            method: None,
            query_string: None,
            request: MessageCapture::default(),
            sor: SorDetails::default(),
            status_code: None,
            response: MessageCapture::default(),
            timed_out: false,
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

    pub fn set_uri(&mut self, uri: impl Into<String>) {
        self.uri = Some(uri.into());
    }

    pub fn set_method(&mut self, method: impl Into<String>) {
        self.method = Some(method.into());
    }

    pub fn set_query_string(&mut self, query_string: impl Into<String>) {
        self.query_string = Some(query_string.into());
    }

    pub fn set_sor_identifier(&mut self, identifier: impl Into<String>) {
        self.sor.identifier = Some(identifier.into());
    }

    pub fn set_sor_resource(&mut self, resource: impl Into<String>) {
        self.sor.resource = Some(resource.into());
    }

    pub fn set_sor_reference(&mut self, reference: impl Into<String>) {
        self.sor.reference = Some(reference.into());
    }

    pub fn set_status_code(&mut self, status_code: u16) {
        self.status_code = Some(status_code);
    }

    pub fn set_timed_out(&mut self, timed_out: bool) {
        self.timed_out = timed_out;
    }

    /// Request headers, body and size.
    pub fn request_mut(&mut self) -> &mut MessageCapture {
        &mut self.request
    }

    /// Response headers, body and size.
    pub fn response_mut(&mut self) -> &mut MessageCapture {
        &mut self.response
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
    pub const fn sor(&self) -> &SorDetails {
        &self.sor
    }

    #[must_use]
    pub const fn request(&self) -> &MessageCapture {
        &self.request
    }

    #[must_use]
    pub const fn response(&self) -> &MessageCapture {
        &self.response
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
                request.opt_string("uri", self.uri.as_deref());
                request.opt_string("method", self.method.as_deref());
                request.opt_string("queryString", self.query_string.as_deref());
                self.request.write_members(request);
            });

            if !self.sor.is_empty() {
                root.object("sor", |sor| {
                    sor.opt_string("identifier", self.sor.identifier.as_deref());
                    sor.opt_string("resource", self.sor.resource.as_deref());
                    sor.opt_string("reference", self.sor.reference.as_deref());
                });
            }

            root.object("response", |response| {
                response.opt_number("statusCode", self.status_code);
                self.response.write_members(response);
                if self.timed_out {
                    response.boolean("timedOut", true);
                }
            });
        })
    }
}

impl fmt::Display for ProviderLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::CapturedHeaders;
    use serde_json::Value;

    const EPOCH_MILLIS: i64 = 1_234_567_890_000;

    fn parse(json: &str) -> Value {
        serde_json::from_str(json).expect("entry should be valid JSON")
    }

    #[test]
    fn timestamp_only_entry_has_empty_request_and_response() {
        let entry = ProviderLogEntry::with_timestamp(EPOCH_MILLIS);
        assert_eq!(
            entry.to_json(),
            r#"{"timestamp":"2009-02-13T23:31:30.000Z","request":{},"response":{}}"#
        );
    }

    #[test]
    fn scalar_members_follow_timestamp_in_order() {
        let mut entry = ProviderLogEntry::with_timestamp(EPOCH_MILLIS);
        entry.set_mapped_user("TESTUSER");
        entry.set_user("testuser");
        entry.set_request_id(42);
        assert_eq!(
            entry.to_json(),
            concat!(
                r#"{"timestamp":"2009-02-13T23:31:30.000Z","requestId":42,"#,
                r#""user":"testuser","mappedUser":"TESTUSER","request":{},"response":{}}"#
            )
        );
    }

    #[test]
    fn request_fields_precede_headers_body_and_size() {
        let mut entry = ProviderLogEntry::with_timestamp(EPOCH_MILLIS);
        entry.set_uri("/api/v1/orders/123");
        entry.set_method("POST");
        entry.set_query_string("verbose=true");
        let request = entry.request_mut();
        request.set_headers(CapturedHeaders::from_iter([
            ("Content-Type", "application/json"),
            ("Authorization", "Bearer token123"),
        ]));
        request.record_payload(r#"{"name":"John","age":30}"#, true);

        let json = entry.to_json();
        assert!(json.contains(concat!(
            r#""request":{"uri":"/api/v1/orders/123","method":"POST","queryString":"verbose=true","#,
            r#""headers":{"Content-Type":"application/json","Authorization":"Bearer token123"},"#,
            r#""body":"{\"name\":\"John\",\"age\":30}","size":24}"#
        )));
    }

    #[test]
    fn size_is_emitted_without_body() {
        let mut entry = ProviderLogEntry::with_timestamp(EPOCH_MILLIS);
        entry.request_mut().record_payload("0123456789", false);
        let value = parse(&entry.to_json());
        assert_eq!(value["request"]["size"], 10);
        assert!(value["request"].get("body").is_none());
    }

    #[test]
    fn sor_is_emitted_between_request_and_response() {
        let mut entry = ProviderLogEntry::with_timestamp(EPOCH_MILLIS);
        entry.set_sor_identifier("CICS01");
        entry.set_sor_resource("CUSTOMER");
        entry.set_sor_reference("REF123");
        assert_eq!(
            entry.to_json(),
            concat!(
                r#"{"timestamp":"2009-02-13T23:31:30.000Z","request":{},"#,
                r#""sor":{"identifier":"CICS01","resource":"CUSTOMER","reference":"REF123"},"#,
                r#""response":{}}"#
            )
        );
    }

    #[test]
    fn partial_sor_only_emits_set_fields() {
        let mut entry = ProviderLogEntry::with_timestamp(EPOCH_MILLIS);
        entry.set_sor_reference("REF123");
        assert!(entry.to_json().contains(r#""sor":{"reference":"REF123"}"#));
    }

    #[test]
    fn response_carries_status_headers_body_size_and_timeout() {
        let mut entry = ProviderLogEntry::with_timestamp(EPOCH_MILLIS);
        entry.set_status_code(201);
        entry.set_timed_out(true);
        let response = entry.response_mut();
        response.set_headers(CapturedHeaders::from_iter([("Cache-Control", "no-cache")]));
        response.record_payload(r#"{"status":"success"}"#, true);

        let json = entry.to_json();
        assert!(json.ends_with(concat!(
            r#""response":{"statusCode":201,"headers":{"Cache-Control":"no-cache"},"#,
            r#""body":"{\"status\":\"success\"}","size":20,"timedOut":true}}"#
        )));
    }

    #[test]
    fn timed_out_is_omitted_when_false() {
        let mut entry = ProviderLogEntry::with_timestamp(EPOCH_MILLIS);
        entry.set_timed_out(false);
        assert!(!entry.to_json().contains("timedOut"));
    }

    #[test]
    fn body_escaping_and_unicode() {
        let mut entry = ProviderLogEntry::with_timestamp(EPOCH_MILLIS);
        entry.request_mut().set_body("q\" b\\ n\n t\t c\u{01}");
        entry.response_mut().set_body("日本語 中文 한국어");

        let json = entry.to_json();
        assert!(json.contains(r#""body":"q\" b\\ n\n t\t c\u0001""#));
        assert!(json.contains("日本語 中文 한국어"));

        let value = parse(&json);
        assert_eq!(value["request"]["body"], "q\" b\\ n\n t\t c\u{01}");
        assert_eq!(value["response"]["body"], "日本語 中文 한국어");
    }

    #[test]
    fn serialization_is_repeatable_and_display_matches() {
        let mut entry = ProviderLogEntry::with_timestamp(EPOCH_MILLIS);
        entry.set_uri("/api");
        entry.set_status_code(404);
        assert_eq!(entry.to_json(), entry.to_json());
        assert_eq!(entry.to_string(), entry.to_json());
        assert_eq!(entry.status_code(), Some(404));
    }
}
