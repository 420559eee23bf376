//! Purpose-built JSON writer for log entries.
//!
//! Log entries have a fixed, shallow shape: string, integer and boolean
//! members, nested objects, and header maps whose keys must keep their capture
//! order. [`JsonObject`] writes exactly that shape straight into a `String`,
//! handling member separators so callers only decide *whether* a member is
//! present.

use chrono::{DateTime, Utc};
use std::fmt::{Display, Write as _};

use super::headers::CapturedHeaders;

/// Output format for entry timestamps (`yyyy-MM-ddTHH:mm:ss.sssZ`, UTC).
const ISO_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Formats epoch milliseconds as an ISO-8601 UTC timestamp with millisecond
/// precision and a literal `Z` suffix.
///
/// Values outside chrono's representable range fall back to the Unix epoch so
/// serialization never fails.
///
/// # Example
///
/// ```rust
/// use zosconnect_fslogger::record::format_timestamp;
///
/// assert_eq!(format_timestamp(1_234_567_890_000), "2009-02-13T23:31:30.000Z");
/// ```
#[must_use]
pub fn format_timestamp(epoch_millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(epoch_millis)
        .unwrap_or_default()
        .format(ISO_TIMESTAMP_FORMAT)
        .to_string()
}

/// Appends `value` to `out` as a quoted, escaped JSON string.
///
/// Quote, backslash, backspace, form feed, newline, carriage return and tab
/// use their two-character escapes. Remaining control characters below
/// `0x20` become `\u00XX`. Everything else, multi-byte UTF-8 included, is
/// copied through unchanged.
pub fn write_escaped(out: &mut String, value: &str) {
    out.reserve(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if u32::from(c) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Incremental writer for one JSON object.
///
/// Created through [`JsonObject::render`], which opens the brace, hands the
/// object to a closure and closes the brace afterwards. Nested objects are
/// written the same way through [`JsonObject::object`], so every opened brace
/// is closed on every path.
pub struct JsonObject<'a> {
    out: &'a mut String,
    empty: bool,
}

impl<'a> JsonObject<'a> {
    /// Renders a complete top-level object into a new `String`.
    pub fn render(build: impl FnOnce(&mut JsonObject<'_>)) -> String {
        let mut out = String::with_capacity(256);
        JsonObject::write_into(&mut out, build);
        out
    }

    fn write_into(out: &mut String, build: impl FnOnce(&mut JsonObject<'_>)) {
        out.push('{');
        let mut object = JsonObject { out, empty: true };
        build(&mut object);
        object.out.push('}');
    }

    fn key(&mut self, key: &str) {
        if !self.empty {
            self.out.push(',');
        }
        self.empty = false;
        write_escaped(self.out, key);
        self.out.push(':');
    }

    /// Writes a string member.
    pub fn string(&mut self, key: &str, value: &str) {
        self.key(key);
        write_escaped(self.out, value);
    }

    /// Writes a string member only when `value` is present.
    pub fn opt_string(&mut self, key: &str, value: Option<&str>) {
        if let Some(value) = value {
            self.string(key, value);
        }
    }

    /// Writes a bare numeric member.
    pub fn number(&mut self, key: &str, value: impl Display) {
        self.key(key);
        let _ = write!(self.out, "{value}");
    }

    /// Writes a numeric member only when `value` is present.
    pub fn opt_number<N: Display>(&mut self, key: &str, value: Option<N>) {
        if let Some(value) = value {
            self.number(key, value);
        }
    }

    /// Writes a boolean member.
    pub fn boolean(&mut self, key: &str, value: bool) {
        self.key(key);
        self.out.push_str(if value { "true" } else { "false" });
    }

    /// Writes a nested object member, always emitted (possibly as `{}`).
    pub fn object(&mut self, key: &str, build: impl FnOnce(&mut JsonObject<'_>)) {
        self.key(key);
        JsonObject::write_into(self.out, build);
    }

    /// Writes captured headers as an object keyed in capture order.
    ///
    /// Nothing is written when no headers were captured.
    pub fn headers(&mut self, key: &str, headers: &CapturedHeaders) {
        if headers.is_empty() {
            return;
        }
        self.object(key, |object| {
            for (name, value) in headers.iter() {
                object.string(name, value);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escaped(value: &str) -> String {
        let mut out = String::new();
        write_escaped(&mut out, value);
        out
    }

    #[test]
    fn formats_epoch_millis_as_utc_iso() {
        assert_eq!(format_timestamp(1_234_567_890_000), "2009-02-13T23:31:30.000Z");
        assert_eq!(format_timestamp(1_234_567_890_123), "2009-02-13T23:31:30.123Z");
        assert_eq!(format_timestamp(0), "1970-01-01T00:00:00.000Z");
    }

    #[test]
    fn out_of_range_timestamp_falls_back_to_epoch() {
        assert_eq!(format_timestamp(i64::MAX), "1970-01-01T00:00:00.000Z");
    }

    #[test]
    fn escapes_short_form_characters() {
        assert_eq!(escaped("a\"b"), r#""a\"b""#);
        assert_eq!(escaped("a\\b"), r#""a\\b""#);
        assert_eq!(escaped("\u{08}\u{0C}\n\r\t"), r#""\b\f\n\r\t""#);
    }

    #[test]
    fn escapes_other_control_characters_as_unicode() {
        assert_eq!(escaped("\u{01}"), r#""\u0001""#);
        assert_eq!(escaped("\u{1f}"), r#""\u001f""#);
    }

    #[test]
    fn passes_multibyte_text_through() {
        assert_eq!(escaped("日本語 中文 한국어 é"), "\"日本語 中文 한국어 é\"");
        assert_eq!(escaped("\u{7f}"), "\"\u{7f}\"");
    }

    #[test]
    fn separates_members_and_nests_objects() {
        let json = JsonObject::render(|root| {
            root.string("a", "x");
            root.opt_string("skipped", None);
            root.number("n", 42);
            root.object("inner", |inner| {
                inner.boolean("flag", true);
                inner.opt_number::<u32>("missing", None);
            });
            root.object("empty", |_| {});
        });
        assert_eq!(json, r#"{"a":"x","n":42,"inner":{"flag":true},"empty":{}}"#);
    }

    #[test]
    fn empty_headers_are_omitted() {
        let json = JsonObject::render(|root| root.headers("headers", &CapturedHeaders::default()));
        assert_eq!(json, "{}");
    }
}
