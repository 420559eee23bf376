//! Header whitelisting and ordered header capture.

use std::collections::HashSet;

/// Case-insensitive set of header names an interceptor is configured to log.
///
/// Names are stored lowercased; incoming header names are lowercased only for
/// the membership test, so the captured output keeps the casing the gateway
/// reported.
///
/// # Example
///
/// ```rust
/// use zosconnect_fslogger::record::HeaderWhitelist;
///
/// let whitelist = HeaderWhitelist::parse("Content-Type, X-Correlation-ID,,");
/// assert!(whitelist.contains("content-type"));
/// assert!(whitelist.contains("x-correlation-id"));
/// assert_eq!(whitelist.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderWhitelist {
    names: HashSet<String>,
}

impl HeaderWhitelist {
    /// Parses a comma-separated header list.
    ///
    /// Entries are trimmed and lowercased; empty entries are dropped.
    #[must_use]
    pub fn parse(list: &str) -> Self {
        Self::from_names(list.split(','))
    }

    /// Builds a whitelist from individual header names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .map(|name| name.as_ref().trim().to_lowercase())
            .filter(|name| !name.is_empty())
            .collect();
        Self { names }
    }

    /// Returns `true` if `name` is whitelisted, ignoring case.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(&name.to_lowercase())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Filters `headers` down to the whitelisted entries, preserving order and
    /// the original name casing.
    ///
    /// An empty whitelist captures nothing without inspecting the input.
    pub fn capture<I, K, V>(&self, headers: I) -> CapturedHeaders
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut captured = CapturedHeaders::default();
        if self.is_empty() {
            return captured;
        }
        for (name, value) in headers {
            if self.contains(name.as_ref()) {
                captured.insert(name.as_ref(), value.as_ref());
            }
        }
        captured
    }
}

/// Header name/value pairs in the order they were captured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedHeaders {
    entries: Vec<(String, String)>,
}

impl CapturedHeaders {
    /// Adds a header, replacing the value of an identically named entry in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Looks up a header value, ignoring case.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CapturedHeaders {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut headers = Self::default();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_lowercases_and_drops_empty_entries() {
        let whitelist = HeaderWhitelist::parse(" Content-Type ,ACCEPT,, ,x-trace");
        assert_eq!(whitelist.len(), 3);
        assert!(whitelist.contains("Content-Type"));
        assert!(whitelist.contains("accept"));
        assert!(whitelist.contains("X-TRACE"));
        assert!(HeaderWhitelist::parse("").is_empty());
        assert!(HeaderWhitelist::parse(" , ").is_empty());
    }

    #[test]
    fn capture_matches_case_insensitively_and_keeps_original_case() {
        let whitelist = HeaderWhitelist::parse("content-type,authorization");
        let captured = whitelist.capture([
            ("Authorization", "Bearer token123"),
            ("Accept", "*/*"),
            ("Content-Type", "application/json"),
        ]);

        let entries: Vec<_> = captured.iter().collect();
        assert_eq!(
            entries,
            vec![
                ("Authorization", "Bearer token123"),
                ("Content-Type", "application/json"),
            ]
        );
        assert_eq!(captured.get("content-type"), Some("application/json"));
    }

    #[test]
    fn capture_with_empty_whitelist_is_empty() {
        let captured = HeaderWhitelist::default().capture([("Accept", "*/*")]);
        assert!(captured.is_empty());
    }

    #[test]
    fn capture_with_no_matches_is_empty() {
        let captured = HeaderWhitelist::parse("x-missing").capture([("Accept", "*/*")]);
        assert!(captured.is_empty());
    }

    #[test]
    fn insert_replaces_existing_name_in_place() {
        let mut headers = CapturedHeaders::default();
        headers.insert("A", "1");
        headers.insert("B", "2");
        headers.insert("A", "3");
        assert_eq!(headers.iter().collect::<Vec<_>>(), vec![("A", "3"), ("B", "2")]);
    }
}
