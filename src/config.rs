//! Interceptor configuration.
//!
//! The gateway hands each interceptor instance a flat property map when it is
//! activated or modified. The same settings can also be kept in a TOML file:
//!
//! ```toml
//! id = "api1"
//! logDirectory = "/var/log/zosconnect"
//! maxFileSize = 10485760
//! maxFileCount = 10
//! requestHeaders = "Content-Type, X-Correlation-ID"
//! responseHeaders = "Content-Type"
//! includeBody = false
//! traceLevel = "info"
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::domain::{FsLoggerError, Result};
use crate::record::HeaderWhitelist;
use crate::writer::{DEFAULT_MAX_FILE_COUNT, DEFAULT_MAX_FILE_SIZE};

/// Settings for one file system logger interceptor instance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterceptorConfig {
    /// Identity of this instance; embedded in every log file name.
    pub id: String,

    /// Position of the interceptor in the gateway's interceptor chain.
    #[serde(default)]
    pub sequence: i32,

    /// Existing, writable directory receiving the log files.
    pub log_directory: PathBuf,

    /// Size in bytes at which a new file is started. Default: 10 MB
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    /// Number of files kept for this identity. Default: 10
    #[serde(default = "default_max_file_count")]
    pub max_file_count: usize,

    /// Comma-separated request header names to capture (case-insensitive).
    #[serde(default)]
    pub request_headers: String,

    /// Comma-separated response header names to capture (case-insensitive).
    #[serde(default)]
    pub response_headers: String,

    /// Whether request and response bodies are written to the log.
    ///
    /// Payload sizes are recorded either way.
    #[serde(default)]
    pub include_body: bool,

    /// Diagnostic log level (`trace`, `debug`, `info`, `warn`, `error`).
    #[serde(default)]
    pub trace_level: Option<String>,
}

const fn default_max_file_size() -> u64 {
    DEFAULT_MAX_FILE_SIZE
}

const fn default_max_file_count() -> usize {
    DEFAULT_MAX_FILE_COUNT
}

impl InterceptorConfig {
    /// Creates a configuration with defaults for every optional setting.
    #[must_use]
    pub fn new(id: impl Into<String>, log_directory: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            sequence: 0,
            log_directory: log_directory.into(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_file_count: DEFAULT_MAX_FILE_COUNT,
            request_headers: String::new(),
            response_headers: String::new(),
            include_body: false,
            trace_level: None,
        }
    }

    /// Parses configuration from the gateway's property map.
    ///
    /// `id` and `logDirectory` are required. Numeric and boolean values that
    /// fail to parse fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`FsLoggerError::Config`] if a required property is missing.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use zosconnect_fslogger::InterceptorConfig;
    ///
    /// let mut properties = BTreeMap::new();
    /// properties.insert("id".to_string(), "api1".to_string());
    /// properties.insert("logDirectory".to_string(), "/var/log/zosconnect".to_string());
    /// properties.insert("maxFileCount".to_string(), "3".to_string());
    ///
    /// let config = InterceptorConfig::from_properties(&properties)?;
    /// assert_eq!(config.max_file_count, 3);
    /// assert_eq!(config.max_file_size, 10 * 1024 * 1024);
    /// # Ok::<(), zosconnect_fslogger::FsLoggerError>(())
    /// ```
    pub fn from_properties(properties: &BTreeMap<String, String>) -> Result<Self> {
        let id = properties
            .get("id")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| FsLoggerError::Config("id configuration is required".to_string()))?;

        let log_directory = properties
            .get("logDirectory")
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| {
                FsLoggerError::Config("logDirectory configuration is required".to_string())
            })?;

        Ok(Self {
            id,
            sequence: parse_or(properties, "sequence", 0),
            log_directory,
            max_file_size: parse_or(properties, "maxFileSize", DEFAULT_MAX_FILE_SIZE),
            max_file_count: parse_or(properties, "maxFileCount", DEFAULT_MAX_FILE_COUNT),
            request_headers: properties.get("requestHeaders").cloned().unwrap_or_default(),
            response_headers: properties.get("responseHeaders").cloned().unwrap_or_default(),
            include_body: parse_or(properties, "includeBody", false),
            trace_level: properties.get("traceLevel").cloned(),
        })
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`FsLoggerError::Config`] if the text is not valid TOML or a
    /// required key is missing.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| FsLoggerError::Config(format!("failed to parse configuration: {e}")))
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`FsLoggerError::Io`] if the file cannot be read, or
    /// [`FsLoggerError::Config`] if its contents are invalid.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    #[must_use]
    pub fn request_header_whitelist(&self) -> HeaderWhitelist {
        HeaderWhitelist::parse(&self.request_headers)
    }

    #[must_use]
    pub fn response_header_whitelist(&self) -> HeaderWhitelist {
        HeaderWhitelist::parse(&self.response_headers)
    }

    /// Returns `true` if moving from `self` to `other` requires a new writer.
    ///
    /// Header lists, body inclusion, sequence and trace level apply without one.
    #[must_use]
    pub fn needs_writer_reinit(&self, other: &Self) -> bool {
        self.id != other.id
            || self.log_directory != other.log_directory
            || self.max_file_size != other.max_file_size
            || self.max_file_count != other.max_file_count
    }
}

fn parse_or<T: std::str::FromStr>(properties: &BTreeMap<String, String>, key: &str, default: T) -> T {
    properties
        .get(key)
        .and_then(|s| s.trim().parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn properties(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn new_applies_defaults() {
        let config = InterceptorConfig::new("api1", "/tmp/logs");
        assert_eq!(config.max_file_size, 10_485_760);
        assert_eq!(config.max_file_count, 10);
        assert!(!config.include_body);
        assert!(config.request_header_whitelist().is_empty());
        assert!(config.response_header_whitelist().is_empty());
    }

    #[test]
    fn from_properties_reads_all_settings() {
        let config = InterceptorConfig::from_properties(&properties(&[
            ("id", "api1"),
            ("sequence", "2"),
            ("logDirectory", "/tmp/logs"),
            ("maxFileSize", "2048"),
            ("maxFileCount", "4"),
            ("requestHeaders", "Content-Type,Authorization"),
            ("responseHeaders", "Cache-Control"),
            ("includeBody", "true"),
            ("traceLevel", "debug"),
        ]))
        .unwrap();

        assert_eq!(config.id, "api1");
        assert_eq!(config.sequence, 2);
        assert_eq!(config.log_directory, PathBuf::from("/tmp/logs"));
        assert_eq!(config.max_file_size, 2048);
        assert_eq!(config.max_file_count, 4);
        assert!(config.include_body);
        assert_eq!(config.trace_level.as_deref(), Some("debug"));
        assert!(config.request_header_whitelist().contains("authorization"));
        assert!(config.response_header_whitelist().contains("CACHE-CONTROL"));
    }

    #[test]
    fn from_properties_falls_back_on_unparseable_values() {
        let config = InterceptorConfig::from_properties(&properties(&[
            ("id", "api1"),
            ("logDirectory", "/tmp/logs"),
            ("maxFileSize", "big"),
            ("includeBody", "maybe"),
        ]))
        .unwrap();
        assert_eq!(config.max_file_size, DEFAULT_MAX_FILE_SIZE);
        assert!(!config.include_body);
    }

    #[test]
    fn from_properties_requires_id_and_directory() {
        let missing_dir = InterceptorConfig::from_properties(&properties(&[("id", "api1")]));
        assert!(matches!(missing_dir, Err(FsLoggerError::Config(ref msg)) if msg.contains("logDirectory")));

        let missing_id = InterceptorConfig::from_properties(&properties(&[("logDirectory", "/tmp")]));
        assert!(matches!(missing_id, Err(FsLoggerError::Config(ref msg)) if msg.contains("id")));
    }

    #[test]
    fn from_toml_str_applies_defaults() {
        let config = InterceptorConfig::from_toml_str(
            r#"
            id = "api1"
            logDirectory = "/tmp/logs"
            requestHeaders = "Content-Type"
            "#,
        )
        .unwrap();
        assert_eq!(config.max_file_size, DEFAULT_MAX_FILE_SIZE);
        assert_eq!(config.max_file_count, DEFAULT_MAX_FILE_COUNT);
        assert_eq!(config.request_headers, "Content-Type");
        assert_eq!(config.sequence, 0);
    }

    #[test]
    fn from_toml_str_rejects_missing_directory() {
        let err = InterceptorConfig::from_toml_str(r#"id = "api1""#).unwrap_err();
        assert!(matches!(err, FsLoggerError::Config(_)));
    }

    #[test]
    fn from_file_reads_toml() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("fslogger.toml");
        std::fs::write(&path, "id = \"api1\"\nlogDirectory = \"/tmp/logs\"\nmaxFileCount = 3\n").unwrap();
        let config = InterceptorConfig::from_file(&path).unwrap();
        assert_eq!(config.max_file_count, 3);

        let missing = InterceptorConfig::from_file(dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(FsLoggerError::Io(_))));
    }

    #[test]
    fn writer_reinit_only_for_writer_settings() {
        let base = InterceptorConfig::new("api1", "/tmp/logs");

        let mut headers_only = base.clone();
        headers_only.request_headers = "Accept".to_string();
        headers_only.include_body = true;
        headers_only.sequence = 5;
        assert!(!base.needs_writer_reinit(&headers_only));

        let mut resized = base.clone();
        resized.max_file_size = 1024;
        assert!(base.needs_writer_reinit(&resized));

        let mut moved = base.clone();
        moved.log_directory = PathBuf::from("/tmp/other");
        assert!(base.needs_writer_reinit(&moved));

        let mut renamed = base.clone();
        renamed.id = "api2".to_string();
        assert!(base.needs_writer_reinit(&renamed));
    }
}
