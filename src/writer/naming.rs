//! Log file naming.
//!
//! Files are named `zosconnect-<identity>-<YYYYMMDD>-<HHMMSS>[-<n>].log`. The
//! optional `-<n>` counter disambiguates files created within the same second.

use chrono::Local;

/// Fixed prefix shared by every log file.
pub const LOG_FILE_PREFIX: &str = "zosconnect";

/// Extension of every log file.
pub const LOG_FILE_SUFFIX: &str = ".log";

/// Local-time timestamp embedded in file names, second granularity.
const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Current local time formatted for a file name.
#[must_use]
pub fn file_timestamp_now() -> String {
    Local::now().format(FILE_TIMESTAMP_FORMAT).to_string()
}

/// Builds a log file name; `counter` is appended after the timestamp when set.
///
/// # Example
///
/// ```rust
/// use zosconnect_fslogger::writer::naming::log_file_name;
///
/// assert_eq!(log_file_name("api1", "20240102-030405", None), "zosconnect-api1-20240102-030405.log");
/// assert_eq!(log_file_name("api1", "20240102-030405", Some(2)), "zosconnect-api1-20240102-030405-2.log");
/// ```
#[must_use]
pub fn log_file_name(identity: &str, timestamp: &str, counter: Option<u32>) -> String {
    match counter {
        Some(counter) => {
            format!("{LOG_FILE_PREFIX}-{identity}-{timestamp}-{counter}{LOG_FILE_SUFFIX}")
        }
        None => format!("{LOG_FILE_PREFIX}-{identity}-{timestamp}{LOG_FILE_SUFFIX}"),
    }
}

/// Creation order of a log file, recovered from its name.
///
/// Orders by timestamp, then counter; a name without a counter is the first
/// file of its second and sorts before `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FileSequence {
    date: u32,
    time: u32,
    counter: u64,
}

/// Parses `file_name` as a log file written for `identity`.
///
/// The part after the identity prefix must be a complete
/// `<YYYYMMDD>-<HHMMSS>[-<n>]` stamp, so an identity never claims files that
/// belong to a longer identity sharing its prefix (`api` vs `api-v2`).
#[must_use]
pub fn parse_log_file_name(identity: &str, file_name: &str) -> Option<FileSequence> {
    let prefix = format!("{LOG_FILE_PREFIX}-{identity}-");
    let stamp = file_name
        .strip_prefix(prefix.as_str())?
        .strip_suffix(LOG_FILE_SUFFIX)?;

    let mut parts = stamp.split('-');
    let date = parse_digits(parts.next()?, Some(8))?;
    let time = parse_digits(parts.next()?, Some(6))?;
    let counter = match parts.next() {
        Some(counter) => parse_digits(counter, None)?,
        None => 0,
    };
    if parts.next().is_some() {
        return None;
    }

    Some(FileSequence {
        date: u32::try_from(date).ok()?,
        time: u32::try_from(time).ok()?,
        counter,
    })
}

fn parse_digits(value: &str, expected_len: Option<usize>) -> Option<u64> {
    let well_formed = !value.is_empty()
        && expected_len.map_or(true, |len| value.len() == len)
        && value.bytes().all(|b| b.is_ascii_digit());
    if well_formed {
        value.parse().ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_log_file_for(identity: &str, file_name: &str) -> bool {
        parse_log_file_name(identity, file_name).is_some()
    }

    #[test]
    fn timestamp_has_second_granularity_shape() {
        let stamp = file_timestamp_now();
        assert_eq!(stamp.len(), 15);
        assert!(is_log_file_for("id", &log_file_name("id", &stamp, None)));
    }

    #[test]
    fn matches_plain_and_counter_suffixed_names() {
        assert!(is_log_file_for("api", "zosconnect-api-20240102-030405.log"));
        assert!(is_log_file_for("api", "zosconnect-api-20240102-030405-12.log"));
    }

    #[test]
    fn rejects_other_identities_sharing_a_prefix() {
        assert!(!is_log_file_for("api", "zosconnect-api-v2-20240102-030405.log"));
        assert!(!is_log_file_for("api-v2", "zosconnect-api-20240102-030405.log"));
        assert!(is_log_file_for("api-v2", "zosconnect-api-v2-20240102-030405.log"));
    }

    #[test]
    fn rejects_malformed_names() {
        assert!(!is_log_file_for("api", "zosconnect-api-20240102-030405.txt"));
        assert!(!is_log_file_for("api", "zosconnect-api-2024012-030405.log"));
        assert!(!is_log_file_for("api", "zosconnect-api-20240102-030405-.log"));
        assert!(!is_log_file_for("api", "zosconnect-api-20240102-030405-1-2.log"));
        assert!(!is_log_file_for("api", "other-api-20240102-030405.log"));
    }

    #[test]
    fn sequence_follows_creation_order_within_a_second() {
        let names = [
            "zosconnect-api-20240102-030405.log",
            "zosconnect-api-20240102-030405-1.log",
            "zosconnect-api-20240102-030405-2.log",
            "zosconnect-api-20240102-030405-10.log",
            "zosconnect-api-20240102-030406.log",
        ];
        let sequences: Vec<FileSequence> = names
            .iter()
            .map(|name| parse_log_file_name("api", name).unwrap())
            .collect();
        assert!(sequences.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn parse_rejects_foreign_names() {
        assert!(parse_log_file_name("api", "zosconnect-api-v2-20240102-030405.log").is_none());
        assert!(parse_log_file_name("api", "notes.txt").is_none());
    }
}
