//! Structured JSON logger
//!
//! - One event per line, valid JSON
//! - Event name first, then severity, then fields sorted by key
//! - Synchronous writes, no buffering

use std::fmt;
use std::io::{self, Write};

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Routine operation detail
    Trace = 0,
    /// Notable lifecycle events
    Info = 1,
    /// Skipped-but-survivable problems
    Warn = 2,
    /// Operation failures
    Error = 3,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Synchronous structured logger.
///
/// Field ordering is deterministic (alphabetical by key) so that two runs
/// over the same operations produce byte-identical log streams.
pub struct Logger;

impl Logger {
    /// Log an event with the given severity and fields to stdout
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        Self::log_to_writer(severity, event, fields, &mut io::stdout());
    }

    fn log_to_writer<W: Write>(
        severity: Severity,
        event: &str,
        fields: &[(&str, &str)],
        writer: &mut W,
    ) {
        // Hand-built JSON: fixed key order, single allocation, one write
        let mut line = String::with_capacity(128);

        line.push_str("{\"event\":\"");
        Self::escape_into(&mut line, event);
        line.push_str("\",\"severity\":\"");
        line.push_str(severity.as_str());
        line.push('"');

        let mut sorted: Vec<_> = fields.iter().collect();
        sorted.sort_by_key(|(k, _)| *k);

        for (key, value) in sorted {
            line.push_str(",\"");
            Self::escape_into(&mut line, key);
            line.push_str("\":\"");
            Self::escape_into(&mut line, value);
            line.push('"');
        }

        line.push_str("}\n");

        let _ = writer.write_all(line.as_bytes());
        let _ = writer.flush();
    }

    fn escape_into(out: &mut String, s: &str) {
        for c in s.chars() {
            match c {
                '"' => out.push_str("\\\""),
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if c.is_control() => {
                    out.push_str(&format!("\\u{:04x}", c as u32));
                }
                c => out.push(c),
            }
        }
    }

    /// Log at TRACE level
    pub fn trace(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Trace, event, fields);
    }

    /// Log at INFO level
    pub fn info(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Info, event, fields);
    }

    /// Log at WARN level
    pub fn warn(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Warn, event, fields);
    }

    /// Log at ERROR level, routed to stderr
    pub fn error(event: &str, fields: &[(&str, &str)]) {
        Self::log_to_writer(Severity::Error, event, fields, &mut io::stderr());
    }
}

#[cfg(test)]
fn capture(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
    let mut buffer = Vec::new();
    Logger::log_to_writer(severity, event, fields, &mut buffer);
    String::from_utf8(buffer).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_is_one_line_of_valid_json() {
        let line = capture(Severity::Trace, "RECORD_SAVED", &[("path", "m.json")]);

        assert!(line.ends_with('\n'));
        assert_eq!(line.matches('\n').count(), 1);

        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["event"], "RECORD_SAVED");
        assert_eq!(parsed["severity"], "TRACE");
        assert_eq!(parsed["path"], "m.json");
    }

    #[test]
    fn test_event_precedes_severity_precedes_fields() {
        let line = capture(Severity::Warn, "CLEAR_CHILD_FAILED", &[("child", "a")]);

        let event = line.find("\"event\"").unwrap();
        let severity = line.find("\"severity\"").unwrap();
        let child = line.find("\"child\"").unwrap();
        assert!(event < severity && severity < child);
    }

    #[test]
    fn test_fields_sorted_regardless_of_call_order() {
        let a = capture(Severity::Info, "E", &[("to", "x"), ("from", "y")]);
        let b = capture(Severity::Info, "E", &[("from", "y"), ("to", "x")]);
        assert_eq!(a, b);
        assert!(a.find("\"from\"").unwrap() < a.find("\"to\"").unwrap());
    }

    #[test]
    fn test_escaping_survives_round_trip() {
        let line = capture(Severity::Error, "E", &[("path", "a\"b\\c\nnew")]);
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["path"], "a\"b\\c\nnew");
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Trace < Severity::Info);
        assert!(Severity::Info < Severity::Warn);
        assert!(Severity::Warn < Severity::Error);
    }
}
