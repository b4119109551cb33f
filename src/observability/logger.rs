//! Structured JSON logger
//!
//! One line per event, written synchronously. Keys come out in a fixed
//! order (event, severity, then fields sorted by key) so two runs over the
//! same document log identical lines. Lines below the threshold are
//! dropped; the threshold is read once from `ROCKETSTORE_LOG` and defaults
//! to WARN so library use stays quiet.

use std::env;
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;
use std::sync::OnceLock;

/// Environment variable holding the minimum severity name.
pub const LOG_LEVEL_ENV: &str = "ROCKETSTORE_LOG";

/// Ordered log levels; comparisons follow declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Trace,
    Info,
    Warn,
    /// Save or load failed because of the sink or source
    Error,
    Fatal,
}

impl Severity {
    const NAMES: [(Severity, &'static str); 5] = [
        (Severity::Trace, "TRACE"),
        (Severity::Info, "INFO"),
        (Severity::Warn, "WARN"),
        (Severity::Error, "ERROR"),
        (Severity::Fatal, "FATAL"),
    ];

    pub fn as_str(&self) -> &'static str {
        Self::NAMES
            .iter()
            .find(|(s, _)| s == self)
            .map_or("FATAL", |(_, name)| name)
    }

    /// Parses a level name, ignoring case and surrounding whitespace.
    pub fn parse(name: &str) -> Option<Severity> {
        let wanted = name.trim();
        Self::NAMES
            .iter()
            .find(|(_, n)| n.eq_ignore_ascii_case(wanted))
            .map(|(s, _)| *s)
    }

    /// ERROR and FATAL lines are routed to stderr.
    fn to_stderr(self) -> bool {
        self >= Severity::Error
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Severity::parse(s).ok_or_else(|| format!("unknown log level: {}", s))
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static THRESHOLD: OnceLock<Severity> = OnceLock::new();

/// Process-wide JSON-lines logger.
pub struct Logger;

impl Logger {
    /// Lowest severity that is written.
    pub fn min_severity() -> Severity {
        *THRESHOLD.get_or_init(|| {
            env::var(LOG_LEVEL_ENV)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(Severity::Warn)
        })
    }

    pub fn enabled(severity: Severity) -> bool {
        severity >= Self::min_severity()
    }

    /// Writes one event if it clears the threshold.
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        if !Self::enabled(severity) {
            return;
        }
        let line = render_line(severity, event, fields);
        if severity.to_stderr() {
            emit(&mut io::stderr().lock(), &line);
        } else {
            emit(&mut io::stdout().lock(), &line);
        }
    }
}

/// Logging never fails a save or load, so write errors are dropped.
fn emit<W: Write>(writer: &mut W, line: &str) {
    let _ = writer.write_all(line.as_bytes()).and_then(|_| writer.flush());
}

/// Renders one JSON object terminated by a newline.
fn render_line(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
    let mut ordered: Vec<(&str, &str)> = fields.to_vec();
    ordered.sort_by(|a, b| a.0.cmp(b.0));

    let mut line = String::with_capacity(64 + fields.len() * 32);
    line.push('{');
    push_pair(&mut line, "event", event);
    line.push(',');
    push_pair(&mut line, "severity", severity.as_str());
    for (key, value) in ordered {
        line.push(',');
        push_pair(&mut line, key, value);
    }
    line.push_str("}\n");
    line
}

fn push_pair(line: &mut String, key: &str, value: &str) {
    push_json_str(line, key);
    line.push(':');
    push_json_str(line, value);
}

fn push_json_str(line: &mut String, text: &str) {
    match serde_json::to_string(text) {
        Ok(quoted) => line.push_str(&quoted),
        Err(_) => line.push_str("\"\""),
    }
}

/// Renders a line without the threshold check, for assertions.
#[cfg(test)]
pub fn capture_log(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
    render_line(severity, event, fields)
}
