//! Run reporting
//!
//! Messages meant for the person running the generator go through a
//! [`Reporter`]. Diagnostics for developers go straight to `tracing`.

use parking_lot::Mutex;
use std::fmt;

/// Severity of a reported message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Success,
    Comment,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "success",
            Self::Comment => "comment",
            Self::Error => "error",
        })
    }
}

/// Sink for user-facing messages, in emission order
pub trait Reporter: Send + Sync {
    fn report(&self, severity: Severity, message: &str);

    fn success(&self, message: &str) {
        self.report(Severity::Success, message);
    }

    fn comment(&self, message: &str) {
        self.report(Severity::Comment, message);
    }

    fn error(&self, message: &str) {
        self.report(Severity::Error, message);
    }
}

/// Forwards messages to `tracing` events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Success => tracing::info!(target: "featuregen", "{message}"),
            Severity::Comment => tracing::info!(target: "featuregen", kind = "comment", "{message}"),
            Severity::Error => tracing::error!(target: "featuregen", "{message}"),
        }
    }
}

/// Keeps every message in memory
#[derive(Debug, Default)]
pub struct CollectingReporter {
    entries: Mutex<Vec<(Severity, String)>>,
}

impl CollectingReporter {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn entries(&self) -> Vec<(Severity, String)> {
        self.entries.lock().clone()
    }

    /// Messages of one severity, in emission order
    #[must_use]
    pub fn messages(&self, severity: Severity) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .filter(|(s, _)| *s == severity)
            .map(|(_, m)| m.clone())
            .collect()
    }

    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.entries.lock().iter().any(|(_, m)| m.contains(needle))
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl Reporter for CollectingReporter {
    fn report(&self, severity: Severity, message: &str) {
        self.entries.lock().push((severity, message.to_string()));
    }
}

/// `1 file`, `2 files`
#[must_use]
pub fn plural(count: usize, noun: &str) -> String {
    if count > 1 {
        format!("{count} {noun}s")
    } else {
        format!("{count} {noun}")
    }
}
