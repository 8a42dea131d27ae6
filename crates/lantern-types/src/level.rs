//! Log severities and the scrollback display filter.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Severity of a log event arriving from the host's logging stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogLevel {
    Error,
    Warning,
    Info,
    Debug,
}

impl LogLevel {
    /// The filter bit for this severity.
    pub fn flag(self) -> LogFilter {
        match self {
            Self::Error => LogFilter::ERROR,
            Self::Warning => LogFilter::WARNING,
            Self::Info => LogFilter::INFO,
            Self::Debug => LogFilter::DEBUG,
        }
    }

    /// Short tag used when a log line is rendered into the scrollback.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

bitflags! {
    /// Which severities the scrollback ingests. Persisted in settings.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct LogFilter: u32 {
        const ERROR = 1;
        const WARNING = 1 << 1;
        const INFO = 1 << 2;
        const DEBUG = 1 << 3;
    }
}

impl Default for LogFilter {
    /// Debug chatter is off by default; everything else shows.
    fn default() -> Self {
        Self::ERROR | Self::WARNING | Self::INFO
    }
}
