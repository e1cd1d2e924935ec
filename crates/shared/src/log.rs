use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Normal,
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogLine {
    pub level: LogLevel,
    pub text: String,
    pub logged_at: DateTime<Utc>,
}

impl LogLine {
    pub fn new(level: LogLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
            logged_at: Utc::now(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.level, LogLevel::Success | LogLevel::Error)
    }
}
