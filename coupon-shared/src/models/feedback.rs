use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Display time used when a message carries no explicit duration
pub const DEFAULT_FEEDBACK_DURATION: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    Success,
    Error,
    Info,
}

/// Transient status notification shown to the visitor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedbackMessage {
    pub kind: FeedbackKind,
    pub message: String,
    pub duration: Option<Duration>,
}

impl FeedbackMessage {
    pub fn new(kind: FeedbackKind, message: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            kind,
            message: message.into(),
            duration: Some(Duration::from_millis(duration_ms)),
        }
    }

    pub fn success(message: impl Into<String>, duration_ms: u64) -> Self {
        Self::new(FeedbackKind::Success, message, duration_ms)
    }

    pub fn error(message: impl Into<String>, duration_ms: u64) -> Self {
        Self::new(FeedbackKind::Error, message, duration_ms)
    }

    pub fn info(message: impl Into<String>, duration_ms: u64) -> Self {
        Self::new(FeedbackKind::Info, message, duration_ms)
    }

    pub fn display_duration(&self) -> Duration {
        self.duration.unwrap_or(DEFAULT_FEEDBACK_DURATION)
    }
}
