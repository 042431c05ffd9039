use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// One device round trip, as written to the JSONL trace file.
#[derive(Debug, Clone, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub stage: String,
    pub method: String,
    pub path: String,

    pub status: Option<u16>,
    pub error: Option<String>,
}

impl TraceEvent {
    pub fn now(stage: &str, method: &str, path: &str) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            stage: stage.to_string(),
            method: method.to_string(),
            path: path.to_string(),
            status: None,
            error: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_error(mut self, error: impl ToString) -> Self {
        self.error = Some(error.to_string());
        self
    }
}
