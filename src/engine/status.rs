// Per-job status model and the event surface the UI layer observes.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Pending,
    Processing,
    Success,
    Failed,
    Stopped,
}

impl Status {
    pub fn is_terminal(self) -> bool {
        matches!(self, Status::Success | Status::Failed | Status::Stopped)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Pending => "Pending",
            Status::Processing => "Processing",
            Status::Success => "Success",
            Status::Failed => "Failed",
            Status::Stopped => "Stopped",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown status: {0}")]
pub struct ParseStatusError(String);

impl FromStr for Status {
    type Err = ParseStatusError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "Pending" => Ok(Status::Pending),
            "Processing" => Ok(Status::Processing),
            // "Successed" is the spelling older saved state used.
            "Success" | "Successed" => Ok(Status::Success),
            "Failed" => Ok(Status::Failed),
            "Stopped" => Ok(Status::Stopped),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// Callbacks the orchestrator emits while a batch is running. The GUI layer
/// implements this once and routes the calls onto its own event loop.
pub trait EventSink: Send + Sync {
    fn log_line(&self, line: &str);
    fn status_changed(&self, job_id: &str, status: Status);
    fn batch_finished(&self);
}
