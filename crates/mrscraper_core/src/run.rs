use std::fmt;

pub const STATUS_READY: &str = "Ready";
pub const STATUS_DOWNLOADING: &str = "Downloading...";
pub const STATUS_PAUSED: &str = "Paused...";
pub const STATUS_COMPLETED: &str = "Download completed!";
pub const STATUS_CANCELLED: &str = "Download cancelled!";
pub const STATUS_NO_SPACE: &str = "Insufficient disk space.";

/// Status text shown when an item starts downloading.
pub fn item_status(file_name: &str) -> String {
    format!("Downloading {file_name}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// Listing or item fetch failed (transport error or non-2xx status).
    Network,
    /// The listing page held no anchors.
    ListingParse,
    /// Free space dropped below the guard threshold.
    SpaceExhausted,
    /// Output directory could not be reset or an item could not be written.
    FileSystem,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Network => write!(f, "network error"),
            FailureReason::ListingParse => write!(f, "unreadable listing"),
            FailureReason::SpaceExhausted => write!(f, "insufficient disk space"),
            FailureReason::FileSystem => write!(f, "file system error"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunStatus {
    #[default]
    Idle,
    Running,
    Paused,
    Cancelled,
    Completed,
    Failed(FailureReason),
}

impl RunStatus {
    /// Running or paused: a worker owns the output directory.
    pub fn is_active(self) -> bool {
        matches!(self, RunStatus::Running | RunStatus::Paused)
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RunStatus::Cancelled | RunStatus::Completed | RunStatus::Failed(_)
        )
    }
}

/// Final observation of a run, delivered once when the worker stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub status: RunStatus,
    pub completed: usize,
    pub total: usize,
    /// Status text describing the outcome.
    pub message: String,
}
