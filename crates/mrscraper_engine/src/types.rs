use std::fmt;

use mrscraper_core::RunReport;
use thiserror::Error;

/// Everything the engine tells its observer. Delivered in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Status text for a state transition or an item start.
    Status(String),
    /// `completed` of `total` items are on disk.
    Progress { completed: usize, total: usize },
    /// Terminal outcome; always the last event of a run.
    Finished(RunReport),
}

/// Directory listing page, decoded to text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
    /// URL after redirects; item hrefs resolve against it.
    pub final_url: String,
    pub html: String,
    pub encoding_label: String,
}

/// A failed listing or item request, classified by `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} ({url})")]
pub struct FetchError {
    pub kind: FailureKind,
    pub url: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, url: impl Into<String>) -> Self {
        Self {
            kind,
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl(String),
    /// Server answered with a non-2xx status.
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    /// Body exceeded the byte cap for its kind of request.
    TooLarge { limit: u64, received: u64 },
    UnsupportedContentType(String),
    Decode(String),
    /// Connection, TLS or mid-body transport failure.
    Network(String),
    /// The body arrived but could not be written locally.
    LocalWrite(String),
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl(reason) => write!(f, "malformed URL: {reason}"),
            FailureKind::HttpStatus(code) => write!(f, "server answered HTTP {code}"),
            FailureKind::Timeout => f.write_str("request timed out"),
            FailureKind::RedirectLimitExceeded => f.write_str("too many redirects"),
            FailureKind::TooLarge { limit, received } => {
                write!(f, "body larger than {limit} bytes (got {received})")
            }
            FailureKind::UnsupportedContentType(content_type) => {
                write!(f, "listing served as {content_type}, not HTML")
            }
            FailureKind::Decode(reason) => write!(f, "listing text unreadable: {reason}"),
            FailureKind::Network(reason) => write!(f, "transport error: {reason}"),
            FailureKind::LocalWrite(reason) => write!(f, "saving body failed: {reason}"),
        }
    }
}
