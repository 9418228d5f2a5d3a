use std::path::PathBuf;

use thiserror::Error;
use url::Url;

use crate::consoles::DEFAULT_REGION;

/// Host-path prefix every user-supplied listing URL must start with.
pub const MYRIENT_FILES_PREFIX: &str = "https://myrient.erista.me/files/";

/// Directory under which console listings live.
pub const NO_INTRO_ROOT: &str = "https://myrient.erista.me/files/No-Intro/";

/// Fixed subdirectory of the output root that a run owns.
pub const OUTPUT_SUBDIR: &str = "output";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("no console or listing URL selected")]
    MissingSourceUrl,
    #[error("no output directory selected")]
    MissingOutputRoot,
    #[error("unknown console {0:?}")]
    UnknownConsole(String),
    #[error("listing URL must start with https://myrient.erista.me/files/: {0}")]
    UntrustedUrl(String),
    #[error("invalid listing URL {url}: {message}")]
    InvalidUrl { url: String, message: String },
}

/// Snapshot of everything a run needs. Never mutated once a run starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfiguration {
    pub source_url: String,
    pub output_root: PathBuf,
    pub region_filter_enabled: bool,
    pub region: String,
    pub smart_filter_enabled: bool,
    /// Number of listing candidates to examine; `None` examines all.
    pub entry_limit: Option<usize>,
}

impl RunConfiguration {
    /// Both filters on, default region, no entry limit.
    pub fn new(source_url: impl Into<String>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            source_url: source_url.into(),
            output_root: output_root.into(),
            region_filter_enabled: true,
            region: DEFAULT_REGION.to_string(),
            smart_filter_enabled: true,
            entry_limit: None,
        }
    }

    /// `{output_root}/output`, the directory the run clears and fills.
    pub fn output_dir(&self) -> PathBuf {
        self.output_root.join(OUTPUT_SUBDIR)
    }

    /// The only checks performed at `start`; everything else is the caller's job.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.source_url.trim().is_empty() {
            return Err(ValidationError::MissingSourceUrl);
        }
        if self.output_root.as_os_str().is_empty() {
            return Err(ValidationError::MissingOutputRoot);
        }
        Ok(())
    }
}

/// Listing URL for a console directory: `NO_INTRO_ROOT` + encoded label + `/`.
pub fn console_source_url(path_segment: &str) -> String {
    format!("{NO_INTRO_ROOT}{}/", urlencoding::encode(path_segment))
}

/// Caller-side guard for raw URL mode.
pub fn validate_custom_url(raw: &str) -> Result<(), ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingSourceUrl);
    }
    if !trimmed.starts_with(MYRIENT_FILES_PREFIX) {
        return Err(ValidationError::UntrustedUrl(trimmed.to_string()));
    }
    Url::parse(trimmed).map_err(|err| ValidationError::InvalidUrl {
        url: trimmed.to_string(),
        message: err.to_string(),
    })?;
    Ok(())
}
