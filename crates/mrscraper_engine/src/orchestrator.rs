use std::sync::Arc;
use std::time::Duration;

use mrscraper_core::{
    build_work_list, item_status, FailureReason, RunConfiguration, RunReport, RunStatus,
    STATUS_CANCELLED, STATUS_COMPLETED, STATUS_DOWNLOADING, STATUS_NO_SPACE, STATUS_PAUSED,
};
use mrscraper_logging::{scrape_error, scrape_info, scrape_warn};
use url::Url;

use crate::filename::destination_file_name;
use crate::listing::parse_listing_anchors;
use crate::persist::{reset_output_dir, AtomicFileWriter};
use crate::{EngineEvent, FailureKind, Fetcher, ProgressReporter, RunControl, SpaceGuard};

/// Mutable run bookkeeping, owned by the run loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunState {
    pub status: RunStatus,
    pub completed_count: usize,
    pub total_count: usize,
}

impl RunState {
    fn report(&self, message: impl Into<String>) -> RunReport {
        RunReport {
            status: self.status,
            completed: self.completed_count,
            total: self.total_count,
            message: message.into(),
        }
    }
}

/// Why the loop stopped before the end of the work list.
enum Stop {
    Cancelled,
    Failed(FailureReason, String),
}

/// Drives one run at a time: listing, output reset, filtering, then the
/// strictly sequential check-fetch-write loop.
pub struct Orchestrator {
    fetcher: Arc<dyn Fetcher>,
    space: SpaceGuard,
    control: RunControl,
    reporter: Arc<dyn ProgressReporter>,
    pause_poll_interval: Duration,
}

impl Orchestrator {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        space: SpaceGuard,
        control: RunControl,
        reporter: Arc<dyn ProgressReporter>,
        pause_poll_interval: Duration,
    ) -> Self {
        Self {
            fetcher,
            space,
            control,
            reporter,
            pause_poll_interval,
        }
    }

    /// Executes a run to a terminal state.
    ///
    /// Never fails: every outcome is reported to the `ProgressReporter`, ending with
    /// `EngineEvent::Finished`, and returned.
    pub async fn run(&self, config: &RunConfiguration) -> RunReport {
        let mut state = RunState {
            status: RunStatus::Running,
            ..RunState::default()
        };
        scrape_info!(
            "Run started: source={} output={:?} region_filter={} region={:?} smart_filter={} limit={:?}",
            config.source_url,
            config.output_dir(),
            config.region_filter_enabled,
            config.region,
            config.smart_filter_enabled,
            config.entry_limit
        );
        self.emit_status(STATUS_DOWNLOADING);

        let outcome = self.execute(config, &mut state).await;
        let message = match outcome {
            Ok(()) => {
                state.status = RunStatus::Completed;
                STATUS_COMPLETED.to_string()
            }
            Err(Stop::Cancelled) => {
                state.status = RunStatus::Cancelled;
                STATUS_CANCELLED.to_string()
            }
            Err(Stop::Failed(reason, detail)) => {
                state.status = RunStatus::Failed(reason);
                scrape_error!("Run failed ({}): {}", reason, detail);
                if reason == FailureReason::SpaceExhausted {
                    STATUS_NO_SPACE.to_string()
                } else {
                    format!("Download failed: {detail}")
                }
            }
        };

        scrape_info!(
            "Run finished: {:?} ({}/{})",
            state.status,
            state.completed_count,
            state.total_count
        );
        let report = state.report(message);
        self.emit_status(&report.message);
        self.reporter.report(EngineEvent::Finished(report.clone()));
        report
    }

    async fn execute(&self, config: &RunConfiguration, state: &mut RunState) -> Result<(), Stop> {
        let page = self
            .fetcher
            .fetch_listing(&config.source_url)
            .await
            .map_err(|err| {
                Stop::Failed(FailureReason::Network, format!("listing fetch failed: {err}"))
            })?;
        let hrefs = parse_listing_anchors(&page.html)
            .map_err(|err| Stop::Failed(FailureReason::ListingParse, err.to_string()))?;
        let base = directory_base(&page.final_url).map_err(|err| {
            Stop::Failed(
                FailureReason::Network,
                format!("listing URL {} is unusable: {err}", page.final_url),
            )
        })?;

        // A cancel that arrived while the listing loaded keeps the old output.
        if self.control.take_cancel() {
            scrape_info!("Cancel observed before the output directory was touched");
            return Err(Stop::Cancelled);
        }

        // Only now is the previous output given up.
        let output_dir = config.output_dir();
        reset_output_dir(&output_dir)
            .map_err(|err| Stop::Failed(FailureReason::FileSystem, err.to_string()))?;

        let anchor_count = hrefs.len();
        let work = build_work_list(hrefs, config);
        state.total_count = work.total_count();
        scrape_info!(
            "Listing {} ({}) has {} anchors; {} examined, {} selected",
            page.final_url,
            page.encoding_label,
            anchor_count,
            work.examined_count(),
            state.total_count
        );
        self.emit_progress(state);

        let writer = AtomicFileWriter::new(output_dir);
        for entry in &work {
            self.checkpoint(state).await?;

            let item_url = base.join(&entry.href).map_err(|err| {
                Stop::Failed(
                    FailureReason::Network,
                    format!("cannot resolve {} against {base}: {err}", entry.href),
                )
            })?;
            let file_name = destination_file_name(&entry.display_name);

            if !self.space.has_sufficient_space(writer.dir()) {
                scrape_warn!(
                    "Less than {} bytes free; stopping before {}",
                    self.space.min_free_bytes(),
                    file_name
                );
                return Err(Stop::Failed(
                    FailureReason::SpaceExhausted,
                    STATUS_NO_SPACE.to_string(),
                ));
            }

            self.emit_status(&item_status(&file_name));
            scrape_info!("Downloading {} from {}", file_name, item_url);
            let mut partial = writer
                .begin(&file_name)
                .map_err(|err| Stop::Failed(FailureReason::FileSystem, err.to_string()))?;
            // On error `partial` is dropped and its temporary file removed.
            self.fetcher
                .download(item_url.as_str(), &mut partial)
                .await
                .map_err(|err| {
                    let reason = match err.kind {
                        FailureKind::LocalWrite(_) => FailureReason::FileSystem,
                        _ => FailureReason::Network,
                    };
                    Stop::Failed(reason, format!("{file_name}: {err}"))
                })?;
            partial
                .commit()
                .map_err(|err| Stop::Failed(FailureReason::FileSystem, err.to_string()))?;

            state.completed_count += 1;
            self.emit_progress(state);
        }
        Ok(())
    }

    /// Top-of-iteration check: honour cancel, then wait out a pause while
    /// still watching for cancel.
    async fn checkpoint(&self, state: &mut RunState) -> Result<(), Stop> {
        if self.control.take_cancel() {
            scrape_info!("Cancel observed before item {}", state.completed_count + 1);
            return Err(Stop::Cancelled);
        }
        if !self.control.is_paused() {
            return Ok(());
        }

        state.status = RunStatus::Paused;
        scrape_info!("Paused before item {}", state.completed_count + 1);
        self.emit_status(STATUS_PAUSED);
        while self.control.is_paused() {
            if self.control.take_cancel() {
                scrape_info!("Cancel observed while paused");
                return Err(Stop::Cancelled);
            }
            tokio::time::sleep(self.pause_poll_interval).await;
        }
        if self.control.take_cancel() {
            return Err(Stop::Cancelled);
        }

        state.status = RunStatus::Running;
        scrape_info!("Resumed");
        self.emit_status(STATUS_DOWNLOADING);
        Ok(())
    }

    fn emit_status(&self, text: &str) {
        self.reporter.report(EngineEvent::Status(text.to_string()));
    }

    fn emit_progress(&self, state: &RunState) {
        self.reporter.report(EngineEvent::Progress {
            completed: state.completed_count,
            total: state.total_count,
        });
    }
}

/// The listing URL as a directory: trailing `/`, no query or fragment.
fn directory_base(listing_url: &str) -> Result<Url, url::ParseError> {
    let mut base = Url::parse(listing_url)?;
    base.set_query(None);
    base.set_fragment(None);
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base)
}
