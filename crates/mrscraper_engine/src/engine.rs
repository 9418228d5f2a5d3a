use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use mrscraper_core::{RunConfiguration, ValidationError};
use mrscraper_logging::{scrape_info, set_run_id};
use thiserror::Error;

use crate::fetch::{ChannelReporter, FetchSettings, Fetcher, ReqwestFetcher};
use crate::space::{Fs2SpaceProbe, SpaceGuard, MIN_FREE_BYTES};
use crate::{EngineEvent, FetchError, Orchestrator, RunControl};

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub fetch: FetchSettings,
    /// Free space that must remain before each item is fetched.
    pub min_free_bytes: u64,
    /// How often a paused run re-checks its signals.
    pub pause_poll_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fetch: FetchSettings::default(),
            min_free_bytes: MIN_FREE_BYTES,
            pause_poll_interval: Duration::from_millis(25),
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("could not build http client: {0}")]
    Client(#[from] FetchError),
    #[error("could not start download worker: {0}")]
    Worker(#[from] std::io::Error),
    #[error("download worker has stopped")]
    WorkerGone,
}

enum EngineCommand {
    Start {
        run_id: u64,
        config: RunConfiguration,
    },
}

/// Caller-side handle to the single download worker.
///
/// Runs execute one at a time on a dedicated thread that owns the tokio
/// runtime. Events come back through `try_recv`/`recv_timeout`.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
    control: RunControl,
    last_run_id: Arc<AtomicU64>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let fetcher = ReqwestFetcher::new(config.fetch.clone())?;
        let space = SpaceGuard::new(Box::new(Fs2SpaceProbe), config.min_free_bytes);
        Self::with_parts(&config, Arc::new(fetcher), space)
    }

    /// Builds a handle around caller-supplied collaborators.
    pub fn with_parts(
        config: &EngineConfig,
        fetcher: Arc<dyn Fetcher>,
        space: SpaceGuard,
    ) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel::<EngineCommand>();
        let (event_tx, event_rx) = mpsc::channel();
        let control = RunControl::new();
        let orchestrator = Orchestrator::new(
            fetcher,
            space,
            control.clone(),
            Arc::new(ChannelReporter::new(event_tx)),
            config.pause_poll_interval,
        );

        thread::Builder::new()
            .name("mrscraper-worker".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    match command {
                        EngineCommand::Start { run_id, config } => {
                            set_run_id(run_id);
                            runtime.block_on(orchestrator.run(&config));
                            set_run_id(0);
                        }
                    }
                }
                scrape_info!("Download worker shutting down");
            })?;

        Ok(Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
            control,
            last_run_id: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Validates `config`, resets the signals and hands the run to the worker.
    /// Returns the run's sequence number immediately.
    ///
    /// Callers must not start a run while another is active.
    pub fn start(&self, config: RunConfiguration) -> Result<u64, EngineError> {
        config.validate()?;
        self.control.reset();
        let run_id = self.last_run_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.cmd_tx
            .send(EngineCommand::Start { run_id, config })
            .map_err(|_| EngineError::WorkerGone)?;
        Ok(run_id)
    }

    pub fn request_cancel(&self) {
        self.control.request_cancel();
    }

    pub fn set_paused(&self, paused: bool) {
        self.control.set_paused(paused);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.recv_timeout(timeout).ok()
    }
}
