use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use mrscraper_core::{Effect, Msg};
use mrscraper_engine::{EngineConfig, EngineError, EngineEvent, EngineHandle};
use mrscraper_logging::scrape_info;

/// Executes session effects against the engine and feeds engine events back
/// as messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(config: EngineConfig, msg_tx: mpsc::Sender<Msg>) -> Result<Self, EngineError> {
        let engine = EngineHandle::new(config)?;
        let runner = Self { engine };
        runner.spawn_event_loop(msg_tx);
        Ok(runner)
    }

    pub fn apply(&self, effects: Vec<Effect>) -> Result<(), EngineError> {
        for effect in effects {
            match effect {
                Effect::StartRun(config) => {
                    let run_id = self.engine.start(config)?;
                    scrape_info!("Started run {}", run_id);
                }
                Effect::SetPaused(paused) => {
                    scrape_info!("Pause requested: {}", paused);
                    self.engine.set_paused(paused);
                }
                Effect::RequestCancel => {
                    scrape_info!("Cancel requested");
                    self.engine.request_cancel();
                }
            }
        }
        Ok(())
    }

    fn spawn_event_loop(&self, msg_tx: mpsc::Sender<Msg>) {
        let engine = self.engine.clone();
        thread::spawn(move || loop {
            if let Some(event) = engine.recv_timeout(Duration::from_millis(100)) {
                if msg_tx.send(to_msg(event)).is_err() {
                    break;
                }
            }
        });
    }
}

fn to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Status(text) => Msg::EngineStatus(text),
        EngineEvent::Progress { completed, total } => Msg::EngineProgress { completed, total },
        EngineEvent::Finished(report) => Msg::RunFinished(report),
    }
}
