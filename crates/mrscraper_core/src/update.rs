use crate::run::STATUS_DOWNLOADING;
use crate::{AppState, Effect, Msg, RunStatus};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::StartRequested(config) => {
            // One run at a time; Start is disabled while a run is active.
            if state.session().is_active() {
                Vec::new()
            } else {
                state.begin_run(STATUS_DOWNLOADING);
                vec![Effect::StartRun(config)]
            }
        }
        Msg::PauseToggled => {
            let session = state.session();
            if session.is_active() {
                let paused = session != RunStatus::Paused;
                state.set_paused(paused);
                vec![Effect::SetPaused(paused)]
            } else {
                Vec::new()
            }
        }
        Msg::CancelClicked => {
            // Session stays active until the engine reports the cancellation.
            if state.session().is_active() {
                vec![Effect::RequestCancel]
            } else {
                Vec::new()
            }
        }
        Msg::EngineStatus(text) => {
            if state.session().is_active() {
                state.set_status_text(text);
            }
            Vec::new()
        }
        Msg::EngineProgress { completed, total } => {
            if state.session().is_active() {
                state.set_progress(completed, total);
            }
            Vec::new()
        }
        Msg::RunFinished(report) => {
            state.finish(report);
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
