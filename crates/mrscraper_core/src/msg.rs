use crate::{RunConfiguration, RunReport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User pressed Start with a validated configuration.
    StartRequested(RunConfiguration),
    /// User pressed Pause/Resume.
    PauseToggled,
    /// User pressed Cancel.
    CancelClicked,
    /// Engine status text for the current run.
    EngineStatus(String),
    /// Engine finished another item.
    EngineProgress { completed: usize, total: usize },
    /// Engine reached a terminal state.
    RunFinished(RunReport),
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
