use crate::RunConfiguration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartRun(RunConfiguration),
    SetPaused(bool),
    RequestCancel,
}
