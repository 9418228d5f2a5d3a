use crate::RunStatus;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub session: RunStatus,
    pub status_text: String,
    pub completed: usize,
    pub total: usize,
    pub start_enabled: bool,
    pub pause_enabled: bool,
    pub cancel_enabled: bool,
    pub pause_label: &'static str,
    pub dirty: bool,
}
