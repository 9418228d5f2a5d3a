use crate::run::STATUS_READY;
use crate::view_model::AppViewModel;
use crate::{RunReport, RunStatus};

/// Presentation-side mirror of the engine's run, fed by engine events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    session: RunStatus,
    status_text: String,
    completed: usize,
    total: usize,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            session: RunStatus::Idle,
            status_text: STATUS_READY.to_string(),
            completed: 0,
            total: 0,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> RunStatus {
        self.session
    }

    pub fn view(&self) -> AppViewModel {
        let active = self.session.is_active();
        AppViewModel {
            session: self.session,
            status_text: self.status_text.clone(),
            completed: self.completed,
            total: self.total,
            start_enabled: !active,
            pause_enabled: active,
            cancel_enabled: active,
            pause_label: if self.session == RunStatus::Paused {
                "Resume Download"
            } else {
                "Pause Download"
            },
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn begin_run(&mut self, status_text: &str) {
        self.session = RunStatus::Running;
        self.status_text = status_text.to_string();
        self.completed = 0;
        self.total = 0;
        self.dirty = true;
    }

    pub(crate) fn set_paused(&mut self, paused: bool) {
        self.session = if paused {
            RunStatus::Paused
        } else {
            RunStatus::Running
        };
        self.dirty = true;
    }

    pub(crate) fn set_status_text(&mut self, text: String) {
        if self.status_text != text {
            self.status_text = text;
            self.dirty = true;
        }
    }

    pub(crate) fn set_progress(&mut self, completed: usize, total: usize) {
        if (self.completed, self.total) != (completed, total) {
            self.completed = completed;
            self.total = total;
            self.dirty = true;
        }
    }

    pub(crate) fn finish(&mut self, report: RunReport) {
        self.session = report.status;
        self.status_text = report.message;
        self.completed = report.completed;
        self.total = report.total;
        self.dirty = true;
    }
}
