use mrscraper_core::{AppViewModel, RunStatus};

/// One terminal line describing the session.
pub fn render(view: &AppViewModel) -> String {
    let progress = if view.total > 0 {
        let percent = (view.completed.min(view.total) as f64 / view.total as f64) * 100.0;
        format!("[{}/{} {:5.1}%]", view.completed, view.total, percent)
    } else {
        format!("[{}/{}]", view.completed, view.total)
    };

    let hint = match view.session {
        RunStatus::Running => "  (p: pause, c: cancel)",
        RunStatus::Paused => "  (p: resume, c: cancel)",
        _ => "",
    };

    format!("{progress} {}{hint}", view.status_text)
}
