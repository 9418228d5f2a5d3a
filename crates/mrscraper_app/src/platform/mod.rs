mod app;
mod effects;
pub mod logging;
mod render;
mod settings;

pub use app::run_app;
