//! Scraper core: run configuration, entry filtering and the pure session model.
mod config;
mod consoles;
mod effect;
mod entry;
mod filter;
mod msg;
mod run;
mod state;
mod update;
mod view_model;

pub use config::{
    console_source_url, validate_custom_url, RunConfiguration, ValidationError, MYRIENT_FILES_PREFIX,
    NO_INTRO_ROOT, OUTPUT_SUBDIR,
};
pub use consoles::{find_console, CONSOLES, DEFAULT_REGION, REGIONS};
pub use effect::Effect;
pub use entry::{build_work_list, decode_segment, trailing_segment, CatalogEntry, FilteredWorkList};
pub use filter::{is_accepted, EXCLUDED_MARKERS, UNIVERSAL_TAG};
pub use msg::Msg;
pub use run::{
    item_status, FailureReason, RunReport, RunStatus, STATUS_CANCELLED, STATUS_COMPLETED,
    STATUS_DOWNLOADING, STATUS_NO_SPACE, STATUS_PAUSED, STATUS_READY,
};
pub use state::AppState;
pub use update::update;
pub use view_model::AppViewModel;
