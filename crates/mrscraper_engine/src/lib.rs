//! Scraper engine: listing fetch, the download run loop and its background worker.
mod control;
mod decode;
mod engine;
mod fetch;
mod filename;
mod listing;
mod orchestrator;
mod persist;
mod space;
mod types;

pub use control::RunControl;
pub use decode::{decode_html, DecodeError, DecodedHtml};
pub use engine::{EngineConfig, EngineError, EngineHandle};
pub use fetch::{ChannelReporter, FetchSettings, Fetcher, ProgressReporter, ReqwestFetcher};
pub use filename::destination_file_name;
pub use listing::{parse_listing_anchors, ListingError, LISTING_ANCHOR_SELECTOR};
pub use orchestrator::{Orchestrator, RunState};
pub use persist::{reset_output_dir, AtomicFileWriter, PartialFile, PersistError};
pub use space::{Fs2SpaceProbe, SpaceGuard, SpaceProbe, MIN_FREE_BYTES};
pub use types::{EngineEvent, FailureKind, FetchError, ListingPage};
