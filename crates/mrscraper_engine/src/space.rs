use std::io;
use std::path::Path;

use mrscraper_logging::{scrape_debug, scrape_warn};

/// Free space that must remain at the destination before each fetch.
pub const MIN_FREE_BYTES: u64 = 100 * 1024 * 1024;

/// Source of free-space figures for a path.
pub trait SpaceProbe: Send + Sync {
    fn available_bytes(&self, path: &Path) -> io::Result<u64>;
}

/// Queries the file system holding the path.
#[derive(Debug, Default, Clone, Copy)]
pub struct Fs2SpaceProbe;

impl SpaceProbe for Fs2SpaceProbe {
    fn available_bytes(&self, path: &Path) -> io::Result<u64> {
        fs2::available_space(path)
    }
}

pub struct SpaceGuard {
    probe: Box<dyn SpaceProbe>,
    min_free_bytes: u64,
}

impl SpaceGuard {
    pub fn new(probe: Box<dyn SpaceProbe>, min_free_bytes: u64) -> Self {
        Self {
            probe,
            min_free_bytes,
        }
    }

    pub fn min_free_bytes(&self) -> u64 {
        self.min_free_bytes
    }

    /// True when at least `min_free_bytes` are free at `destination`.
    /// A failed query counts as insufficient space.
    pub fn has_sufficient_space(&self, destination: &Path) -> bool {
        match self.probe.available_bytes(destination) {
            Ok(available) => {
                scrape_debug!(
                    "Free space at {:?}: {} bytes (minimum {})",
                    destination,
                    available,
                    self.min_free_bytes
                );
                available >= self.min_free_bytes
            }
            Err(err) => {
                scrape_warn!("Free space query for {:?} failed: {}", destination, err);
                false
            }
        }
    }
}

impl Default for SpaceGuard {
    fn default() -> Self {
        Self::new(Box::new(Fs2SpaceProbe), MIN_FREE_BYTES)
    }
}
