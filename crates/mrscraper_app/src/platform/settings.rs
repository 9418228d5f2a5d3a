use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use mrscraper_core::DEFAULT_REGION;
use mrscraper_engine::{EngineConfig, FetchSettings};
use mrscraper_logging::{scrape_info, scrape_warn};
use serde::{Deserialize, Serialize};

const SETTINGS_FILENAME: &str = "mrscraper.ron";

const MIB: u64 = 1024 * 1024;

/// Optional overrides read from `mrscraper.ron`. Missing fields keep their
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppSettings {
    pub default_region: String,
    pub min_free_mib: u64,
    pub pause_poll_ms: u64,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub redirect_limit: usize,
}

impl Default for AppSettings {
    fn default() -> Self {
        let engine = EngineConfig::default();
        Self {
            default_region: DEFAULT_REGION.to_string(),
            min_free_mib: engine.min_free_bytes / MIB,
            pause_poll_ms: engine.pause_poll_interval.as_millis() as u64,
            connect_timeout_secs: engine.fetch.connect_timeout.as_secs(),
            request_timeout_secs: engine.fetch.request_timeout.as_secs(),
            redirect_limit: engine.fetch.redirect_limit,
        }
    }
}

impl AppSettings {
    pub(crate) fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            fetch: FetchSettings {
                connect_timeout: Duration::from_secs(self.connect_timeout_secs),
                request_timeout: Duration::from_secs(self.request_timeout_secs),
                redirect_limit: self.redirect_limit,
                ..FetchSettings::default()
            },
            min_free_bytes: self.min_free_mib.saturating_mul(MIB),
            pause_poll_interval: Duration::from_millis(self.pause_poll_ms.max(1)),
        }
    }
}

/// Reads settings from `path`, or `./mrscraper.ron` when none is given.
///
/// A missing file yields defaults; an unreadable or malformed one is logged
/// and also yields defaults.
pub(crate) fn load_settings(path: Option<&Path>) -> AppSettings {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(SETTINGS_FILENAME));
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return AppSettings::default();
        }
        Err(err) => {
            scrape_warn!("Failed to read settings from {:?}: {}", path, err);
            return AppSettings::default();
        }
    };

    match ron::from_str(&content) {
        Ok(settings) => {
            scrape_info!("Loaded settings from {:?}", path);
            settings
        }
        Err(err) => {
            scrape_warn!("Failed to parse settings from {:?}: {}", path, err);
            AppSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_engine_defaults() {
        let config = AppSettings::default().engine_config();
        let engine = EngineConfig::default();
        assert_eq!(config.min_free_bytes, engine.min_free_bytes);
        assert_eq!(config.pause_poll_interval, engine.pause_poll_interval);
        assert_eq!(config.fetch.connect_timeout, engine.fetch.connect_timeout);
        assert_eq!(config.fetch.request_timeout, engine.fetch.request_timeout);
        assert_eq!(config.fetch.redirect_limit, engine.fetch.redirect_limit);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let settings = load_settings(Some(&temp.path().join("absent.ron")));
        assert_eq!(settings, AppSettings::default());
    }

    #[test]
    fn partial_file_overrides_named_fields() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("mrscraper.ron");
        fs::write(&path, r#"(default_region: "Japan", min_free_mib: 512)"#).unwrap();

        let settings = load_settings(Some(&path));
        assert_eq!(settings.default_region, "Japan");
        assert_eq!(settings.min_free_mib, 512);
        assert_eq!(settings.redirect_limit, AppSettings::default().redirect_limit);
        assert_eq!(settings.engine_config().min_free_bytes, 512 * MIB);
    }

    #[test]
    fn malformed_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("mrscraper.ron");
        fs::write(&path, "(min_free_mib: \"lots\"").unwrap();

        assert_eq!(load_settings(Some(&path)), AppSettings::default());
    }

    #[test]
    fn written_settings_load_back() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("mrscraper.ron");
        let settings = AppSettings {
            pause_poll_ms: 50,
            ..AppSettings::default()
        };
        let text =
            ron::ser::to_string_pretty(&settings, ron::ser::PrettyConfig::new()).unwrap();
        fs::write(&path, text).unwrap();

        assert_eq!(load_settings(Some(&path)), settings);
    }
}
