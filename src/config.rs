//! Environment-driven configuration.
//!
//! Every field has a default, so the binary runs with no environment at
//! all; durations accept humane strings like `1s` or `250ms`.

use crate::page::locator::DEFAULT_SHELF_DENY;
use fundu::DurationParser;
use serde::{Deserialize, Deserializer};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Port for the HTTP surface.
    pub port: u16,
    /// Base log level for the crate's own targets.
    pub log_level: String,
    /// Endpoint of the external genre lookup service.
    pub genre_service_url: String,
    /// Host substring a page address must carry to count as a playlist.
    pub playlist_host: String,
    /// Where the learning model document lives.
    pub learning_data_path: PathBuf,
    /// Grace period for in-flight requests on shutdown.
    #[serde(deserialize_with = "de_duration")]
    pub shutdown_timeout: Duration,

    /// Settle wait after each pagination scroll.
    #[serde(deserialize_with = "de_duration")]
    pub scroll_settle: Duration,
    /// Pause after scrolling back to the top.
    #[serde(deserialize_with = "de_duration")]
    pub scroll_top_pause: Duration,
    /// Hard bound on pagination scroll cycles.
    pub max_scroll_attempts: u32,
    /// Consecutive no-growth observations that end pagination.
    pub scroll_stagnation_limit: u32,
    /// Maximum tracks extracted per run.
    pub track_cap: usize,

    /// Attempt cap for the readiness poll loop.
    pub readiness_attempts: u32,
    /// Interval between readiness polls.
    #[serde(deserialize_with = "de_duration")]
    pub readiness_poll: Duration,

    /// Shelf labels whose items are excluded, comma-separated in the
    /// environment. Locale-dependent, hence configurable.
    #[serde(deserialize_with = "de_string_list")]
    pub shelf_deny_list: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            log_level: "info".to_string(),
            genre_service_url:
                "https://yt-music-extension.netlify.app/.netlify/functions/spotify-genre"
                    .to_string(),
            playlist_host: "music.youtube.com".to_string(),
            learning_data_path: PathBuf::from("learning-data.json"),
            shutdown_timeout: Duration::from_secs(10),
            scroll_settle: Duration::from_secs(1),
            scroll_top_pause: Duration::from_millis(200),
            max_scroll_attempts: 50,
            scroll_stagnation_limit: 5,
            track_cap: 100,
            readiness_attempts: 15,
            readiness_poll: Duration::from_secs(1),
            shelf_deny_list: DEFAULT_SHELF_DENY.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Parse a humane duration string (`1s`, `250ms`, `2m`).
pub fn parse_duration(raw: &str) -> Result<Duration, String> {
    DurationParser::with_all_time_units()
        .parse(raw)
        .map_err(|e| format!("invalid duration {raw:?}: {e}"))?
        .try_into()
        .map_err(|e| format!("duration {raw:?} out of range: {e}"))
}

fn de_duration<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_duration(&raw).map_err(serde::de::Error::custom)
}

fn de_string_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(crate::utils::split_csv(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Figment;
    use figment::providers::Serialized;

    #[test]
    fn test_defaults_without_environment() {
        let config: Config = Figment::new().extract().unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_scroll_attempts, 50);
        assert_eq!(config.track_cap, 100);
        assert_eq!(config.scroll_settle, Duration::from_secs(1));
        assert!(config.shelf_deny_list.contains(&"Recommended".to_string()));
    }

    #[test]
    fn test_overrides_parse_through_custom_deserializers() {
        let config: Config = Figment::new()
            .merge(Serialized::default("port", 9100))
            .merge(Serialized::default("scroll_settle", "250ms"))
            .merge(Serialized::default("shelf_deny_list", "Recommandé, Similaire"))
            .extract()
            .unwrap();
        assert_eq!(config.port, 9100);
        assert_eq!(config.scroll_settle, Duration::from_millis(250));
        assert_eq!(config.shelf_deny_list, vec!["Recommandé", "Similaire"]);
    }

    #[test]
    fn test_duration_parsing() {
        assert_eq!(parse_duration("1s").unwrap(), Duration::from_secs(1));
        assert_eq!(parse_duration("200ms").unwrap(), Duration::from_millis(200));
        assert!(parse_duration("soon").is_err());
    }
}
