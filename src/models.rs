//! Core data types shared by the extraction and classification pipelines.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Sentinel used when no performer could be extracted for a track.
pub const UNKNOWN_PERFORMER: &str = "Unknown Artist";

/// One extracted playlist entry.
///
/// Immutable after creation; the orchestrator rebuilds its result list from
/// scratch on every run, so tracks carry no cross-run identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub title: String,
    /// Credited performers, in page order. Never empty: extraction falls
    /// back to [`UNKNOWN_PERFORMER`] when nothing could be resolved.
    pub performers: Vec<String>,
    /// Free-form duration text as displayed on the page (possibly empty).
    pub duration: String,
    pub video_id: Option<String>,
    /// Derived deterministically from `video_id`; `None` without one.
    pub thumbnail_url: Option<String>,
    pub captured_at: DateTime<Utc>,
}

impl Track {
    /// The primary (first-credited) performer.
    pub fn primary_performer(&self) -> &str {
        self.performers
            .first()
            .map(String::as_str)
            .unwrap_or(UNKNOWN_PERFORMER)
    }

    /// The `{title, artist}` pair sent to classification providers.
    pub fn song_ref(&self) -> SongRef {
        SongRef {
            title: self.title.clone(),
            artist: self.primary_performer().to_string(),
        }
    }
}

/// Bounded, ordered outcome of one extraction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub tracks: Vec<Track>,
    /// Item elements present on the page after full pagination, including
    /// any beyond the cap and any that failed field extraction.
    pub total_found_on_page: usize,
    /// True iff the page held more items than the extraction cap.
    pub limit_reached: bool,
}

/// A `{title, artist}` pair as understood by the genre and language services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongRef {
    pub title: String,
    pub artist: String,
}

/// Compact track record embedded in classification groupings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackSummary {
    pub title: String,
    pub performers: Vec<String>,
    pub duration: String,
    pub video_id: Option<String>,
    pub thumbnail_url: Option<String>,
    pub captured_at: DateTime<Utc>,
}

impl From<&Track> for TrackSummary {
    fn from(track: &Track) -> Self {
        Self {
            title: track.title.clone(),
            performers: track.performers.clone(),
            duration: track.duration.clone(),
            video_id: track.video_id.clone(),
            thumbnail_url: track.thumbnail_url.clone(),
            captured_at: track.captured_at,
        }
    }
}

/// A track summary annotated with its language detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageEntry {
    #[serde(flatten)]
    pub track: TrackSummary,
    /// BCP-47-ish language tag from the detector (`"tr"` / `"en"`).
    pub language: String,
    pub confidence: String,
    pub score: i64,
    pub patterns: Vec<String>,
}

/// Result of classifying one batch of tracks along every dimension.
///
/// Maps preserve their locale-sorted key order. Built fresh per extraction
/// run; never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub by_performer: IndexMap<String, Vec<TrackSummary>>,
    pub by_genre: IndexMap<String, Vec<TrackSummary>>,
    pub by_language: IndexMap<String, Vec<LanguageEntry>>,
    pub total_tracks: usize,
    pub total_performers: usize,
    pub total_genres: usize,
    pub performer_list: Vec<String>,
    pub genre_list: Vec<String>,
    /// Set when the genre dimension degraded to an empty grouping.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre_error: Option<String>,
    /// Set when the language dimension degraded to an empty grouping.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_error: Option<String>,
}
