//! Classification of extracted tracks by performer, genre, and language.
//!
//! Performer grouping is pure and always succeeds. Genre and language each
//! cost one batched provider call; a failed call degrades that dimension to
//! an empty grouping with an attached error, never the whole run.

pub mod collate;
pub mod genre;
pub mod json;
pub mod language;

use crate::models::{ClassificationResult, LanguageEntry, Track, TrackSummary};
use crate::utils::fmt_duration;
use genre::{GenreEntry, GenreProvider};
use indexmap::IndexMap;
use language::LanguageProvider;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Failure of one classification provider call.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("service returned status {status}")]
    Status { status: u16 },
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Group keys for the language dimension, in display order.
const LANGUAGE_GROUPS: [&str; 2] = ["Turkish", "Foreign"];

pub struct ClassificationOrchestrator {
    genre: Arc<dyn GenreProvider>,
    language: Arc<dyn LanguageProvider>,
}

impl ClassificationOrchestrator {
    pub fn new(genre: Arc<dyn GenreProvider>, language: Arc<dyn LanguageProvider>) -> Self {
        Self { genre, language }
    }

    /// Classify one batch of tracks along every dimension.
    pub async fn classify(&self, tracks: &[Track]) -> ClassificationResult {
        let start = Instant::now();
        let mut result = ClassificationResult {
            by_performer: group_by_performer(tracks),
            total_tracks: tracks.len(),
            ..Default::default()
        };
        result.total_performers = result.by_performer.len();
        result.performer_list = result.by_performer.keys().cloned().collect();

        let songs: Vec<_> = tracks.iter().map(Track::song_ref).collect();

        match self.genre.genres_for(&songs).await {
            Ok(entries) => {
                result.by_genre = group_by_genre(tracks, entries);
            }
            Err(e) => {
                warn!(error = %e, "genre classification degraded to empty grouping");
                result.genre_error = Some(e.to_string());
            }
        }
        result.total_genres = result.by_genre.len();
        result.genre_list = result.by_genre.keys().cloned().collect();

        match self.language.detect_batch(&songs).await {
            Ok(batch) => {
                result.by_language = group_by_language(tracks, batch.results);
            }
            Err(e) => {
                warn!(error = %e, "language classification degraded to empty grouping");
                result.language_error = Some(e.to_string());
            }
        }

        info!(
            tracks = result.total_tracks,
            performers = result.total_performers,
            genres = result.total_genres,
            duration = fmt_duration(start.elapsed()),
            "classification completed"
        );
        result
    }
}

/// Membership grouping: a track appears under every performer it credits.
/// Keys come back sorted under Turkish collation.
fn group_by_performer(tracks: &[Track]) -> IndexMap<String, Vec<TrackSummary>> {
    let mut groups: HashMap<String, Vec<TrackSummary>> = HashMap::new();
    for track in tracks {
        for performer in &track.performers {
            groups
                .entry(performer.clone())
                .or_default()
                .push(TrackSummary::from(track));
        }
    }
    into_sorted(groups, collate::turkish_cmp)
}

/// Join genre lookups back to tracks by title and credited performer, then
/// group under each effective genre.
fn group_by_genre(tracks: &[Track], entries: Vec<GenreEntry>) -> IndexMap<String, Vec<TrackSummary>> {
    let mut groups: HashMap<String, Vec<TrackSummary>> = HashMap::new();
    for entry in entries {
        let matched = tracks.iter().find(|t| {
            t.title == entry.title
                && (t.primary_performer() == entry.artist || t.performers.contains(&entry.artist))
        });
        let Some(track) = matched else {
            continue;
        };
        groups
            .entry(entry.genre_or_unknown().to_string())
            .or_default()
            .push(TrackSummary::from(track));
    }
    into_sorted(groups, collate::base_cmp)
}

/// Zip detections back onto their tracks (one per song, request order) and
/// bucket into the fixed language groups.
fn group_by_language(
    tracks: &[Track],
    detections: Vec<language::LanguageDetection>,
) -> IndexMap<String, Vec<LanguageEntry>> {
    let mut groups: IndexMap<String, Vec<LanguageEntry>> = IndexMap::new();
    for key in LANGUAGE_GROUPS {
        groups.insert(key.to_string(), Vec::new());
    }

    for (track, detection) in tracks.iter().zip(detections) {
        let key = if detection.is_turkish {
            LANGUAGE_GROUPS[0]
        } else {
            LANGUAGE_GROUPS[1]
        };
        groups.entry(key.to_string()).or_default().push(LanguageEntry {
            track: TrackSummary::from(track),
            language: detection.language,
            confidence: detection.confidence,
            score: detection.turkish_score,
            patterns: detection.patterns,
        });
    }

    groups.retain(|_, entries| !entries.is_empty());
    groups
}

fn into_sorted<T>(
    groups: HashMap<String, Vec<T>>,
    cmp: fn(&str, &str) -> std::cmp::Ordering,
) -> IndexMap<String, Vec<T>> {
    let mut groups: Vec<(String, Vec<T>)> = groups.into_iter().collect();
    groups.sort_by(|(a, _), (b, _)| cmp(a, b));
    groups.into_iter().collect()
}
