//! Extraction orchestrator: validation, readiness, pagination, then
//! per-item field extraction into a bounded result.
//!
//! One extraction at a time per orchestrator: a second call while one is in
//! flight is rejected immediately rather than queued.

use crate::models::{ExtractionResult, Track};
use crate::page::fields::extract_track;
use crate::page::locator::ItemLocator;
use crate::page::pagination::PaginationDriver;
use crate::page::readiness::ReadinessMonitor;
use crate::page::DocumentView;
use crate::utils::fmt_duration;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{info, warn};
use url::Url;

/// Structural elements that identify a playlist page.
const PLAYLIST_STRUCTURE_SELECTOR: &str =
    "ytmusic-playlist-shelf-renderer, [data-testid='playlist'], .playlist";

/// Listing-size phrases ("34 parça", "2 hours") accepted as corroboration
/// that the address points at a playlist.
const LISTING_INDICATORS: &[&str] = &[
    "parça",
    "track",
    "Oynatma listesi",
    "Playlist",
    "saat",
    "hour",
    "dakika",
    "minute",
];

/// Interstitial text served to unsupported browsers instead of the app.
const DEGRADED_PAGE_PHRASES: &[&str] = &[
    "not optimized for your browser",
    "Check for updates",
    "Get Chrome",
];

/// The auto-generated "liked music" list id, not acceptable as evidence on
/// its own.
const DEFAULT_LIST_ID: &str = "LM";

/// How an extraction run can fail. Everything else in the pipeline degrades
/// softly instead of erroring.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("an extraction is already in progress")]
    Busy,
    #[error("not a supported playlist page: {0}")]
    NotPlaylist(String),
    #[error("the page served a degraded shell instead of the playlist app")]
    DegradedPage,
    #[error("no track elements found after scrolling the page")]
    NoElements,
    #[error("no valid tracks could be extracted ({invalid} elements rejected)")]
    NoValidTracks { invalid: usize },
}

/// Clears the in-flight flag when an extraction run ends, however it ends.
struct FlightGuard<'a>(&'a AtomicBool);

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct Extractor {
    locator: ItemLocator,
    readiness: ReadinessMonitor,
    pagination: PaginationDriver,
    item_cap: usize,
    /// Substring the page host must carry to qualify as a playlist address.
    playlist_host: String,
    in_flight: AtomicBool,
}

impl Extractor {
    pub fn new(
        locator: ItemLocator,
        readiness: ReadinessMonitor,
        pagination: PaginationDriver,
        item_cap: usize,
        playlist_host: String,
    ) -> Self {
        Self {
            locator,
            readiness,
            pagination,
            item_cap,
            playlist_host,
            in_flight: AtomicBool::new(false),
        }
    }

    fn acquire(&self) -> Result<FlightGuard<'_>, ExtractError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ExtractError::Busy)?;
        Ok(FlightGuard(&self.in_flight))
    }

    /// Run the full extraction pipeline against a page view.
    pub async fn extract<V: DocumentView>(
        &self,
        view: &V,
    ) -> Result<ExtractionResult, ExtractError> {
        let _guard = self.acquire()?;
        let start = Instant::now();

        // Unsupported browsers get an interstitial shell instead of the app;
        // nothing below can work against it.
        let body = view.body_text();
        if DEGRADED_PAGE_PHRASES.iter().any(|p| body.contains(p)) {
            return Err(ExtractError::DegradedPage);
        }

        self.validate_playlist_page(view)?;

        if !self.readiness.wait(view, &self.locator).await {
            // Soft failure: the pagination loop gets a chance regardless.
            warn!("page readiness timed out, attempting extraction anyway");
        }

        let pagination = self.pagination.run(view, &self.locator).await;

        let candidates = self.locator.locate(view);
        if candidates.is_empty() {
            return Err(ExtractError::NoElements);
        }
        let total_found = candidates.len();

        let mut tracks: Vec<Track> = Vec::new();
        let mut invalid = 0usize;
        for (index, &element) in candidates.iter().take(self.item_cap).enumerate() {
            match extract_track(view, element) {
                Some(track) => tracks.push(track),
                None => invalid += 1,
            }
            // Stay cooperative on large batches.
            if index % 20 == 0 {
                tokio::task::yield_now().await;
            }
        }

        if tracks.is_empty() {
            return Err(ExtractError::NoValidTracks { invalid });
        }

        let limit_reached = total_found > self.item_cap;
        info!(
            valid = tracks.len(),
            invalid,
            total_found,
            limit_reached,
            scroll_attempts = pagination.attempts,
            duration = fmt_duration(start.elapsed()),
            "extraction completed"
        );

        Ok(ExtractionResult {
            tracks,
            total_found_on_page: total_found,
            limit_reached,
        })
    }

    /// A page qualifies when its address has the playlist shape and at least
    /// one corroborating signal backs it up: playlist structure, located
    /// items, listing-size text, or a non-default list identifier.
    fn validate_playlist_page<V: DocumentView>(&self, view: &V) -> Result<(), ExtractError> {
        let location = view.current_location();
        let url = Url::parse(&location)
            .map_err(|_| ExtractError::NotPlaylist(location.clone()))?;

        let host_ok = url
            .host_str()
            .is_some_and(|host| host.contains(&self.playlist_host));
        if !host_ok || !location.contains("playlist") {
            return Err(ExtractError::NotPlaylist(location));
        }

        if !view.query_all(PLAYLIST_STRUCTURE_SELECTOR).is_empty() {
            return Ok(());
        }
        if !self.locator.locate(view).is_empty() {
            return Ok(());
        }
        let body = view.body_text();
        if LISTING_INDICATORS.iter().any(|p| body.contains(p)) {
            return Ok(());
        }
        if url
            .query_pairs()
            .any(|(key, value)| key == "list" && !value.is_empty() && value != DEFAULT_LIST_ID)
        {
            return Ok(());
        }

        Err(ExtractError::NotPlaylist(location))
    }
}
