//! Waiting for the page to finish loading and for dynamic content to
//! materialize.
//!
//! All waits are bounded condition-polls; exhausting them is a soft failure
//! that is logged and never blocks the pipeline.

use crate::page::locator::{ItemLocator, TRACK_COUNT_PHRASES};
use crate::page::{DocumentView, ReadyState};
use std::time::Duration;
use tracing::{debug, warn};

/// Title shown before the SPA has rendered anything useful.
const PLACEHOLDER_TITLE: &str = "YouTube Music";

/// Poll `predicate` up to `max_attempts` times, sleeping `interval` between
/// attempts. Returns whether the predicate ever held.
pub async fn wait_until<F>(mut predicate: F, max_attempts: u32, interval: Duration) -> bool
where
    F: FnMut() -> bool,
{
    for attempt in 0..max_attempts {
        if predicate() {
            return true;
        }
        if attempt + 1 < max_attempts {
            tokio::time::sleep(interval).await;
        }
    }
    false
}

/// Bounded readiness polling ahead of extraction.
pub struct ReadinessMonitor {
    pub max_attempts: u32,
    pub poll_interval: Duration,
}

impl ReadinessMonitor {
    pub fn new(max_attempts: u32, poll_interval: Duration) -> Self {
        Self {
            max_attempts,
            poll_interval,
        }
    }

    /// Wait for document load, then for dynamic content. Returns `false` on
    /// timeout, which callers treat as a soft failure.
    pub async fn wait<V: DocumentView>(&self, view: &V, locator: &ItemLocator) -> bool {
        let loaded = wait_until(
            || view.ready_state() == ReadyState::Complete,
            self.max_attempts,
            self.poll_interval,
        )
        .await;
        if !loaded {
            warn!("document never reached complete ready state, proceeding anyway");
            return false;
        }

        let visible = wait_until(
            || Self::content_visible(view, locator),
            self.max_attempts,
            self.poll_interval,
        )
        .await;
        if visible {
            debug!("dynamic content visible");
        } else {
            warn!(
                attempts = self.max_attempts,
                "dynamic content wait timed out, proceeding anyway"
            );
        }
        visible
    }

    /// Any signal that the playlist has rendered: a real page title, located
    /// item elements, or track-count indicator text.
    fn content_visible<V: DocumentView>(view: &V, locator: &ItemLocator) -> bool {
        let title = view.title();
        if !title.is_empty() && title != PLACEHOLDER_TITLE && !title.contains("Loading") {
            return true;
        }

        if !locator.locate(view).is_empty() {
            return true;
        }

        let body = view.body_text();
        TRACK_COUNT_PHRASES.iter().any(|p| body.contains(p))
    }
}
