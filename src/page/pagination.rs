//! Scroll-driven pagination with convergence detection.
//!
//! This is a bounded convergence loop, not a fixed-iteration scrape: it
//! stops on the item cap, on stagnation, or on the attempt bound, whichever
//! comes first. The observed item count only ever grows.

use crate::page::DocumentView;
use crate::page::locator::ItemLocator;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

/// Why the pagination loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The page exposed at least the item cap.
    CapReached,
    /// No new items across the stagnation window.
    Stagnated,
    /// The hard attempt bound was hit first.
    AttemptsExhausted,
}

#[derive(Debug, Clone, Copy)]
pub struct PaginationOutcome {
    pub final_count: usize,
    pub attempts: u32,
    pub reason: StopReason,
}

/// Drives scroll-to-bottom cycles until the item count converges.
pub struct PaginationDriver {
    pub max_attempts: u32,
    pub stagnation_limit: u32,
    pub item_cap: usize,
    /// Settle wait after each scroll, for lazy-loaded rows to land.
    pub settle: Duration,
    /// Pause after the final scroll back to the top.
    pub top_pause: Duration,
}

impl PaginationDriver {
    /// Run the loop to convergence. Always leaves the page scrolled back to
    /// the top, regardless of stop reason.
    pub async fn run<V: DocumentView>(&self, view: &V, locator: &ItemLocator) -> PaginationOutcome {
        let mut attempts = 0u32;
        let mut last_count = 0usize;
        let mut stagnant = 0u32;
        let mut count = 0usize;

        let reason = loop {
            if attempts >= self.max_attempts {
                break StopReason::AttemptsExhausted;
            }

            view.scroll_to_bottom();
            sleep(self.settle).await;

            count = locator.locate(view).len();
            debug!(attempt = attempts + 1, count, "pagination scroll cycle");

            if count >= self.item_cap {
                break StopReason::CapReached;
            }

            if count == last_count {
                stagnant += 1;
            } else {
                stagnant = 0;
            }
            if stagnant >= self.stagnation_limit {
                break StopReason::Stagnated;
            }

            attempts += 1;
            last_count = count;

            // Slow lazy-load bursts sometimes land late; give them one extra
            // settle window every fifth cycle.
            if attempts % 5 == 0 {
                sleep(self.settle).await;
            }
        };

        view.scroll_to_top();
        sleep(self.top_pause).await;

        info!(
            final_count = count,
            attempts,
            reason = ?reason,
            "pagination converged"
        );

        PaginationOutcome {
            final_count: count,
            attempts,
            reason,
        }
    }
}
