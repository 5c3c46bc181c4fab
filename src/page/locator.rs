//! Multi-strategy location of track item elements.
//!
//! Strategies are an ordered priority table, most specific first. A strategy
//! only wins if at least one of its candidates survives the shelf deny-list
//! filter; otherwise the next strategy is consulted. When the whole table
//! comes up empty, a broad structural heuristic scans every element on the
//! page.

use crate::page::{DocumentView, ElementHandle};
use regex::Regex;
use std::sync::LazyLock;

/// Ordered location strategies, most to least specific.
const ITEM_STRATEGIES: &[&str] = &[
    "ytmusic-playlist-shelf-renderer ytmusic-responsive-list-item-renderer",
    "ytmusic-shelf-renderer[title*='Oynatma listesi'] ytmusic-responsive-list-item-renderer",
    "ytmusic-shelf-renderer[title*='Playlist'] ytmusic-responsive-list-item-renderer",
    "[data-testid='song-item']",
    ".song-item",
    "[role='listitem']",
    "ytmusic-responsive-list-item-renderer[is-music]",
    "ytmusic-responsive-list-item-renderer[is-music-video]",
    "ytmusic-shelf-renderer ytmusic-responsive-list-item-renderer",
    "ytmusic-responsive-list-item-renderer",
    "[data-testid='playlist-item']",
    ".playlist-item",
];

/// Container element that labels a shelf section.
const SHELF_SELECTOR: &str = "ytmusic-shelf-renderer";

/// Descendants that mark an element as title-bearing for the heuristic scan.
const TITLE_BEARING_SELECTOR: &str =
    "a[href*='watch'], [title], yt-formatted-string, .title, .song-title";

/// Shelf labels excluded by default. The page mixes playlist items with
/// recommendation shelves; these labels are locale-dependent, so the
/// effective list is configurable.
pub const DEFAULT_SHELF_DENY: &[&str] = &["Önerilen", "Recommended", "Benzer", "Similar"];

/// Phrases that appear in container-level summary text ("34 parça",
/// "2 hours") but never inside a single item element.
pub const TRACK_COUNT_PHRASES: &[&str] = &["parça", "track", "saat", "hour"];

/// Duration-shaped substring (`3:41`).
pub(crate) static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+:\d+").unwrap());

/// Resolves the current set of item elements on a page.
pub struct ItemLocator {
    shelf_deny: Vec<String>,
}

impl ItemLocator {
    pub fn new(shelf_deny: Vec<String>) -> Self {
        Self { shelf_deny }
    }

    /// Locate item elements using the strategy table, falling back to the
    /// broad heuristic. May return an empty set.
    pub fn locate<V: DocumentView>(&self, view: &V) -> Vec<ElementHandle> {
        for strategy in ITEM_STRATEGIES {
            let candidates = view.query_all(strategy);
            if candidates.is_empty() {
                continue;
            }

            let kept: Vec<ElementHandle> = candidates
                .into_iter()
                .filter(|&el| !self.in_denied_shelf(view, el))
                .collect();

            if !kept.is_empty() {
                return kept;
            }
        }

        self.heuristic_scan(view)
    }

    /// True when the element's nearest shelf container carries a denied
    /// label in its `title` attribute or text.
    fn in_denied_shelf<V: DocumentView>(&self, view: &V, element: ElementHandle) -> bool {
        let Some(shelf) = view.closest(element, SHELF_SELECTOR) else {
            return false;
        };
        let title = view.attribute(shelf, "title").unwrap_or_default();
        let text = view.text(shelf);
        self.shelf_deny
            .iter()
            .any(|label| title.contains(label.as_str()) || text.contains(label.as_str()))
    }

    /// Last-resort scan over every element: keep ones that look like a
    /// single track row. Container elements are excluded by their
    /// track-count summary text and their child counts.
    fn heuristic_scan<V: DocumentView>(&self, view: &V) -> Vec<ElementHandle> {
        view.query_all("*")
            .into_iter()
            .filter(|&el| {
                if view.child_count(el) <= 2 {
                    return false;
                }
                if view.query_within(el, TITLE_BEARING_SELECTOR).is_empty() {
                    return false;
                }

                let text = view.text(el);
                if !DURATION_RE.is_match(&text) {
                    return false;
                }
                if TRACK_COUNT_PHRASES.iter().any(|p| text.contains(p)) {
                    return false;
                }
                !self
                    .shelf_deny
                    .iter()
                    .any(|label| text.contains(label.as_str()))
            })
            .collect()
    }
}

impl Default for ItemLocator {
    fn default() -> Self {
        Self::new(DEFAULT_SHELF_DENY.iter().map(|s| s.to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::HtmlView;

    #[test]
    fn test_primary_strategy_wins() {
        let view = HtmlView::parse(
            "loc",
            r#"<html><body>
              <ytmusic-playlist-shelf-renderer>
                <ytmusic-responsive-list-item-renderer>A</ytmusic-responsive-list-item-renderer>
                <ytmusic-responsive-list-item-renderer>B</ytmusic-responsive-list-item-renderer>
              </ytmusic-playlist-shelf-renderer>
            </body></html>"#,
        );
        let locator = ItemLocator::default();
        assert_eq!(locator.locate(&view).len(), 2);
    }

    #[test]
    fn test_denied_shelf_items_are_filtered() {
        // The playlist shelf has no ytmusic-shelf-renderer ancestor, so only
        // the recommendation shelf's items are dropped.
        let view = HtmlView::parse(
            "loc",
            r#"<html><body>
              <ytmusic-playlist-shelf-renderer>
                <ytmusic-responsive-list-item-renderer>Keep 1</ytmusic-responsive-list-item-renderer>
                <ytmusic-responsive-list-item-renderer>Keep 2</ytmusic-responsive-list-item-renderer>
              </ytmusic-playlist-shelf-renderer>
              <ytmusic-shelf-renderer title="Recommended">
                <ytmusic-responsive-list-item-renderer>Drop</ytmusic-responsive-list-item-renderer>
              </ytmusic-shelf-renderer>
            </body></html>"#,
        );
        let locator = ItemLocator::default();
        let found = locator.locate(&view);
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|&el| view.text(el).contains("Keep")));
    }

    #[test]
    fn test_all_candidates_denied_falls_through() {
        // Every strategy-nine candidate sits in a denied shelf; the next
        // applicable strategy (bare renderer) also only sees denied items,
        // so the locator ends at the heuristic and finds nothing.
        let view = HtmlView::parse(
            "loc",
            r#"<html><body>
              <ytmusic-shelf-renderer title="Benzer">
                <ytmusic-responsive-list-item-renderer>X</ytmusic-responsive-list-item-renderer>
              </ytmusic-shelf-renderer>
            </body></html>"#,
        );
        let locator = ItemLocator::default();
        assert!(locator.locate(&view).is_empty());
    }

    #[test]
    fn test_heuristic_scan_finds_row_shaped_elements() {
        let view = HtmlView::parse(
            "loc",
            r#"<html><body>
              <div class="list">
                <span>34 parça</span>
                <div><a href="/watch?v=a1">Song A</a><span>Artist A</span><span>3:41</span></div>
                <div><a href="/watch?v=b2">Song B</a><span>Artist B</span><span>4:02</span></div>
              </div>
            </body></html>"#,
        );
        let locator = ItemLocator::default();
        let found = locator.locate(&view);
        // The container itself is excluded by its track-count summary text.
        assert_eq!(found.len(), 2);
        assert!(view.text(found[0]).contains("Song A"));
    }

    #[test]
    fn test_heuristic_requires_duration_and_children() {
        let view = HtmlView::parse(
            "loc",
            r#"<html><body>
              <div><a href="/watch?v=a1">No duration here</a><span>x</span><span>y</span></div>
              <div><a href="/watch?v=b2">Too few children</a><span>3:41</span></div>
            </body></html>"#,
        );
        let locator = ItemLocator::default();
        assert!(locator.locate(&view).is_empty());
    }
}
