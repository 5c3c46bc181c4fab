//! Cascading per-field extraction from one item element.
//!
//! Each field has an ordered sub-selector list; the first selector whose
//! first match yields non-empty trimmed text wins. Title and performer have
//! a final line-split fallback over the element's full text.

use crate::models::{Track, UNKNOWN_PERFORMER};
use crate::page::locator::DURATION_RE;
use crate::page::performers::parse_performers;
use crate::page::{DocumentView, ElementHandle};
use chrono::Utc;
use regex::Regex;
use std::sync::LazyLock;

const TITLE_SELECTORS: &[&str] = &[
    ".title",
    "[data-testid='title']",
    ".song-title",
    "a[href*='watch']",
    "yt-formatted-string",
    "[title]",
    ".flex-column yt-formatted-string",
    ".title-text",
];

const PERFORMER_SELECTORS: &[&str] = &[
    ".subtitle",
    "[data-testid='artist']",
    ".artist",
    "a[href*='channel']",
    "yt-formatted-string",
    ".byline",
    ".subtitle-text",
    ".flex-column yt-formatted-string:nth-child(2)",
];

const DURATION_SELECTORS: &[&str] = &[
    ".duration",
    "[data-testid='duration']",
    ".time",
    "span[aria-label*=':']",
    ".fixed-column",
    ".length-text",
];

const WATCH_LINK_SELECTOR: &str = "a[href*='watch']";

static VIDEO_ID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[?&]v=([^&]+)").unwrap());

/// Credit prefix stripped from performer names ("by Tarkan").
static BY_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^by\s+").unwrap());

/// First selector whose first match has non-empty trimmed text.
fn first_text<V: DocumentView>(
    view: &V,
    element: ElementHandle,
    selectors: &[&str],
) -> Option<String> {
    for selector in selectors {
        if let Some(&found) = view.query_within(element, selector).first() {
            let text = view.text(found);
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

/// Identifier from the first watch/play link's `v=` query parameter.
fn extract_video_id<V: DocumentView>(view: &V, element: ElementHandle) -> Option<String> {
    let link = *view.query_within(element, WATCH_LINK_SELECTOR).first()?;
    let href = view.attribute(link, "href")?;
    VIDEO_ID_RE
        .captures(&href)
        .map(|caps| caps[1].to_string())
}

fn thumbnail_url(video_id: &str) -> String {
    format!("https://img.youtube.com/vi/{video_id}/default.jpg")
}

/// Extract a [`Track`] from one located item element.
///
/// Returns `None` when no title is resolvable after every fallback; the
/// caller counts such elements as invalid and continues with the rest of
/// the batch.
pub fn extract_track<V: DocumentView>(view: &V, element: ElementHandle) -> Option<Track> {
    let mut title = first_text(view, element, TITLE_SELECTORS).unwrap_or_default();
    let mut performers = first_text(view, element, PERFORMER_SELECTORS)
        .map(|credit| parse_performers(&credit))
        .unwrap_or_default();
    let mut duration = first_text(view, element, DURATION_SELECTORS).unwrap_or_default();

    // Selector cascade came up short: fall back to the element's raw text.
    // Line one is conventionally the title, line two the performer credit;
    // only still-missing fields are filled in.
    if title.is_empty() || performers.is_empty() {
        let full_text = view.text(element);
        let lines: Vec<&str> = full_text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        if duration.is_empty()
            && let Some(found) = DURATION_RE.find(&full_text)
        {
            duration = found.as_str().to_string();
        }
        if title.is_empty()
            && let Some(first) = lines.first()
        {
            title = (*first).to_string();
        }
        if performers.is_empty()
            && let Some(second) = lines.get(1)
        {
            performers = parse_performers(second);
        }
    }

    if title.is_empty() {
        return None;
    }

    let performers: Vec<String> = performers
        .into_iter()
        .map(|name| BY_PREFIX_RE.replace(&name, "").trim().to_string())
        .filter(|name| !name.is_empty())
        .collect();
    let performers = if performers.is_empty() {
        vec![UNKNOWN_PERFORMER.to_string()]
    } else {
        performers
    };

    let video_id = extract_video_id(view, element);
    let thumbnail_url = video_id.as_deref().map(thumbnail_url);

    Some(Track {
        title,
        performers,
        duration,
        video_id,
        thumbnail_url,
        captured_at: Utc::now(),
    })
}
