//! Snapshot-backed [`DocumentView`] over parsed HTML, plus the fetcher that
//! produces one from a live URL.
//!
//! The snapshot is immutable, so the scroll hints are no-ops and readiness
//! is always `Complete`; the pagination loop still runs against it and
//! converges through its stagnation counter.

use crate::page::{DocumentView, ElementHandle, ReadyState};
use anyhow::{Context, Result};
use ego_tree::NodeId;
use html_scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Browser identity presented when fetching pages. Playlist pages serve a
/// degraded "not optimized for your browser" shell to unknown agents.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// A parsed, immutable HTML document implementing [`DocumentView`].
pub struct HtmlView {
    location: String,
    doc: Html,
    /// Handle index → node, assigned in document order at parse time.
    nodes: Vec<NodeId>,
    ids: HashMap<NodeId, usize>,
}

impl HtmlView {
    /// Parse an HTML document fetched from (or standing in for) `location`.
    pub fn parse(location: impl Into<String>, html: &str) -> Self {
        let doc = Html::parse_document(html);
        let mut nodes = Vec::new();
        let mut ids = HashMap::new();
        for node in doc.root_element().descendants() {
            if node.value().is_element() {
                ids.insert(node.id(), nodes.len());
                nodes.push(node.id());
            }
        }
        Self {
            location: location.into(),
            doc,
            nodes,
            ids,
        }
    }

    fn element(&self, handle: ElementHandle) -> Option<ElementRef<'_>> {
        let id = *self.nodes.get(handle.0)?;
        self.doc.tree.get(id).and_then(ElementRef::wrap)
    }

    fn handle_for(&self, element: ElementRef<'_>) -> Option<ElementHandle> {
        self.ids.get(&element.id()).copied().map(ElementHandle)
    }

    fn selector(raw: &str) -> Option<Selector> {
        match Selector::parse(raw) {
            Ok(sel) => Some(sel),
            Err(e) => {
                debug!(selector = raw, error = %e, "unparseable selector, skipping");
                None
            }
        }
    }
}

impl DocumentView for HtmlView {
    fn ready_state(&self) -> ReadyState {
        ReadyState::Complete
    }

    fn current_location(&self) -> String {
        self.location.clone()
    }

    fn title(&self) -> String {
        Self::selector("title")
            .and_then(|sel| {
                self.doc
                    .select(&sel)
                    .next()
                    .map(|el| el.text().collect::<String>().trim().to_string())
            })
            .unwrap_or_default()
    }

    fn body_text(&self) -> String {
        let body = Self::selector("body").and_then(|sel| self.doc.select(&sel).next());
        match body {
            Some(el) => el.text().collect(),
            None => self.doc.root_element().text().collect(),
        }
    }

    fn query_all(&self, selector: &str) -> Vec<ElementHandle> {
        let Some(sel) = Self::selector(selector) else {
            return Vec::new();
        };
        self.doc
            .select(&sel)
            .filter_map(|el| self.handle_for(el))
            .collect()
    }

    fn query_within(&self, element: ElementHandle, selector: &str) -> Vec<ElementHandle> {
        let (Some(el), Some(sel)) = (self.element(element), Self::selector(selector)) else {
            return Vec::new();
        };
        el.select(&sel)
            .filter_map(|found| self.handle_for(found))
            .collect()
    }

    fn closest(&self, element: ElementHandle, selector: &str) -> Option<ElementHandle> {
        let el = self.element(element)?;
        let sel = Self::selector(selector)?;
        el.ancestors()
            .filter_map(ElementRef::wrap)
            .find(|ancestor| sel.matches(ancestor))
            .and_then(|ancestor| self.handle_for(ancestor))
    }

    fn text(&self, element: ElementHandle) -> String {
        self.element(element)
            .map(|el| el.text().collect())
            .unwrap_or_default()
    }

    fn attribute(&self, element: ElementHandle, name: &str) -> Option<String> {
        self.element(element)?
            .value()
            .attr(name)
            .map(str::to_string)
    }

    fn child_count(&self, element: ElementHandle) -> usize {
        self.element(element)
            .map(|el| el.children().filter(|c| c.value().is_element()).count())
            .unwrap_or(0)
    }

    fn scroll_to_bottom(&self) {}

    fn scroll_to_top(&self) {}
}

/// Fetches a page over HTTP and parses it into an [`HtmlView`].
pub struct PageFetcher {
    http: reqwest::Client,
}

impl Default for PageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PageFetcher {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .timeout(FETCH_TIMEOUT)
                .build()
                .expect("Failed to build reqwest client"),
        }
    }

    /// Fetch `url` and return a snapshot view of the response body.
    pub async fn fetch(&self, url: &str) -> Result<HtmlView> {
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch page {url}"))?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("Page fetch returned {status} for {url}");
        }

        let body = resp
            .text()
            .await
            .with_context(|| format!("Failed to read page body from {url}"))?;

        Ok(HtmlView::parse(url, &body))
    }
}
