//! Abstract view over the document being scraped.
//!
//! The extraction engine only ever talks to [`DocumentView`], never to a
//! concrete page technology. Production runs use the snapshot view in
//! [`html`]; tests drive the same engine through scripted in-memory views.

pub mod fields;
pub mod html;
pub mod locator;
pub mod pagination;
pub mod performers;
pub mod readiness;

pub use html::{HtmlView, PageFetcher};

/// Opaque reference to one element inside a [`DocumentView`].
///
/// Handles are only meaningful to the view that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementHandle(pub(crate) usize);

/// Document load state, mirroring the classic readiness enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Loading,
    Interactive,
    Complete,
}

/// Capability surface the extraction engine requires from a page.
///
/// Queries take CSS selector strings; an invalid selector yields an empty
/// result rather than an error, matching how the cascades are meant to
/// degrade. Scrolling is a hint; a static snapshot may ignore it.
pub trait DocumentView: Send + Sync {
    fn ready_state(&self) -> ReadyState;

    /// Address of the document, as the page itself reports it.
    fn current_location(&self) -> String;

    /// Document title (empty when absent).
    fn title(&self) -> String;

    /// Concatenated text content of the whole document body.
    fn body_text(&self) -> String;

    fn query_all(&self, selector: &str) -> Vec<ElementHandle>;

    fn query_within(&self, element: ElementHandle, selector: &str) -> Vec<ElementHandle>;

    /// Nearest ancestor (not including `element`) matching `selector`.
    fn closest(&self, element: ElementHandle, selector: &str) -> Option<ElementHandle>;

    /// Concatenated text content of `element` and its descendants.
    fn text(&self, element: ElementHandle) -> String;

    fn attribute(&self, element: ElementHandle, name: &str) -> Option<String>;

    /// Number of direct element children.
    fn child_count(&self, element: ElementHandle) -> usize;

    fn scroll_to_bottom(&self);

    fn scroll_to_top(&self);
}
