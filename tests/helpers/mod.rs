//! Shared fixtures for integration tests.
#![allow(dead_code)]

use playdex::classify::ClassificationOrchestrator;
use playdex::classify::genre::GenreClient;
use playdex::classify::language::LearnedLanguage;
use playdex::config::Config;
use playdex::extract::Extractor;
use playdex::learning::LearningStore;
use playdex::page::PageFetcher;
use playdex::page::locator::ItemLocator;
use playdex::page::pagination::PaginationDriver;
use playdex::page::readiness::ReadinessMonitor;
use playdex::state::AppState;
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

/// An extractor with zero-length waits, for tests that should not sleep.
pub fn fast_extractor(playlist_host: &str) -> Extractor {
    Extractor::new(
        ItemLocator::default(),
        ReadinessMonitor::new(3, Duration::ZERO),
        PaginationDriver {
            max_attempts: 50,
            stagnation_limit: 5,
            item_cap: 100,
            settle: Duration::ZERO,
            top_pause: Duration::ZERO,
        },
        100,
        playlist_host.to_string(),
    )
}

/// Render a playlist page whose items extract through the primary selector
/// path.
pub fn playlist_html(songs: &[(&str, &str)]) -> String {
    let mut items = String::new();
    for (index, (title, artist)) in songs.iter().enumerate() {
        write!(
            items,
            r#"<ytmusic-responsive-list-item-renderer>
                <a class="title" href="/watch?v=vid{index}">{title}</a>
                <span class="subtitle">{artist}</span>
                <span class="duration">3:{index:02}</span>
            </ytmusic-responsive-list-item-renderer>"#
        )
        .unwrap();
    }
    format!(
        "<html><head><title>Test Mix</title></head><body>\
         <ytmusic-playlist-shelf-renderer>{items}</ytmusic-playlist-shelf-renderer>\
         </body></html>"
    )
}

/// Full application state against a fresh learning store and the given
/// genre endpoint.
pub async fn test_state(
    genre_endpoint: String,
    playlist_host: &str,
    dir: &tempfile::TempDir,
) -> AppState {
    let learning = Arc::new(
        LearningStore::open(dir.path().join("learning.json"))
            .await
            .unwrap(),
    );
    let genre = Arc::new(GenreClient::new(genre_endpoint));
    let language = Arc::new(LearnedLanguage::new(learning.clone()));
    let classifier = Arc::new(ClassificationOrchestrator::new(genre, language));

    AppState::new(
        Arc::new(Config::default()),
        learning,
        Arc::new(fast_extractor(playlist_host)),
        classifier,
        Arc::new(PageFetcher::new()),
    )
}
