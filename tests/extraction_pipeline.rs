//! End-to-end pipeline tests: extraction from a rendered page followed by
//! full classification.

mod helpers;

use helpers::{fast_extractor, playlist_html};
use playdex::classify::ClassificationOrchestrator;
use playdex::classify::genre::GenreClient;
use playdex::classify::language::LearnedLanguage;
use playdex::learning::LearningStore;
use playdex::page::HtmlView;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

const PLAYLIST_URL: &str = "https://music.youtube.com/playlist?list=PLtest01";

const SONGS: &[(&str, &str)] = &[
    ("Aşk Şarkısı", "Sezen Aksu"),
    ("Islands", "Ludovico Einaudi"),
    ("Yellow", "Coldplay"),
];

async fn classifier_against(
    server: &MockServer,
    dir: &tempfile::TempDir,
) -> ClassificationOrchestrator {
    let learning = Arc::new(
        LearningStore::open(dir.path().join("learning.json"))
            .await
            .unwrap(),
    );
    ClassificationOrchestrator::new(
        Arc::new(GenreClient::new(server.uri())),
        Arc::new(LearnedLanguage::new(learning)),
    )
}

#[tokio::test]
async fn test_three_track_playlist_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"title": "Aşk Şarkısı", "artist": "Sezen Aksu", "genre": "Pop"},
                {"title": "Islands", "artist": "Ludovico Einaudi", "genre": "Modern classical"},
                {"title": "Yellow", "artist": "Coldplay", "genre": "Rock"},
            ]
        })))
        .mount(&server)
        .await;

    let view = HtmlView::parse(PLAYLIST_URL, &playlist_html(SONGS));
    let extraction = fast_extractor("music.youtube.com")
        .extract(&view)
        .await
        .unwrap();

    assert_eq!(extraction.tracks.len(), 3);
    assert_eq!(extraction.total_found_on_page, 3);
    assert!(!extraction.limit_reached);
    assert!(extraction.tracks.iter().all(|t| t.performers.len() == 1));
    assert!(extraction.tracks.iter().all(|t| t.video_id.is_some()));

    let dir = tempfile::tempdir().unwrap();
    let result = classifier_against(&server, &dir)
        .await
        .classify(&extraction.tracks)
        .await;

    // Three distinct single-performer tracks: exactly three one-track groups.
    assert_eq!(result.total_tracks, 3);
    assert_eq!(result.total_performers, 3);
    assert!(result.by_performer.values().all(|group| group.len() == 1));
    assert_eq!(
        result.performer_list,
        vec!["Coldplay", "Ludovico Einaudi", "Sezen Aksu"]
    );

    // Genre dimension joined every track.
    assert_eq!(result.total_genres, 3);
    assert_eq!(result.by_genre["Pop"][0].title, "Aşk Şarkısı");
    assert!(result.genre_error.is_none());

    // The Turkish title clears the default threshold on character and base
    // vocabulary evidence alone; the others land in the foreign bucket.
    assert_eq!(result.by_language["Turkish"].len(), 1);
    assert_eq!(result.by_language["Turkish"][0].track.title, "Aşk Şarkısı");
    assert_eq!(result.by_language["Foreign"].len(), 2);
    assert!(result.language_error.is_none());
}

#[tokio::test]
async fn test_genre_outage_degrades_only_that_dimension() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let view = HtmlView::parse(PLAYLIST_URL, &playlist_html(SONGS));
    let extraction = fast_extractor("music.youtube.com")
        .extract(&view)
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let result = classifier_against(&server, &dir)
        .await
        .classify(&extraction.tracks)
        .await;

    assert!(result.by_genre.is_empty());
    assert!(result.genre_error.is_some());
    // The run still succeeded on the other dimensions.
    assert_eq!(result.total_performers, 3);
    assert!(!result.by_language.is_empty());
}

#[tokio::test]
async fn test_recommendation_shelf_is_excluded_end_to_end() {
    let mut html = playlist_html(SONGS);
    html = html.replace(
        "</body>",
        r#"<ytmusic-shelf-renderer title="Recommended">
            <ytmusic-responsive-list-item-renderer>
              <a class="title" href="/watch?v=rec1">Should Not Appear</a>
              <span class="subtitle">Nobody</span>
            </ytmusic-responsive-list-item-renderer>
        </ytmusic-shelf-renderer></body>"#,
    );

    let view = HtmlView::parse(PLAYLIST_URL, &html);
    let extraction = fast_extractor("music.youtube.com")
        .extract(&view)
        .await
        .unwrap();

    assert_eq!(extraction.tracks.len(), 3);
    assert!(
        extraction
            .tracks
            .iter()
            .all(|t| t.title != "Should Not Appear")
    );
}
