//! Client for the external genre lookup service.
//!
//! One batched JSON POST per classification run; a non-2xx status or a
//! malformed body is total failure for the call, which the orchestrator
//! degrades rather than retries.

use crate::classify::ProviderError;
use crate::classify::json::parse_with_path;
use crate::models::SongRef;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Fallback genre when the service has no answer for a song.
pub const UNKNOWN_GENRE: &str = "Unknown";

/// One genre lookup result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenreEntry {
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub genre: Option<String>,
}

impl GenreEntry {
    /// The effective genre, with empty and missing values collapsed to
    /// [`UNKNOWN_GENRE`].
    pub fn genre_or_unknown(&self) -> &str {
        match self.genre.as_deref() {
            Some(g) if !g.is_empty() => g,
            _ => UNKNOWN_GENRE,
        }
    }
}

#[derive(Debug, Serialize)]
struct GenreRequest<'a> {
    songs: &'a [SongRef],
}

#[derive(Debug, Deserialize)]
struct GenreResponse {
    results: Vec<GenreEntry>,
}

/// Batched genre lookups, one call per extraction run.
#[async_trait]
pub trait GenreProvider: Send + Sync {
    async fn genres_for(&self, songs: &[SongRef]) -> Result<Vec<GenreEntry>, ProviderError>;
}

/// HTTP client for the genre service.
pub struct GenreClient {
    http: reqwest::Client,
    endpoint: String,
}

impl GenreClient {
    pub fn new(endpoint: String) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to build reqwest client"),
            endpoint,
        }
    }
}

#[async_trait]
impl GenreProvider for GenreClient {
    async fn genres_for(&self, songs: &[SongRef]) -> Result<Vec<GenreEntry>, ProviderError> {
        let resp = self
            .http
            .post(&self.endpoint)
            .json(&GenreRequest { songs })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        let parsed: GenreResponse =
            parse_with_path(&body).map_err(|e| ProviderError::Malformed(e.to_string()))?;

        debug!(
            requested = songs.len(),
            resolved = parsed.results.len(),
            "genre lookup completed"
        );
        Ok(parsed.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn songs() -> Vec<SongRef> {
        vec![
            SongRef {
                title: "Gülpembe".into(),
                artist: "Barış Manço".into(),
            },
            SongRef {
                title: "Yine mi Çiçek".into(),
                artist: "Duman".into(),
            },
        ]
    }

    #[tokio::test]
    async fn test_batch_lookup_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/genre"))
            .and(body_partial_json(
                json!({"songs": [{"title": "Gülpembe", "artist": "Barış Manço"}, {"title": "Yine mi Çiçek", "artist": "Duman"}]}),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    {"title": "Gülpembe", "artist": "Barış Manço", "genre": "Anadolu rock"},
                    {"title": "Yine mi Çiçek", "artist": "Duman", "genre": null},
                ]
            })))
            .mount(&server)
            .await;

        let client = GenreClient::new(format!("{}/genre", server.uri()));
        let results = client.genres_for(&songs()).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].genre_or_unknown(), "Anadolu rock");
        assert_eq!(results[1].genre_or_unknown(), UNKNOWN_GENRE);
    }

    #[tokio::test]
    async fn test_non_success_status_is_total_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = GenreClient::new(server.uri());
        let err = client.genres_for(&songs()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Status { status: 500 }));
    }

    #[tokio::test]
    async fn test_malformed_body_is_total_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": "nope"})))
            .mount(&server)
            .await;

        let client = GenreClient::new(server.uri());
        let err = client.genres_for(&songs()).await.unwrap_err();
        match err {
            ProviderError::Malformed(msg) => assert!(msg.contains("results")),
            other => panic!("expected malformed error, got {other:?}"),
        }
    }
}
