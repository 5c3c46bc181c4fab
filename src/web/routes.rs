//! Route handlers for the API surface.

use crate::classify::language::{LanguageProvider, LearnedLanguage};
use crate::learning::{Correction, LanguageLabel, LearningState, LearningStats};
use crate::models::{ClassificationResult, SongRef, Track};
use crate::state::AppState;
use crate::web::error::ApiError;
use axum::extract::State;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/extract", post(extract_playlist))
        .route("/api/classify", post(classify_tracks))
        .route("/api/language", post(language_service))
        .route("/api/status", get(status))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExtractRequest {
    url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExtractResponse {
    tracks: Vec<Track>,
    count: usize,
    total_found_on_page: usize,
    limit_reached: bool,
    playlist_url: String,
    classifications: ClassificationResult,
}

/// Fetch a playlist page, extract its tracks, and classify them.
async fn extract_playlist(
    State(state): State<AppState>,
    Json(req): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, ApiError> {
    info!(url = %req.url, "extraction requested");

    let view = state
        .fetcher
        .fetch(&req.url)
        .await
        .map_err(|e| ApiError::Fetch(format!("{e:#}")))?;

    let result = state.extractor.extract(&view).await?;
    let classifications = state.classifier.classify(&result.tracks).await;

    Ok(Json(ExtractResponse {
        count: result.tracks.len(),
        total_found_on_page: result.total_found_on_page,
        limit_reached: result.limit_reached,
        playlist_url: req.url,
        tracks: result.tracks,
        classifications,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClassifyRequest {
    tracks: Vec<Track>,
}

/// Classify an already-extracted track list.
async fn classify_tracks(
    State(state): State<AppState>,
    Json(req): Json<ClassifyRequest>,
) -> Json<ClassificationResult> {
    Json(state.classifier.classify(&req.tracks).await)
}

/// Language service contract: one endpoint dispatching on `action`.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", content = "data", rename_all = "camelCase")]
enum LanguageRequest {
    Detect {
        songs: Vec<SongRef>,
    },
    /// `learn` is accepted as a legacy alias for `feedback`.
    #[serde(alias = "learn", rename_all = "camelCase")]
    Feedback {
        track: SongRef,
        correct_label: LanguageLabel,
        prior_label: LanguageLabel,
    },
    GetStats,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum LanguageResponse {
    Detect(crate::classify::language::LanguageBatch),
    #[serde(rename_all = "camelCase")]
    Feedback {
        message: &'static str,
        learning_stats: LearningStats,
    },
    Stats(Box<LearningState>),
}

async fn language_service(
    State(state): State<AppState>,
    Json(req): Json<LanguageRequest>,
) -> Result<Json<LanguageResponse>, ApiError> {
    match req {
        LanguageRequest::Detect { songs } => {
            let provider = LearnedLanguage::new(state.learning.clone());
            let batch = provider
                .detect_batch(&songs)
                .await
                .map_err(|e| ApiError::Internal(e.to_string()))?;
            Ok(Json(LanguageResponse::Detect(batch)))
        }
        LanguageRequest::Feedback {
            track,
            correct_label,
            prior_label,
        } => {
            let correction = Correction::new(track, correct_label, prior_label);
            let stats = state
                .learning
                .submit_correction(correction)
                .await
                .map_err(|e| ApiError::Internal(format!("{e:#}")))?;
            info!(
                total_corrections = stats.total_corrections,
                "correction applied"
            );
            Ok(Json(LanguageResponse::Feedback {
                message: "Feedback received and learning applied",
                learning_stats: stats,
            }))
        }
        LanguageRequest::GetStats => {
            let snapshot = state.learning.snapshot().await;
            Ok(Json(LanguageResponse::Stats(Box::new(snapshot))))
        }
    }
}

#[derive(Debug, Serialize)]
struct StatusResponse {
    status: &'static str,
    version: &'static str,
    commit: &'static str,
    services: BTreeMap<String, crate::state::ServiceStatus>,
}

async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let services: BTreeMap<_, _> = state.service_statuses.all().into_iter().collect();
    Json(StatusResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        commit: env!("GIT_COMMIT_SHORT"),
        services,
    })
}
