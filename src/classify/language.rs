//! Language detection provider backed by the in-process learning store.
//!
//! The wire types mirror the language service contract, so the same shapes
//! serve both the classification orchestrator and the HTTP surface.

use crate::classify::ProviderError;
use crate::learning::{LearningStats, LearningStore};
use crate::models::SongRef;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One scored song, as the language service reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageDetection {
    pub title: String,
    pub artist: String,
    /// Language tag (`"tr"` / `"en"`).
    pub language: String,
    pub is_turkish: bool,
    pub confidence: String,
    pub turkish_score: i64,
    pub patterns: Vec<String>,
}

/// Batch detection response: one result per requested song, in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageBatch {
    pub results: Vec<LanguageDetection>,
    pub learning_stats: LearningStats,
}

/// Batched language detection, one call per classification run.
#[async_trait]
pub trait LanguageProvider: Send + Sync {
    async fn detect_batch(&self, songs: &[SongRef]) -> Result<LanguageBatch, ProviderError>;
}

/// The adaptive classifier over the shared learning store.
pub struct LearnedLanguage {
    store: Arc<LearningStore>,
}

impl LearnedLanguage {
    pub fn new(store: Arc<LearningStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl LanguageProvider for LearnedLanguage {
    async fn detect_batch(&self, songs: &[SongRef]) -> Result<LanguageBatch, ProviderError> {
        let (detections, stats) = self.store.detect_batch(songs).await;

        let results = songs
            .iter()
            .zip(detections)
            .map(|(song, detection)| LanguageDetection {
                title: song.title.clone(),
                artist: song.artist.clone(),
                language: detection.label.tag().to_string(),
                is_turkish: detection.label == crate::learning::LanguageLabel::Turkish,
                confidence: detection.confidence.as_str().to_string(),
                turkish_score: detection.score,
                patterns: detection.patterns_used,
            })
            .collect();

        Ok(LanguageBatch {
            results,
            learning_stats: stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::learning::{Correction, LanguageLabel};

    async fn store() -> (tempfile::TempDir, Arc<LearningStore>) {
        let dir = tempfile::tempdir().unwrap();
        let store = LearningStore::open(dir.path().join("learning.json"))
            .await
            .unwrap();
        (dir, Arc::new(store))
    }

    #[tokio::test]
    async fn test_results_align_with_request_order() {
        let (_dir, store) = store().await;
        let provider = LearnedLanguage::new(store);
        let songs = vec![
            SongRef {
                title: "aşk şarkısı".into(),
                artist: "sezen".into(),
            },
            SongRef {
                title: "plain title".into(),
                artist: "band".into(),
            },
        ];
        let batch = provider.detect_batch(&songs).await.unwrap();
        assert_eq!(batch.results.len(), 2);
        assert_eq!(batch.results[0].title, "aşk şarkısı");
        assert!(batch.results[0].is_turkish);
        assert_eq!(batch.results[0].language, "tr");
        assert!(!batch.results[1].is_turkish);
        assert_eq!(batch.results[1].language, "en");
    }

    #[tokio::test]
    async fn test_batch_reports_learning_stats() {
        let (_dir, store) = store().await;
        store
            .submit_correction(Correction::new(
                SongRef {
                    title: "gözlerin".into(),
                    artist: "duman".into(),
                },
                LanguageLabel::Turkish,
                LanguageLabel::Foreign,
            ))
            .await
            .unwrap();

        let provider = LearnedLanguage::new(store);
        let batch = provider.detect_batch(&[]).await.unwrap();
        assert_eq!(batch.learning_stats.total_corrections, 1);
        assert!(batch.learning_stats.learned_words > 0);
    }
}
