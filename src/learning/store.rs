//! Durable storage for the learning model.
//!
//! One JSON document, loaded once at startup and rewritten after every
//! correction. All mutation funnels through [`LearningStore::submit_correction`],
//! which holds the write lock across the whole read-modify-persist cycle so
//! in-process submissions can never interleave.

use crate::learning::{Correction, Detection, LearningState, LearningStats, detect, learn};
use crate::models::SongRef;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{info, warn};

pub struct LearningStore {
    path: PathBuf,
    state: RwLock<LearningState>,
}

impl LearningStore {
    /// Load the persisted model, falling back to defaults when the document
    /// is missing or unreadable. Unreadable documents are preserved on disk
    /// until the next successful persist.
    pub async fn open(path: PathBuf) -> Result<Self> {
        let state = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => match serde_json::from_str::<LearningState>(&raw) {
                Ok(state) => {
                    info!(
                        path = %path.display(),
                        corrections = state.corrections.len(),
                        learned_words = state.learned_words.len(),
                        "learning state loaded"
                    );
                    state
                }
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "learning state unreadable, starting from defaults"
                    );
                    LearningState::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no learning state yet, starting from defaults");
                LearningState::default()
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read learning state {}", path.display()));
            }
        };

        Ok(Self {
            path,
            state: RwLock::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Score one song against the current model.
    pub async fn detect_song(&self, song: &SongRef) -> Detection {
        let state = self.state.read().await;
        detect(&state, &song.title, &song.artist)
    }

    /// Score a batch under a single read lock.
    pub async fn detect_batch(&self, songs: &[SongRef]) -> (Vec<Detection>, LearningStats) {
        let state = self.state.read().await;
        let detections = songs
            .iter()
            .map(|song| detect(&state, &song.title, &song.artist))
            .collect();
        (detections, state.stats())
    }

    /// Fold a correction into the model and persist before returning.
    pub async fn submit_correction(&self, correction: Correction) -> Result<LearningStats> {
        let mut state = self.state.write().await;
        learn(&mut state, correction);
        self.persist(&state).await?;
        Ok(state.stats())
    }

    pub async fn stats(&self) -> LearningStats {
        self.state.read().await.stats()
    }

    /// Full copy of the current model, for the stats surface.
    pub async fn snapshot(&self) -> LearningState {
        self.state.read().await.clone()
    }

    async fn persist(&self, state: &LearningState) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create learning state directory {}", parent.display())
            })?;
        }

        let json =
            serde_json::to_string_pretty(state).context("Failed to serialize learning state")?;
        tokio::fs::write(&self.path, json)
            .await
            .with_context(|| format!("Failed to write learning state {}", self.path.display()))?;
        Ok(())
    }
}
