//! Application state shared across the web surface and the pipeline.

use crate::classify::ClassificationOrchestrator;
use crate::config::Config;
use crate::extract::Extractor;
use crate::learning::LearningStore;
use crate::page::PageFetcher;
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// Health status of a service.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Starting,
    Active,
    Error,
}

/// A timestamped status entry for a service.
#[derive(Debug, Clone)]
pub struct StatusEntry {
    pub status: ServiceStatus,
    #[allow(dead_code)]
    pub updated_at: Instant,
}

/// Thread-safe registry for services to self-report their health status.
#[derive(Debug, Clone, Default)]
pub struct ServiceStatusRegistry {
    inner: Arc<DashMap<String, StatusEntry>>,
}

impl ServiceStatusRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or updates the status for a named service.
    pub fn set(&self, name: &str, status: ServiceStatus) {
        self.inner.insert(
            name.to_owned(),
            StatusEntry {
                status,
                updated_at: Instant::now(),
            },
        );
    }

    /// Returns the current status of a named service, if present.
    pub fn get(&self, name: &str) -> Option<ServiceStatus> {
        self.inner.get(name).map(|entry| entry.status.clone())
    }

    /// Returns a snapshot of all service statuses.
    pub fn all(&self) -> Vec<(String, ServiceStatus)> {
        self.inner
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().status.clone()))
            .collect()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub learning: Arc<LearningStore>,
    pub extractor: Arc<Extractor>,
    pub classifier: Arc<ClassificationOrchestrator>,
    pub fetcher: Arc<PageFetcher>,
    pub service_statuses: ServiceStatusRegistry,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        learning: Arc<LearningStore>,
        extractor: Arc<Extractor>,
        classifier: Arc<ClassificationOrchestrator>,
        fetcher: Arc<PageFetcher>,
    ) -> Self {
        Self {
            config,
            learning,
            extractor,
            classifier,
            fetcher,
            service_statuses: ServiceStatusRegistry::new(),
        }
    }
}
