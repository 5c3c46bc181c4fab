use crate::classify::ClassificationOrchestrator;
use crate::classify::genre::GenreClient;
use crate::classify::language::LearnedLanguage;
use crate::config::Config;
use crate::extract::Extractor;
use crate::learning::LearningStore;
use crate::page::PageFetcher;
use crate::page::locator::ItemLocator;
use crate::page::pagination::PaginationDriver;
use crate::page::readiness::ReadinessMonitor;
use crate::state::{AppState, ServiceStatus};
use crate::utils::fmt_duration;
use anyhow::Context;
use figment::{Figment, providers::Env};
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{error, info, warn};

/// Main application struct containing all necessary components
pub struct App {
    config: Arc<Config>,
    state: AppState,
}

impl App {
    /// Create a new App instance with all necessary components initialized
    pub async fn new() -> Result<Self, anyhow::Error> {
        // Load configuration
        let config: Config = Figment::new()
            .merge(Env::raw())
            .extract()
            .context("Failed to load config")?;
        let config = Arc::new(config);

        // Load the learning model (defaults when no document exists yet)
        let learning = Arc::new(
            LearningStore::open(config.learning_data_path.clone())
                .await
                .context("Failed to open learning store")?,
        );

        // Classification providers: external genre service, in-process
        // adaptive language classifier
        let genre = Arc::new(GenreClient::new(config.genre_service_url.clone()));
        let language = Arc::new(LearnedLanguage::new(learning.clone()));
        let classifier = Arc::new(ClassificationOrchestrator::new(genre, language));

        // Extraction pipeline
        let locator = ItemLocator::new(config.shelf_deny_list.clone());
        let readiness = ReadinessMonitor::new(config.readiness_attempts, config.readiness_poll);
        let pagination = PaginationDriver {
            max_attempts: config.max_scroll_attempts,
            stagnation_limit: config.scroll_stagnation_limit,
            item_cap: config.track_cap,
            settle: config.scroll_settle,
            top_pause: config.scroll_top_pause,
        };
        let extractor = Arc::new(Extractor::new(
            locator,
            readiness,
            pagination,
            config.track_cap,
            config.playlist_host.clone(),
        ));

        let fetcher = Arc::new(PageFetcher::new());

        let state = AppState::new(
            config.clone(),
            learning,
            extractor,
            classifier,
            fetcher,
        );
        state
            .service_statuses
            .set("web", ServiceStatus::Starting);

        info!(
            genre_service = %config.genre_service_url,
            learning_data = %config.learning_data_path.display(),
            track_cap = config.track_cap,
            "application components initialized"
        );

        Ok(App { config, state })
    }

    /// Serve the HTTP surface until a shutdown signal arrives.
    pub async fn run(self) -> ExitCode {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.port));
        let listener = match tokio::net::TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(e) => {
                error!(error = ?e, %addr, "Failed to bind listener");
                return ExitCode::FAILURE;
            }
        };

        info!(port = self.config.port, "web service listening");
        self.state.service_statuses.set("web", ServiceStatus::Active);

        let router = crate::web::router(self.state.clone());

        // Graceful shutdown: stop accepting on signal, then give in-flight
        // requests the configured grace period to drain.
        let shutdown_started = Arc::new(Notify::new());
        let drain_deadline = shutdown_started.clone();
        let shutdown_timeout = self.config.shutdown_timeout;

        let serve = axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal(shutdown_started))
            .into_future();

        tokio::select! {
            result = serve => match result {
                Ok(()) => {
                    info!("web service stopped cleanly");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    error!(error = ?e, "web service failed");
                    ExitCode::FAILURE
                }
            },
            _ = async {
                drain_deadline.notified().await;
                tokio::time::sleep(shutdown_timeout).await;
            } => {
                warn!(
                    grace = fmt_duration(shutdown_timeout),
                    "shutdown grace period elapsed with requests still in flight"
                );
                ExitCode::SUCCESS
            }
        }
    }
}

/// Resolve on SIGINT or SIGTERM, notifying the drain timer.
async fn shutdown_signal(started: Arc<Notify>) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
    started.notify_one();
}
