use clap::Parser;
use playdex::app::App;
use playdex::cli::Args;
use playdex::config::Config;
use playdex::logging::setup_logging;
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let args = Args::parse();

    // Load config and setup logging before App::new() so startup logs are never silently dropped
    let early_config: Config = {
        use figment::providers::Env;
        figment::Figment::new()
            .merge(Env::raw())
            .extract()
            .expect("Failed to load config for logging setup")
    };
    setup_logging(&early_config, args.tracing);

    // Log application startup context
    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = if cfg!(debug_assertions) {
            "development"
        } else {
            "production"
        },
        "starting playdex"
    );

    // Create and initialize the application
    let app = match App::new().await {
        Ok(app) => app,
        Err(e) => {
            error!(error = ?e, "Failed to initialize application");
            return ExitCode::FAILURE;
        }
    };

    app.run().await
}
