//! Command-line arguments.

use clap::{Parser, ValueEnum};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TracingFormat {
    /// Human-readable output for terminals.
    Pretty,
    /// Newline-delimited JSON for log shippers.
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "playdex",
    about = "Playlist extraction and classification service",
    version
)]
pub struct Args {
    #[arg(long = "tracing", value_enum, default_value_t = TracingFormat::Pretty)]
    pub tracing: TracingFormat,
}
