//! HTTP surface for the extraction and classification pipeline.
//!
//! Thin glue only: handlers validate/deserialize, call into the core, and
//! map errors. All algorithmic content lives in the core modules.

pub mod error;
pub mod routes;

pub use routes::router;
