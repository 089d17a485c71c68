//! Tubely API Library
//!
//! This crate provides the HTTP handlers, the upload pipeline and application setup.

// Module declarations
mod api_doc;
pub mod constants;
mod handlers;
pub mod services;
pub mod setup;
pub mod telemetry;

// Public modules
pub mod auth;
pub mod error;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use services::upload::{StagingArea, UploadPipeline};
pub use state::AppState;
