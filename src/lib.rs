// minbar - page/post/link CMS backend over SQLite

// HTTP surface
pub mod api;
pub mod app_state;

// Data store and models
pub mod models;
pub mod store;

// Session gate
pub mod session;

// Common utilities
pub mod config;
pub mod error;

// Re-exports for convenience
pub use error::{AppError, AppResult};
