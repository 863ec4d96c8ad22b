// src/utils/mod.rs
pub mod error;
pub mod logging;

pub use error::{AppError, Error, FetchError, ScrapeError}; // Re-export error types for convenience
