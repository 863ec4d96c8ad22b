// src/utils/error.rs
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error), // Automatically convert reqwest errors

    #[error("HTTP error {status} for {url}")]
    Http { status: reqwest::StatusCode, url: String }, // e.g., 404 Not Found

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Bad URL {url}: {reason}")]
    BadUrl { url: String, reason: String },
}

/// Errors produced while extracting records from a parsed page.
///
/// A missing optional field is never an error; it extracts as an empty
/// value. `StructuralFailure` means the markup contract itself has drifted
/// and carries enough context to identify the offending node.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("{function}({node}): {message}")]
    StructuralFailure {
        function: &'static str,
        node: String,
        message: String,
    },

    /// The page is a "word not found" page. This is an expected outcome,
    /// not a structural defect; any search suggestions the page offers are
    /// carried along.
    #[error("Word not found")]
    WordNotFound { suggestions: Vec<String> },

    #[error("Bad arguments: {0}")]
    BadArgs(String),
}

impl ScrapeError {
    /// Builds a `StructuralFailure` tagged with the originating function
    /// and a description of the offending node.
    pub fn structural(
        function: &'static str,
        node: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ScrapeError::StructuralFailure {
            function,
            node: node.into(),
            message: message.into(),
        }
    }
}

/// Library-level error: either the page couldn't be obtained or the
/// extraction pass failed.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Extraction failed: {0}")]
    Scrape(#[from] ScrapeError),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Larousse(#[from] Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<FetchError> for AppError {
    fn from(e: FetchError) -> Self {
        AppError::Larousse(Error::Fetch(e))
    }
}

impl From<ScrapeError> for AppError {
    fn from(e: ScrapeError) -> Self {
        AppError::Larousse(Error::Scrape(e))
    }
}
