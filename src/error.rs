//! Error types for vidscrape.
//!
//! This module defines the error types returned by scraping operations.
//! Every variant is terminal for the invocation that produced it: the
//! engine never retries and never returns a partial result on failure.

/// Error type for scraping operations.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// The input could not be parsed as an absolute http(s) URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The fetch exceeded its deadline. The in-flight request is aborted
    /// when this fires, not abandoned.
    #[error("timed out fetching {0}")]
    Timeout(String),

    /// Network-level failure other than a timeout.
    #[error("failed to fetch {url}: {message}")]
    FetchFailure {
        /// The URL that was being fetched.
        url: String,
        /// Underlying transport error description.
        message: String,
    },

    /// The server answered with a non-success status code.
    #[error("page returned HTTP status {0}")]
    HttpError(u16),

    /// The response is not an HTML document.
    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),

    /// No playable video source survived filtering.
    ///
    /// The engine itself never raises this: an empty `video_sources` list
    /// is a valid result. Callers that require a source check
    /// [`ScrapeResult::has_video_sources`](crate::ScrapeResult::has_video_sources)
    /// and surface this variant themselves.
    #[error("no playable video source found on the page")]
    NoVideoFound,
}

/// Result type alias for scraping operations.
pub type Result<T> = std::result::Result<T, ScrapeError>;
