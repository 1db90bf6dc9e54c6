//! # vidscrape
//!
//! Video metadata and source extraction from third-party product pages.
//!
//! Given a product-page URL, this library fetches the page and discovers
//! the pieces of a demo-video submission: title, description, thumbnail,
//! tags, duration, and candidate playable video sources. Signals come
//! from meta tags, the canonical link, the document title, JSON-LD
//! structured data, inline `<video>`/`<source>` markup, and a direct
//! video-URL fallback; everything converges into one normalized,
//! deduplicated result.
//!
//! Extraction never builds a DOM tree. Third-party markup is routinely
//! malformed, so each signal is a permissive single-pass scan that
//! degrades gracefully instead of failing.
//!
//! ## Quick Start
//!
//! ```rust
//! use vidscrape::extract_from_html;
//!
//! let html = r#"<head>
//!   <meta property="og:title" content="Widget demo">
//!   <script type="application/ld+json">
//!     {"@type":"VideoObject","contentUrl":"https://cdn.example/v.m3u8","duration":"PT45S"}
//!   </script>
//! </head>"#;
//!
//! let result = extract_from_html(html, "https://shop.example/widget")?;
//! assert_eq!(result.title.as_deref(), Some("Widget demo"));
//! assert_eq!(result.duration_seconds, Some(45));
//! assert_eq!(result.video_sources[0].url, "https://cdn.example/v.m3u8");
//! # Ok::<(), vidscrape::ScrapeError>(())
//! ```
//!
//! To fetch and extract in one step, use [`scrape_product_page`].

mod collectors;
mod error;
mod extract;
mod fetch;
mod patterns;
mod result;

/// Video duration normalization (numeric and restricted ISO-8601 forms).
pub mod duration;

/// Character encoding detection and transcoding.
pub mod encoding;

/// HTML entity decoding.
pub mod entities;

/// Deduplicating, merging video-source registry.
pub mod registry;

/// Tag attribute tokenizer shared by every scanner.
pub mod tokenizer;

/// URL utilities for validation, resolution, and normalization.
pub mod url_utils;

// Public API - re-exports
pub use error::{Result, ScrapeError};
pub use result::{ScrapeResult, SourceType, VideoSource};

/// Fetches a product page and extracts its video metadata.
///
/// The whole operation is bounded by the fetch timeout; there are no
/// retries and no shared state, so any number of scrapes may run
/// concurrently. On success the result's URLs are absolute, its video
/// sources deduplicated and typed; an empty source list is a valid
/// result that callers requiring a playable source map to
/// [`ScrapeError::NoVideoFound`] themselves.
///
/// # Errors
///
/// Returns [`ScrapeError::InvalidUrl`], [`ScrapeError::Timeout`],
/// [`ScrapeError::FetchFailure`], [`ScrapeError::HttpError`], or
/// [`ScrapeError::UnsupportedContentType`]. No partial result is ever
/// returned on failure.
pub async fn scrape_product_page(url: &str) -> Result<ScrapeResult> {
    let page = fetch::fetch_page(url).await?;
    let result = extract::extract_from_html(&page.body, &page.final_url);

    tracing::debug!(
        url = %page.final_url,
        sources = result.video_sources.len(),
        tags = result.tags.len(),
        "scrape complete"
    );

    Ok(result)
}

/// Extracts video metadata from already-fetched HTML.
///
/// `page_url` must be the absolute URL the document was fetched from;
/// it is the resolution base for every relative URL on the page.
/// Extraction itself cannot fail — local parsing problems are skipped
/// where they occur — so the only error is an unusable `page_url`.
///
/// # Errors
///
/// Returns [`ScrapeError::InvalidUrl`] if `page_url` is not an absolute
/// http(s) URL.
pub fn extract_from_html(html: &str, page_url: &str) -> Result<ScrapeResult> {
    let (_, parsed) = url_utils::is_absolute_url(page_url);
    let Some(base) = parsed else {
        return Err(ScrapeError::InvalidUrl(page_url.trim().to_string()));
    };

    Ok(extract::extract_from_html(html, &base))
}
