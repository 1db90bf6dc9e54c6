//! Result types for scraping output.
//!
//! This module defines the structured output of a scrape: the metadata
//! bundle a caller uses to pre-populate a demo-video submission. The
//! result is constructed once by the assembler and never mutated
//! afterwards; persistence of a chosen source is the caller's business.

use serde::{Deserialize, Serialize};

/// Playback type of a discovered video source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// Progressive file download (mp4, webm, quicktime).
    File,

    /// HTTP Live Streaming manifest (`.m3u8`).
    Hls,

    /// Type could not be inferred from any signal yet.
    ///
    /// Unknown entries live only inside the registry during a scan; the
    /// assembler drops them before the result is returned.
    #[default]
    Unknown,
}

impl SourceType {
    /// Whether the type has been resolved to something playable.
    #[must_use]
    pub fn is_resolved(self) -> bool {
        self != SourceType::Unknown
    }
}

/// One candidate video source discovered on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSource {
    /// Absolute, normalized URL of the source.
    pub url: String,

    /// Resolved playback type.
    #[serde(rename = "type")]
    pub source_type: SourceType,

    /// Human-readable label naming the signal that found the source
    /// (e.g. "OpenGraph video", "Inline video 1").
    pub label: Option<String>,

    /// MIME type, when a signal supplied one.
    pub mime_type: Option<String>,
}

/// Result of scraping one product page.
///
/// Scalar fields hold the first non-empty candidate in fixed signal
/// priority (meta tags, then `<title>`, then JSON-LD, then inline
/// scanners). All URLs are absolute, resolved against `original_url`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeResult {
    /// The fetched, fully-resolved page URL (after redirects).
    pub original_url: String,

    /// Self-declared authoritative URL from `<link rel="canonical">`.
    pub canonical_url: Option<String>,

    /// Page/video title.
    pub title: Option<String>,

    /// Page/video description.
    pub description: Option<String>,

    /// Thumbnail image URL.
    pub thumbnail_url: Option<String>,

    /// Deduplicated tags, at most 20, each at most 50 characters.
    pub tags: Vec<String>,

    /// Discovered video sources, deduplicated by normalized URL.
    /// Only `File` and `Hls` entries survive into the result, `File`
    /// entries first.
    pub video_sources: Vec<VideoSource>,

    /// Video duration in whole seconds, when any signal supplied one.
    pub duration_seconds: Option<u64>,
}

impl ScrapeResult {
    /// Whether at least one playable video source was discovered.
    ///
    /// Callers that require a source treat `false` as the
    /// [`NoVideoFound`](crate::ScrapeError::NoVideoFound) condition.
    #[must_use]
    pub fn has_video_sources(&self) -> bool {
        !self.video_sources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_type_serializes_lowercase() {
        let source = VideoSource {
            url: "https://cdn.example/v.m3u8".to_string(),
            source_type: SourceType::Hls,
            label: None,
            mime_type: None,
        };

        let json = match serde_json::to_string(&source) {
            Ok(json) => json,
            Err(err) => panic!("serialization failed: {err}"),
        };
        assert!(json.contains(r#""type":"hls""#));
        assert!(json.contains(r#""url":"https://cdn.example/v.m3u8""#));
    }

    #[test]
    fn result_serializes_camel_case() {
        let result = ScrapeResult {
            original_url: "https://shop.example/p".to_string(),
            duration_seconds: Some(45),
            ..ScrapeResult::default()
        };

        let json = match serde_json::to_string(&result) {
            Ok(json) => json,
            Err(err) => panic!("serialization failed: {err}"),
        };
        assert!(json.contains(r#""originalUrl""#));
        assert!(json.contains(r#""durationSeconds":45"#));
        assert!(json.contains(r#""videoSources":[]"#));
    }

    #[test]
    fn unknown_type_is_unresolved() {
        assert!(!SourceType::Unknown.is_resolved());
        assert!(SourceType::File.is_resolved());
        assert!(SourceType::Hls.is_resolved());
    }
}
