//! Video-source registry.
//!
//! The single convergence point for every signal that discovers a video
//! URL. Candidates are keyed by normalized absolute URL; unlike the
//! scalar metadata fields (strict first-wins), registry entries merge:
//! later signals fill in a missing label or MIME type and may upgrade an
//! `Unknown` type to an explicit one, but never overwrite or downgrade
//! what an earlier signal established.

use std::collections::HashMap;

use url::Url;

use crate::result::{SourceType, VideoSource};
use crate::url_utils::normalize_source_url;

/// File extensions that identify a progressive video file.
const FILE_EXTENSIONS: [&str; 4] = ["mp4", "webm", "mov", "m4v"];

/// MIME fragments that identify a progressive video file.
const FILE_MIME_FRAGMENTS: [&str; 3] = ["mp4", "webm", "quicktime"];

/// Infer the playback type of a source from its URL and optional MIME type.
#[must_use]
pub fn infer_source_type(url: &str, mime_type: Option<&str>) -> SourceType {
    let url_lower = url.to_lowercase();
    let mime_lower = mime_type.map(str::to_lowercase).unwrap_or_default();

    if url_lower.contains("m3u8") || mime_lower.contains("m3u8") {
        return SourceType::Hls;
    }

    if FILE_MIME_FRAGMENTS.iter().any(|f| mime_lower.contains(f)) {
        return SourceType::File;
    }

    if FILE_EXTENSIONS.contains(&url_extension(&url_lower).as_str()) {
        return SourceType::File;
    }

    SourceType::Unknown
}

/// Extension of the URL path, query string and fragment excluded.
fn url_extension(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    match path.rsplit_once('.') {
        Some((_, ext)) if !ext.contains('/') => ext.to_string(),
        _ => String::new(),
    }
}

/// Deduplicating, merging index of discovered video sources.
///
/// Entries keep discovery order; the index maps normalized URL to entry
/// position.
#[derive(Debug, Default)]
pub struct SourceRegistry {
    entries: Vec<VideoSource>,
    index: HashMap<String, usize>,
}

impl SourceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a candidate video source.
    ///
    /// The raw URL is resolved against `base` and normalized before it
    /// becomes the registry key. Empty values and `data:` URLs are
    /// rejected outright.
    pub fn insert(
        &mut self,
        base: &Url,
        raw_url: &str,
        label: Option<&str>,
        mime_type: Option<&str>,
    ) {
        let Some(key) = normalize_source_url(raw_url, base) else {
            return;
        };

        if key.starts_with("data:") {
            return;
        }

        let inferred = infer_source_type(&key, mime_type);

        if let Some(&pos) = self.index.get(&key) {
            let entry = &mut self.entries[pos];

            if entry.label.is_none() {
                entry.label = label.map(str::to_string);
            }
            if entry.mime_type.is_none() {
                entry.mime_type = mime_type.map(str::to_string);
            }
            // Monotonic: unknown may resolve, resolved never changes
            if entry.source_type == SourceType::Unknown && inferred.is_resolved() {
                entry.source_type = inferred;
            }
            return;
        }

        self.index.insert(key.clone(), self.entries.len());
        self.entries.push(VideoSource {
            url: key,
            source_type: inferred,
            label: label.map(str::to_string),
            mime_type: mime_type.map(str::to_string),
        });
    }

    /// Consume the registry, returning entries in discovery order.
    #[must_use]
    pub fn into_sources(self) -> Vec<VideoSource> {
        self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
