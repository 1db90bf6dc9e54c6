//! Extraction pipeline and result assembly.
//!
//! One scan of a fetched document runs every signal collector in a fixed
//! order over a shared [`ScrapeContext`]. The context separates the two
//! merge policies that govern this engine:
//!
//! - **Scalar fields** (title, description, thumbnail, duration) are
//!   candidate lists in scan order; assembly picks the first non-empty
//!   candidate, so earlier collectors take precedence.
//! - **Video sources** converge in the [`SourceRegistry`], which merges
//!   by normalized URL regardless of which signal arrived first.
//!
//! Collector order is the priority order: meta tags, canonical link,
//! `<title>`, JSON-LD, inline media, direct-URL fallback, duration
//! attributes. Reordering these calls changes observable behavior.

use url::Url;

use crate::collectors::{json_ld, media_tags, meta_tags};
use crate::duration;
use crate::registry::SourceRegistry;
use crate::result::{ScrapeResult, SourceType, VideoSource};
use crate::url_utils::create_absolute_url;

/// Maximum number of tags kept in the result.
const MAX_TAGS: usize = 20;

/// Maximum length of a single tag, in characters.
const MAX_TAG_LEN: usize = 50;

/// Mutable accumulator threaded through every collector during one scan.
///
/// Collectors only ever append; nothing is resolved until
/// [`ScrapeContext::into_result`] assembles the final value.
pub(crate) struct ScrapeContext {
    base: Url,
    canonical_url: Option<String>,
    titles: Vec<String>,
    descriptions: Vec<String>,
    thumbnails: Vec<String>,
    durations: Vec<u64>,
    tags: Vec<String>,
    sources: SourceRegistry,
}

impl ScrapeContext {
    pub(crate) fn new(base: Url) -> Self {
        Self {
            base,
            canonical_url: None,
            titles: Vec::new(),
            descriptions: Vec::new(),
            thumbnails: Vec::new(),
            durations: Vec::new(),
            tags: Vec::new(),
            sources: SourceRegistry::new(),
        }
    }

    /// Record the canonical URL; only the first one found is kept.
    pub(crate) fn set_canonical(&mut self, href: &str) {
        if self.canonical_url.is_none() {
            let resolved = create_absolute_url(href, &self.base);
            if !resolved.is_empty() {
                self.canonical_url = Some(resolved);
            }
        }
    }

    pub(crate) fn push_title(&mut self, value: &str) {
        let value = value.trim();
        if !value.is_empty() {
            self.titles.push(value.to_string());
        }
    }

    pub(crate) fn push_description(&mut self, value: &str) {
        let value = value.trim();
        if !value.is_empty() {
            self.descriptions.push(value.to_string());
        }
    }

    /// Record a thumbnail candidate, resolved against the page URL.
    pub(crate) fn push_thumbnail(&mut self, value: &str) {
        let resolved = create_absolute_url(value, &self.base);
        if !resolved.is_empty() {
            self.thumbnails.push(resolved);
        }
    }

    /// Record one tag: trimmed, truncated, deduplicated.
    pub(crate) fn push_tag(&mut self, value: &str) {
        let tag: String = value.trim().chars().take(MAX_TAG_LEN).collect();
        if !tag.is_empty() && !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    /// Record a comma/semicolon-separated tag list.
    pub(crate) fn push_tag_list(&mut self, value: &str) {
        for part in value.split([',', ';']) {
            self.push_tag(part);
        }
    }

    /// Record a duration candidate from a raw string; values that fail
    /// to normalize are discarded, not errors.
    pub(crate) fn push_duration_raw(&mut self, value: &str) {
        if let Some(seconds) = duration::parse_duration(value) {
            self.durations.push(seconds);
        }
    }

    /// Record a numeric duration candidate (seconds).
    pub(crate) fn push_duration_seconds(&mut self, value: f64) {
        if let Some(seconds) = duration::from_seconds(value) {
            self.durations.push(seconds);
        }
    }

    /// Register a video-source candidate.
    pub(crate) fn add_source(&mut self, raw_url: &str, label: Option<&str>, mime_type: Option<&str>) {
        self.sources.insert(&self.base, raw_url, label, mime_type);
    }

    /// Assemble the immutable result: first-wins scalars, capped tags,
    /// filtered and ordered sources.
    pub(crate) fn into_result(self) -> ScrapeResult {
        let mut tags = self.tags;
        tags.truncate(MAX_TAGS);

        let mut video_sources: Vec<VideoSource> = self
            .sources
            .into_sources()
            .into_iter()
            .filter(|s| s.source_type.is_resolved())
            .collect();

        // Stable sort: files before streams, discovery order otherwise
        video_sources.sort_by_key(|s| match s.source_type {
            SourceType::File => 0,
            SourceType::Hls | SourceType::Unknown => 1,
        });

        ScrapeResult {
            original_url: self.base.to_string(),
            canonical_url: self.canonical_url,
            title: self.titles.into_iter().next(),
            description: self.descriptions.into_iter().next(),
            thumbnail_url: self.thumbnails.into_iter().next(),
            tags,
            video_sources,
            duration_seconds: self.durations.into_iter().next(),
        }
    }
}

/// Run every collector over the document and assemble the result.
///
/// This is the synchronous core of the engine; it cannot fail. Local
/// parsing problems inside any collector are swallowed where they occur
/// and never abort the scan.
#[must_use]
pub(crate) fn extract_from_html(html: &str, page_url: &Url) -> ScrapeResult {
    let mut ctx = ScrapeContext::new(page_url.clone());

    meta_tags::collect_meta_tags(&mut ctx, html);
    meta_tags::collect_canonical_link(&mut ctx, html);
    meta_tags::collect_title_tag(&mut ctx, html);
    json_ld::collect_json_ld(&mut ctx, html);
    media_tags::collect_video_tags(&mut ctx, html);
    media_tags::collect_direct_urls(&mut ctx, html);
    media_tags::collect_duration_attributes(&mut ctx, html);

    ctx.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Url {
        let Ok(url) = Url::parse("https://shop.example/products/widget") else {
            panic!("invalid page url in test");
        };
        url
    }

    #[test]
    fn scalar_fields_are_first_wins() {
        let mut ctx = ScrapeContext::new(page());
        ctx.push_title("First");
        ctx.push_title("Second");
        ctx.push_description("  ");
        ctx.push_description("Kept");

        let result = ctx.into_result();
        assert_eq!(result.title.as_deref(), Some("First"));
        assert_eq!(result.description.as_deref(), Some("Kept"));
    }

    #[test]
    fn empty_candidates_never_win() {
        let mut ctx = ScrapeContext::new(page());
        ctx.push_title("");
        ctx.push_title("   ");

        let result = ctx.into_result();
        assert_eq!(result.title, None);
    }

    #[test]
    fn tags_deduplicate_and_cap() {
        let mut ctx = ScrapeContext::new(page());
        for i in 0..30 {
            ctx.push_tag(&format!("tag-{i}"));
        }
        ctx.push_tag("tag-0"); // duplicate

        let result = ctx.into_result();
        assert_eq!(result.tags.len(), 20);
        assert_eq!(result.tags[0], "tag-0");
    }

    #[test]
    fn long_tags_truncate_to_fifty_chars() {
        let mut ctx = ScrapeContext::new(page());
        ctx.push_tag(&"x".repeat(80));

        let result = ctx.into_result();
        assert_eq!(result.tags[0].chars().count(), 50);
    }

    #[test]
    fn unknown_sources_dropped_files_sorted_first() {
        let mut ctx = ScrapeContext::new(page());
        ctx.add_source("https://cdn.example/a.m3u8", None, None);
        ctx.add_source("https://cdn.example/embed/unknowable", None, None);
        ctx.add_source("https://cdn.example/b.mp4", None, None);
        ctx.add_source("https://cdn.example/c.m3u8", None, None);

        let result = ctx.into_result();
        let urls: Vec<&str> = result.video_sources.iter().map(|s| s.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://cdn.example/b.mp4",
                "https://cdn.example/a.m3u8",
                "https://cdn.example/c.m3u8",
            ]
        );
    }

    #[test]
    fn first_duration_candidate_wins() {
        let mut ctx = ScrapeContext::new(page());
        ctx.push_duration_raw("not-a-duration"); // discarded, adds nothing
        ctx.push_duration_raw("PT1M30S");
        ctx.push_duration_seconds(12.0);

        let result = ctx.into_result();
        assert_eq!(result.duration_seconds, Some(90));
    }

    #[test]
    fn canonical_first_match_is_kept() {
        let mut ctx = ScrapeContext::new(page());
        ctx.set_canonical("/products/widget");
        ctx.set_canonical("https://other.example/ignored");

        let result = ctx.into_result();
        assert_eq!(
            result.canonical_url.as_deref(),
            Some("https://shop.example/products/widget")
        );
    }
}
