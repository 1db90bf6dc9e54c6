//! Compiled regex patterns for the tag scanners.
//!
//! All patterns are compiled once at startup using `LazyLock` for
//! efficiency. The scanners deliberately work on raw markup text, one
//! pass per tag kind, instead of building a DOM tree: third-party
//! product pages are frequently malformed, and a regex scan degrades
//! gracefully where a tree parser changes failure semantics.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Tag Scanning Patterns
// =============================================================================

/// Matches a whole `<meta ...>` tag. Attributes are picked apart by the
/// tokenizer afterwards.
pub static META_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<meta\b[^>]*>").expect("META_TAG regex"));

/// Matches a whole `<link ...>` tag (canonical URL discovery).
pub static LINK_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<link\b[^>]*>").expect("LINK_TAG regex"));

/// Matches the document `<title>` element and captures its text.
pub static TITLE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("TITLE_TAG regex"));

/// Matches a `<script type="application/ld+json">` block and captures the
/// raw JSON payload.
pub static JSON_LD_SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script\b[^>]*type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#)
        .expect("JSON_LD_SCRIPT regex")
});

/// Matches an HTML comment. JSON-LD payloads are stripped of these
/// before parsing; some CMSes wrap the JSON in comment markers.
pub static HTML_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("HTML_COMMENT regex"));

/// Matches a `<video ...>...</video>` block, capturing the opening tag
/// and the inner markup separately.
pub static VIDEO_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)(<video\b[^>]*>)(.*?)</video>").expect("VIDEO_BLOCK regex")
});

/// Matches a nested `<source ...>` tag inside a video block.
pub static SOURCE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<source\b[^>]*>").expect("SOURCE_TAG regex"));

// =============================================================================
// Attribute & Value Patterns
// =============================================================================

/// Matches one `name="value"` or `name='value'` attribute inside a tag.
pub static TAG_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)([a-z][a-z0-9_:.-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("TAG_ATTRIBUTE regex")
});

/// Matches a `data-duration="..."` attribute anywhere in the document.
pub static DATA_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)data-duration\s*=\s*["']([^"']+)["']"#).expect("DATA_DURATION regex")
});

// =============================================================================
// Fallback URL Patterns
// =============================================================================

/// Matches a bare video-file URL anywhere in the document. Last-resort
/// signal for pages that embed players via script configuration only.
pub static DIRECT_VIDEO_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)https?://[^\s"'<>\\]+\.(?:mp4|m3u8|webm|mov|m4v)(?:\?[^\s"'<>\\]*)?"#)
        .expect("DIRECT_VIDEO_URL regex")
});

/// Matches the restricted ISO-8601 duration form `P(T(nH)?(nM)?(nS)?)?`
/// (hours/minutes/seconds only; no days, months or years).
pub static ISO8601_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^P(?:T(?:([0-9]+(?:\.[0-9]+)?)H)?(?:([0-9]+(?:\.[0-9]+)?)M)?(?:([0-9]+(?:\.[0-9]+)?)S)?)?$")
        .expect("ISO8601_DURATION regex")
});
