//! URL utility functions.
//!
//! Every URL discovered by a collector is resolved against the fetched
//! page URL before it is compared or stored, so downstream consumers
//! only ever see absolute URLs. Video-source URLs additionally go
//! through a fixed textual normalization so the same asset referenced
//! from different signals deduplicates to one registry key.

use url::Url;

use crate::entities::decode_entities;

/// Check if a string is a valid absolute http(s) URL.
///
/// # Returns
/// * `(is_absolute, parsed_url)` - Whether URL is absolute and the parsed URL if valid
#[must_use]
pub fn is_absolute_url(s: &str) -> (bool, Option<Url>) {
    let s = s.trim();

    if s.is_empty() {
        return (false, None);
    }

    // Must start with http:// or https://
    if !s.starts_with("http://") && !s.starts_with("https://") {
        return (false, None);
    }

    match Url::parse(s) {
        Ok(url) => {
            // Verify it has a host
            if url.host().is_some() {
                (true, Some(url))
            } else {
                (false, None)
            }
        }
        Err(_) => (false, None),
    }
}

/// Convert a relative or absolute URL to absolute form.
///
/// Special schemes (`data:`, `javascript:`, `mailto:`, `tel:`) are
/// preserved unchanged; the registry rejects what it must reject.
///
/// # Returns
/// * The absolute URL string, or the original if resolution fails
#[must_use]
pub fn create_absolute_url(url_str: &str, base: &Url) -> String {
    let url_str = url_str.trim();

    if url_str.is_empty() {
        return String::new();
    }

    if url_str.starts_with("data:")
        || url_str.starts_with("javascript:")
        || url_str.starts_with("mailto:")
        || url_str.starts_with("tel:")
    {
        return url_str.to_string();
    }

    let (is_abs, _) = is_absolute_url(url_str);
    if is_abs {
        return url_str.to_string();
    }

    match base.join(url_str) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => url_str.to_string(),
    }
}

/// Normalize a video-source URL into its registry key form.
///
/// Resolves against the page URL, entity-decodes, and applies the fixed
/// `&amp;` → `&` replacement. The extra replacement catches
/// double-encoded query separators that survive one round of decoding.
///
/// # Returns
/// * `Some(normalized)` for a usable value, `None` for empty/whitespace input
#[must_use]
pub fn normalize_source_url(url_str: &str, base: &Url) -> Option<String> {
    let decoded = decode_entities(url_str.trim());
    let decoded = decoded.replace("&amp;", "&");

    if decoded.trim().is_empty() {
        return None;
    }

    Some(create_absolute_url(&decoded, base))
}
