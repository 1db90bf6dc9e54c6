//! Meta-tag, canonical-link and `<title>` collectors.
//!
//! Extracts metadata from standard HTML meta tags, Open Graph tags,
//! Twitter cards and schema.org itemprops, plus the canonical link and
//! the document title. One regex pass per tag kind, no tree walk.

use crate::extract::ScrapeContext;
use crate::entities::decode_entities;
use crate::patterns::{LINK_TAG, META_TAG, TITLE_TAG};
use crate::tokenizer::{non_empty_attr, tag_attributes};

/// Examine every `<meta>` tag in the document.
///
/// The tag's key is `property`, falling back to `name`, then `itemprop`,
/// lower-cased, so `og:*` properties, Twitter card names and itemprops
/// route through one match table. Candidates accumulate in document
/// order; the assembler's first-wins rule does the rest.
pub(crate) fn collect_meta_tags(ctx: &mut ScrapeContext, html: &str) {
    for tag in META_TAG.find_iter(html) {
        let attrs = tag_attributes(tag.as_str());

        let name = attrs
            .get("property")
            .or_else(|| attrs.get("name"))
            .or_else(|| attrs.get("itemprop"))
            .map(|n| n.to_lowercase())
            .unwrap_or_default();

        let Some(content) = non_empty_attr(&attrs, "content") else {
            continue;
        };

        match name.as_str() {
            // Title
            "og:title" | "twitter:title" | "name" | "title" => {
                ctx.push_title(content);
            }

            // Description
            "og:description" | "description" | "twitter:description"
            | "product:description" => {
                ctx.push_description(content);
            }

            // Thumbnail
            "og:image" | "og:image:url" | "twitter:image" | "image" | "thumbnailurl" => {
                ctx.push_thumbnail(content);
            }

            // Tags
            "keywords" => {
                ctx.push_tag_list(content);
            }

            // Video sources
            "og:video" | "og:video:url" | "og:video:secure_url" => {
                ctx.add_source(content, Some("OpenGraph video"), None);
            }
            "twitter:player:stream" | "twitter:player:stream:src" => {
                ctx.add_source(content, Some("Twitter video"), None);
            }

            // Duration
            "og:video:duration" | "video:duration" | "duration" => {
                ctx.push_duration_raw(content);
            }

            // article:tag, og:video:tag, video:tag, ...
            _ if name.ends_with(":tag") => {
                ctx.push_tag(content);
            }

            _ => {}
        }
    }
}

/// Find the first `<link rel="canonical">` and record its target.
///
/// The scan stops at the first usable match.
pub(crate) fn collect_canonical_link(ctx: &mut ScrapeContext, html: &str) {
    for tag in LINK_TAG.find_iter(html) {
        let attrs = tag_attributes(tag.as_str());

        let is_canonical = attrs
            .get("rel")
            .is_some_and(|rel| rel.eq_ignore_ascii_case("canonical"));
        if !is_canonical {
            continue;
        }

        if let Some(href) = non_empty_attr(&attrs, "href") {
            ctx.set_canonical(href);
            return;
        }
    }
}

/// Record the document `<title>` as a title candidate.
///
/// Runs after the meta pass, so a `<title>` only wins when no meta tag
/// supplied a title.
pub(crate) fn collect_title_tag(ctx: &mut ScrapeContext, html: &str) {
    if let Some(caps) = TITLE_TAG.captures(html) {
        if let Some(text) = caps.get(1) {
            ctx.push_title(decode_entities(text.as_str()).trim());
        }
    }
}
