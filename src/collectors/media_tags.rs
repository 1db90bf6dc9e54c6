//! Inline `<video>`/`<source>` scanner plus last-resort fallbacks.
//!
//! The inline scanner reads the markup players actually render from;
//! the direct-URL regex catches pages that only mention a video file
//! inside script configuration; the `data-duration` scan picks up the
//! duration attribute several player widgets emit.

use crate::extract::ScrapeContext;
use crate::patterns::{DATA_DURATION, DIRECT_VIDEO_URL, SOURCE_TAG, VIDEO_BLOCK};
use crate::tokenizer::{non_empty_attr, tag_attributes};

/// Scan every `<video ...>...</video>` block.
///
/// Block numbering is 1-based and shows up in the source labels
/// ("Inline video 2", "Video source 2.1") so a user picking between
/// candidates can tell the players apart.
pub(crate) fn collect_video_tags(ctx: &mut ScrapeContext, html: &str) {
    for (index, caps) in VIDEO_BLOCK.captures_iter(html).enumerate() {
        let video_number = index + 1;

        let Some(opening_tag) = caps.get(1) else { continue };
        let attrs = tag_attributes(opening_tag.as_str());

        if let Some(poster) = non_empty_attr(&attrs, "poster") {
            ctx.push_thumbnail(poster);
        }

        if let Some(src) = non_empty_attr(&attrs, "src") {
            ctx.add_source(src, Some(&format!("Inline video {video_number}")), None);
        }

        let Some(body) = caps.get(2) else { continue };
        for (source_index, source_tag) in SOURCE_TAG.find_iter(body.as_str()).enumerate() {
            let source_number = source_index + 1;
            let source_attrs = tag_attributes(source_tag.as_str());

            if let Some(src) = non_empty_attr(&source_attrs, "src") {
                ctx.add_source(
                    src,
                    Some(&format!("Video source {video_number}.{source_number}")),
                    non_empty_attr(&source_attrs, "type"),
                );
            }
        }
    }
}

/// Whole-document scan for bare video-file URLs.
pub(crate) fn collect_direct_urls(ctx: &mut ScrapeContext, html: &str) {
    for url in DIRECT_VIDEO_URL.find_iter(html) {
        ctx.add_source(url.as_str(), Some("Detected video"), None);
    }
}

/// Whole-document scan for `data-duration="..."` attributes.
pub(crate) fn collect_duration_attributes(ctx: &mut ScrapeContext, html: &str) {
    for caps in DATA_DURATION.captures_iter(html) {
        if let Some(value) = caps.get(1) {
            ctx.push_duration_raw(value.as_str());
        }
    }
}
