//! JSON-LD structured-data collector.
//!
//! Walks every `<script type="application/ld+json">` block looking for
//! schema.org `VideoObject` and `Product` nodes. Sites nest these
//! arbitrarily deep (`@graph` arrays, `offers`, `mainEntity`, cyclic
//! cross-references), so the walk is a recursive traversal over the
//! parsed JSON with a visited set keyed by node identity.

use std::collections::HashSet;

use serde_json::{Map, Value};
use tracing::debug;

use crate::extract::ScrapeContext;
use crate::patterns::{HTML_COMMENT, JSON_LD_SCRIPT};
use crate::registry::infer_source_type;

/// Properties that commonly nest further schema entities. These are
/// walked first; every other object- or array-valued property is walked
/// afterwards as a fallback.
const CONTAINER_PROPS: [&str; 9] = [
    "video",
    "hasVideo",
    "itemListElement",
    "associatedMedia",
    "subjectOf",
    "mentions",
    "offers",
    "potentialAction",
    "mainEntity",
];

/// Harvest metadata from every JSON-LD block in the document.
///
/// Blocks that fail to parse are skipped; a bare comma-joined object
/// list (invalid JSON some CMSes emit) gets one retry wrapped in
/// `[...]`.
pub(crate) fn collect_json_ld(ctx: &mut ScrapeContext, html: &str) {
    for caps in JSON_LD_SCRIPT.captures_iter(html) {
        let Some(raw) = caps.get(1) else { continue };

        let cleaned = HTML_COMMENT.replace_all(raw.as_str(), "");
        let cleaned = cleaned.trim();
        if cleaned.is_empty() {
            continue;
        }

        let parsed: Option<Value> = match serde_json::from_str(cleaned) {
            Ok(value) => Some(value),
            Err(_) if !cleaned.starts_with('[') => {
                serde_json::from_str(&format!("[{cleaned}]")).ok()
            }
            Err(_) => None,
        };

        let Some(value) = parsed else {
            debug!("skipping unparseable JSON-LD block");
            continue;
        };

        let mut visited = HashSet::new();
        walk(ctx, &value, &mut visited);
    }
}

/// Recursive schema walk.
///
/// The visited set holds node addresses, not structural hashes:
/// structurally equal but distinct nodes must both be harvested, while
/// a cyclic or heavily cross-referenced graph must terminate.
fn walk(ctx: &mut ScrapeContext, value: &Value, visited: &mut HashSet<usize>) {
    match value {
        Value::Array(items) => {
            for item in items {
                walk(ctx, item, visited);
            }
        }
        Value::Object(obj) => {
            let identity = std::ptr::from_ref(value) as usize;
            if !visited.insert(identity) {
                return;
            }

            if type_matches(obj, "videoobject") {
                harvest_video_object(ctx, obj);
            } else if type_matches(obj, "product") {
                harvest_product(ctx, obj);
            }

            for key in CONTAINER_PROPS {
                if let Some(nested) = obj.get(key) {
                    walk(ctx, nested, visited);
                }
            }

            for (key, nested) in obj {
                if CONTAINER_PROPS.contains(&key.as_str()) {
                    continue;
                }
                if nested.is_object() || nested.is_array() {
                    walk(ctx, nested, visited);
                }
            }
        }
        _ => {}
    }
}

/// Whether the node's `@type`/`type` matches `expected`
/// (case-insensitive; array-valued types match on membership).
fn type_matches(obj: &Map<String, Value>, expected: &str) -> bool {
    let Some(type_value) = obj.get("@type").or_else(|| obj.get("type")) else {
        return false;
    };

    match type_value {
        Value::String(s) => s.eq_ignore_ascii_case(expected),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .any(|s| s.eq_ignore_ascii_case(expected)),
        _ => false,
    }
}

fn harvest_video_object(ctx: &mut ScrapeContext, obj: &Map<String, Value>) {
    if let Some(name) = single_string(obj, "name") {
        ctx.push_title(&name);
    }
    if let Some(description) = single_string(obj, "description") {
        ctx.push_description(&description);
    }
    if let Some(thumbnail) = single_string(obj, "thumbnailUrl") {
        ctx.push_thumbnail(&thumbnail);
    }

    match obj.get("duration") {
        Some(Value::String(raw)) => ctx.push_duration_raw(raw),
        Some(Value::Number(n)) => {
            if let Some(secs) = n.as_f64() {
                ctx.push_duration_seconds(secs);
            }
        }
        _ => {}
    }

    let mime = single_string(obj, "encodingFormat");

    if let Some(content_url) = single_string(obj, "contentUrl") {
        ctx.add_source(&content_url, Some("Structured data video"), mime.as_deref());
    }

    // An embed URL is only useful when we can already tell it is a
    // playable file or stream; bare player pages are noise.
    if let Some(embed_url) = single_string(obj, "embedUrl") {
        if infer_source_type(&embed_url, None).is_resolved() {
            ctx.add_source(&embed_url, Some("Structured data video"), None);
        }
    }

    match obj.get("keywords") {
        Some(Value::String(list)) => ctx.push_tag_list(list),
        Some(Value::Array(items)) => {
            for tag in items.iter().filter_map(Value::as_str) {
                ctx.push_tag(tag);
            }
        }
        _ => {}
    }
}

fn harvest_product(ctx: &mut ScrapeContext, obj: &Map<String, Value>) {
    if let Some(name) = single_string(obj, "name") {
        ctx.push_title(&name);
    }
    if let Some(description) = single_string(obj, "description") {
        ctx.push_description(&description);
    }
    if let Some(image) = image_url(obj.get("image")) {
        ctx.push_thumbnail(&image);
    }

    let brand = match obj.get("brand") {
        Some(Value::Object(brand)) => single_string(brand, "name"),
        Some(Value::String(brand)) => Some(brand.clone()),
        _ => None,
    };
    if let Some(brand) = brand {
        ctx.push_tag(&brand);
    }
}

/// Get a single string value from an object property; array values
/// yield their first string element.
fn single_string(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else {
                Some(s.to_string())
            }
        }
        Value::Array(items) => items
            .first()
            .and_then(Value::as_str)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        _ => None,
    }
}

/// Extract an image URL from the schema `image` property, which sites
/// supply as a string, an `ImageObject`, or an array of either.
fn image_url(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => single_string(obj, "url"),
        Value::Array(items) => image_url(items.first()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn context() -> ScrapeContext {
        let Ok(url) = Url::parse("https://site.example/p") else {
            panic!("invalid page url in test");
        };
        ScrapeContext::new(url)
    }

    fn wrap(json: &str) -> String {
        format!(r#"<script type="application/ld+json">{json}</script>"#)
    }

    #[test]
    fn harvests_video_object() {
        let html = wrap(
            r#"{"@type":"VideoObject","name":"Demo","description":"A demo.",
               "thumbnailUrl":"/thumb.jpg","contentUrl":"https://cdn.example/v.m3u8",
               "duration":"PT45S","keywords":["demo","widget"]}"#,
        );

        let mut ctx = context();
        collect_json_ld(&mut ctx, &html);

        let result = ctx.into_result();
        assert_eq!(result.title.as_deref(), Some("Demo"));
        assert_eq!(result.description.as_deref(), Some("A demo."));
        assert_eq!(result.thumbnail_url.as_deref(), Some("https://site.example/thumb.jpg"));
        assert_eq!(result.duration_seconds, Some(45));
        assert_eq!(result.tags, vec!["demo", "widget"]);
        assert_eq!(result.video_sources.len(), 1);
        assert_eq!(result.video_sources[0].url, "https://cdn.example/v.m3u8");
    }

    #[test]
    fn type_matching_is_case_insensitive_and_array_aware() {
        let html = wrap(r#"[{"@type":"videoOBJECT","name":"A"},{"@type":["Thing","Product"],"name":"B"}]"#);

        let mut ctx = context();
        collect_json_ld(&mut ctx, &html);

        let result = ctx.into_result();
        assert_eq!(result.title.as_deref(), Some("A"));
    }

    #[test]
    fn walks_graph_and_container_properties() {
        let html = wrap(
            r#"{"@graph":[{"@type":"WebPage","mainEntity":{"@type":"Product","name":"Widget",
               "offers":{"price":"9.99"},"brand":{"@type":"Brand","name":"Acme"},
               "subjectOf":{"@type":"VideoObject","contentUrl":"https://cdn.example/w.mp4"}}}]}"#,
        );

        let mut ctx = context();
        collect_json_ld(&mut ctx, &html);

        let result = ctx.into_result();
        assert_eq!(result.title.as_deref(), Some("Widget"));
        assert_eq!(result.tags, vec!["Acme"]);
        assert_eq!(result.video_sources[0].url, "https://cdn.example/w.mp4");
    }

    #[test]
    fn walks_unknown_object_properties_as_fallback() {
        let html = wrap(
            r#"{"@type":"WebPage","somethingCustom":{"@type":"VideoObject","name":"Nested"}}"#,
        );

        let mut ctx = context();
        collect_json_ld(&mut ctx, &html);

        let result = ctx.into_result();
        assert_eq!(result.title.as_deref(), Some("Nested"));
    }

    #[test]
    fn retries_bare_comma_joined_objects() {
        let html = wrap(r#"{"@type":"VideoObject","name":"One"},{"@type":"VideoObject","name":"Two"}"#);

        let mut ctx = context();
        collect_json_ld(&mut ctx, &html);

        let result = ctx.into_result();
        assert_eq!(result.title.as_deref(), Some("One"));
    }

    #[test]
    fn strips_html_comments_before_parsing() {
        let html = wrap(r#"<!-- start -->{"@type":"VideoObject","name":"Commented"}<!-- end -->"#);

        let mut ctx = context();
        collect_json_ld(&mut ctx, &html);

        let result = ctx.into_result();
        assert_eq!(result.title.as_deref(), Some("Commented"));
    }

    #[test]
    fn unparseable_blocks_are_skipped() {
        let broken = wrap("{ not json at all ]");
        let valid = wrap(r#"{"@type":"VideoObject","name":"Valid"}"#);
        let html = format!("{broken}{valid}");

        let mut ctx = context();
        collect_json_ld(&mut ctx, &html);

        let result = ctx.into_result();
        assert_eq!(result.title.as_deref(), Some("Valid"));
    }

    #[test]
    fn embed_url_requires_inferable_type() {
        let html = wrap(
            r#"[{"@type":"VideoObject","embedUrl":"https://player.example/embed/123"},
                {"@type":"VideoObject","embedUrl":"https://cdn.example/direct.m3u8"}]"#,
        );

        let mut ctx = context();
        collect_json_ld(&mut ctx, &html);

        let result = ctx.into_result();
        assert_eq!(result.video_sources.len(), 1);
        assert_eq!(result.video_sources[0].url, "https://cdn.example/direct.m3u8");
    }

    #[test]
    fn thumbnail_array_takes_first_entry() {
        let html = wrap(
            r#"{"@type":"VideoObject","thumbnailUrl":["https://cdn.example/a.jpg","https://cdn.example/b.jpg"]}"#,
        );

        let mut ctx = context();
        collect_json_ld(&mut ctx, &html);

        let result = ctx.into_result();
        assert_eq!(result.thumbnail_url.as_deref(), Some("https://cdn.example/a.jpg"));
    }

    #[test]
    fn numeric_duration_is_accepted() {
        let html = wrap(r#"{"@type":"VideoObject","duration":89.6}"#);

        let mut ctx = context();
        collect_json_ld(&mut ctx, &html);

        let result = ctx.into_result();
        assert_eq!(result.duration_seconds, Some(90));
    }

    #[test]
    fn deeply_cross_referenced_graph_terminates() {
        // itemListElement chain long enough to prove the walk bounds
        let html = wrap(
            r#"{"@type":"ItemList","itemListElement":[
                {"@type":"ListItem","item":{"@type":"Product","name":"Deep"}},
                {"@type":"ListItem","item":{"@type":"Product","name":"Deep"}}
            ]}"#,
        );

        let mut ctx = context();
        collect_json_ld(&mut ctx, &html);

        let result = ctx.into_result();
        assert_eq!(result.title.as_deref(), Some("Deep"));
    }
}
