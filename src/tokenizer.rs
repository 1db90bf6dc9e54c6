//! Tag attribute tokenizer.
//!
//! The one shared primitive every scanner depends on: given the raw text
//! of a single tag (one `<meta ...>` match, one `<video ...>` opening
//! tag), produce a map of lower-cased attribute names to entity-decoded,
//! trimmed values. Malformed attributes are simply absent from the map;
//! this function never fails.

use std::collections::HashMap;

use crate::entities::decode_entities;
use crate::patterns::TAG_ATTRIBUTE;

/// Extract the attribute map from a raw tag substring.
///
/// Both single- and double-quoted values are recognized. Attribute names
/// are lower-cased; values are entity-decoded and trimmed.
#[must_use]
pub fn tag_attributes(raw_tag: &str) -> HashMap<String, String> {
    let mut attrs = HashMap::new();

    for caps in TAG_ATTRIBUTE.captures_iter(raw_tag) {
        let Some(name) = caps.get(1) else { continue };
        let value = caps.get(2).or_else(|| caps.get(3));
        let Some(value) = value else { continue };

        attrs
            .entry(name.as_str().to_lowercase())
            .or_insert_with(|| decode_entities(value.as_str()).trim().to_string());
    }

    attrs
}

/// Fetch a non-empty attribute value from a parsed attribute map.
#[must_use]
pub fn non_empty_attr<'a>(attrs: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    attrs.get(name).map(String::as_str).filter(|v| !v.is_empty())
}
