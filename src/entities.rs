//! HTML entity decoding.
//!
//! Attribute values and text content scraped out of third-party markup
//! arrive entity-encoded. This module decodes the small set of named
//! entities that actually occur in metadata (`&amp;`, `&lt;`, `&gt;`,
//! `&quot;`, `&apos;`, `&nbsp;`) plus numeric character references
//! (`&#NN;`, `&#xHH;`). Anything unrecognized is left verbatim so no
//! data is ever lost to a decoding failure.

/// Longest entity body we attempt to decode, semicolon excluded.
/// `&#x10FFFF;` is 8 characters after the ampersand.
const MAX_ENTITY_LEN: usize = 8;

/// Decode HTML entities in a string.
///
/// Named and numeric entities are replaced by their characters; any
/// entity that cannot be decoded (unknown name, malformed or
/// out-of-range number, missing semicolon) is copied through unchanged.
#[must_use]
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        match decode_one(rest) {
            Some((decoded, consumed)) => {
                out.push_str(&decoded);
                rest = &rest[consumed..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Try to decode a single entity at the start of `text` (which begins
/// with `&`). Returns the decoded string and the byte length consumed.
fn decode_one(text: &str) -> Option<(String, usize)> {
    let semi = text.find(';')?;
    if semi < 2 || semi > MAX_ENTITY_LEN + 1 {
        return None;
    }

    let body = &text[1..semi];
    let consumed = semi + 1;

    let named = match body {
        "amp" => Some("&"),
        "lt" => Some("<"),
        "gt" => Some(">"),
        "quot" => Some("\""),
        "apos" => Some("'"),
        "nbsp" => Some("\u{a0}"),
        _ => None,
    };
    if let Some(s) = named {
        return Some((s.to_string(), consumed));
    }

    let code = body.strip_prefix('#')?;
    let value = if let Some(hex) = code.strip_prefix('x').or_else(|| code.strip_prefix('X')) {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        code.parse::<u32>().ok()?
    };

    char::from_u32(value).map(|c| (c.to_string(), consumed))
}
