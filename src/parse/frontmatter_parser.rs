use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use serde_yaml_ng::Value;

use crate::model::frontmatter::Frontmatter;

/// `---` at offset 0, the header text, then the first `\n---` after it.
static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A---\n((?s:.*?))\n---").expect("header pattern is valid"));

/// Byte span of the whole header block (both markers included), if present.
pub fn header_span(text: &str) -> Option<Range<usize>> {
    HEADER_RE.find(text).map(|m| m.range())
}

/// Decode the header block at the start of `text`.
///
/// Returns `None` when there is no header block, when the YAML inside it
/// does not parse, or when it decodes to something other than a mapping.
/// An empty or all-comment header decodes to an empty `Frontmatter`.
pub fn parse_frontmatter(text: &str) -> Option<Frontmatter> {
    let caps = HEADER_RE.captures(text)?;
    let yaml = caps.get(1).map_or("", |m| m.as_str());

    match serde_yaml_ng::from_str::<Value>(yaml) {
        Ok(Value::Mapping(mapping)) => Some(Frontmatter::from_mapping(mapping)),
        Ok(Value::Null) => Some(Frontmatter::new()),
        Ok(_) => {
            tracing::warn!("frontmatter is not a key-value mapping");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "invalid frontmatter");
            None
        }
    }
}

/// The document body: everything after the closing header marker, or the
/// whole text when there is no header.
pub fn body(text: &str) -> &str {
    match header_span(text) {
        Some(span) => &text[span.end..],
        None => text,
    }
}
