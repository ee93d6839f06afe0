use serde_yaml_ng::Value;

use super::frontmatter_parser::header_span;
use crate::model::frontmatter::Frontmatter;

/// Error type for header rewrites
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("document has no frontmatter block to replace")]
    MissingHeader,
}

/// Replace the header block of `text` with `fm`, leaving the body untouched.
///
/// A document without a header is rejected rather than given a new one.
pub fn serialize_frontmatter(text: &str, fm: &Frontmatter) -> Result<String, FrontmatterError> {
    let span = header_span(text).ok_or(FrontmatterError::MissingHeader)?;
    let mut out = render_header(fm);
    out.push_str(&text[span.end..]);
    Ok(out)
}

/// Render a complete header block: `---`, one `key: value` line per entry,
/// `---`. No trailing newline.
pub fn render_header(fm: &Frontmatter) -> String {
    let lines: Vec<String> = fm
        .iter()
        .map(|(key, value)| format!("{}: {}", key, format_value(value, false)))
        .collect();
    format!("---\n{}\n---", lines.join("\n"))
}

/// Inline rendering of a value. Sequences and mappings use the flow forms
/// `[a, b]` and `{k: v}`. A top-level null renders as nothing so that
/// `key: ` stays blank; inside a flow collection it is `~`.
fn format_value(value: &Value, in_flow: bool) -> String {
    match value {
        Value::Null if in_flow => "~".to_string(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(n),
        Value::String(s) => format_string(s, in_flow),
        Value::Sequence(items) => {
            let parts: Vec<String> = items.iter().map(|v| format_value(v, true)).collect();
            format!("[{}]", parts.join(", "))
        }
        Value::Mapping(entries) => {
            let parts: Vec<String> = entries
                .iter()
                .map(|(k, v)| format!("{}: {}", format_value(k, true), format_value(v, true)))
                .collect();
            format!("{{{}}}", parts.join(", "))
        }
        Value::Tagged(tagged) => format!("{} {}", tagged.tag, format_value(&tagged.value, in_flow)),
    }
}

/// Integers and integral floats print without a fractional part.
pub fn format_number(n: &serde_yaml_ng::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f == 0.0 => "0".to_string(),
        Some(f) if f.is_finite() => format!("{}", f),
        _ => n.to_string(),
    }
}

/// Plain scalars are written bare; anything YAML would read back differently
/// is double-quoted.
fn format_string(s: &str, in_flow: bool) -> String {
    if needs_quotes(s, in_flow) {
        serde_json::to_string(s).unwrap_or_else(|_| format!("\"{}\"", s))
    } else {
        s.to_string()
    }
}

fn needs_quotes(s: &str, in_flow: bool) -> bool {
    if s.is_empty() || s.trim() != s {
        return true;
    }
    if s.contains(": ") || s.contains(" #") || s.ends_with(':') || s.contains(['\n', '\r', '\t']) {
        return true;
    }
    if in_flow && s.contains([',', ':', '[', ']', '{', '}']) {
        return true;
    }
    let first = s.chars().next().unwrap_or(' ');
    if "[]{}&*!|>'\"%@`,#".contains(first) || s.starts_with("- ") || s.starts_with("? ") {
        return true;
    }
    // Would read back as null, bool or number
    !matches!(serde_yaml_ng::from_str::<Value>(s), Ok(Value::String(ref back)) if back == s)
}
