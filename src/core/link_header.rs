//! Parsing of HTTP `Link` header values (RFC 8288).
//!
//! Only what relation lookups need is kept: the target and the parameters,
//! with `rel` split into its individual relation types.

use std::collections::HashMap;

/// Relation advertised by repositories for binaries whose RDF description
/// lives at a separate URI.
pub const DESCRIBED_BY: &str = "describedby";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkValue {
    pub target: String,
    pub params: HashMap<String, String>,
}

impl LinkValue {
    /// Relation types from the `rel` parameter, lowercased.
    pub fn relations(&self) -> Vec<String> {
        self.params
            .get("rel")
            .map(|rel| rel.split_whitespace().map(|r| r.to_ascii_lowercase()).collect())
            .unwrap_or_default()
    }

    pub fn has_relation(&self, relation: &str) -> bool {
        self.relations().iter().any(|r| r.eq_ignore_ascii_case(relation))
    }
}

/// Parse one `Link` header value, which may hold several comma-separated links.
///
/// Entries without a `<target>` are dropped.
pub fn parse_link_header(value: &str) -> Vec<LinkValue> {
    split_outside(value, ',')
        .into_iter()
        .filter_map(|entry| parse_entry(entry.trim()))
        .collect()
}

fn parse_entry(entry: &str) -> Option<LinkValue> {
    let rest = entry.strip_prefix('<')?;
    let end = rest.find('>')?;
    let target = rest[..end].trim().to_string();

    let mut params = HashMap::new();
    for param in split_outside(&rest[end + 1..], ';') {
        let param = param.trim();
        if param.is_empty() {
            continue;
        }
        let (name, value) = match param.split_once('=') {
            Some((name, value)) => (name.trim(), unquote(value.trim())),
            None => (param, String::new()),
        };
        // first occurrence wins
        params.entry(name.to_ascii_lowercase()).or_insert(value);
    }

    Some(LinkValue { target, params })
}

fn unquote(value: &str) -> String {
    match value.strip_prefix('"').and_then(|v| v.strip_suffix('"')) {
        Some(inner) => inner.replace("\\\"", "\""),
        None => value.to_string(),
    }
}

/// Split on `separator`, ignoring occurrences inside `<...>` or quotes.
fn split_outside(value: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_target = false;
    let mut in_quotes = false;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in value.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes => escaped = true,
            '"' if !in_target => in_quotes = !in_quotes,
            '<' if !in_quotes => in_target = true,
            '>' if !in_quotes => in_target = false,
            c if c == separator && !in_target && !in_quotes => {
                parts.push(&value[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&value[start..]);
    parts
}
