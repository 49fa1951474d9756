//! YAML frontmatter envelopes around markdown bodies.
//!
//! An envelope is a `---` line, a YAML mapping, and a closing `---` line at
//! the very start of a file. Everything after the closing line is the body.
//! Files without an opening line, or with no closing line, are all body.

use regex::Regex;
use serde_yaml::{Mapping, Value};
use std::sync::LazyLock;

/// Default number of characters kept when a paragraph becomes a description.
pub const DEFAULT_DESCRIPTION_LIMIT: usize = 50;

/// Suffix appended to a truncated description.
pub const ELLIPSIS: &str = "...";

static HEADING_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#+\s*").expect("valid regex"));

/// A parsed file: optional header mapping plus trimmed body.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    /// `None` when the file had no header block at all.
    pub header: Option<Mapping>,
    pub body: String,
}

impl Envelope {
    /// Header mapping, or an empty one when absent.
    pub fn header_or_empty(&self) -> Mapping {
        self.header.clone().unwrap_or_default()
    }
}

/// Splits content into raw header YAML and untrimmed body.
pub fn split_frontmatter(content: &str) -> (Option<&str>, &str) {
    let trimmed = content.strip_prefix('\u{feff}').unwrap_or(content);

    let Some(after_open) = trimmed.strip_prefix("---") else {
        return (None, content);
    };
    let after_open = match after_open
        .strip_prefix("\r\n")
        .or_else(|| after_open.strip_prefix('\n'))
    {
        Some(rest) => rest,
        None => return (None, content),
    };

    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == "---" {
            let yaml = &after_open[..offset];
            let body = &after_open[offset + line.len()..];
            return (Some(yaml), body);
        }
        offset += line.len();
    }

    (None, content)
}

/// Returns the body with any header stripped, trimmed.
///
/// Two files whose bodies compare equal here are considered the same content
/// regardless of how their headers differ.
pub fn extract_body(content: &str) -> String {
    split_frontmatter(content).1.trim().to_string()
}

/// Parses the envelope of a file.
///
/// An empty header block yields an empty mapping. A header that is not a
/// YAML mapping is an error.
pub fn parse_envelope(content: &str) -> Result<Envelope, String> {
    let (raw, body) = split_frontmatter(content);
    let header = match raw {
        None => None,
        Some(yaml) if yaml.trim().is_empty() => Some(Mapping::new()),
        Some(yaml) => match serde_yaml::from_str::<Value>(yaml) {
            Ok(Value::Mapping(map)) => Some(map),
            Ok(Value::Null) => Some(Mapping::new()),
            Ok(_) => return Err("header is not a key/value mapping".to_string()),
            Err(e) => return Err(format!("Invalid YAML frontmatter: {e}")),
        },
    };

    Ok(Envelope {
        header,
        body: body.trim().to_string(),
    })
}

/// Renders a header and body into file content.
///
/// An empty header renders the body alone, unless the body itself opens with
/// `---`; then an empty `---\n---\n` block goes first so the body is not
/// read back as a header. Key order follows the mapping's insertion order.
pub fn render(header: &Mapping, body: &str) -> crate::Result<String> {
    if header.is_empty() {
        return Ok(format!("{}\n", render_bare(body)));
    }
    let yaml = serde_yaml::to_string(header)?;
    Ok(format!("---\n{}---\n{}\n", yaml, body))
}

/// The body as a file with no header, fenced by an empty block when needed.
pub fn render_bare(body: &str) -> String {
    if opens_with_fence(body) {
        format!("---\n---\n{}", body)
    } else {
        body.to_string()
    }
}

fn opens_with_fence(body: &str) -> bool {
    body.strip_prefix('\u{feff}').unwrap_or(body).starts_with("---")
}

/// Derives a description for content that carries none.
///
/// Tries the first line as a markdown heading, then the first paragraph cut
/// to `limit` characters with [`ELLIPSIS`] appended, then the file stem with
/// `-` and `_` turned into spaces.
pub fn heuristic_description(body: &str, file_stem: &str, limit: usize) -> String {
    let body = body.trim();

    if let Some(first) = body.lines().next().map(str::trim) {
        if first.starts_with('#') {
            let heading = HEADING_PREFIX.replace(first, "");
            let heading = heading.trim();
            if !heading.is_empty() {
                return heading.to_string();
            }
        }
    }

    let paragraph = body
        .lines()
        .take_while(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    let paragraph = paragraph.trim();
    if !paragraph.is_empty() {
        return truncate_chars(paragraph, limit);
    }

    file_stem.replace(['-', '_'], " ")
}

fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut out: String = text.chars().take(limit).collect();
    out.push_str(ELLIPSIS);
    out
}
