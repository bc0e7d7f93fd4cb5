//! Minimal HTML scanning for the calls page.
//!
//! The page is server-rendered from a fixed template, so the scanner only
//! needs start/end tags and their attributes: enough to cut the content
//! region out of a full document and to list the elements inside it.

use crate::error::{CallsError, Result};
use regex::Regex;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::OnceLock;

static TAG_RE: OnceLock<Regex> = OnceLock::new();
static ATTR_RE: OnceLock<Regex> = OnceLock::new();
static INERT_RE: OnceLock<Regex> = OnceLock::new();
static ENTITY_RE: OnceLock<Regex> = OnceLock::new();

fn tag_re() -> &'static Regex {
    TAG_RE.get_or_init(|| {
        Regex::new(r#"<(/?)([a-zA-Z][a-zA-Z0-9-]*)((?:[^>"']|"[^"]*"|'[^']*')*)>"#).unwrap()
    })
}

fn attr_re() -> &'static Regex {
    ATTR_RE.get_or_init(|| {
        Regex::new(r#"([^\s"'>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#).unwrap()
    })
}

/// Comments, and the bodies of raw-text elements. Tags inside them are text.
fn inert_re() -> &'static Regex {
    INERT_RE.get_or_init(|| {
        Regex::new(
            r"(?is)<!--.*?(?:-->|\z)|<(script|style)\b[^>]*>(.*?)(?:</(?:script|style)\s*>|\z)",
        )
        .unwrap()
    })
}

fn entity_re() -> &'static Regex {
    ENTITY_RE.get_or_init(|| {
        Regex::new(r"&(?:#([0-9]{1,7})|#[xX]([0-9a-fA-F]{1,6})|(quot|amp|lt|gt|apos));").unwrap()
    })
}

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

// ---------------------------------------------------------------------------
// Element
// ---------------------------------------------------------------------------

/// A start tag and its attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: BTreeMap<String, String>,
}

impl Element {
    pub fn id(&self) -> Option<&str> {
        self.attrs.get("id").map(String::as_str)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attrs
            .get("class")
            .map(String::as_str)
            .unwrap_or("")
            .split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    /// Value of a `data-*` attribute.
    pub fn data(&self, name: &str) -> Option<&str> {
        self.attrs.get(&format!("data-{name}")).map(String::as_str)
    }

    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let entry = self.attrs.entry("class".to_string()).or_default();
        if !entry.is_empty() {
            entry.push(' ');
        }
        entry.push_str(class);
    }

    pub fn remove_class(&mut self, class: &str) {
        if let Some(value) = self.attrs.get_mut("class") {
            *value = value
                .split_whitespace()
                .filter(|c| *c != class)
                .collect::<Vec<_>>()
                .join(" ");
        }
    }
}

// ---------------------------------------------------------------------------
// Scanning
// ---------------------------------------------------------------------------

fn parse_attrs(raw: &str) -> BTreeMap<String, String> {
    let mut attrs = BTreeMap::new();
    for cap in attr_re().captures_iter(raw) {
        let name = cap[1].to_ascii_lowercase();
        let value = cap
            .get(2)
            .or_else(|| cap.get(3))
            .or_else(|| cap.get(4))
            .map(|m| decode_entities(m.as_str()))
            .unwrap_or_default();
        // First occurrence wins, as in browsers.
        attrs.entry(name).or_insert(value);
    }
    attrs
}

fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    entity_re()
        .replace_all(s, |cap: &regex::Captures<'_>| {
            let decoded = if let Some(dec) = cap.get(1) {
                dec.as_str().parse().ok().and_then(char::from_u32)
            } else if let Some(hex) = cap.get(2) {
                u32::from_str_radix(hex.as_str(), 16)
                    .ok()
                    .and_then(char::from_u32)
            } else {
                match cap.get(3).map(|m| m.as_str()) {
                    Some("quot") => Some('"'),
                    Some("amp") => Some('&'),
                    Some("lt") => Some('<'),
                    Some("gt") => Some('>'),
                    Some("apos") => Some('\''),
                    _ => None,
                }
            };
            // Unknown code points stay as written.
            decoded.map_or_else(|| cap[0].to_string(), String::from)
        })
        .into_owned()
}

/// `html` with comments and script/style bodies blanked to spaces.
///
/// Byte offsets are unchanged, so positions found in the result index the
/// original text.
fn mask_inert(html: &str) -> Cow<'_, str> {
    let mut masked: Option<String> = None;
    for cap in inert_re().captures_iter(html) {
        let Some(span) = cap.get(2).or_else(|| cap.get(0)).map(|m| m.range()) else {
            continue;
        };
        if span.is_empty() {
            continue;
        }
        let buf = masked.get_or_insert_with(|| html.to_string());
        buf.replace_range(span.clone(), &" ".repeat(span.len()));
    }
    masked.map_or(Cow::Borrowed(html), Cow::Owned)
}

fn is_self_closing(tag: &str, raw_attrs: &str) -> bool {
    raw_attrs.trim_end().ends_with('/') || VOID_TAGS.contains(&tag)
}

/// Every start tag in `html`, in document order.
pub fn scan_elements(html: &str) -> Vec<Element> {
    let masked = mask_inert(html);
    tag_re()
        .captures_iter(&masked)
        .filter(|cap| cap[1].is_empty())
        .map(|cap| Element {
            tag: cap[2].to_ascii_lowercase(),
            attrs: parse_attrs(&cap[3]),
        })
        .collect()
}

/// Inner markup of the first element carrying class `marker`.
///
/// Nesting of the same tag name is tracked so that a `<div class="container">`
/// holding further `<div>`s is cut at its own closing tag. Tags inside
/// comments and script/style bodies do not count.
pub fn extract_region(html: &str, marker: &str) -> Result<String> {
    let malformed = || CallsError::MalformedResponse {
        marker: marker.to_string(),
    };

    let masked = mask_inert(html);
    let mut tags = tag_re().captures_iter(&masked);
    let (tag, inner_start) = loop {
        let cap = tags.next().ok_or_else(malformed)?;
        if !cap[1].is_empty() {
            continue;
        }
        let attrs = parse_attrs(&cap[3]);
        let matches = attrs
            .get("class")
            .is_some_and(|c| c.split_whitespace().any(|t| t == marker));
        if !matches {
            continue;
        }
        let tag = cap[2].to_ascii_lowercase();
        if is_self_closing(&tag, &cap[3]) {
            return Ok(String::new());
        }
        let end = cap.get(0).map(|m| m.end()).ok_or_else(malformed)?;
        break (tag, end);
    };

    let mut depth = 1usize;
    for cap in tags {
        if !cap[2].eq_ignore_ascii_case(&tag) {
            continue;
        }
        if cap[1].is_empty() {
            if !is_self_closing(&tag, &cap[3]) {
                depth += 1;
            }
            continue;
        }
        depth -= 1;
        if depth == 0 {
            let inner_end = cap.get(0).map(|m| m.start()).ok_or_else(malformed)?;
            return Ok(html[inner_start..inner_end].to_string());
        }
    }

    Err(malformed())
}
