use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::MindmapConfig;
use crate::ir::ContentNode;

static HEADER_MARKERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:#+\s*)+").unwrap());

/// Cleans one title or body field.
///
/// Escaped `\n` sequences (a backslash followed by `n`, as produced by
/// doubly encoded JSON) become real line breaks, surrounding whitespace is
/// trimmed and leading markdown header markers are removed. Applying it
/// twice gives the same result as applying it once.
pub fn normalize_field(raw: &str) -> String {
    let unescaped = raw.replace("\\n", "\n");
    HEADER_MARKERS
        .replace(unescaped.trim(), "")
        .trim()
        .to_string()
}

/// Display-ready content of one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedContent {
    pub title: String,
    pub body: String,
    pub source: Option<String>,
}

impl NormalizedContent {
    pub fn from_node(node: &ContentNode, placeholder_title: &str) -> Self {
        let mut title = normalize_field(&node.title);
        if title.is_empty() {
            title = placeholder_title.to_string();
        }
        let source = node
            .source
            .as_deref()
            .map(str::trim)
            .filter(|source| !source.is_empty())
            .map(str::to_string);
        Self {
            title,
            body: normalize_field(&node.text),
            source,
        }
    }

    /// Markdown shown on the canvas; header level follows depth, capped at 3.
    pub fn to_markdown(&self, depth: usize) -> String {
        let level = depth.clamp(1, 3);
        let mut text = format!("{} {}\n\n{}", "#".repeat(level), self.title, self.body);
        if let Some(source) = &self.source {
            text.push_str(&format!("\n\n`📍 {source}`"));
        }
        text
    }
}

/// Maps content length to a node size through fixed length bands.
#[derive(Debug, Clone, Copy)]
pub struct ContentSizer<'c> {
    config: &'c MindmapConfig,
}

impl<'c> ContentSizer<'c> {
    pub fn new(config: &'c MindmapConfig) -> Self {
        Self { config }
    }

    /// `(width, height)` for a node showing `title`, `text` and an optional
    /// source tag.
    pub fn size(&self, title: &str, text: &str, source: Option<&str>) -> (f64, f64) {
        let mut length = title.chars().count() + 2 + text.chars().count();
        if let Some(source) = source {
            length += source.chars().count() + 3;
        }
        self.size_for_length(length)
    }

    pub fn size_content(&self, content: &NormalizedContent) -> (f64, f64) {
        self.size(&content.title, &content.body, content.source.as_deref())
    }

    pub fn size_for_length(&self, length: usize) -> (f64, f64) {
        self.config
            .size_bands
            .iter()
            .find(|band| length < band.below)
            .map(|band| (band.width, band.height))
            .unwrap_or((self.config.overflow_width, self.config.overflow_height))
    }
}
