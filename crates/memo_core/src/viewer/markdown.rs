//! Markdown rendering seam.
//!
//! The real renderer is an external collaborator; the viewer only needs a pure
//! function from markdown source to display text. `PlainTextRenderer` covers
//! front-ends without one (terminals, logs-free previews).

use once_cell::sync::Lazy;
use regex::Regex;

static MARKDOWN_IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[([^\]]*)]\([^)]+\)").expect("valid image regex"));
static MARKDOWN_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").expect("valid link regex"));
static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s{0,3}#{1,6}\s*").expect("valid heading regex"));
static QUOTE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*>\s?").expect("valid quote regex"));
static BULLET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)[-*+]\s+").expect("valid bullet regex"));
static EMPHASIS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[*_`~]+").expect("valid emphasis regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Pure markdown-to-display conversion.
pub trait MarkdownRenderer {
    fn render(&self, source: &str) -> String;
}

/// Renders markdown as plain text, one output line per source line.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextRenderer;

impl MarkdownRenderer for PlainTextRenderer {
    fn render(&self, source: &str) -> String {
        source
            .lines()
            .map(render_line)
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string()
    }
}

fn render_line(line: &str) -> String {
    let line = HEADING_RE.replace(line, "");
    let line = QUOTE_RE.replace(&line, "");
    let line = BULLET_RE.replace(&line, "${1}• ");
    let line = MARKDOWN_IMAGE_RE.replace_all(&line, "$1");
    let line = MARKDOWN_LINK_RE.replace_all(&line, "$1");
    EMPHASIS_RE.replace_all(&line, "").trim_end().to_string()
}

/// Derives a single-line plain-text preview capped at `max_chars`.
///
/// Returns `None` when the content has no visible text.
pub fn preview_text(content: &str, max_chars: usize) -> Option<String> {
    let rendered = PlainTextRenderer.render(content);
    let normalized = WHITESPACE_RE.replace_all(&rendered, " ");
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut preview = trimmed.chars().take(max_chars).collect::<String>();
    if trimmed.chars().count() > max_chars {
        preview.push_str("...");
    }
    Some(preview)
}
