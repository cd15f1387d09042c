//! Line-oriented formatter for post bodies
//!
//! Post bodies use a tiny markup: `#`/`##`/`###` headings, `- ` bullets,
//! `1. ` ordered items, blank-line spacers and `**bold**` inside paragraphs.
//! Code fences are recognized and dropped. Anything else is a paragraph.
//!
//! The formatter never fails. Malformed markup is kept as literal text.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    static ref ORDERED_ITEM: Regex = Regex::new(r"^[0-9]+\.\s").expect("ordered item pattern");
    static ref BOLD: Regex = Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern");
}

/// Kind of list a list item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    Bullet,
    Ordered,
}

/// A run of paragraph text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "style", content = "text", rename_all = "snake_case")]
pub enum Span {
    Text(String),
    Bold(String),
}

/// Paragraph text after inline formatting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InlineText {
    pub spans: Vec<Span>,
}

impl InlineText {
    /// Apply the `**bold**` rule to a single line
    pub fn parse(line: &str) -> Self {
        let mut spans = Vec::new();
        let mut last = 0;

        for caps in BOLD.captures_iter(line) {
            let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if whole.start() > last {
                spans.push(Span::Text(line[last..whole.start()].to_string()));
            }
            spans.push(Span::Bold(inner.as_str().to_string()));
            last = whole.end();
        }

        if last < line.len() {
            spans.push(Span::Text(line[last..].to_string()));
        }

        Self { spans }
    }

    /// The text with formatting removed
    pub fn plain_text(&self) -> String {
        self.spans
            .iter()
            .map(|span| match span {
                Span::Text(text) | Span::Bold(text) => text.as_str(),
            })
            .collect()
    }
}

/// One rendering unit of a post body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Heading { level: u8, text: String },
    ListItem { kind: ListKind, text: String },
    Paragraph(InlineText),
    Spacer,
}

/// What a rule decided for one line
enum LineShape {
    Emit(ContentBlock),
    Drop,
}

type LineRule = fn(&str) -> Option<LineShape>;

/// Checked in order, first match wins. The last rule always matches.
const RULES: &[LineRule] = &[
    heading_1,
    heading_2,
    heading_3,
    code_fence,
    bullet_item,
    ordered_item,
    blank,
    paragraph,
];

fn heading(line: &str, marker: &str, level: u8) -> Option<LineShape> {
    line.strip_prefix(marker).map(|text| {
        LineShape::Emit(ContentBlock::Heading {
            level,
            text: text.to_string(),
        })
    })
}

fn heading_1(line: &str) -> Option<LineShape> {
    heading(line, "# ", 1)
}

fn heading_2(line: &str) -> Option<LineShape> {
    heading(line, "## ", 2)
}

fn heading_3(line: &str) -> Option<LineShape> {
    heading(line, "### ", 3)
}

fn code_fence(line: &str) -> Option<LineShape> {
    line.starts_with("```").then_some(LineShape::Drop)
}

fn bullet_item(line: &str) -> Option<LineShape> {
    line.strip_prefix("- ").map(|text| {
        LineShape::Emit(ContentBlock::ListItem {
            kind: ListKind::Bullet,
            text: text.to_string(),
        })
    })
}

fn ordered_item(line: &str) -> Option<LineShape> {
    // The source number is not kept; renderers number items themselves
    ORDERED_ITEM.find(line).map(|marker| {
        LineShape::Emit(ContentBlock::ListItem {
            kind: ListKind::Ordered,
            text: line[marker.end()..].to_string(),
        })
    })
}

fn blank(line: &str) -> Option<LineShape> {
    line.trim().is_empty().then_some(LineShape::Emit(ContentBlock::Spacer))
}

fn paragraph(line: &str) -> Option<LineShape> {
    Some(LineShape::Emit(ContentBlock::Paragraph(InlineText::parse(
        line,
    ))))
}

fn classify(line: &str) -> LineShape {
    RULES
        .iter()
        .find_map(|rule| rule(line))
        .unwrap_or(LineShape::Drop)
}

/// Format a post body into content blocks
pub fn format(content: &str) -> Vec<ContentBlock> {
    content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter_map(|line| match classify(line) {
            LineShape::Emit(block) => Some(block),
            LineShape::Drop => None,
        })
        .collect()
}
