//! Atlassian Document Format (ADF) handling
//!
//! Jira stores comment bodies as ADF, a nested JSON tree of typed nodes.
//! This module converts a plain-text draft into an ADF document before it is
//! submitted, and flattens documents received from the backend back into
//! text for display.
//!
//! Nodes are modelled generically (a `type` plus optional `content`, `text`,
//! `attrs` and `marks`) so that node types this crate never produces still
//! survive a deserialize/serialize pass unchanged.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

lazy_static! {
    static ref URL_PATTERN: Regex = Regex::new(r#"https?://[^\s<>"]+"#).unwrap();
}

/// Characters trimmed from the end of a detected URL ("see https://x.io/a.")
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ']', '}', '\''];

const ADF_VERSION: u32 = 1;

fn default_version() -> u32 {
    ADF_VERSION
}

/// Root of an ADF tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub content: Vec<Node>,
}

/// A single node in an ADF tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<Node>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<Mark>,
}

/// Formatting applied to a text node (link, strong, em, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Value>,
}

impl Document {
    /// Creates a `doc` root holding the given block nodes
    pub fn new(content: Vec<Node>) -> Self {
        Self {
            version: ADF_VERSION,
            kind: "doc".to_string(),
            content,
        }
    }

    /// Returns true if the document has no block content
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Serialize the document the way it is shown in the preview pane
    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Flatten the document into readable text
    ///
    /// Blocks are separated by a blank line, hard breaks become newlines and
    /// list items are prefixed with a bullet or their position.
    pub fn to_plain_text(&self) -> String {
        blocks_to_text(&self.content)
    }
}

impl Node {
    pub fn paragraph(content: Vec<Node>) -> Self {
        Self::container("paragraph", content)
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            content: None,
            text: Some(text.into()),
            attrs: None,
            marks: Vec::new(),
        }
    }

    /// A text node whose text is also its link target
    pub fn link(url: impl Into<String>) -> Self {
        let url = url.into();
        let mut node = Self::text(url.clone());
        node.marks.push(Mark {
            kind: "link".to_string(),
            attrs: Some(serde_json::json!({ "href": url })),
        });
        node
    }

    pub fn hard_break() -> Self {
        Self {
            kind: "hardBreak".to_string(),
            content: None,
            text: None,
            attrs: None,
            marks: Vec::new(),
        }
    }

    fn container(kind: &str, content: Vec<Node>) -> Self {
        Self {
            kind: kind.to_string(),
            content: Some(content),
            text: None,
            attrs: None,
            marks: Vec::new(),
        }
    }

    fn children(&self) -> &[Node] {
        self.content.as_deref().unwrap_or(&[])
    }

    fn attr_str(&self, key: &str) -> Option<&str> {
        self.attrs.as_ref()?.get(key)?.as_str()
    }

    fn to_plain_text(&self) -> String {
        match self.kind.as_str() {
            "text" => self.text.clone().unwrap_or_default(),
            "hardBreak" => "\n".to_string(),
            "mention" | "emoji" => self.attr_str("text").unwrap_or_default().to_string(),
            "inlineCard" => self.attr_str("url").unwrap_or_default().to_string(),
            "paragraph" | "heading" | "codeBlock" => {
                self.children().iter().map(Node::to_plain_text).collect()
            }
            "bulletList" => list_to_text(self.children(), |_| "- ".to_string()),
            "orderedList" => list_to_text(self.children(), |i| format!("{}. ", i + 1)),
            _ => blocks_to_text(self.children()),
        }
    }
}

fn blocks_to_text(nodes: &[Node]) -> String {
    nodes
        .iter()
        .map(Node::to_plain_text)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn list_to_text(items: &[Node], prefix: impl Fn(usize) -> String) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}{}", prefix(i), item.to_plain_text()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Convert a plain-text draft into an ADF document
///
/// Runs of non-blank lines become paragraphs, newlines inside a paragraph
/// become hard breaks and bare http(s) URLs become link-marked text.
/// Whitespace-only input produces a document with no content.
pub fn from_plain_text(text: &str) -> Document {
    let normalized = text.replace("\r\n", "\n");

    let mut paragraphs = Vec::new();
    let mut block: Vec<&str> = Vec::new();

    for line in normalized.lines() {
        if line.trim().is_empty() {
            if !block.is_empty() {
                paragraphs.push(Node::paragraph(inline_nodes(&block)));
                block.clear();
            }
        } else {
            block.push(line);
        }
    }
    if !block.is_empty() {
        paragraphs.push(Node::paragraph(inline_nodes(&block)));
    }

    Document::new(paragraphs)
}

fn inline_nodes(lines: &[&str]) -> Vec<Node> {
    let mut nodes = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            nodes.push(Node::hard_break());
        }
        nodes.extend(linkify(line));
    }
    nodes
}

/// Strip trailing punctuation that belongs to the sentence, not the URL
///
/// A closing parenthesis is only stripped when it has no opening partner
/// inside the URL, so "https://en.wikipedia.org/wiki/Rust_(language)" stays whole.
fn trim_url(url: &str) -> &str {
    let mut url = url;
    loop {
        let trimmed = url.trim_end_matches(TRAILING_PUNCTUATION);
        let trimmed = match trimmed.strip_suffix(')') {
            Some(rest) if trimmed.matches('(').count() < trimmed.matches(')').count() => rest,
            _ => trimmed,
        };
        if trimmed.len() == url.len() {
            return url;
        }
        url = trimmed;
    }
}

fn linkify(line: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut cursor = 0;

    for m in URL_PATTERN.find_iter(line) {
        let url = trim_url(m.as_str());
        if m.start() > cursor {
            nodes.push(Node::text(&line[cursor..m.start()]));
        }
        nodes.push(Node::link(url));
        cursor = m.start() + url.len();
    }

    if cursor < line.len() {
        nodes.push(Node::text(&line[cursor..]));
    }
    nodes
}
