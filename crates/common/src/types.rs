// Core domain types shared across all Note Maker crates.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A document known to the remote document directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DocumentHandle {
    pub id: String,
    pub title: String,
}

impl DocumentHandle {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self { id: id.into(), title: title.into() }
    }
}

impl fmt::Display for DocumentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" ({})", self.title, self.id)
    }
}

/// One page request against the document directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentQuery {
    pub title_exact: String,
    pub exclude_trashed: bool,
    pub page_token: Option<String>,
    pub page_size: u32,
}

impl DocumentQuery {
    /// First-page query for an exact, non-trashed title match.
    pub fn for_title(title: &str, page_size: u32) -> Self {
        Self {
            title_exact: title.to_string(),
            exclude_trashed: true,
            page_token: None,
            page_size,
        }
    }

    /// Same filter, continued at `token`.
    pub fn next_page(&self, token: String) -> Self {
        Self { page_token: Some(token), ..self.clone() }
    }
}

/// One page of directory results.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListPage {
    #[serde(default)]
    pub files: Vec<DocumentHandle>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("heading level {0} is outside 1..=4")]
pub struct InvalidHeadingLevel(pub u8);

/// Heading level, restricted to the four levels the notes document supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 4;

    pub fn new(level: u8) -> Result<Self, InvalidHeadingLevel> {
        if (Self::MIN..=Self::MAX).contains(&level) {
            Ok(Self(level))
        } else {
            Err(InvalidHeadingLevel(level))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for HeadingLevel {
    type Error = InvalidHeadingLevel;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<HeadingLevel> for u8 {
    fn from(level: HeadingLevel) -> Self {
        level.0
    }
}

/// Inline emphasis mirrored as a character style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmphasisKind {
    Bold,
    Italic,
    Underline,
}

impl EmphasisKind {
    pub const ALL: [EmphasisKind; 3] = [Self::Bold, Self::Italic, Self::Underline];

    /// Text-style field the remote editor toggles for this emphasis.
    pub const fn style_field(self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Underline => "underline",
        }
    }
}

/// Classification of a scraped element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElementKind {
    Heading { level: HeadingLevel },
    Emphasis { style: EmphasisKind },
}

/// A heading or emphasis element pulled out of a web page.
///
/// `text` is always non-empty and whitespace-normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedElement {
    #[serde(flatten)]
    pub kind: ElementKind,
    pub text: String,
}

impl ExtractedElement {
    pub fn heading(level: HeadingLevel, text: impl Into<String>) -> Self {
        Self { kind: ElementKind::Heading { level }, text: text.into() }
    }

    pub fn emphasis(style: EmphasisKind, text: impl Into<String>) -> Self {
        Self { kind: ElementKind::Emphasis { style }, text: text.into() }
    }
}

/// Named paragraph style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ParagraphStyle {
    Normal,
    Heading(HeadingLevel),
}

impl ParagraphStyle {
    pub fn name(self) -> String {
        match self {
            Self::Normal => "NORMAL_TEXT".to_string(),
            Self::Heading(level) => format!("HEADING_{}", level.get()),
        }
    }
}

impl fmt::Display for ParagraphStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown paragraph style `{0}`")]
pub struct UnknownParagraphStyle(pub String);

impl TryFrom<String> for ParagraphStyle {
    type Error = UnknownParagraphStyle;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == "NORMAL_TEXT" {
            return Ok(Self::Normal);
        }
        value
            .strip_prefix("HEADING_")
            .and_then(|level| level.parse::<u8>().ok())
            .and_then(|level| HeadingLevel::new(level).ok())
            .map(Self::Heading)
            .ok_or(UnknownParagraphStyle(value))
    }
}

impl From<ParagraphStyle> for String {
    fn from(style: ParagraphStyle) -> Self {
        style.name()
    }
}

/// A single position-based edit against a document body.
///
/// Indices are 1-based offsets in UTF-16 code units; ranges are half-open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditOperation {
    InsertText { text: String, index: u32 },
    SetParagraphStyle { style: ParagraphStyle, start: u32, end: u32 },
    SetCharacterStyle { style: EmphasisKind, start: u32, end: u32 },
}
