// In-memory document body with remote-editor index semantics.
//
// The body starts as a single terminating newline at index 1. Offsets are
// 1-based UTF-16 code units. Insertions are allowed anywhere before the
// terminating newline; style ranges are half-open and must lie inside the
// body. Paragraph styles live on each paragraph's terminating newline.

use serde::Serialize;
use thiserror::Error;

use crate::types::{EditOperation, EmphasisKind, ParagraphStyle};

const NEWLINE: u16 = b'\n' as u16;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("insertion index {index} must be in 1..{end_index}")]
    InsertOutOfBounds { index: u32, end_index: u32 },

    #[error("invalid range [{start}, {end}) for body ending at {end_index}")]
    InvalidRange { start: u32, end: u32, end_index: u32 },

    #[error("insert text must not be empty")]
    EmptyInsert,
}

/// A failed batch: which operation broke and why. Nothing was applied.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("operation {position}: {error}")]
pub struct BatchError {
    pub position: usize,
    #[source]
    pub error: EditError,
}

/// Character style flags for a single code unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TextStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl TextStyle {
    fn set(&mut self, kind: EmphasisKind) {
        match kind {
            EmphasisKind::Bold => self.bold = true,
            EmphasisKind::Italic => self.italic = true,
            EmphasisKind::Underline => self.underline = true,
        }
    }

    pub fn is_plain(self) -> bool {
        self == Self::default()
    }
}

#[derive(Debug, Clone)]
struct Unit {
    code: u16,
    style: TextStyle,
    /// Set only on newline units.
    paragraph: Option<ParagraphStyle>,
}

/// A run of identically styled text within a paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyledRun {
    pub style: TextStyle,
    pub text: String,
}

/// A rendered paragraph, without its terminating newline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedParagraph {
    pub style: ParagraphStyle,
    pub text: String,
    pub runs: Vec<StyledRun>,
}

#[derive(Debug, Clone)]
pub struct BodyModel {
    units: Vec<Unit>,
}

impl Default for BodyModel {
    fn default() -> Self {
        Self::new()
    }
}

impl BodyModel {
    /// An empty document body.
    pub fn new() -> Self {
        Self {
            units: vec![Unit {
                code: NEWLINE,
                style: TextStyle::default(),
                paragraph: Some(ParagraphStyle::Normal),
            }],
        }
    }

    /// Exclusive end index of the body (one past the terminating newline).
    pub fn end_index(&self) -> u32 {
        self.units.len() as u32 + 1
    }

    /// Apply a batch atomically: either every operation lands or none does.
    pub fn apply_batch(&mut self, operations: &[EditOperation]) -> Result<(), BatchError> {
        let mut staged = self.clone();
        for (position, operation) in operations.iter().enumerate() {
            staged.apply(operation).map_err(|error| BatchError { position, error })?;
        }
        *self = staged;
        Ok(())
    }

    pub fn apply(&mut self, operation: &EditOperation) -> Result<(), EditError> {
        match operation {
            EditOperation::InsertText { text, index } => self.insert_text(text, *index),
            EditOperation::SetParagraphStyle { style, start, end } => {
                self.set_paragraph_style(*style, *start, *end)
            }
            EditOperation::SetCharacterStyle { style, start, end } => {
                self.set_character_style(*style, *start, *end)
            }
        }
    }

    fn insert_text(&mut self, text: &str, index: u32) -> Result<(), EditError> {
        if text.is_empty() {
            return Err(EditError::EmptyInsert);
        }
        let end_index = self.end_index();
        if index < 1 || index >= end_index {
            return Err(EditError::InsertOutOfBounds { index, end_index });
        }

        let at = (index - 1) as usize;
        // New paragraph breaks inherit the style of the paragraph they split.
        let inherited = self.terminator_at_or_after(at).and_then(|t| self.units[t].paragraph);
        let inserted = text.encode_utf16().map(|code| Unit {
            code,
            style: TextStyle::default(),
            paragraph: if code == NEWLINE { inherited } else { None },
        });
        self.units.splice(at..at, inserted);
        Ok(())
    }

    fn set_paragraph_style(
        &mut self,
        style: ParagraphStyle,
        start: u32,
        end: u32,
    ) -> Result<(), EditError> {
        let (first, last) = self.check_range(start, end)?;
        // An empty range still selects the paragraph containing `start`.
        let last = last.max(first + 1);
        let from = self.terminator_at_or_after(first);
        let to = self.terminator_at_or_after(last - 1);
        if let (Some(from), Some(to)) = (from, to) {
            for unit in &mut self.units[from..=to] {
                if unit.code == NEWLINE {
                    unit.paragraph = Some(style);
                }
            }
        }
        Ok(())
    }

    fn set_character_style(
        &mut self,
        style: EmphasisKind,
        start: u32,
        end: u32,
    ) -> Result<(), EditError> {
        let (first, last) = self.check_range(start, end)?;
        for unit in &mut self.units[first..last] {
            unit.style.set(style);
        }
        Ok(())
    }

    fn check_range(&self, start: u32, end: u32) -> Result<(usize, usize), EditError> {
        let end_index = self.end_index();
        if start < 1 || start > end || end > end_index || start >= end_index {
            return Err(EditError::InvalidRange { start, end, end_index });
        }
        Ok(((start - 1) as usize, (end - 1) as usize))
    }

    fn terminator_at_or_after(&self, position: usize) -> Option<usize> {
        self.units[position..].iter().position(|unit| unit.code == NEWLINE).map(|i| position + i)
    }

    /// Full body text, including the terminating newline.
    pub fn text(&self) -> String {
        let codes: Vec<u16> = self.units.iter().map(|unit| unit.code).collect();
        String::from_utf16_lossy(&codes)
    }

    /// Body text without the terminating newline.
    pub fn body_text(&self) -> String {
        let mut text = self.text();
        text.pop();
        text
    }

    /// Paragraphs in order, excluding the trailing empty paragraph.
    pub fn paragraphs(&self) -> Vec<RenderedParagraph> {
        let mut paragraphs = Vec::new();
        let mut start = 0;
        for (position, unit) in self.units.iter().enumerate() {
            if unit.code != NEWLINE {
                continue;
            }
            let body = &self.units[start..position];
            paragraphs.push(RenderedParagraph {
                style: unit.paragraph.unwrap_or(ParagraphStyle::Normal),
                text: decode(body),
                runs: runs(body),
            });
            start = position + 1;
        }
        if paragraphs.last().is_some_and(|last| last.text.is_empty()) {
            paragraphs.pop();
        }
        paragraphs
    }
}

fn decode(units: &[Unit]) -> String {
    let codes: Vec<u16> = units.iter().map(|unit| unit.code).collect();
    String::from_utf16_lossy(&codes)
}

fn runs(units: &[Unit]) -> Vec<StyledRun> {
    let mut runs: Vec<StyledRun> = Vec::new();
    let mut start = 0;
    for index in 1..=units.len() {
        if index == units.len() || units[index].style != units[start].style {
            runs.push(StyledRun { style: units[start].style, text: decode(&units[start..index]) });
            start = index;
        }
    }
    runs
}
