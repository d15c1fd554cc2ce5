// Edit-batch compilation: extracted elements → index-stable edit operations.
//
// Every operation targets the start of the body (index 1). Operation groups
// are built in source order and the flat sequence is then reversed, so the
// last element is inserted first and each later insertion pushes earlier
// text down. The finished document reads in source order and no index ever
// has to be recomputed.

use crate::types::{EditOperation, ElementKind, ExtractedElement, ParagraphStyle};

/// Index of the first character of the document body.
pub const BODY_START: u32 = 1;

/// Compile extracted elements into one atomic batch.
pub fn compile(elements: &[ExtractedElement]) -> Vec<EditOperation> {
    let mut operations: Vec<EditOperation> = elements.iter().flat_map(element_group).collect();
    operations.reverse();
    operations
}

/// Operations for a single element, in source (pre-reversal) order.
pub fn element_group(element: &ExtractedElement) -> Vec<EditOperation> {
    let insert =
        EditOperation::InsertText { text: format!("{}\n", element.text), index: BODY_START };

    match element.kind {
        ElementKind::Heading { level } => vec![
            EditOperation::SetParagraphStyle {
                style: ParagraphStyle::Heading(level),
                start: BODY_START,
                end: BODY_START,
            },
            insert,
        ],
        ElementKind::Emphasis { style } => vec![
            EditOperation::SetCharacterStyle {
                style,
                start: BODY_START,
                end: BODY_START + utf16_len(&element.text),
            },
            EditOperation::SetParagraphStyle {
                style: ParagraphStyle::Normal,
                start: BODY_START,
                end: BODY_START,
            },
            insert,
        ],
    }
}

/// Length in UTF-16 code units, the unit document offsets are counted in.
pub fn utf16_len(text: &str) -> u32 {
    u32::try_from(text.encode_utf16().count()).unwrap_or(u32::MAX - BODY_START)
}
