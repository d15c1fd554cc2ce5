// Heading and emphasis extraction from raw HTML.
//
// The page is parsed with html5ever (via `scraper`); scripts are never run.
// Elements are visited in document pre-order, so a recognized element nested
// inside another recognized element is emitted after its ancestor, and its
// text also appears in the ancestor's text.

pub mod normalize;

use scraper::{ElementRef, Html};

use crate::types::{ElementKind, EmphasisKind, ExtractedElement, HeadingLevel};

pub use normalize::normalize_text;

/// Tag names the extractor recognizes, in no particular order.
pub const RECOGNIZED_TAGS: [&str; 9] = ["h1", "h2", "h3", "h4", "strong", "b", "em", "i", "mark"];

/// Pull heading and emphasis elements out of `html`, in document order.
///
/// Elements whose normalized text is empty are dropped. Malformed or
/// unrelated markup is not an error; it just yields fewer elements.
pub fn extract(html: &str) -> Vec<ExtractedElement> {
    let document = Html::parse_document(html);

    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter_map(|element| {
            let kind = classify(element.value().name())?;
            let text = normalize_text(&element.text().collect::<String>());
            if text.is_empty() {
                None
            } else {
                Some(ExtractedElement { kind, text })
            }
        })
        .collect()
}

/// Map a lowercase tag name onto the element kind it mirrors as.
pub fn classify(tag: &str) -> Option<ElementKind> {
    let kind = match tag {
        "h1" => heading(1)?,
        "h2" => heading(2)?,
        "h3" => heading(3)?,
        "h4" => heading(4)?,
        "strong" | "b" => ElementKind::Emphasis { style: EmphasisKind::Bold },
        "em" | "i" => ElementKind::Emphasis { style: EmphasisKind::Italic },
        "mark" => ElementKind::Emphasis { style: EmphasisKind::Underline },
        _ => return None,
    };
    Some(kind)
}

fn heading(level: u8) -> Option<ElementKind> {
    let level = HeadingLevel::new(level).ok()?;
    Some(ElementKind::Heading { level })
}
