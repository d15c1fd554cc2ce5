// Text normalization for scraped element content.
//
// Trim both ends, collapse every interior whitespace run (spaces, tabs,
// newlines, NBSP) to one ASCII space.

/// Normalize element text for insertion into the notes document.
///
/// Returns an empty string when `input` is all whitespace. Idempotent:
/// `normalize_text(&normalize_text(s)) == normalize_text(s)`.
pub fn normalize_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for word in input.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}
