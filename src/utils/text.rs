use std::borrow::Cow;
use std::string::FromUtf8Error;

/// Appended to book text whenever it was cut to fit a budget.
pub const TRUNCATION_MARKER: &str = "\n\n[Content truncated due to length]";

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// First `max_chars` characters of `text`, never splitting a code point.
pub fn char_prefix(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Cut `text` to `max_chars` characters and append the marker, or borrow it
/// unchanged when it already fits.
pub fn truncate_to_budget(text: &str, max_chars: usize) -> Cow<'_, str> {
    let prefix = char_prefix(text, max_chars);
    if prefix.len() == text.len() {
        Cow::Borrowed(text)
    } else {
        let mut truncated = String::with_capacity(prefix.len() + TRUNCATION_MARKER.len());
        truncated.push_str(prefix);
        truncated.push_str(TRUNCATION_MARKER);
        Cow::Owned(truncated)
    }
}

/// Book text for a single model call. The global budget cut carries the
/// marker; the per-call window is a plain prefix of that result.
pub fn window(text: &str, budget_chars: usize, window_chars: usize) -> Cow<'_, str> {
    match truncate_to_budget(text, budget_chars) {
        Cow::Borrowed(fits) => Cow::Borrowed(char_prefix(fits, window_chars)),
        Cow::Owned(mut truncated) => {
            let end = char_prefix(&truncated, window_chars).len();
            truncated.truncate(end);
            Cow::Owned(truncated)
        }
    }
}

/// Decode an uploaded plain-text book, dropping a leading UTF-8 BOM.
pub fn decode_upload(bytes: Vec<u8>) -> Result<String, FromUtf8Error> {
    if bytes.starts_with(&UTF8_BOM) {
        String::from_utf8(bytes[UTF8_BOM.len()..].to_vec())
    } else {
        String::from_utf8(bytes)
    }
}
