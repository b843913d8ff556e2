use unicode_width::UnicodeWidthStr;

/// Terminal display width of `text`; wide characters count as two.
pub fn text_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Widest entry of `texts`, zero when empty.
pub fn max_width<'a>(texts: impl IntoIterator<Item = &'a str>) -> usize {
    texts.into_iter().map(text_width).max().unwrap_or(0)
}

/// Appends `text` to `out` followed by spaces up to `width` columns.
pub fn push_padded(out: &mut String, text: &str, width: usize) {
    out.push_str(text);
    let used = text_width(text);
    for _ in used..width {
        out.push(' ');
    }
}
