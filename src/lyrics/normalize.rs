use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref SECTION_MARKER: Regex = Regex::new(r"\[.*?\]").unwrap();
    static ref SENTENCE_BREAK: Regex = Regex::new(r#"\.[^\s'"]"#).unwrap();
    // combining marks left by NFKD are not word characters here
    static ref NON_WORD: Regex = Regex::new(r"[^\p{L}\p{N}_]+\s*").unwrap();
}

/// Turns provider lyrics into a single lower-case line of word tokens.
///
/// Leading banners are cut at the first `[Section]` marker, or, when the
/// text has none, at the last `.` that runs straight into the next word.
/// Markers, newlines, apostrophes and punctuation are then flattened so
/// `"[Verse 1]\nI don't know"` becomes `"i dont know"`.
pub fn normalize_lyrics(raw: &str) -> String {
    let text: String = raw.nfkd().collect();

    let start = match SECTION_MARKER.find(&text) {
        Some(m) => m.start(),
        // one break or many, the cut is at the last one
        None => SENTENCE_BREAK.find_iter(&text).last().map_or(0, |m| m.start()),
    };
    let text = &text[start..];

    let text = SECTION_MARKER.replace_all(text, " ");
    let text = text.replace('\n', " ");
    let text = text.replace(['\'', '\u{2019}'], "");
    let text = NON_WORD.replace_all(&text, " ");

    text.to_lowercase().trim().to_string()
}
