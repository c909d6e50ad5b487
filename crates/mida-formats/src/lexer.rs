//! Tokenization helpers shared by the notation parser.

const WHITESPACE: &[char] = &[' ', '\t', '\r', '\n'];

/// Strip spaces, tabs and line endings from both ends.
pub fn trim(s: &str) -> &str {
    s.trim_matches(WHITESPACE)
}

/// Split on `delim` and trim each piece. Empty pieces are kept.
pub fn split_trimmed(s: &str, delim: char) -> impl Iterator<Item = &str> {
    s.split(delim).map(trim)
}

/// Body of a line wrapped in `open … close`, if it is.
///
/// The line must be at least two characters so the delimiters are distinct.
pub fn strip_delimiters(line: &str, open: char, close: char) -> Option<&str> {
    if line.len() < 2 {
        return None;
    }
    line.strip_prefix(open)?.strip_suffix(close)
}
