/// Converts CRLF and lone CR line endings to LF. Everything else is kept.
pub fn normalize_content(content: &str) -> String {
    content.replace("\r\n", "\n").replace('\r', "\n")
}

/// Joins a possibly multi-line title into one line with single spaces.
pub fn flatten_title(title: &str) -> String {
    title
        .replace('\r', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
