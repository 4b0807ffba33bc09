use std::sync::OnceLock;

use regex::Regex;

fn trailing_count_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"\s*(?:[(\[（【]\s*(?:字數\s*[:：]\s*[0-9][0-9,]*\s*字?|[0-9][0-9,]*\s*字)\s*[)\]）】]|字數\s*[:：]\s*[0-9][0-9,]*\s*字?)$",
        )
        .expect("count annotation regex")
    })
}

/// Number of characters (not bytes) in the trimmed content.
pub fn char_count(content: &str) -> usize {
    content.trim().chars().count()
}

/// Canonical annotation for `content`, e.g. `(1234字)`.
pub fn count_annotation(content: &str) -> String {
    format!("({}字)", char_count(content))
}

pub fn has_existing_count_suffix(s: &str) -> bool {
    trailing_count_regex().is_match(s)
}

/// Removes every trailing count annotation, returning the bare title and the
/// annotations that were dropped (outermost last).
pub fn strip_count_suffixes(s: &str) -> (String, Vec<String>) {
    let re = trailing_count_regex();
    let mut title = s.trim_end();
    let mut removed = Vec::new();

    while let Some(found) = re.find(title) {
        removed.push(found.as_str().trim().to_string());
        title = title[..found.start()].trim_end();
    }

    (title.to_string(), removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_characters_not_bytes() {
        assert_eq!(char_count("  天地玄黃  "), 4);
        assert_eq!(char_count("abc"), 3);
        assert_eq!(char_count("\n\n"), 0);
        assert_eq!(count_annotation("宇宙洪荒"), "(4字)");
    }

    #[test]
    fn recognizes_all_bracket_styles() {
        for title in [
            "黎明 (10字)",
            "黎明 [10字]",
            "黎明（10字）",
            "黎明【10字】",
            "黎明(字數:1,024字)",
            "黎明【字數：88】",
            "黎明 字數：88",
        ] {
            assert!(has_existing_count_suffix(title), "{title}");
        }
        assert!(!has_existing_count_suffix("黎明"));
        assert!(!has_existing_count_suffix("黎明 (上)"));
        assert!(!has_existing_count_suffix("(10字) 黎明"));
    }

    #[test]
    fn strips_stacked_annotations() {
        let (title, removed) = strip_count_suffixes("黎明 (10字) 【12字】  ");
        assert_eq!(title, "黎明");
        assert_eq!(removed, vec!["【12字】".to_string(), "(10字)".to_string()]);
    }

    #[test]
    fn leaves_non_trailing_annotations() {
        let (title, removed) = strip_count_suffixes("(10字) 黎明");
        assert_eq!(title, "(10字) 黎明");
        assert!(removed.is_empty());
    }
}
