use std::sync::OnceLock;

use regex::Regex;

use super::digits::canonical_number;

fn leading_prefix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^第\s*([0-9]+)\s*章\s*-\s*").expect("prefix regex"))
}

fn chapter_only_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^第\s*([0-9]+)\s*章$").expect("chapter-only regex"))
}

/// `第 <N> 章` for a title that was only a number.
pub fn bare_number_title(digits: &str) -> String {
    format!("第 {} 章", canonical_number(digits))
}

/// `第 <index> 章 - <title>`, or just `第 <index> 章` when the title is empty.
pub fn synthesize_prefix(chapter_index: usize, title: &str) -> String {
    if title.is_empty() {
        format!("第 {chapter_index} 章")
    } else {
        format!("第 {chapter_index} 章 - {title}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollapsedPrefix {
    pub title: String,
    pub number: String,
    pub removed: usize,
}

/// Collapses repeated `第 N 章 - ` segments at the start of a title.
///
/// Returns `None` when the title has no leading prefix, or has one that is
/// neither repeated nor dangling (a prefix with nothing after it).
pub fn collapse_repeated_prefix(title: &str) -> Option<CollapsedPrefix> {
    let prefix = leading_prefix_regex();
    let first = prefix.captures(title)?;
    let number = canonical_number(&first[1]).to_string();

    let mut rest = &title[first[0].len()..];
    let mut removed = 0;

    loop {
        if let Some(next) = prefix.captures(rest) {
            if canonical_number(&next[1]) == number {
                rest = &rest[next[0].len()..];
                removed += 1;
                continue;
            }
        }
        if let Some(tail) = chapter_only_regex().captures(rest.trim_end()) {
            if canonical_number(&tail[1]) == number {
                rest = "";
                removed += 1;
            }
        }
        break;
    }

    if removed == 0 && !rest.is_empty() {
        return None;
    }

    let title = if rest.is_empty() {
        format!("第 {number} 章")
    } else {
        format!("第 {number} 章 - {rest}")
    };

    Some(CollapsedPrefix {
        title,
        number,
        removed,
    })
}
