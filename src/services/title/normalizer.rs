use crate::services::title::rules::{
    count::{count_annotation, strip_count_suffixes},
    digits::{is_pure_integer, to_ascii_digits},
    markers::{has_bare_chapter_marker, has_volume_chapter_marker},
    prefix::{bare_number_title, collapse_repeated_prefix, synthesize_prefix},
};

/// A decision taken while normalizing one title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleEvent {
    StaleCountRemoved { annotation: String },
    BareNumber { number: String },
    ExistingMarker { volume: bool },
    PrefixSynthesized { chapter_index: usize },
    DuplicatePrefixCollapsed { number: String, removed: usize },
}

/// Turns raw chapter titles into display titles of the form
/// `第 N 章 - 標題 (1234字)`.
///
/// Stateless: one value can be shared across threads and reused for every
/// chapter of every book.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChapterTitleNormalizer;

impl ChapterTitleNormalizer {
    pub fn normalize(&self, raw_title: &str, chapter_index: usize, content: &str) -> String {
        self.normalize_with(raw_title, chapter_index, content, |_| {})
    }

    /// Same as [`normalize`](Self::normalize), reporting every decision to
    /// `observer`.
    pub fn normalize_with<F>(
        &self,
        raw_title: &str,
        chapter_index: usize,
        content: &str,
        mut observer: F,
    ) -> String
    where
        F: FnMut(&TitleEvent),
    {
        let canonical = to_ascii_digits(raw_title.trim());

        let (bare, stale) = strip_count_suffixes(&canonical);
        for annotation in stale {
            observer(&TitleEvent::StaleCountRemoved { annotation });
        }

        let mut title = if is_pure_integer(&bare) {
            observer(&TitleEvent::BareNumber {
                number: bare.clone(),
            });
            bare_number_title(&bare)
        } else if has_volume_chapter_marker(&bare) {
            observer(&TitleEvent::ExistingMarker { volume: true });
            bare
        } else if has_bare_chapter_marker(&bare) {
            observer(&TitleEvent::ExistingMarker { volume: false });
            bare
        } else {
            observer(&TitleEvent::PrefixSynthesized { chapter_index });
            synthesize_prefix(chapter_index, &bare)
        };

        if let Some(collapsed) = collapse_repeated_prefix(&title) {
            if collapsed.removed > 0 {
                observer(&TitleEvent::DuplicatePrefixCollapsed {
                    number: collapsed.number,
                    removed: collapsed.removed,
                });
            }
            title = collapsed.title;
        }

        format!("{title} {}", count_annotation(content))
    }
}

/// Shorthand for `ChapterTitleNormalizer.normalize(..)`.
pub fn normalize_chapter_title(raw_title: &str, chapter_index: usize, content: &str) -> String {
    ChapterTitleNormalizer.normalize(raw_title, chapter_index, content)
}
