use crate::models::{PreparedChapter, RawChapter};
use crate::services::content::{flatten_title, normalize_content};
use crate::services::title::{ChapterTitleNormalizer, TitleEvent};

pub fn prepare_chapters(chapters: &[RawChapter]) -> Vec<PreparedChapter> {
    prepare_chapters_with(chapters, |_, _| {})
}

/// Numbers chapters from 1 and normalizes each one independently. The
/// observer receives the chapter index with every title decision.
pub fn prepare_chapters_with<F>(chapters: &[RawChapter], mut observer: F) -> Vec<PreparedChapter>
where
    F: FnMut(usize, &TitleEvent),
{
    let normalizer = ChapterTitleNormalizer;

    chapters
        .iter()
        .enumerate()
        .map(|(i, chapter)| {
            let index = i + 1;
            let content = normalize_content(&chapter.content);
            let title = normalizer.normalize_with(
                &flatten_title(&chapter.title),
                index,
                &content,
                |event| observer(index, event),
            );

            PreparedChapter {
                index,
                title,
                content,
            }
        })
        .collect()
}

/// Logs title decisions at debug level.
pub fn trace_title_event(book: &str, index: usize, event: &TitleEvent) {
    match event {
        TitleEvent::ExistingMarker { volume } => {
            tracing::debug!(book, index, volume, "existing chapter marker, prefix skipped")
        }
        TitleEvent::BareNumber { number } => {
            tracing::debug!(book, index, number = %number, "bare chapter number rewritten")
        }
        TitleEvent::PrefixSynthesized { chapter_index } => {
            tracing::debug!(book, index, chapter_index, "chapter prefix synthesized")
        }
        TitleEvent::DuplicatePrefixCollapsed { number, removed } => {
            tracing::debug!(book, index, number = %number, removed, "duplicate prefix collapsed")
        }
        TitleEvent::StaleCountRemoved { annotation } => {
            tracing::debug!(book, index, annotation = %annotation, "stale count annotation removed")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(title: &str, content: &str) -> RawChapter {
        RawChapter {
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn prepares_chapters_with_one_based_indexes() {
        let chapters = vec![
            raw("楔子", "天地\r\n玄黃"),
            raw("2", "宇宙"),
            raw("第三回\n風起", "洪荒 (舊)"),
        ];

        let prepared = prepare_chapters(&chapters);

        assert_eq!(prepared.len(), 3);
        assert_eq!(prepared[0].index, 1);
        assert_eq!(prepared[0].title, "第 1 章 - 楔子 (5字)");
        assert_eq!(prepared[0].content, "天地\n玄黃");
        assert_eq!(prepared[1].title, "第 2 章 (2字)");
        assert_eq!(prepared[2].title, "第三回 風起 (6字)");
    }

    #[test]
    fn observer_receives_chapter_index() {
        let chapters = vec![raw("a", "x"), raw("第2章", "y")];
        let mut seen = Vec::new();

        prepare_chapters_with(&chapters, |index, event| seen.push((index, event.clone())));

        assert_eq!(
            seen,
            vec![
                (1, TitleEvent::PrefixSynthesized { chapter_index: 1 }),
                (2, TitleEvent::ExistingMarker { volume: false }),
            ]
        );
    }
}
