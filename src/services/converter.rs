use std::path::Path;

use anyhow::Result;

use crate::models::ConvertReport;
use crate::services::loader::load_book;
use crate::services::markdown::build_markdown;
use crate::services::pipeline::{prepare_chapters_with, trace_title_event};
use crate::services::writer::{NovelConfig, write_chapter, write_config_yaml};

/// Random 32-character alphanumeric key for a novel's output directory.
pub fn generate_novel_key() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Converts one JSON book into `<output_dir>/<novel_key>/{config.yaml,chapters/*.md}`.
pub fn run_converter(input: &Path, output_dir: &Path, novel_key: &str) -> Result<ConvertReport> {
    let book = load_book(input)?;

    let book_name = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| novel_key.to_string());

    let config_path = write_config_yaml(
        output_dir,
        novel_key,
        &NovelConfig {
            title: book_name.clone(),
            author: book.metadata.author.clone(),
            description: book.metadata.description.clone(),
        },
    )?;

    let chapters = prepare_chapters_with(&book.chapters, |index, event| {
        trace_title_event(&book_name, index, event)
    });

    let mut chapter_paths = Vec::with_capacity(chapters.len());
    for chapter in &chapters {
        let markdown = build_markdown(&chapter.title, chapter.index, &chapter.content);
        let path = write_chapter(output_dir, novel_key, chapter.index, &markdown)?;
        tracing::info!("[OK] Chapter {} -> {}", chapter.index, path.display());
        chapter_paths.push(path);
    }

    Ok(ConvertReport {
        novel_key: novel_key.to_string(),
        config_path,
        chapter_paths,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn novel_keys_are_32_alphanumeric_chars() {
        let key = generate_novel_key();
        assert_eq!(key.len(), 32);
        assert!(key.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(key, generate_novel_key());
    }

    #[test]
    fn converts_a_book_to_markdown_files() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("山海經.json");
        fs::write(
            &input,
            r#"[
                {"metadata": {"author": "佚名"}},
                {"title": "南山經", "content": "南山經之首曰鵲山。\r\n"},
                {"title": "2", "content": "又東三百里"}
            ]"#,
        )
        .unwrap();
        let output = dir.path().join("content");

        let report = run_converter(&input, &output, "shanhai").unwrap();

        assert_eq!(report.chapter_paths.len(), 2);
        let config = fs::read_to_string(&report.config_path).unwrap();
        assert!(config.contains("title: \"山海經\""));
        assert!(config.contains("author: \"佚名\""));

        let first = fs::read_to_string(output.join("shanhai/chapters/0001.md")).unwrap();
        assert!(first.starts_with("---\ntitle: \"第 1 章 - 南山經 (9字)\"\nchapter: 1\n"));
        assert!(first.ends_with("南山經之首曰鵲山。\n"));

        let second = fs::read_to_string(output.join("shanhai/chapters/0002.md")).unwrap();
        assert!(second.contains("title: \"第 2 章 (5字)\""));
    }

    #[test]
    fn invalid_input_writes_no_chapters() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("broken.json");
        fs::write(&input, r#"{"title": "x"}"#).unwrap();

        let err = run_converter(&input, dir.path(), "key").unwrap_err();
        assert!(err.to_string().contains("list of chapter objects"));
        assert!(!dir.path().join("key").exists());
    }
}
