use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::models::ImportSummary;
use crate::services::library::Database;
use crate::services::loader::parse_book;
use crate::services::pipeline::{prepare_chapters_with, trace_title_event};

/// Imports every `*.json` file in `inputs_dir` as a book named after the file
/// stem. Files that fail to load are skipped with a warning.
pub async fn run_import(db: &Database, inputs_dir: &Path) -> Result<Vec<ImportSummary>> {
    let files = json_files(inputs_dir).await?;
    let mut summaries = Vec::with_capacity(files.len());

    for path in files {
        let Some(book_name) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
            continue;
        };

        match import_book(db, &book_name, &path).await {
            Ok(summary) => {
                tracing::info!(
                    "成功匯入書籍：{}，共 {} 章。",
                    summary.book_name,
                    summary.chapter_count
                );
                summaries.push(summary);
            }
            Err(err) => {
                tracing::warn!("skipping {}: {:#}", path.display(), err);
            }
        }
    }

    Ok(summaries)
}

async fn import_book(db: &Database, book_name: &str, path: &Path) -> Result<ImportSummary> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let book = parse_book(&text)?;

    let book_id = db.ensure_book(book_name).await?;
    db.upsert_metadata(book_id, &book.metadata).await?;

    let chapters = prepare_chapters_with(&book.chapters, |index, event| {
        trace_title_event(book_name, index, event)
    });
    let inserted = db.insert_chapters(book_id, &chapters).await?;

    Ok(ImportSummary {
        book_name: book_name.to_string(),
        chapter_count: chapters.len(),
        inserted,
    })
}

async fn json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("failed to read inputs directory {}", dir.display()))?;

    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "json") && path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
