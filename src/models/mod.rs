use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawChapter {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookMetadata {
    pub author: String,
    pub tags: String,
    pub status: String,
    pub description: String,
}

impl Default for BookMetadata {
    fn default() -> Self {
        Self {
            author: "未知".to_string(),
            tags: String::new(),
            status: "連載中".to_string(),
            description: "暫無簡介".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookSource {
    pub metadata: BookMetadata,
    pub chapters: Vec<RawChapter>,
}

/// A chapter ready to be written or stored: 1-based index, display title,
/// newline-normalized content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreparedChapter {
    pub index: usize,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterSummary {
    pub chapter_num: i64,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterContent {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMetadata {
    #[serde(flatten)]
    pub metadata: BookMetadata,
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub book_name: String,
    pub chapter_count: usize,
    pub inserted: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertReport {
    pub novel_key: String,
    pub config_path: PathBuf,
    pub chapter_paths: Vec<PathBuf>,
}
