use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::{BookMetadata, BookSource, RawChapter};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON format: {0}")]
    Json(#[from] serde_json::Error),
    #[error("JSON root must be a list of chapter objects")]
    NotAList,
    #[error("entry #{index} must be an object")]
    NotAnObject { index: usize },
    #[error("entry #{index} is missing `{field}`")]
    MissingField { index: usize, field: &'static str },
    #[error("entry #{index}: `{field}` must be a string")]
    NotAString { index: usize, field: &'static str },
}

/// Tags arrive either as one string or as a list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Tags {
    Text(String),
    List(Vec<String>),
}

impl Tags {
    fn joined(self) -> String {
        match self {
            Tags::Text(text) => text,
            Tags::List(list) => list.join(","),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MetadataEntry {
    author: Option<String>,
    tags: Option<Tags>,
    sort: Option<Tags>,
    status: Option<String>,
    description: Option<String>,
    #[serde(rename = "簡介")]
    summary: Option<String>,
}

impl MetadataEntry {
    fn apply_to(self, metadata: &mut BookMetadata) {
        if let Some(author) = self.author {
            metadata.author = author;
        }
        if let Some(tags) = self.tags.or(self.sort) {
            metadata.tags = tags.joined();
        }
        if let Some(status) = self.status {
            metadata.status = status;
        }
        if let Some(description) = self.description.or(self.summary) {
            metadata.description = description;
        }
    }
}

pub fn load_book(path: impl AsRef<Path>) -> Result<BookSource, LoadError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_book(&text)
}

/// Parses a JSON array of `{"title", "content"}` records, optionally mixed
/// with `{"metadata": {...}}` entries.
pub fn parse_book(json: &str) -> Result<BookSource, LoadError> {
    let root: Value = serde_json::from_str(json.trim_start_matches('\u{feff}'))?;
    let Value::Array(entries) = root else {
        return Err(LoadError::NotAList);
    };

    let mut book = BookSource::default();

    for (i, entry) in entries.into_iter().enumerate() {
        let index = i + 1;
        let Value::Object(mut object) = entry else {
            return Err(LoadError::NotAnObject { index });
        };

        if let Some(metadata) = object.remove("metadata") {
            let entry: MetadataEntry = serde_json::from_value(metadata)?;
            entry.apply_to(&mut book.metadata);
            continue;
        }

        book.chapters.push(RawChapter {
            title: take_string(&mut object, index, "title")?,
            content: take_string(&mut object, index, "content")?,
        });
    }

    Ok(book)
}

fn take_string(
    object: &mut Map<String, Value>,
    index: usize,
    field: &'static str,
) -> Result<String, LoadError> {
    match object.remove(field) {
        Some(Value::String(value)) => Ok(value),
        Some(_) => Err(LoadError::NotAString { index, field }),
        None => Err(LoadError::MissingField { index, field }),
    }
}
