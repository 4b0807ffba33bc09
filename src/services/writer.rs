use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::services::markdown::escape_yaml_string;

/// Values written into a novel's `config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NovelConfig {
    pub title: String,
    pub author: String,
    pub description: String,
}

impl Default for NovelConfig {
    fn default() -> Self {
        Self {
            title: "title".to_string(),
            author: "author".to_string(),
            description: "description.".to_string(),
        }
    }
}

/// Writes `<base>/<novel_key>/chapters/<index:04>.md` and returns its path.
pub fn write_chapter(
    base_dir: &Path,
    novel_key: &str,
    index: usize,
    markdown: &str,
) -> Result<PathBuf> {
    let output_dir = base_dir.join(novel_key).join("chapters");
    fs::create_dir_all(&output_dir).with_context(|| {
        format!("failed to create output directory {}", output_dir.display())
    })?;

    let file_path = output_dir.join(format!("{index:04}.md"));
    fs::write(&file_path, markdown)
        .with_context(|| format!("failed to write {}", file_path.display()))?;

    Ok(file_path)
}

/// Writes `<base>/<novel_key>/config.yaml` unless it already exists.
pub fn write_config_yaml(base_dir: &Path, novel_key: &str, config: &NovelConfig) -> Result<PathBuf> {
    let novel_dir = base_dir.join(novel_key);
    fs::create_dir_all(&novel_dir)
        .with_context(|| format!("failed to create {}", novel_dir.display()))?;

    let config_path = novel_dir.join("config.yaml");
    if config_path.exists() {
        tracing::debug!(path = %config_path.display(), "config.yaml already present");
        return Ok(config_path);
    }

    let yaml = format!(
        "title: \"{}\"\nauthor: \"{}\"\ndescription: \"{}\"\n",
        escape_yaml_string(&config.title),
        escape_yaml_string(&config.author),
        escape_yaml_string(&config.description),
    );
    fs::write(&config_path, yaml)
        .with_context(|| format!("failed to write {}", config_path.display()))?;

    Ok(config_path)
}
