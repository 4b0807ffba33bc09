use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use html_escape::{encode_double_quoted_attribute, encode_text};
use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteChapter {
    pub id: String,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Novel {
    pub slug: String,
    pub title: String,
    pub author: String,
    pub description: String,
    pub chapters: Vec<SiteChapter>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteReport {
    pub novels: usize,
    pub pages: usize,
}

fn front_matter_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)^---[ \t]*\r?\n(.*?)\r?\n---[ \t]*\r?\n").expect("front matter regex")
    })
}

/// Splits `key: value` lines. Quoted values are unquoted and unescaped.
fn parse_key_values(block: &str) -> HashMap<String, String> {
    block
        .lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_string(), unquote(value.trim())))
        .collect()
}

fn unquote(value: &str) -> String {
    let Some(inner) = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
    else {
        return value.trim_matches('"').to_string();
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(match escaped {
                    'n' => '\n',
                    'r' => '\r',
                    other => other,
                });
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// Returns the front matter fields and the body that follows them.
pub fn parse_front_matter(text: &str) -> (HashMap<String, String>, &str) {
    match front_matter_regex().captures(text) {
        Some(caps) => {
            let end = caps.get(0).map_or(0, |m| m.end());
            let meta = caps.get(1).map_or_else(HashMap::new, |m| parse_key_values(m.as_str()));
            (meta, text[end..].trim_start_matches(['\r', '\n']))
        }
        None => (HashMap::new(), text),
    }
}

fn is_unpublished(meta: &HashMap<String, String>) -> bool {
    meta.get("published")
        .map(|v| matches!(v.to_lowercase().as_str(), "false" | "0" | "no"))
        .unwrap_or(false)
}

pub fn load_chapters(chapter_dir: &Path) -> Result<Vec<SiteChapter>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(chapter_dir)
        .with_context(|| format!("failed to read {}", chapter_dir.display()))?
    {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "md") {
            files.push(path);
        }
    }
    files.sort();

    let mut chapters = Vec::with_capacity(files.len());
    let mut used_ids = HashSet::new();
    for path in files {
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let (meta, body) = parse_front_matter(&raw);

        if is_unpublished(&meta) {
            continue;
        }

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        // The id becomes a file name, so front matter may only supply a number.
        let declared = meta
            .get("chapter")
            .filter(|id| !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()))
            .filter(|id| !used_ids.contains(id.as_str()));
        let id = match declared {
            Some(id) => id.clone(),
            None if !stem.is_empty() && !used_ids.contains(&stem) => stem,
            None => {
                tracing::warn!(path = %path.display(), "duplicate chapter id, skipping");
                continue;
            }
        };
        used_ids.insert(id.clone());
        let title = meta
            .get("title")
            .cloned()
            .unwrap_or_else(|| format!("Chapter {id}"));

        chapters.push(SiteChapter {
            id,
            title,
            body: body.to_string(),
        });
    }

    chapters.sort_by_key(|c| (c.id.parse::<u64>().unwrap_or(u64::MAX), c.id.clone()));
    Ok(chapters)
}

/// Every directory under `content_dir` holding both `config.yaml` and
/// `chapters/` is a novel. Novels without published chapters are left out.
pub fn load_novels(content_dir: &Path) -> Result<Vec<Novel>> {
    let mut novels = Vec::new();

    for entry in fs::read_dir(content_dir)
        .with_context(|| format!("failed to read {}", content_dir.display()))?
    {
        let novel_dir = entry?.path();
        if !novel_dir.is_dir() {
            continue;
        }

        let config_path = novel_dir.join("config.yaml");
        let chapters_dir = novel_dir.join("chapters");
        if !config_path.exists() || !chapters_dir.exists() {
            continue;
        }

        let slug = novel_dir
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let config = fs::read_to_string(&config_path)
            .map(|raw| parse_key_values(&raw))
            .with_context(|| format!("failed to read {}", config_path.display()))?;

        let chapters = load_chapters(&chapters_dir)?;
        if chapters.is_empty() {
            tracing::debug!(slug = %slug, "novel has no published chapters");
            continue;
        }

        novels.push(Novel {
            title: config.get("title").cloned().unwrap_or_else(|| slug.clone()),
            author: config.get("author").cloned().unwrap_or_default(),
            description: config.get("description").cloned().unwrap_or_default(),
            slug,
            chapters,
        });
    }

    novels.sort_by_key(|n| n.title.to_lowercase());
    Ok(novels)
}

fn page(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="zh-TW">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0, maximum-scale=1.0, user-scalable=no">
    <title>{title}</title>
    <style>
        :root {{ --bg-page: #eeeeee; --bg-paper: #fffdf8; --text: #222222; --link: #4a6fa5; }}
        body.dark {{ --bg-page: #1a1a1a; --bg-paper: #222222; --text: #e6e6e6; --link: #7aa2d6; }}
        body {{ background: var(--bg-page); margin: 0; display: flex; justify-content: center; font-family: "Noto Serif TC", "Times New Roman", serif; }}
        .reader {{ width: 800px; max-width: 95vw; background: var(--bg-paper); margin: 40px 0; padding: 60px; font-size: 26px; line-height: 2.3; color: var(--text); box-shadow: 0 6px 25px rgba(0,0,0,0.2); }}
        h1 {{ margin-top: 0; font-size: 42px; }}
        a {{ color: var(--link); text-decoration: none; }}
        .nav {{ margin-top: 40px; font-size: 20px; }}
        .toggle {{ position: fixed; top: 12px; right: 12px; padding: 8px 14px; background: #444; color: #fff; border-radius: 6px; cursor: pointer; font-size: 14px; }}
        body.dark .toggle {{ background: #bbb; color: #000; }}
    </style>
    <script>
        function toggleTheme() {{
            document.body.classList.toggle("dark");
            localStorage.setItem("reader-theme", document.body.classList.contains("dark") ? "dark" : "light");
        }}
        window.addEventListener("DOMContentLoaded", () => {{
            if (localStorage.getItem("reader-theme") === "dark") {{
                document.body.classList.add("dark");
            }}
        }});
    </script>
</head>
<body>
    <div class="toggle" onclick="toggleTheme()">🌓 切換模式</div>
    <div class="reader">
        {content}
    </div>
</body>
</html>
"#,
        title = encode_text(title),
    )
}

fn chapter_href(id: &str) -> String {
    format!("{}.html", encode_double_quoted_attribute(id))
}

pub fn render_chapter_page(novel: &Novel, position: usize) -> String {
    let chapter = &novel.chapters[position];
    let body = encode_text(&chapter.body).replace('\n', "<br>");

    let mut nav = String::from("<div class=\"nav\">");
    if let Some(prev) = position.checked_sub(1).and_then(|i| novel.chapters.get(i)) {
        nav.push_str(&format!(
            "<a href=\"{}\">⬅ Previous</a> &nbsp;&nbsp;",
            chapter_href(&prev.id)
        ));
    }
    nav.push_str("<a href=\"../index.html\">📚 Back to list</a>");
    if let Some(next) = novel.chapters.get(position + 1) {
        nav.push_str(&format!(
            "&nbsp;&nbsp; <a href=\"{}\">Next ➡</a>",
            chapter_href(&next.id)
        ));
    }
    nav.push_str("</div>");

    let content = format!(
        "<h1>{}</h1>\n<p><em>{} · {}</em></p>\n<div class=\"chapter\">{}</div>\n{}",
        encode_text(&chapter.title),
        encode_text(&novel.title),
        encode_text(&novel.author),
        body,
        nav
    );

    page(&chapter.title, &content)
}

pub fn render_novel_index(novel: &Novel) -> String {
    let items: Vec<String> = novel
        .chapters
        .iter()
        .map(|c| {
            format!(
                "<li><a href=\"chapters/{}\">{}</a></li>",
                chapter_href(&c.id),
                encode_text(&c.title)
            )
        })
        .collect();

    let content = format!(
        "<h1>{}</h1>\n<p>Author: {}</p>\n<p>{}</p>\n<h2>Chapters</h2>\n<ul>\n{}\n</ul>\n<p><a href=\"../index.html\">Back to library</a></p>",
        encode_text(&novel.title),
        encode_text(&novel.author),
        encode_text(&novel.description),
        items.join("\n")
    );

    page(&novel.title, &content)
}

pub fn render_library_index(novels: &[Novel]) -> String {
    let items: Vec<String> = novels
        .iter()
        .map(|n| {
            format!(
                "<li><a href=\"{}/index.html\">{}</a></li>",
                encode_double_quoted_attribute(&n.slug),
                encode_text(&n.title)
            )
        })
        .collect();

    let content = format!("<h1>Novel Library</h1>\n<ul>\n{}\n</ul>", items.join("\n"));
    page("Library", &content)
}

fn write_page(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, html).with_context(|| format!("failed to write {}", path.display()))
}

/// Renders the whole Markdown tree under `content_dir` into `out_dir`.
pub fn build_site(content_dir: &Path, out_dir: &Path) -> Result<SiteReport> {
    let novels = load_novels(content_dir)?;
    let mut pages = 0;

    write_page(&out_dir.join("index.html"), &render_library_index(&novels))?;
    pages += 1;

    for novel in &novels {
        let novel_out = out_dir.join(&novel.slug);
        write_page(&novel_out.join("index.html"), &render_novel_index(novel))?;
        pages += 1;

        for (position, chapter) in novel.chapters.iter().enumerate() {
            let path = novel_out
                .join("chapters")
                .join(format!("{}.html", chapter.id));
            write_page(&path, &render_chapter_page(novel, position))?;
            pages += 1;
        }
    }

    tracing::info!("Built {} novels -> {}", novels.len(), out_dir.display());

    Ok(SiteReport {
        novels: novels.len(),
        pages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn novel(ids: &[&str]) -> Novel {
        Novel {
            slug: "slug".to_string(),
            title: "山海經".to_string(),
            author: "佚名".to_string(),
            description: "<古籍>".to_string(),
            chapters: ids
                .iter()
                .map(|id| SiteChapter {
                    id: id.to_string(),
                    title: format!("第 {id} 章"),
                    body: "一行\n<b>二行</b>".to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn parses_front_matter_and_body() {
        let (meta, body) = parse_front_matter(
            "---\ntitle: \"第 1 章 - \\\"序\\\" (3字)\"\nchapter: 1\npublished: true\n---\n\n正文",
        );
        assert_eq!(meta["title"], "第 1 章 - \"序\" (3字)");
        assert_eq!(meta["chapter"], "1");
        assert_eq!(body, "正文");
    }

    #[test]
    fn unquote_decodes_line_breaks() {
        assert_eq!(unquote(r#""第一行\n第二行\r""#), "第一行\n第二行\r");
        assert_eq!(unquote(r#""C:\\new""#), r"C:\new");
    }

    #[test]
    fn text_without_front_matter_is_all_body() {
        let (meta, body) = parse_front_matter("just text\n---\n");
        assert!(meta.is_empty());
        assert_eq!(body, "just text\n---\n");
    }

    #[test]
    fn unpublished_flags() {
        for value in ["false", "False", "0", "no"] {
            let meta = HashMap::from([("published".to_string(), value.to_string())]);
            assert!(is_unpublished(&meta), "{value}");
        }
        assert!(!is_unpublished(&HashMap::new()));
    }

    #[test]
    fn chapter_page_links_neighbours_and_escapes() {
        let novel = novel(&["1", "2", "3"]);

        let middle = render_chapter_page(&novel, 1);
        assert!(middle.contains("href=\"1.html\""));
        assert!(middle.contains("href=\"3.html\""));
        assert!(middle.contains("一行<br>&lt;b&gt;二行&lt;/b&gt;"));

        let first = render_chapter_page(&novel, 0);
        assert!(!first.contains("Previous"));
        let last = render_chapter_page(&novel, 2);
        assert!(!last.contains("Next"));
    }

    #[test]
    fn indexes_list_their_children() {
        let novel = novel(&["1", "2"]);
        let index = render_novel_index(&novel);
        assert!(index.contains("<a href=\"chapters/2.html\">第 2 章</a>"));
        assert!(index.contains("&lt;古籍&gt;"));

        let library = render_library_index(&[novel]);
        assert!(library.contains("<a href=\"slug/index.html\">山海經</a>"));
    }
}
