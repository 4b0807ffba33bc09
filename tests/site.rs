use std::fs;

use tempfile::tempdir;

use novelshelf::services::converter::run_converter;
use novelshelf::services::site::{build_site, load_chapters, load_novels};
use novelshelf::services::writer::{NovelConfig, write_config_yaml};

#[test]
fn converted_books_render_to_html() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("紅樓夢.json");
    fs::write(
        &input,
        r#"[
            {"metadata": {"author": "曹雪芹", "description": "<石頭記>"}},
            {"title": "第一回 甄士隱夢幻識通靈", "content": "此開卷第一回也。"},
            {"title": "第二回", "content": "卻說封肅"}
        ]"#,
    )
    .unwrap();
    let content = dir.path().join("content");
    let site = dir.path().join("site");

    run_converter(&input, &content, "hongloumeng").unwrap();
    let report = build_site(&content, &site).unwrap();

    assert_eq!(report.novels, 1);
    assert_eq!(report.pages, 4);

    let library = fs::read_to_string(site.join("index.html")).unwrap();
    assert!(library.contains("<a href=\"hongloumeng/index.html\">紅樓夢</a>"));

    let novel = fs::read_to_string(site.join("hongloumeng/index.html")).unwrap();
    assert!(novel.contains("Author: 曹雪芹"));
    assert!(novel.contains("&lt;石頭記&gt;"));
    assert!(novel.contains("第一回 甄士隱夢幻識通靈 (8字)"));

    let first = fs::read_to_string(site.join("hongloumeng/chapters/1.html")).unwrap();
    assert!(first.contains("此開卷第一回也。"));
    assert!(first.contains("href=\"2.html\""));
}

#[test]
fn skips_unpublished_chapters_and_incomplete_novels() {
    let dir = tempdir().unwrap();
    let content = dir.path();

    let novel = content.join("novel");
    fs::create_dir_all(novel.join("chapters")).unwrap();
    fs::write(novel.join("config.yaml"), "title: \"Zeta\"\nauthor: \"A\"\n").unwrap();
    fs::write(
        novel.join("chapters/0010.md"),
        "---\ntitle: \"Ten\"\nchapter: 10\n---\n\nten",
    )
    .unwrap();
    fs::write(
        novel.join("chapters/0002.md"),
        "---\ntitle: \"Two\"\nchapter: 2\n---\n\ntwo",
    )
    .unwrap();
    fs::write(
        novel.join("chapters/0003.md"),
        "---\ntitle: \"Draft\"\nchapter: 3\npublished: false\n---\n\ndraft",
    )
    .unwrap();

    let other = content.join("alpha");
    fs::create_dir_all(other.join("chapters")).unwrap();
    fs::write(other.join("config.yaml"), "title: \"alpha\"\n").unwrap();
    fs::write(other.join("chapters/0001.md"), "no front matter").unwrap();

    fs::create_dir_all(content.join("no-config/chapters")).unwrap();

    let novels = load_novels(content).unwrap();
    let titles: Vec<&str> = novels.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, vec!["alpha", "Zeta"]);

    let ids: Vec<&str> = novels[1].chapters.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["2", "10"]);

    assert_eq!(novels[0].chapters[0].id, "0001");
    assert_eq!(novels[0].chapters[0].title, "Chapter 0001");
    assert_eq!(novels[0].chapters[0].body, "no front matter");
}

#[test]
fn multi_line_metadata_survives_config_yaml() {
    let dir = tempdir().unwrap();
    let content = dir.path();
    let config = NovelConfig {
        title: "原題".to_string(),
        author: "作者".to_string(),
        description: "第一行\ntitle: 被覆寫\r\n\"引號\" \\ 結尾".to_string(),
    };
    write_config_yaml(content, "novel", &config).unwrap();
    fs::create_dir_all(content.join("novel/chapters")).unwrap();
    fs::write(content.join("novel/chapters/0001.md"), "正文").unwrap();

    let novels = load_novels(content).unwrap();
    assert_eq!(novels.len(), 1);
    assert_eq!(novels[0].title, "原題");
    assert_eq!(novels[0].author, "作者");
    assert_eq!(novels[0].description, config.description);
}

#[test]
fn non_numeric_chapter_ids_fall_back_to_file_stem() {
    let dir = tempdir().unwrap();
    let content = dir.path().join("content");
    let chapters = content.join("novel/chapters");
    fs::create_dir_all(&chapters).unwrap();
    fs::write(content.join("novel/config.yaml"), "title: \"Novel\"\n").unwrap();
    fs::write(
        chapters.join("0001.md"),
        "---\ntitle: \"Escape\"\nchapter: ../../../escaped\n---\n\nbody",
    )
    .unwrap();

    let loaded = load_chapters(&chapters).unwrap();
    assert_eq!(loaded[0].id, "0001");

    let site = dir.path().join("site");
    build_site(&content, &site).unwrap();
    assert!(site.join("novel/chapters/0001.html").exists());
    assert!(!dir.path().join("escaped.html").exists());
    assert!(!site.join("escaped.html").exists());
}

#[test]
fn duplicate_chapter_ids_do_not_overwrite() {
    let dir = tempdir().unwrap();
    let chapters = dir.path().join("chapters");
    fs::create_dir_all(&chapters).unwrap();
    fs::write(chapters.join("0001.md"), "---\nchapter: 1\n---\n\nfirst").unwrap();
    fs::write(chapters.join("0002.md"), "---\nchapter: 1\n---\n\nsecond").unwrap();

    let loaded = load_chapters(&chapters).unwrap();
    let ids: Vec<&str> = loaded.iter().map(|c| c.id.as_str()).collect();
    let bodies: Vec<&str> = loaded.iter().map(|c| c.body.as_str()).collect();
    assert_eq!(ids, vec!["1", "0002"]);
    assert_eq!(bodies, vec!["first", "second"]);
}
