/// Escapes `\`, `"` and line breaks for a single-line YAML double-quoted scalar.
pub fn escape_yaml_string(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

/// Builds a Markdown chapter document with YAML front matter.
pub fn build_markdown(title: &str, chapter_num: usize, content: &str) -> String {
    format!(
        "---\n\
         title: \"{}\"\n\
         chapter: {chapter_num}\n\
         lang: zh-TW\n\
         published: true\n\
         tags: []\n\
         ---\n\n\
         {content}",
        escape_yaml_string(title)
    )
}
