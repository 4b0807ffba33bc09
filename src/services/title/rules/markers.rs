use std::sync::OnceLock;

use regex::Regex;

// 零〇兩 are needed for numbers such as 一百零八.
const NUMERAL: &str = "[0-9一二三四五六七八九十百千萬零〇兩]+";
const CHAPTER_SUFFIX: &str = "[章回節卷冊部]";
const VOLUME_SUFFIX: &str = "[卷冊部]";

/// "第二卷 第十章", "第1冊第3回", ...
pub fn has_volume_chapter_marker(s: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(&format!(
            r"第\s*{NUMERAL}\s*{VOLUME_SUFFIX}\s*第\s*{NUMERAL}\s*{CHAPTER_SUFFIX}"
        ))
        .expect("volume marker regex")
    });

    re.is_match(s)
}

/// "第12章", "第三回", "第 7 章", anywhere in the title.
pub fn has_bare_chapter_marker(s: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(&format!(r"第\s*{NUMERAL}\s*{CHAPTER_SUFFIX}")).expect("chapter marker regex")
    });

    re.is_match(s)
}
