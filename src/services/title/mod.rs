//! Chapter title normalization.
//!
//! Rules run in a fixed order. Digits are canonicalized and stale count
//! annotations dropped first. The first matching prefix rule wins, duplicated
//! prefixes are collapsed, and the current character count is appended last.

mod normalizer;
pub mod rules;

pub use normalizer::{ChapterTitleNormalizer, TitleEvent, normalize_chapter_title};
