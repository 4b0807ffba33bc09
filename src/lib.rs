pub mod config;
pub mod models;
pub mod server;
pub mod services;

pub use config::AppConfig;
pub use server::run_server;
pub use services::title::{ChapterTitleNormalizer, normalize_chapter_title};
