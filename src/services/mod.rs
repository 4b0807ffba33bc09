pub mod content;
pub mod converter;
pub mod importer;
pub mod library;
pub mod loader;
pub mod markdown;
pub mod pipeline;
pub mod site;
pub mod title;
pub mod writer;
