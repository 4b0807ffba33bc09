use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use novelshelf::services::library::Database;
use novelshelf::services::{converter, importer, site};
use novelshelf::{AppConfig, run_server};

#[derive(Parser, Debug)]
#[command(name = "novelshelf")]
#[command(about = "Import, serve and render JSON novel chapters")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the read-only HTTP API
    Serve {
        /// Import the inputs directory before serving
        #[arg(long, default_value_t = false)]
        import: bool,
    },
    /// Import every JSON book from the inputs directory into the database
    Import {
        #[arg(long)]
        inputs: Option<PathBuf>,
    },
    /// Convert one JSON book into Markdown chapter files
    Convert {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
        /// Output directory name; random when omitted
        #[arg(long)]
        novel_key: Option<String>,
    },
    /// Render the Markdown tree to static HTML
    BuildSite {
        #[arg(long)]
        content: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = AppConfig::from_env();

    match cli.command {
        Command::Serve { import } => {
            let db = Database::new(&config).await?;
            if import {
                importer::run_import(&db, &config.inputs_dir).await?;
            }
            run_server(config, db).await?;
        }
        Command::Import { inputs } => {
            let db = Database::new(&config).await?;
            let inputs = inputs.unwrap_or_else(|| config.inputs_dir.clone());
            let summaries = importer::run_import(&db, &inputs).await?;
            let inserted: u64 = summaries.iter().map(|s| s.inserted).sum();
            tracing::info!(
                "Import complete. books={} new_chapters={}",
                summaries.len(),
                inserted
            );
        }
        Command::Convert {
            input,
            output,
            novel_key,
        } => {
            let output = output.unwrap_or_else(|| config.content_dir.clone());
            let novel_key = novel_key.unwrap_or_else(converter::generate_novel_key);
            let report = converter::run_converter(&input, &output, &novel_key)?;
            tracing::info!(
                "Converted {} chapters into {}",
                report.chapter_paths.len(),
                output.join(&report.novel_key).display()
            );
        }
        Command::BuildSite { content, output } => {
            let content = content.unwrap_or_else(|| config.content_dir.clone());
            let output = output.unwrap_or_else(|| config.site_dir.clone());
            let report = site::build_site(&content, &output)?;
            tracing::info!("Wrote {} pages", report.pages);
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();
}
