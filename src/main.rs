mod config;
mod content;
mod export;
mod newsletter;
mod render;
mod server;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::{MailchimpSettings, Settings};
use crate::content::accessor::ContentAccessor;
use crate::content::dates::display_date;
use crate::content::ContentEntry;

#[derive(Parser)]
#[command(name = "referee_content", about = "WordPress export to site content store")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a WordPress export into content/content.json
    Extract {
        /// Export file (default: REFEREE_EXPORT_PATH or data/export.xml)
        source: Option<PathBuf>,
    },
    /// List published posts from the content store
    List {
        /// List pages instead of posts
        #[arg(long)]
        pages: bool,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
    /// Serve content and the newsletter signup over HTTP
    Serve {
        /// Address to bind (default: REFEREE_BIND or 127.0.0.1:3000)
        #[arg(long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;

    let result = match cli.command {
        Commands::Extract { source } => {
            let source = source.unwrap_or_else(|| settings.export_path.clone());
            let xml = std::fs::read_to_string(&source)
                .with_context(|| format!("Failed to read export {}", source.display()))?;
            let store = export::parse_document(&xml)
                .with_context(|| format!("Failed to parse export {}", source.display()))?;
            let out_file = content::store::write_store(&store, &settings.output_dir)?;
            println!(
                "Parsed: {} pages, {} posts -> {}",
                store.pages.len(),
                store.posts.len(),
                out_file.display()
            );
            Ok(())
        }
        Commands::List { pages, limit } => {
            let accessor = ContentAccessor::from_settings(&settings);
            let (kind, rows) = if pages {
                ("pages", accessor.pages()?)
            } else {
                ("posts", accessor.posts()?)
            };
            if rows.is_empty() {
                println!("No {} found.", kind);
                return Ok(());
            }
            print_table(&rows, limit);
            println!("\n{} {} | link: /blog/<slug>", rows.len(), kind);
            Ok(())
        }
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| settings.bind.clone());
            let mailchimp = newsletter::mailchimp::MailchimpClient::new(MailchimpSettings::load()?)?;
            let state = server::AppState::new(ContentAccessor::from_settings(&settings), mailchimp);
            server::serve(state, &bind).await
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn print_table(rows: &[&ContentEntry], limit: usize) {
    println!(
        "{:>3} | {:<18} | {:<28} | {:<40} | {:<7}",
        "#", "Date", "Slug", "Title", "Status"
    );
    println!("{}", "-".repeat(108));

    for (i, e) in rows.iter().take(limit).enumerate() {
        let date = display_date(&e.date).unwrap_or_else(|| "-".into());
        let status = if e.status.is_empty() { "-" } else { e.status.as_str() };
        println!(
            "{:>3} | {:<18} | {:<28} | {:<40} | {:<7}",
            i + 1,
            date,
            truncate(e.route_slug(), 28),
            truncate(&e.title, 40),
            status
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
