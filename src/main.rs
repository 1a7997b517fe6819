use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use headline_topics::config::Config;
use headline_topics::model::lda::VariationalLda;
use headline_topics::pipeline;
use headline_topics::report::html::HtmlReport;
use headline_topics::report::terminal;
use headline_topics::scrape::fetch::{HttpPageSource, PageSource};

/// Headline topics: scrape news summaries and discover what they are about.
///
/// Fetches one page, pulls the text of every element matching a CSS
/// selector, and fits an LDA topic model over the result. Settings come from
/// HEADLINE_TOPICS_* environment variables (or a .env file).
#[derive(Parser)]
#[command(name = "headline-topics", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape, fit the topic model, print topics and write the visualization (default)
    Run,

    /// Scrape and build the corpus only; print its size and the first document's bag
    Corpus,

    /// Print the active stop-word list
    StopWords,
}

/// Wraps a page source with a terminal spinner while the request is in flight.
struct SpinnerSource<S> {
    inner: S,
}

#[async_trait]
impl<S: PageSource> PageSource for SpinnerSource<S> {
    async fn fetch(&self, url: &str) -> headline_topics::error::Result<String> {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("  {spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(format!("Fetching {url}"));
        spinner.enable_steady_tick(Duration::from_millis(100));

        let result = self.inner.fetch(url).await;
        spinner.finish_and_clear();
        result
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("headline_topics=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load().context("Failed to load configuration")?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let source = page_source(&config)?;
            let visualizer = HtmlReport::default();

            println!("Scraping {}...", config.url);

            let run = pipeline::run(&config, &source, &VariationalLda, &visualizer).await?;

            terminal::display_corpus_summary(
                run.prepared.corpus.len(),
                run.prepared.empty_documents(),
                run.prepared.dictionary.len(),
            );
            terminal::display_topics(&run.topics);
            terminal::display_bow_preview(&run.prepared.corpus);
            terminal::display_document_topics(&run.document_topics);

            info!(path = %run.visualization_path.display(), "Run complete");
            println!(
                "\n{}",
                format!(
                    "Visualization saved to: {}",
                    run.visualization_path.display()
                )
                .bold()
            );
        }

        Commands::Corpus => {
            let source = page_source(&config)?;

            println!("Scraping {}...", config.url);

            let prepared = pipeline::collect_corpus(&config, &source).await?;

            terminal::display_corpus_summary(
                prepared.corpus.len(),
                prepared.empty_documents(),
                prepared.dictionary.len(),
            );
            terminal::display_bow_preview(&prepared.corpus);
        }

        Commands::StopWords => {
            let stop_words = config.stop_words.load();
            println!(
                "{}",
                format!("=== Stop words ({}) ===", stop_words.len()).bold()
            );
            println!("{}", stop_words.sorted().join(" "));
        }
    }

    Ok(())
}

fn page_source(config: &Config) -> Result<SpinnerSource<HttpPageSource>> {
    let inner = HttpPageSource::new(config.timeout).context("Failed to set up the HTTP client")?;
    Ok(SpinnerSource { inner })
}
