//! wordcrawl CLI
//!
//! Crawls from a seed URL given as an argument or typed at the prompt.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use wordcrawl::{
    config,
    error::Result,
    models::{Config, CrawlReport},
    pipeline,
    storage::{LocalStorage, ReportStorage},
    utils::{
        http::HttpFetcher,
        url::{normalize_scheme, validate},
    },
};

const PROMPT: &str = "Enter url you want to parse: ";

/// wordcrawl - Site Word Frequency Crawler
#[derive(Parser, Debug)]
#[command(
    name = "wordcrawl",
    version,
    about = "Crawl a site and report its most frequent words",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    crawl: CrawlArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Args, Debug)]
struct CrawlArgs {
    /// Seed URL; prompts when omitted
    url: Option<String>,

    /// Link hops to follow beyond the seed page
    #[arg(short = 'd', long)]
    max_depth: Option<usize>,

    /// Number of words in the report
    #[arg(short = 'n', long)]
    top: Option<usize>,

    /// Concurrent fetches per level
    #[arg(long)]
    concurrency: Option<usize>,

    /// Give up after this many seconds
    #[arg(long)]
    deadline: Option<u64>,

    /// Write the report as JSON to this path
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate configuration and compile content rules
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Apply command-line overrides on top of the file configuration.
fn apply_overrides(config: &mut Config, args: &CrawlArgs) {
    if let Some(depth) = args.max_depth {
        config.crawler.max_depth = depth;
    }
    if let Some(top) = args.top {
        config.report.top_n = top;
    }
    if let Some(concurrency) = args.concurrency {
        config.crawler.max_concurrent = concurrency;
    }
    if let Some(deadline) = args.deadline {
        config.crawler.crawl_deadline_secs = deadline;
    }
}

/// Prompt until a valid URL is entered; `None` on `q` or end of input.
fn prompt_for_url() -> Result<Option<String>> {
    let stdin = io::stdin();
    let mut lines = stdin.lock();
    loop {
        print!("{PROMPT}");
        io::stdout().flush()?;

        let mut line = String::new();
        if lines.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let input = line.trim();
        if input == "q" {
            return Ok(None);
        }

        let url = normalize_scheme(input);
        match validate(&url) {
            Ok(_) => return Ok(Some(url)),
            Err(e) => println!("{e}"),
        }
    }
}

fn print_report(report: &CrawlReport) {
    println!();
    println!("Visited {} page(s):", report.visited.len());
    for url in &report.visited {
        println!("  {url}");
    }

    println!();
    println!("Top {} word(s):", report.top_words.len());
    for entry in &report.top_words {
        println!("  ({:?}, {})", entry.word, entry.count);
    }
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = config::load_config(cli.config.as_deref());

    if let Some(Command::Validate) = cli.command {
        log::info!("Validating configuration...");
        if let Err(e) = config::load_components(&config) {
            log::error!("Config validation failed: {}", e);
            return Err(e);
        }
        log::info!(
            "✓ Config OK ({} configured rule(s) compiled)",
            config.rules.len()
        );
        return Ok(());
    }

    apply_overrides(&mut config, &cli.crawl);

    let input = match cli.crawl.url {
        Some(url) => url,
        None => match prompt_for_url()? {
            Some(url) => url,
            None => return Ok(()),
        },
    };

    let fetcher = Arc::new(HttpFetcher::new(&config.crawler)?);
    let storage = cli.crawl.output.clone().map(LocalStorage::new);
    let run = pipeline::run_crawler(
        &config,
        &input,
        fetcher,
        storage.as_ref().map(|s| s as &dyn ReportStorage),
    )
    .await?;

    print_report(&run.report);
    if let Some(location) = run.location {
        log::info!("Report saved to {}", location);
    }

    Ok(())
}
