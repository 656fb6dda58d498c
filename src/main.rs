use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use urlsentry::classifier::MaliciousUrlClassifier;
use urlsentry::config::{Config, ModelBackend};
use urlsentry::output::terminal;
use urlsentry::urls::{extract_urls, normalize};

/// urlsentry: multi-tier malicious URL detection.
///
/// Checks URLs against local and remote blacklists, phishing heuristics,
/// and a predictive model, in that order.
#[derive(Parser)]
#[command(name = "urlsentry", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the unique normalized URLs found in a text file (or - for stdin)
    Extract {
        /// Input file, or - to read stdin
        input: PathBuf,
    },

    /// Classify one or more URLs
    Classify {
        /// URLs to classify (query and fragment are stripped first)
        #[arg(required = true)]
        urls: Vec<String>,

        /// Abort a classification that takes longer than this many seconds
        #[arg(long)]
        deadline: Option<u64>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Extract every URL from a text and classify each one
    Scan {
        /// Input file, or - to read stdin
        input: PathBuf,

        /// Number of URLs to classify in parallel (default: URLSENTRY_SCAN_CONCURRENCY or 8)
        #[arg(long)]
        concurrency: Option<usize>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the active configuration (blacklist sources, model backend)
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging on stderr so JSON output stays clean
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("urlsentry=warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract { input } => {
            let text = read_input(&input)?;
            for url in extract_urls(&text) {
                println!("{url}");
            }
        }

        Commands::Classify {
            urls,
            deadline,
            json,
        } => {
            let config = Config::load()?;
            let classifier = build_classifier(&config)?;

            let mut results = Vec::with_capacity(urls.len());
            for raw in &urls {
                let url = normalize(raw);
                let result = match deadline {
                    Some(secs) => {
                        classifier
                            .classify_within(&url, Duration::from_secs(secs))
                            .await
                    }
                    None => classifier.classify(&url).await,
                }
                .with_context(|| format!("Failed to classify {url}"))?;

                if !json {
                    terminal::display_result(&url, &result);
                }
                results.push(serde_json::json!({ "url": url, "result": result }));
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            }
        }

        Commands::Scan {
            input,
            concurrency,
            json,
        } => {
            let config = Config::load()?;
            let classifier = build_classifier(&config)?;
            let text = read_input(&input)?;
            let concurrency = concurrency.unwrap_or(config.scan_concurrency);

            info!(input = %input.display(), concurrency, "Starting scan");
            let report = urlsentry::pipeline::scan::run(&classifier, &text, concurrency, !json)
                .await
                .context("Scan failed")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                terminal::display_scan_report(&report);
            }
        }

        Commands::Status => {
            let config = Config::load()?;
            show_status(&config);
        }
    }

    Ok(())
}

/// Validate the model configuration and build the cascade.
fn build_classifier(config: &Config) -> Result<MaliciousUrlClassifier> {
    config.require_model()?;
    let classifier = MaliciousUrlClassifier::from_config(config)?;
    if config.model_backend == ModelBackend::None {
        eprintln!(
            "{} no model configured; URLs that pass the blacklist and heuristics will fail",
            "Warning:".yellow()
        );
    }
    Ok(classifier)
}

/// Read the whole input file, or stdin when the path is `-`.
fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        return Ok(text);
    }

    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn show_status(config: &Config) {
    println!("{}", "urlsentry configuration".bold());

    match &config.blacklist.local_path {
        Some(path) => {
            let state = if path.exists() {
                "found".green()
            } else {
                "missing".red()
            };
            println!("  Local blacklist:  {} ({})", path.display(), state);
        }
        None => println!("  Local blacklist:  {}", "not configured".dimmed()),
    }

    match &config.blacklist.remote_url {
        Some(url) => {
            let freshness = match config.blacklist.remote_ttl {
                Some(ttl) => format!("cached for {}s", ttl.as_secs()),
                None => "fetched on every lookup".to_string(),
            };
            println!("  Remote blacklist: {url} ({freshness})");
        }
        None => println!("  Remote blacklist: {}", "not configured".dimmed()),
    }

    let model_state = match config.model_backend {
        ModelBackend::None => "disabled".yellow(),
        _ if config.model_path.exists() => "found".green(),
        _ => "missing".red(),
    };
    println!(
        "  Model:            {} at {} ({})",
        config.model_backend.as_str(),
        config.model_path.display(),
        model_state
    );
    println!(
        "  Timeouts:         fetch {}s, model {}s",
        config.blacklist.fetch_timeout.as_secs(),
        config.model_timeout.as_secs()
    );
}
