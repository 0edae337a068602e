//! site-cloner main entry point
//!
//! This is the command-line interface for the site cloner.

use anyhow::Context;
use clap::{Parser, Subcommand};
use site_cloner::config::{load_config_with_hash, Config};
use site_cloner::pipeline::clone_site;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// site-cloner: a bounded same-origin website cloner
///
/// Crawls a few pages of one site in a headless browser, writes them out as
/// a static preview with screenshots, and asks a hosted model to summarize
/// what it found.
#[derive(Parser, Debug)]
#[command(name = "site-cloner")]
#[command(version)]
#[command(about = "A bounded same-origin website cloner", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Clone a site once and print where the preview was written
    Clone {
        /// Start URL
        url: String,

        /// Page budget; zero or below captures nothing
        #[arg(long, allow_negative_numbers = true)]
        max_pages: Option<i64>,

        /// Skip the summarization request
        #[arg(long)]
        no_summary: bool,
    },

    /// Run the HTTP API and preview server
    Serve {
        /// Listen address, overriding the config file and PORT
        #[arg(long, value_name = "ADDR")]
        addr: Option<SocketAddr>,
    },

    /// Validate the configuration and print the effective settings
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = load(cli.config.as_deref())?;
    apply_port_override(&mut config)?;

    match cli.command {
        Command::Clone {
            url,
            max_pages,
            no_summary,
        } => {
            if no_summary {
                config.summarizer.enabled = false;
            }
            let max_pages = max_pages.unwrap_or(config.crawler.max_pages);
            handle_clone(&config, &url, max_pages).await
        }
        Command::Serve { addr } => {
            if let Some(addr) = addr {
                config.server.bind = addr.to_string();
            }
            site_cloner::server::serve(config)
                .await
                .context("Server failed")
        }
        Command::CheckConfig => {
            handle_check_config(&config);
            Ok(())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_cloner=info,warn"),
            1 => EnvFilter::new("site_cloner=debug,info"),
            2 => EnvFilter::new("site_cloner=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file if one was given, otherwise the defaults
fn load(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::info!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    Ok(config)
}

/// Replaces the server port with `PORT` from the environment, if set
fn apply_port_override(config: &mut Config) -> anyhow::Result<()> {
    let Ok(port) = std::env::var("PORT") else {
        return Ok(());
    };

    let port: u16 = port
        .trim()
        .parse()
        .with_context(|| format!("PORT is not a valid port number: {:?}", port))?;
    let mut addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address: {}", config.server.bind))?;
    addr.set_port(port);

    tracing::debug!("PORT override, binding {}", addr);
    config.server.bind = addr.to_string();
    Ok(())
}

/// Handles the clone subcommand
async fn handle_clone(config: &Config, url: &str, max_pages: i64) -> anyhow::Result<()> {
    let outcome = match clone_site(config, url, max_pages).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("Clone failed: {}", e);
            return Err(e.into());
        }
    };

    let output_root = Path::new(&config.output.output_dir);
    println!("=== Clone of {} ===\n", url);
    println!("Pages captured: {}", outcome.pages());
    for (i, record) in outcome.crawl.records.iter().enumerate() {
        println!("  {}. {}", i + 1, record.url());
    }
    println!(
        "\nPreview: {}",
        output_root.join(&outcome.site.preview_relative_path).display()
    );
    println!("\nSummary:\n  {}", outcome.summary);

    Ok(())
}

/// Handles the check-config subcommand
fn handle_check_config(config: &Config) {
    println!("=== site-cloner Configuration ===\n");

    println!("Crawler:");
    println!("  Max pages: {}", config.crawler.max_pages);
    println!(
        "  Navigation timeout: {}ms",
        config.crawler.navigation_timeout_ms
    );
    println!("  Settle delay: {}ms", config.crawler.settle_delay_ms);
    println!("  Query sensitive: {}", config.crawler.query_sensitive);
    println!("  Frontier dedup: {:?}", config.crawler.frontier_dedup);

    println!("\nRender:");
    println!("  Backend: {:?}", config.render.backend);
    println!("  User agent: {}", config.render.user_agent);
    println!(
        "  Network idle timeout: {}ms",
        config.render.network_idle_timeout_ms
    );

    println!("\nOutput:");
    println!("  Directory: {}", config.output.output_dir);

    println!("\nSummarizer:");
    println!("  Enabled: {}", config.summarizer.enabled);
    println!("  Endpoint: {}", config.summarizer.endpoint);
    println!(
        "  Credential: ${} ({})",
        config.summarizer.api_key_env,
        if std::env::var(&config.summarizer.api_key_env).is_ok() {
            "set"
        } else {
            "not set"
        }
    );

    println!("\nServer:");
    println!("  Bind: {}", config.server.bind);

    println!("\n✓ Configuration is valid");
}
