//! Trending-Relay main entry point
//!
//! This is the command-line interface for the GitHub Trending to Feishu relay.

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use trending_relay::config::{load_feishu_config, load_settings_or_default, Config};
use trending_relay::pipeline::{preview, print_report, run_pipeline, FATAL_EXIT_CODE};
use trending_relay::trending::{FetchRequest, Period};

/// Trending-Relay: GitHub Trending to Feishu
///
/// Fetches the GitHub Trending leaderboard, posts a summary card to a Feishu
/// webhook and upserts one Bitable row per repository.
#[derive(Parser, Debug)]
#[command(name = "trending-relay")]
#[command(version)]
#[command(about = "Relay GitHub Trending to a Feishu card and Bitable", long_about = None)]
struct Cli {
    /// Programming language, e.g. rust, python, go (default: all languages)
    #[arg(long = "lang", value_name = "LANGUAGE")]
    lang: Option<String>,

    /// Trending period
    #[arg(long, value_enum, default_value_t = Period::Daily)]
    since: Period,

    /// How many top repositories to show on the card
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    limit: u32,

    /// Feishu webhook URL (overrides FEISHU_WEBHOOK_URL)
    #[arg(long, value_name = "URL")]
    webhook: Option<String>,

    /// Path to an optional TOML settings file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Fetch and print the card and table rows without delivering them
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::from(FATAL_EXIT_CODE)
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("trending_relay=info,warn"),
            1 => EnvFilter::new("trending_relay=debug,info"),
            2 => EnvFilter::new("trending_relay=trace,debug"),
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

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let settings = load_settings_or_default(cli.config.as_deref())
        .context("Failed to load settings")?;
    let request = FetchRequest::new(cli.lang, cli.since, cli.limit as usize);
    let today = Utc::now().date_naive();

    if cli.dry_run {
        handle_dry_run(&request, &settings, today).await?;
        return Ok(ExitCode::SUCCESS);
    }

    let feishu = load_feishu_config(cli.webhook.as_deref())
        .context("Failed to load Feishu configuration")?;
    let config = Config {
        request,
        settings,
        feishu,
    };

    tracing::info!(
        "Relaying {} trending for {} (limit {})",
        config.request.period.label(),
        config.request.language_label(),
        config.request.limit
    );

    let report = run_pipeline(&config, today)
        .await
        .context("Pipeline aborted")?;
    print_report(&report);

    Ok(ExitCode::from(report.status().exit_code()))
}

/// Handles --dry-run: prints the webhook body and table rows as JSON
async fn handle_dry_run(
    request: &FetchRequest,
    settings: &trending_relay::config::Settings,
    today: chrono::NaiveDate,
) -> anyhow::Result<()> {
    let preview = preview(request, settings, today)
        .await
        .context("Dry run aborted")?;

    println!("=== Card ({} entries) ===", preview.card.lines.len());
    println!("{}", serde_json::to_string_pretty(&preview.card.to_message())?);

    println!("\n=== Table rows ({}) ===", preview.rows.len());
    let rows: Vec<_> = preview.rows.iter().map(|row| row.to_record_body()).collect();
    println!("{}", serde_json::to_string_pretty(&rows)?);

    Ok(())
}
