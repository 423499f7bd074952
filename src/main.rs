use anyhow::Result;
use clap::Parser;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::info;

use ldp_type_report::{
    config::Configuration,
    core::HttpFetcher,
    pipeline::{run_with_events, RunEvent, RunSummary},
};

#[derive(Parser)]
#[command(
    name = "ldp_type_report",
    about = "Classify the resources an LDP container lists and record them in a resumable CSV report",
    long_about = None,
    version
)]
struct Cli {
    /// Turtle document listing the container's ldp:contains members
    input: PathBuf,

    /// CSV report to create or resume
    output: PathBuf,

    /// HTTP configuration file (YAML or JSON)
    #[arg(long, env = "LDP_TYPE_REPORT_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.debug {
        tracing::Level::DEBUG
    } else if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    let config = match &cli.config {
        Some(path) => Configuration::from_file(path)?,
        None => Configuration::default(),
    };
    config.validate()?;
    info!("HTTP timeout {}s, Accept: {}", config.http.timeout, config.http.accept);

    println!("{}", "Building resource type report...".bright_blue().bold());
    println!(" Input: {}", cli.input.display().to_string().bright_green());
    println!(" Output: {}", cli.output.display().to_string().bright_green());

    let fetcher = HttpFetcher::new(&config.http)?;

    let mut progress: Option<ProgressBar> = None;
    let summary = run_with_events(&cli.input, &cli.output, &fetcher, |event| match event {
        RunEvent::Started { pending } => {
            let bar = ProgressBar::new(pending as u64);
            bar.set_style(
                ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} [{elapsed_precise}]")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            progress = Some(bar);
        }
        RunEvent::Classified(record) => {
            if let Some(bar) = &progress {
                bar.println(format!(" Checking {} => {}", record.uri, record.resource_type.to_string().bright_cyan()));
                bar.inc(1);
            }
        }
    })
    .await;

    if let Some(bar) = progress {
        bar.finish_and_clear();
    }

    print_summary(&summary?);
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!("\n{}", " Report Summary".bright_green().bold());
    println!(" URIs found: {}", summary.discovered.to_string().bright_cyan());
    println!(" Already checked: {}", summary.previously_completed);
    println!(" Checked this run: {}", summary.classified_total().to_string().bright_cyan());
    for (resource_type, count) in &summary.classified {
        println!("  • {}: {}", resource_type, count);
    }
    println!(" {} completed successfully!", "Report".bright_green());
}
