use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;

use pageproof::config::Config;
use pageproof::scenario::runner;

/// pageproof: run end-to-end UI scenarios against a web app in headless Chrome
#[derive(Parser)]
#[command(name = "pageproof", version, about)]
struct Cli {
    /// Scenario YAML files to run, one fresh browser session each
    #[arg(required = true)]
    scenarios: Vec<PathBuf>,

    /// Base URL that relative scenario URLs resolve against
    #[arg(long)]
    base_url: Option<String>,

    /// Run Chrome with a visible window (default: headless)
    #[arg(long)]
    headed: bool,

    /// Disable the Chrome sandbox (needed in most containers)
    #[arg(long)]
    no_sandbox: bool,

    /// Default per-action timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Wall-clock budget per scenario in seconds
    #[arg(long)]
    budget_secs: Option<u64>,

    /// Directory for failure screenshots
    #[arg(long)]
    screenshot_dir: Option<PathBuf>,

    /// Debug-level logging on stderr (RUST_LOG still takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Log to stderr only — stdout carries the scenario report
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .without_time()
        .init();

    let mut config = Config::default();
    config.apply_env();
    if let Some(url) = cli.base_url {
        config.base_url = Some(url);
    }
    if cli.headed {
        config.headless = false;
    }
    if cli.no_sandbox {
        config.no_sandbox = true;
    }
    if let Some(ms) = cli.timeout_ms {
        config.action_timeout_ms = ms;
    }
    if let Some(secs) = cli.budget_secs {
        config.budget_secs = secs;
    }
    if cli.screenshot_dir.is_some() {
        config.screenshot_dir = cli.screenshot_dir;
    }

    let mut passed = 0usize;
    let mut failed = 0usize;

    for path in &cli.scenarios {
        let outcome = runner::run_file(path, &config).await;
        match outcome {
            pageproof::scenario::Outcome::Passed => {
                passed += 1;
                println!("{} {}", "✓ Passed".green().bold(), path.display());
            }
            pageproof::scenario::Outcome::Failed { step, reason } => {
                failed += 1;
                println!(
                    "{} {} (step {}: {})",
                    "✗ Failed".red().bold(),
                    path.display(),
                    step,
                    reason
                );
            }
        }
    }

    println!(
        "\n{}: {} passed, {} failed",
        "Summary".bold(),
        passed.to_string().green(),
        if failed > 0 {
            failed.to_string().red().to_string()
        } else {
            failed.to_string()
        }
    );

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
