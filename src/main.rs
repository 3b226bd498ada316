use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use textlens::analyzer::{AnalyzerClient, AnalyzerError};
use textlens::{AnalyzerClientBuilder, AnalyzerClientTrait, Config, ConfigOverrides, render_plain};
use tracing::{error, info};

/// lens - live text analysis in the terminal
#[derive(Parser)]
#[command(name = "lens")]
#[command(about = "Analyze text for language, sentiment, PII and entities as you type")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct GlobalArgs {
    /// Base URL of the analysis service
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    /// Pause after the last keystroke before analyzing, in milliseconds
    #[arg(long, global = true, value_name = "MS")]
    debounce_ms: Option<u64>,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    timeout_secs: Option<u64>,

    /// File to append logs to
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Launch interactive terminal UI (default)
    Tui(TuiCommand),
    /// Analyze text once and print the results
    Analyze(AnalyzeCommand),
    /// Check that the analysis service is reachable
    Status,
}

#[derive(Args)]
struct TuiCommand {
    /// Text to start with
    #[arg(value_name = "TEXT")]
    text: Option<String>,
}

#[derive(Args)]
struct AnalyzeCommand {
    /// The text to analyze, or `-` to read standard input
    #[arg(value_name = "TEXT")]
    text: String,

    /// Print the raw service response as JSON
    #[arg(long)]
    json: bool,
}

fn main() {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let result = run(cli);

    if let Err(e) = result {
        error!(error = %format!("{e:#}"), "command failed");
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(ConfigOverrides {
        api_url: cli.global.api_url,
        debounce_ms: cli.global.debounce_ms,
        timeout_secs: cli.global.timeout_secs,
        log_file: cli.global.log_file,
    })?;

    if let Err(e) = textlens::logging::init(&config.log_file) {
        eprintln!("Warning: logging disabled: {e:#}");
    }
    info!(version = env!("CARGO_PKG_VERSION"), "lens starting");

    match cli.command {
        None => textlens::tui::run(&config, None),
        Some(Commands::Tui(cmd)) => textlens::tui::run(&config, cmd.text),
        Some(Commands::Analyze(cmd)) => handle_analyze(&config, &cmd),
        Some(Commands::Status) => handle_status(&config),
    }
}

/// Determines if an error is a user error (vs internal error).
///
/// User errors are bad input such as empty text. Everything else, including
/// service and network failures, is internal.
fn is_user_error(error: &anyhow::Error) -> bool {
    error
        .chain()
        .any(|cause| {
            matches!(
                cause.downcast_ref::<AnalyzerError>(),
                Some(AnalyzerError::EmptyInput)
            )
        })
}

fn build_client(config: &Config) -> Result<AnalyzerClient> {
    AnalyzerClientBuilder::new()
        .base_url(&config.api_url)
        .timeout(config.request_timeout)
        .build()
        .context("Failed to create analysis client")
}

/// Handles the analyze command.
fn handle_analyze(config: &Config, cmd: &AnalyzeCommand) -> Result<()> {
    let text = if cmd.text == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read standard input")?;
        buf
    } else {
        cmd.text.clone()
    };

    let client = build_client(config)?;
    execute_analyze(&client, &text, cmd.json)
}

/// Runs one analysis and prints it.
///
/// Separated from `handle_analyze` so tests can pass a mock client.
fn execute_analyze(client: &dyn AnalyzerClientTrait, text: &str, json: bool) -> Result<()> {
    let response = client.analyze(text).context("Analysis request failed")?;

    if json {
        let pretty =
            serde_json::to_string_pretty(&response).context("Failed to serialize response")?;
        println!("{pretty}");
    } else {
        for line in render_plain(&response) {
            println!("{line}");
        }
    }

    if response.has_error {
        anyhow::bail!(
            "Service reported an error: {}",
            response.error.as_deref().unwrap_or("Unknown error")
        );
    }
    Ok(())
}

/// Handles the status command by querying `/` and `/settings`.
fn handle_status(config: &Config) -> Result<()> {
    let client = build_client(config)?;
    println!("Service: {}", client.base_url());

    let info = client
        .service_info()
        .context("Analysis service is unreachable")?;
    println!("  version:     {}", info.version);
    println!("  description: {}", info.description);

    match client.service_settings() {
        Ok(settings) => println!("  environment: {}", settings.environment),
        Err(e) => println!("  environment: unavailable ({e})"),
    }

    Ok(())
}
