use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

use scenegen::{
    DEFAULT_MODEL, GeminiClient, GeminiConfig, GenerationConfig, execute_stage0, execute_stage1,
    execute_stage2, load_system_prompt,
};

#[derive(Parser)]
#[command(name = "scenegen")]
#[command(author, version, about = "Generate scenarios from conversation history CSV", long_about = None)]
struct Cli {
    /// Input CSV with an `input` column (and optionally `id`)
    #[arg(short, long, default_value = "secom_dt.csv")]
    input: PathBuf,

    /// Output file for the generated scenarios (JSON)
    #[arg(short, long, default_value = "scenarios_output.json")]
    output: PathBuf,

    /// File whose content replaces the built-in system prompt
    #[arg(
        short = 's',
        long = "system_prompt_file",
        visible_alias = "system-prompt-file",
        default_value = "system_prompt.txt"
    )]
    system_prompt_file: PathBuf,

    /// Gemini model to use
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Sampling temperature
    #[arg(long, default_value = "0.8")]
    temperature: f64,

    /// Minimum delay between API requests in milliseconds
    #[arg(long, default_value = "1000")]
    delay_ms: u64,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; the key may come from the real environment.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    setup_logging(cli.verbose);
    run(cli).await
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

async fn run(cli: Cli) -> Result<()> {
    let instruction = load_system_prompt(Some(cli.system_prompt_file.as_path()))
        .context("Failed to load system prompt")?;

    let api_config = GeminiConfig::from_env(cli.model.as_str())
        .context("Gemini is not configured")?
        .with_temperature(cli.temperature);
    let client = GeminiClient::new(api_config).context("Failed to build HTTP client")?;
    info!("Using model {}", client.config().model);

    // Stage 0: Load input
    let loaded = execute_stage0(&cli.input).context("Failed to read input CSV")?;

    // Stage 1: Generate scenarios
    let generation_config = GenerationConfig {
        request_interval: Duration::from_millis(cli.delay_ms),
    };
    let result = execute_stage1(&client, &loaded.records, &instruction, &generation_config).await;

    // Stage 2: Write output
    execute_stage2(&cli.output, &result.scenarios).context("Failed to save output")?;

    // Summary
    info!(
        "Complete: {} of {} records saved ({} failed, {} malformed rows skipped)",
        result.scenarios.len(),
        result.attempted,
        result.failures.len(),
        loaded.skipped_rows
    );
    if !result.failures.is_empty() {
        let lines: Vec<String> = result.failures.iter().map(|f| f.line.to_string()).collect();
        warn!("Failed input lines: {}", lines.join(", "));
    }

    Ok(())
}
