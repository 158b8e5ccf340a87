use anyhow::Result;
use dotenvy::dotenv;
use teloxide::prelude::*;

use segmenta::cli::{Cli, Commands};
use segmenta::core::logging::{init_logger, log_split_configuration};
use segmenta::core::config;
use segmenta::split::{SplitOptions, Splitter};
use segmenta::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps};

/// Main entry point for the Telegram bot
///
/// Parses CLI arguments and dispatches to the appropriate subcommand.
///
/// # Errors
/// Returns an error if initialization fails (logging, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Set up global panic handler so a panic inside a handler is logged
    // instead of silently terminating the process
    std::panic::set_hook(Box::new(|panic_info| {
        log::error!("Panic caught: {:?}", panic_info);
        if let Some(location) = panic_info.location() {
            log::error!("Panic at {}:{}:{}", location.file(), location.line(), location.column());
        }
    }));

    // Load environment variables from .env if present (before config statics
    // are first read)
    let _ = dotenv();

    // Initialize logger (console + file)
    init_logger(&config::LOG_FILE_PATH)?;

    match cli.command {
        Some(Commands::Run) | None => run_bot().await,
        Some(Commands::Split {
            input,
            output,
            duration,
            compress,
        }) => run_cli_split(input, output, duration, compress).await,
        Some(Commands::Probe { input }) => run_cli_probe(input).await,
    }
}

/// Run the Telegram bot with long polling
async fn run_bot() -> Result<()> {
    log_split_configuration();

    // Scratch root must exist before the first upload arrives
    tokio::fs::create_dir_all(&*config::WORK_DIR).await?;

    let bot = create_bot()?;

    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to register bot commands: {}", e);
    }

    let deps = HandlerDeps::from_config();

    log::info!("🚀 The bot is starting...");

    Dispatcher::builder(bot, schema(deps))
        .dependencies(DependencyMap::new())
        .default_handler(|upd| async move {
            log::warn!("Unhandled update: {:?}", upd.kind);
        })
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    log::info!("Dispatcher shut down");
    Ok(())
}

/// Split a local file from the command line
async fn run_cli_split(input: String, output: Option<String>, duration: Option<u64>, compress: bool) -> Result<()> {
    let output_dir = output.unwrap_or_else(|| ".".to_string());
    tokio::fs::create_dir_all(&output_dir).await?;

    let mut options = SplitOptions::from_config();
    if let Some(d) = duration {
        options.segment_duration = d;
    }
    options.compress = compress;

    let splitter = Splitter::from_config();
    let parts = splitter
        .split(&input, &output_dir, &options)
        .await
        .map_err(|e| anyhow::anyhow!("Split failed: {}", e))?;

    println!("Produced {} segments:", parts.len());
    for part in parts {
        println!("  {}", part.display());
    }
    Ok(())
}

/// Print the duration of a local file in seconds
async fn run_cli_probe(input: String) -> Result<()> {
    let splitter = Splitter::from_config();
    let duration = splitter
        .probe_duration(&input)
        .await
        .map_err(|e| anyhow::anyhow!("Probe failed: {}", e))?;
    println!("{:.2}", duration);
    Ok(())
}
