//! keypoints: build fine-tuning datasets of article key points and
//! fact-check every point against its source.

mod api_key;
mod commands;
mod config;
mod context;
mod menu;
mod progress;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::commands::{ProcessArgs, VerifyArgs};
use crate::context::AppContext;

#[derive(Parser)]
#[command(name = "keypoints")]
#[command(about = "Key-point dataset curator with fact-checking", long_about = None)]
#[command(version)]
struct Cli {
    /// Suppress prompts and decorative output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Settings file (defaults to ./keypoints.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch articles and append generated key points to a dataset
    Process {
        /// Article URLs
        urls: Vec<String>,

        /// Read URLs from a file, one per line
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Dataset file to append to
        #[arg(short, long)]
        dataset: Option<PathBuf>,

        /// Attach verification results to each entry
        #[arg(long)]
        verify: bool,

        /// Regenerate key points that fail verification
        #[arg(long)]
        auto_check: bool,

        /// Regenerations allowed per article
        #[arg(long)]
        max_attempts: Option<u32>,

        /// Don't back up the dataset before writing
        #[arg(long)]
        no_backup: bool,
    },

    /// Fact-check every entry of a dataset
    Verify {
        /// Dataset to verify
        input: Option<PathBuf>,

        /// Where to write results (defaults to <input>_verified.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Save after every N entries
        #[arg(long)]
        checkpoint_every: Option<usize>,

        /// Don't back up the output file before writing
        #[arg(long)]
        no_backup: bool,
    },

    /// Strip citation markers from stored key points
    Clean {
        dataset: Option<PathBuf>,

        #[arg(long)]
        no_backup: bool,
    },

    /// Count entries missing content or key points
    Validate { dataset: Option<PathBuf> },

    /// Show verification statistics
    Stats { dataset: Option<PathBuf> },

    /// Export a dataset as ShareGPT conversations
    Convert {
        input: Option<PathBuf>,

        /// Defaults to <input>_sharegpt.json
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Manage the stored API key
    #[command(name = "api-key")]
    ApiKey {
        #[command(subcommand)]
        action: ApiKeyAction,
    },

    /// Open the interactive menu
    Menu,
}

#[derive(Subcommand)]
enum ApiKeyAction {
    /// Show the current key, masked
    Show,
    /// Prompt for a new key and save it to .env
    Set,
    /// Remove the key from .env
    Remove,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(quiet: bool) {
    let default = if quiet { "error" } else { "warn,keypoints=info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(fmt::layer().with_target(true).with_line_number(true))
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let mut ctx = AppContext::new(cli.quiet, cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Process {
            urls,
            file,
            dataset,
            verify,
            auto_check,
            max_attempts,
            no_backup,
        }) => {
            commands::process(
                &mut ctx,
                ProcessArgs {
                    urls,
                    file,
                    dataset,
                    verify,
                    auto_check,
                    max_attempts,
                    no_backup,
                },
            )
            .await
        }
        Some(Commands::Verify {
            input,
            output,
            checkpoint_every,
            no_backup,
        }) => {
            commands::verify(
                &ctx,
                VerifyArgs {
                    input,
                    output,
                    no_backup,
                    checkpoint_every,
                },
            )
            .await
        }
        Some(Commands::Clean { dataset, no_backup }) => {
            commands::clean(&ctx, dataset, no_backup).await
        }
        Some(Commands::Validate { dataset }) => commands::validate(&ctx, dataset).await,
        Some(Commands::Stats { dataset }) => commands::stats(&ctx, dataset).await,
        Some(Commands::Convert { input, output }) => commands::convert(&ctx, input, output).await,
        Some(Commands::ApiKey { action }) => match action {
            ApiKeyAction::Show => {
                api_key::show(&ctx);
                Ok(())
            }
            ApiKeyAction::Set => {
                api_key::prompt_api_key(&ctx)?;
                Ok(())
            }
            ApiKeyAction::Remove => api_key::remove(&ctx).map(|_| ()),
        },
        Some(Commands::Menu) | None => menu::run(&mut ctx).await,
    }
}
