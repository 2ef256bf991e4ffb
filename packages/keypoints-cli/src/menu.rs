//! Interactive menu, shown when no subcommand is given.

use anyhow::Result;
use console::style;
use dialoguer::{Input, Select};
use keypoints::fetchers::validate_url;
use keypoints::verified_output_path;

use crate::api_key;
use crate::commands::{self, sharegpt_output_path, ProcessArgs, VerifyArgs};
use crate::context::AppContext;

/// Actions offered by the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    ProcessUrls,
    Clean,
    Stats,
    Validate,
    Verify,
    Convert,
    ManageApiKey,
    Exit,
}

impl MenuAction {
    pub const ALL: [MenuAction; 8] = [
        MenuAction::ProcessUrls,
        MenuAction::Clean,
        MenuAction::Stats,
        MenuAction::Validate,
        MenuAction::Verify,
        MenuAction::Convert,
        MenuAction::ManageApiKey,
        MenuAction::Exit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuAction::ProcessUrls => "🌐 Process URLs",
            MenuAction::Clean => "🧹 Clean existing dataset",
            MenuAction::Stats => "📊 View dataset info",
            MenuAction::Validate => "✅ Validate dataset",
            MenuAction::Verify => "🔍 Verify dataset key points",
            MenuAction::Convert => "🔄 Convert to ShareGPT format",
            MenuAction::ManageApiKey => "🔑 Manage API key",
            MenuAction::Exit => "❌ Exit",
        }
    }
}

pub async fn run(ctx: &mut AppContext) -> Result<()> {
    print_banner();
    let labels: Vec<&str> = MenuAction::ALL.iter().map(|a| a.label()).collect();

    loop {
        println!();
        let selection = Select::with_theme(&ctx.theme())
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        let action = MenuAction::ALL[selection];
        if action == MenuAction::Exit {
            println!("{}", style("👋 Goodbye!").blue());
            return Ok(());
        }

        // A failed action reports and returns to the menu.
        if let Err(e) = dispatch(ctx, action).await {
            ctx.print_error(&format!("Error: {:#}", e));
        }
    }
}

async fn dispatch(ctx: &mut AppContext, action: MenuAction) -> Result<()> {
    let default_dataset = ctx.settings.dataset.clone();

    match action {
        MenuAction::ProcessUrls => {
            let dataset = ctx.prompt_path("Dataset path", &default_dataset)?;
            let backup = ctx.confirm("Create backup before processing?", true)?;
            let verify = ctx.confirm("Verify key points against original content?", false)?;
            let auto_check = ctx.confirm(
                "Regenerate key points that fail verification?",
                ctx.settings.extraction.auto_check_enabled,
            )?;

            let urls = prompt_urls(ctx)?;
            if !ctx.confirm(&format!("Process {} URL(s)?", urls.len()), true)? {
                ctx.print_warning("Operation cancelled");
                return Ok(());
            }

            commands::process(
                ctx,
                ProcessArgs {
                    urls,
                    dataset: Some(dataset),
                    verify,
                    auto_check,
                    no_backup: !backup,
                    ..Default::default()
                },
            )
            .await
        }
        MenuAction::Clean => {
            let dataset = ctx.prompt_path("Dataset path", &default_dataset)?;
            let backup = ctx.confirm("Create backup before cleaning?", true)?;
            commands::clean(ctx, Some(dataset), !backup).await
        }
        MenuAction::Stats => {
            let dataset = ctx.prompt_path("Dataset path", &default_dataset)?;
            commands::stats(ctx, Some(dataset)).await
        }
        MenuAction::Validate => {
            let dataset = ctx.prompt_path("Dataset path", &default_dataset)?;
            commands::validate(ctx, Some(dataset)).await
        }
        MenuAction::Verify => {
            let input = ctx.prompt_path("Input dataset path", &default_dataset)?;
            let output = ctx.prompt_path("Output dataset path", &verified_output_path(&input))?;
            let backup = ctx.confirm("Create backup before processing?", true)?;
            commands::verify(
                ctx,
                VerifyArgs {
                    input: Some(input),
                    output: Some(output),
                    no_backup: !backup,
                    checkpoint_every: None,
                },
            )
            .await
        }
        MenuAction::Convert => {
            let input = ctx.prompt_path("Input dataset path", &default_dataset)?;
            let output = ctx.prompt_path("Output path", &sharegpt_output_path(&input))?;
            commands::convert(ctx, Some(input), Some(output)).await
        }
        MenuAction::ManageApiKey => api_key::manage(ctx),
        MenuAction::Exit => Ok(()),
    }
}

/// Collect at least one URL from the user.
fn prompt_urls(ctx: &AppContext) -> Result<Vec<String>> {
    let mut urls = Vec::new();

    loop {
        let url: String = Input::with_theme(&ctx.theme())
            .with_prompt("Enter URL (or press Enter to finish)")
            .allow_empty(true)
            .validate_with(|input: &String| -> std::result::Result<(), &'static str> {
                if input.trim().is_empty() || validate_url(input).is_ok() {
                    Ok(())
                } else {
                    Err("Invalid URL format")
                }
            })
            .interact_text()?;
        let url = url.trim().to_string();

        if url.is_empty() {
            if urls.is_empty() {
                ctx.print_warning("Please enter at least one URL");
                continue;
            }
            return Ok(urls);
        }

        ctx.print_success(&format!("Added URL: {}", url));
        urls.push(url);

        if !ctx.confirm("Add another URL?", true)? {
            return Ok(urls);
        }
    }
}

fn print_banner() {
    println!(
        "{}",
        style("╔════════════════════════════════════════╗").cyan()
    );
    println!(
        "{}",
        style("║        Key Points Dataset Curator      ║").cyan()
    );
    println!(
        "{}",
        style("╚════════════════════════════════════════╝").cyan()
    );
}
