use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tracing_subscriber::EnvFilter;

use recipe_application::{AppIntent, RecipeApp};
use recipe_core::config::ClientConfig;
use recipe_core::view::ViewSelection;
use recipe_interaction::HttpRecipeApi;

mod commands;
mod render;

use commands::{Command, Target};

const COMMAND_NAMES: &[&str] = &[
    "add", "all", "back", "cancel", "delete", "edit", "fav", "favorites", "help", "login",
    "logout", "mode", "open", "quit", "refresh", "register", "save", "search", "set", "submit",
    "theme",
];

#[derive(Parser)]
#[command(name = "recipes")]
#[command(about = "Recipe Explorer - browse, search and curate recipes", long_about = None)]
struct Cli {
    /// Base URL of the recipe service (overrides RECIPES_API_URL and the config file)
    #[arg(long)]
    base_url: Option<String>,

    /// TOML file with client settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,
}

/// Completes command names at the start of the line.
struct ReplHelper;

impl Helper for ReplHelper {}

impl Completer for ReplHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if line.contains(' ') {
            return Ok((0, vec![]));
        }

        let candidates = COMMAND_NAMES
            .iter()
            .filter(|name| name.starts_with(line))
            .map(|name| Pair {
                display: name.to_string(),
                replacement: name.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Hinter for ReplHelper {
    type Hint = String;
}

impl Highlighter for ReplHelper {}

impl Validator for ReplHelper {}

enum Flow {
    Continue,
    Quit,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => ClientConfig::load_file(path)?,
        None => ClientConfig::default(),
    }
    .with_env()?
    .with_base_url_override(cli.base_url.as_deref())?;
    tracing::info!("[Cli] Using recipe service at {}", config.base_url);

    let api = Arc::new(HttpRecipeApi::new(&config).context("Failed to build HTTP client")?);
    let app = RecipeApp::new(api);

    println!("{}", render::render(&app.snapshot().await));
    app.start().await;
    println!("{}", render::render(&app.snapshot().await));
    println!("{}", "Type 'help' for commands.".bright_black());

    let mut rl: Editor<ReplHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(ReplHelper));

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                match execute(&app, &mut rl, trimmed).await {
                    Ok(Flow::Quit) => break,
                    Ok(Flow::Continue) => {
                        println!("{}", render::render(&app.snapshot().await));
                    }
                    Err(e) => {
                        let snapshot = app.snapshot().await;
                        println!("{}", render::render(&snapshot));
                        // Refetch failures are already part of the rendered status.
                        if snapshot.collection.last_error.as_ref() != Some(&e) {
                            println!("{}", format!("Error: {e}").red());
                        }
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    println!("{}", "Goodbye!".bright_green());
    Ok(())
}

async fn execute(
    app: &RecipeApp,
    rl: &mut Editor<ReplHelper, DefaultHistory>,
    line: &str,
) -> recipe_core::Result<Flow> {
    let intent = match commands::parse(line)? {
        Command::Quit => return Ok(Flow::Quit),
        Command::Help => {
            println!("{}", commands::HELP);
            return Ok(Flow::Continue);
        }
        Command::Intent(intent) => intent,
        Command::Open(arg) => match commands::resolve_target(&arg, &app.snapshot().await) {
            Target::Loaded(recipe) => AppIntent::Select(recipe),
            Target::Id(id) => AppIntent::Open(id),
        },
        Command::Favorite(number) => {
            AppIntent::ToggleFavorite(commands::favorite_target(number, &app.snapshot().await)?)
        }
        Command::Delete => {
            if let ViewSelection::Detail(recipe) = app.view().await {
                if !confirm(rl, &format!("Delete \"{}\"? (yes/no) ", recipe.title)) {
                    println!("{}", "Nothing deleted.".bright_black());
                    return Ok(Flow::Continue);
                }
            }
            AppIntent::Delete
        }
    };

    app.dispatch(intent).await?;
    Ok(Flow::Continue)
}

fn confirm(rl: &mut Editor<ReplHelper, DefaultHistory>, prompt: &str) -> bool {
    rl.readline(prompt)
        .map(|answer| matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
        .unwrap_or(false)
}
