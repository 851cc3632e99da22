use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use iocraft::prelude::*;

use qa_board::app::{App, ViewKind};
use qa_board::color::ColorDepth;
use qa_board::config::keybindings::MergedBindings;
use qa_board::config::loader;
use qa_board::engine::{Engine, MockEngine};
use qa_board::filter::{self, ConversationFilter, QuickFilter};
use qa_board::report;
use qa_board::repository::{MockRepository, Repository};
use qa_board::theme::{Background, ResolvedTheme};

#[derive(Parser)]
#[command(name = "qa-board", version, about = "Bot conversation QA dashboard")]
struct Cli {
    /// Path to config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON fixture to load instead of the built-in sample data.
    #[arg(long)]
    data: Option<PathBuf>,

    /// Enable debug logging to debug.log.
    #[arg(long)]
    debug: bool,

    /// View to open first.
    #[arg(long, value_enum)]
    view: Option<ViewKind>,

    /// Open the conversation list scoped to this bot id.
    #[arg(long)]
    bot: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the bot list.
    Bots {
        /// Case-insensitive match on name, id or tags.
        #[arg(long)]
        search: Option<String>,
    },
    /// Print the conversation list.
    Conversations {
        /// Case-insensitive match on id, bot name or QA answer.
        #[arg(long)]
        search: Option<String>,
        /// Quick filter: policy-fail, score-low or need-fix. Repeatable.
        #[arg(long = "filter")]
        filters: Vec<QuickFilter>,
        /// Only conversations of this bot.
        #[arg(long)]
        bot: Option<String>,
    },
    /// Print the effective evaluation prompt.
    Prompt,
}

fn main() -> Result<()> {
    // Install a panic hook that writes to a file, since the fullscreen TUI
    // swallows stderr.
    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::force_capture();
        let msg = format!("{info}\n\n{backtrace}");
        let _ = std::fs::write("panic.log", &msg);
        eprintln!("{msg}");
    }));

    let cli = Cli::parse();

    // Set up tracing.
    if cli.debug {
        let file = std::fs::File::create("debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(file)
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
    }

    // Load config and data.
    let config = loader::load_config(cli.config.as_deref())?;
    let repo = match cli.data.as_ref().or(config.data.fixture.as_ref()) {
        Some(path) => MockRepository::from_path(path)
            .with_context(|| format!("loading data from {}", path.display()))?,
        None => MockRepository::embedded().context("loading built-in sample data")?,
    };

    // Handle subcommands that don't need the TUI.
    match cli.command {
        Some(Commands::Bots { search }) => {
            let bots = repo.list_bots();
            let hits: Vec<_> = filter::filter_bots(bots, search.as_deref().unwrap_or_default())
                .into_iter()
                .map(|i| &bots[i])
                .collect();
            print!("{}", report::bot_table(&hits));
            return Ok(());
        }
        Some(Commands::Conversations {
            search,
            filters,
            bot,
        }) => {
            let conv_filter = ConversationFilter {
                query: search.unwrap_or_default(),
                quick: filters.into_iter().collect(),
                bot_id: bot,
            };
            let listed = repo.list_conversations(&conv_filter);
            let refs: Vec<_> = listed.iter().collect();
            print!(
                "{}",
                report::conversation_table(&refs, &repo, config.defaults.table_label_max)
            );
            return Ok(());
        }
        Some(Commands::Prompt) => {
            let settings = config.evaluation.prompt_settings();
            println!("{}", settings.effective_prompt());
            return Ok(());
        }
        None => {}
    }

    if let Some(bot_id) = cli.bot.as_deref()
        && repo.bot(bot_id).is_none()
    {
        anyhow::bail!("unknown bot id: {bot_id}");
    }

    // Detect terminal capabilities.
    let color_depth = ColorDepth::detect();
    let background = Background::detect();
    let theme = ResolvedTheme::resolve(&config.theme, background);
    let keybindings = MergedBindings::from_config(&config.keybindings);

    // Start the mock backend in a dedicated OS thread (owns its own Tokio
    // runtime). Dropping `engine_handle` at the end of `main` closes the
    // sender channel, signalling the engine to shut down.
    let engine_handle = MockEngine::new(Arc::new(repo))
        .failing(config.data.fail_commands)
        .start();

    tracing::info!("qa-board starting");

    // Enter fullscreen TUI (iocraft uses smol internally).
    smol::block_on(
        element! {
            App(
                config: &config,
                engine: &engine_handle,
                theme: &theme,
                keybindings: &keybindings,
                color_depth,
                initial_view: cli.view,
                initial_bot: cli.bot,
            )
        }
        .fullscreen(),
    )?;

    Ok(())
}
