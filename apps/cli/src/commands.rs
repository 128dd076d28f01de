//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use docsteps_content::FsContentSource;
use docsteps_core::aggregator::load_all;
use docsteps_core::cache::TutorialCache;
use docsteps_core::catalog::{Catalog, TopicFilter};
use docsteps_core::location::{LocationKind, classify};
use docsteps_core::navigation::NavigationTracker;
use docsteps_shared::{
    AppConfig, NavigationState, RouteConfig, Step, init_config, load_config, load_config_from,
};
use tracing::{error, info, warn};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// docsteps: multi-step tutorials for documentation sites.
#[derive(Parser)]
#[command(
    name = "docsteps",
    version,
    about = "Resolve, validate, and navigate multi-step documentation tutorials.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.docsteps/docsteps.toml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Tutorial content directory (overrides `content.root`).
    #[arg(long, env = "DOCSTEPS_ROOT", global = true)]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// List tutorials, optionally filtered by title and topic.
    List {
        /// Case-insensitive title search.
        #[arg(short, long, default_value = "")]
        search: String,

        /// Topic label, or "All topics".
        #[arg(short, long, default_value = docsteps_core::catalog::ALL_TOPICS)]
        topic: String,

        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Build every tutorial and fail on the first authoring error.
    Check,

    /// Show the active step and pagination for a site location.
    Nav {
        /// Location as the router reports it, e.g. /tutorials/intro/setup.
        location: String,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "docsteps=info,docsteps_core=info,docsteps_content=info",
        1 => "docsteps=debug,docsteps_core=debug,docsteps_content=debug",
        _ => "docsteps=trace,docsteps_core=trace,docsteps_content=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };

    match cli.command {
        Command::List {
            ref search,
            ref topic,
            json,
        } => cmd_list(&Workspace::new(&config, cli.root.clone()), search, topic, json),
        Command::Check => cmd_check(&Workspace::new(&config, cli.root.clone())),
        Command::Nav { ref location, json } => {
            cmd_nav(&Workspace::new(&config, cli.root.clone()), location, json)
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(&config),
        },
    }
}

/// Content source and routes resolved from config + flags.
struct Workspace {
    source: FsContentSource,
    routes: RouteConfig,
}

impl Workspace {
    fn new(config: &AppConfig, root_override: Option<PathBuf>) -> Self {
        let root = root_override.unwrap_or_else(|| PathBuf::from(&config.content.root));
        Self {
            source: FsContentSource::new(root, &config.content),
            routes: RouteConfig::from(config),
        }
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_list(ws: &Workspace, search: &str, topic: &str, json: bool) -> Result<()> {
    let topic: TopicFilter = topic
        .parse()
        .wrap_err_with(|| format!("valid topics: {}", TopicFilter::options().join(", ")))?;

    let mut cache = TutorialCache::new(ws.routes.clone());
    let catalog = Catalog::load(&ws.source, &mut cache)?;
    let cards = catalog.filter(search, topic);

    info!(total = catalog.tutorials().len(), shown = cards.len(), "listing tutorials");

    if json {
        println!("{}", serde_json::to_string_pretty(&cards)?);
        return Ok(());
    }

    if cards.is_empty() {
        println!("No tutorials match.");
        return Ok(());
    }

    for card in &cards {
        println!();
        match &card.first_step {
            Some(_) => println!("  {}", card.meta.title),
            None => println!("  {} (no steps found)", card.meta.title),
        }
        println!("  Topic:  {}", card.meta.label);
        println!("  About:  {}", card.meta.description);
        println!("  Steps:  {}", card.step_count);
        if let Some(first) = &card.first_step {
            println!("  Start:  {first}");
        }
    }
    println!();

    Ok(())
}

fn cmd_check(ws: &Workspace) -> Result<()> {
    info!(root = %ws.source.root().display(), "checking tutorials");

    let tutorials = match load_all(&ws.source, &ws.routes) {
        Ok(tutorials) => tutorials,
        Err(e) if e.is_content_error() => {
            error!(error = %e, "authoring error blocks publishing");
            return Err(e).wrap_err("tutorial content is invalid");
        }
        Err(e) => return Err(e).wrap_err("could not read tutorial content"),
    };

    let mut empty = 0;
    for tutorial in &tutorials {
        if tutorial.is_empty() {
            empty += 1;
            warn!(tutorial = %tutorial.id(), "tutorial has no steps");
        }
        for (path, sources) in tutorial.duplicate_paths() {
            warn!(tutorial = %tutorial.id(), path, ?sources, "several steps share one route");
        }
        println!(
            "  ok  {:<24} {:>3} steps  [{}]",
            tutorial.id(),
            tutorial.steps().len(),
            tutorial.meta().label
        );
    }

    println!();
    println!(
        "  {} tutorials checked, {} without steps.",
        tutorials.len(),
        empty
    );

    Ok(())
}

fn cmd_nav(ws: &Workspace, location: &str, json: bool) -> Result<()> {
    match classify(location, &ws.routes) {
        LocationKind::Tutorial(_) => {}
        LocationKind::TutorialHome => {
            println!("{location} is the tutorial list.");
            return Ok(());
        }
        LocationKind::Docs | LocationKind::Unknown => {
            println!("{location} is not a tutorial page.");
            return Ok(());
        }
    }

    let mut cache = TutorialCache::new(ws.routes.clone());
    let mut tracker = NavigationTracker::new();
    let state = tracker.follow_location(location, &mut cache, &ws.source)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&*state)?);
        return Ok(());
    }

    let Some(tutorial) = tracker.tutorial() else {
        println!("No tutorial found for {location}.");
        return Ok(());
    };

    println!();
    println!("  Tutorial: {} ({})", tutorial.meta().title, tutorial.id());
    print_state(&state);
    println!();

    Ok(())
}

fn print_state(state: &NavigationState) {
    fn describe(step: Option<&Step>) -> String {
        match step {
            Some(step) => match step.title() {
                Some(title) => format!("{}  ({title})", step.path),
                None => step.path.clone(),
            },
            None => "-".to_string(),
        }
    }

    if !state.is_on_step() {
        println!("  Not on a step of this tutorial.");
        return;
    }

    println!("  Active:   {}", describe(state.active_step.as_ref()));
    println!("  Previous: {}", describe(state.prev.as_ref()));
    println!("  Next:     {}", describe(state.next.as_ref()));
    if state.ambiguous {
        println!("  (several steps share this route; the lowest position was chosen)");
    }
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config: &AppConfig) -> Result<()> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{toml_str}");
    Ok(())
}
