mod config;
mod console;
mod input;
mod output;
mod session;
mod tui;

use clap::Parser;
use pairrank_core::{OracleError, Ranking, max_comparisons, min_comparisons, sort};
use rand::seq::SliceRandom;
use std::io::{self, StdinLock};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::config::PairrankConfig;
use crate::console::ConsoleOracle;
use crate::input::ItemSource;
use crate::session::SessionOutcome;
use crate::tui::TerminalUi;

pub fn bail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}

#[derive(Parser)]
#[command(
    name = "pairrank",
    version,
    about = "Rank items by answering pairwise \"which do you prefer?\" questions"
)]
struct Cli {
    /// Items to rank, one per argument (ignored when --file is given)
    items: Vec<String>,

    /// File with one item per line (blank lines ignored)
    #[arg(long)]
    file: Option<PathBuf>,

    /// Answer comparisons in a terminal UI (← / → or h / l) instead of the line prompt
    #[arg(long)]
    tui: bool,

    /// Also write the final ranking to this file
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Print the ranking as JSON instead of a numbered list
    #[arg(long)]
    json: bool,

    /// Shuffle items before sorting
    #[arg(long)]
    shuffle: bool,

    /// Debug logging on stderr
    #[arg(short, long)]
    verbose: bool,

    /// Path to config file (default: ~/.config/pairrank/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Create a default config file and exit
    #[arg(long)]
    init_config: bool,
}

fn init_logging(verbose: bool, tui: bool) {
    // Anything below warn would draw over the alternate screen.
    let default = if verbose && !tui {
        "pairrank=debug,pairrank_core=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();

    let config_path = cli.config.clone().or_else(config::config_path);

    if cli.init_config {
        let path = config_path.unwrap_or_else(|| bail("HOME is not set; pass --config <path>"));
        config::create_default_config(&path);
        println!("Created config at {}", path.display());
        return;
    }

    let cfg = config_path
        .as_deref()
        .map(config::load_config)
        .unwrap_or_else(PairrankConfig::default);

    let tui = cli.tui || cfg.tui.unwrap_or(false);
    let shuffle = cli.shuffle || cfg.shuffle.unwrap_or(false);
    let verbose = cli.verbose || cfg.verbose.unwrap_or(false);
    let output_path = cli.output.clone().or_else(|| cfg.output.map(PathBuf::from));

    init_logging(verbose, tui);

    // One shared input stream: item capture first, then the console oracle.
    let mut stdin = io::stdin().lock();
    let source = ItemSource::select(cli.file.as_deref(), &cli.items);
    let mut items = input::load_items(source, &mut stdin, &mut io::stdout()).unwrap_or_else(|e| bail(e));

    if shuffle {
        items.shuffle(&mut rand::rng());
    }

    info!(
        items = items.len(),
        min_comparisons = min_comparisons(items.len()),
        max_comparisons = max_comparisons(items.len()),
        tui,
        "starting sort"
    );

    let ranking = if tui {
        drop(stdin);
        run_tui(items)
    } else {
        run_console(items, stdin)
    };

    let Some(ranking) = ranking else {
        println!("Quitting.");
        return;
    };
    debug!(comparisons = ranking.comparisons(), "sort complete");

    if cli.json {
        output::print_json(&ranking).unwrap_or_else(|e| bail(format!("Failed to render JSON: {e}")));
    } else {
        output::print_ranking(&ranking).unwrap_or_else(|e| bail(format!("Failed to print ranking: {e}")));
    }

    if let Some(path) = output_path {
        output::write_ranking_file(&ranking, &path)
            .unwrap_or_else(|e| bail(format!("Failed to write output to {}: {e}", path.display())));
    }
}

/// `None` when the user quit.
fn run_console(items: Vec<String>, input: StdinLock<'static>) -> Option<Ranking> {
    println!("\nGot {} items. We'll ask pairwise questions to rank them.", items.len());
    println!("On each prompt enter 1 or 2 to choose the item you prefer. Enter q to quit.\n");

    let mut oracle = ConsoleOracle::new(input, io::stdout());
    match sort(&items, &mut oracle) {
        Ok(ranking) => Some(ranking),
        Err(OracleError::Cancelled) => None,
        Err(e) => bail(e),
    }
}

/// `None` when the user quit.
fn run_tui(items: Vec<String>) -> Option<Ranking> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|e| bail(format!("Failed to start async runtime: {e}")));

    let ui = TerminalUi::new(max_comparisons(items.len()));
    match runtime.block_on(session::run_session(items, ui)) {
        Ok(SessionOutcome::Completed(ranking)) => Some(ranking),
        Ok(SessionOutcome::Aborted) => None,
        Err(e) => bail(format!("Failed to run TUI: {e}")),
    }
}
