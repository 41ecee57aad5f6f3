//! Relgraph CLI: inspect the relationship graph of a directory of notes.
//!
//! Usage:
//!   relgraph [--config path] [-v] scan <DIR>
//!   relgraph graph <DIR> [--filter text]
//!   relgraph layout <DIR> [--ticks N] [--seed S]

use clap::{Parser, Subcommand};
use relgraph::{GraphEngine, GraphView, Settings, Simulation, Vault};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "relgraph",
    version,
    about = "Typed relationships between markdown documents"
)]
struct Cli {
    /// Settings file (defaults to <config dir>/relgraph/settings.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every relationship declared in a directory
    Scan {
        /// Directory of markdown documents
        dir: PathBuf,
    },
    /// Print the graph model as JSON
    Graph {
        /// Directory of markdown documents
        dir: PathBuf,
        /// Only keep edges whose label contains this text
        #[arg(long)]
        filter: Option<String>,
    },
    /// Settle the layout and print the positioned view as JSON
    Layout {
        /// Directory of markdown documents
        dir: PathBuf,
        /// Upper bound on simulation ticks
        #[arg(long, default_value = "2000")]
        ticks: usize,
        /// Seed for reproducible placement of new nodes
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn open_engine(dir: &Path, settings: Settings) -> Result<GraphEngine, String> {
    let vault = Vault::open(dir).map_err(|e| format!("Failed to open {}: {}", dir.display(), e))?;
    let mut engine = GraphEngine::with_settings(settings);
    engine.full_scan(vault.contents());
    Ok(engine)
}

fn print_json<T: Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_scan(engine: &GraphEngine) -> i32 {
    let index = engine.index();
    if index.is_empty() {
        println!("No relationships found.");
        return 0;
    }
    println!(
        "{:<24}  {:>5}  {:<13}  {:<24}  {}",
        "SOURCE", "LINE", "DIRECTION", "TARGET", "LABEL"
    );
    println!("{}", "-".repeat(80));
    for rel in index.all_relationships() {
        let target = if engine.exists(&rel.target_file) {
            rel.target_file.clone()
        } else {
            format!("{} (missing)", rel.target_file)
        };
        println!(
            "{:<24}  {:>5}  {:<13}  {:<24}  {}",
            rel.source_file,
            rel.line,
            rel.direction.as_str(),
            target,
            rel.label.as_deref().unwrap_or("")
        );
    }
    println!(
        "\n{} relationships in {} documents",
        index.len(),
        index.source_count()
    );
    0
}

fn cmd_graph(engine: &GraphEngine) -> i32 {
    print_json(&engine.model(Vec::<String>::new()))
}

fn cmd_layout(engine: &GraphEngine, ticks: usize, seed: Option<u64>) -> i32 {
    let model = engine.model(Vec::<String>::new());
    let params = engine.settings().layout_params();
    let mut sim = match seed {
        Some(seed) => Simulation::with_seed(params, seed),
        None => Simulation::new(params),
    };
    sim.sync(&model);
    let used = sim.settle(ticks);
    if !sim.is_settled() {
        eprintln!("Warning: layout not settled after {} ticks", used);
    }
    print_json(&GraphView::compose(&model, &sim, engine.settings()))
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut settings = match Settings::load_or_default(cli.config.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let dir = match &cli.command {
        Commands::Scan { dir } | Commands::Graph { dir, .. } | Commands::Layout { dir, .. } => {
            dir.clone()
        }
    };
    if let Commands::Graph {
        filter: Some(filter),
        ..
    } = &cli.command
    {
        settings.label_filter = filter.clone();
    }

    let engine = match open_engine(&dir, settings) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let code = match cli.command {
        Commands::Scan { .. } => cmd_scan(&engine),
        Commands::Graph { .. } => cmd_graph(&engine),
        Commands::Layout { ticks, seed, .. } => cmd_layout(&engine, ticks, seed),
    };
    std::process::exit(code);
}
