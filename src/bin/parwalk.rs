use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use parwalk::{FrontierBfs, Graph, TaskDfs, TraversalConfig};

#[derive(Parser)]
#[command(name = "parwalk")]
#[command(about = "Parallel BFS/DFS over an adjacency-list graph", long_about = None)]
struct Cli {
    /// JSON adjacency list (`[[1,2],[0],...]`); the built-in sample graph if omitted
    #[arg(long)]
    graph: Option<PathBuf>,

    /// Start node
    #[arg(long, default_value_t = 0)]
    start: usize,

    /// Traversal to run
    #[arg(long, value_enum, default_value_t = Algorithm::Both)]
    algorithm: Algorithm,

    /// Worker threads (overrides PARWALK_THREADS)
    #[arg(long)]
    threads: Option<usize>,

    /// BFS frontier chunk size (overrides PARWALK_CHUNK_SIZE)
    #[arg(long)]
    chunk_size: Option<usize>,

    /// DFS task cap (overrides PARWALK_MAX_TASKS)
    #[arg(long)]
    max_tasks: Option<usize>,

    /// Print BFS levels instead of the flat order
    #[arg(long, default_value_t = false)]
    levels: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Algorithm {
    Bfs,
    Dfs,
    Both,
}

fn sample_graph() -> Result<Graph> {
    Ok(Graph::from_adjacency(&[
        vec![1, 2],
        vec![0, 3, 4],
        vec![0, 4],
        vec![1, 5],
        vec![1, 2, 5],
        vec![3, 4],
    ])?)
}

fn load_graph(path: Option<&PathBuf>) -> Result<Graph> {
    let Some(path) = path else {
        return sample_graph();
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read graph file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse graph file {}", path.display()))
}

fn config_from(cli: &Cli) -> Result<TraversalConfig> {
    let mut config = TraversalConfig::from_env().context("invalid PARWALK_* environment")?;
    if let Some(threads) = cli.threads {
        config = config.with_threads(threads);
    }
    if let Some(chunk_size) = cli.chunk_size {
        config = config.with_chunk_size(chunk_size);
    }
    if let Some(max_tasks) = cli.max_tasks {
        config = config.with_max_tasks(max_tasks);
    }
    config.validate()?;
    Ok(config)
}

fn join(nodes: &[usize]) -> String {
    nodes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let graph = load_graph(cli.graph.as_ref())?;
    let config = config_from(&cli)?;
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        threads = config.threads,
        "graph loaded"
    );

    if matches!(cli.algorithm, Algorithm::Bfs | Algorithm::Both) {
        let bfs = FrontierBfs::new(config.clone());
        if cli.levels {
            let levels = bfs.run_levels(&graph, cli.start)?;
            println!("Parallel BFS levels:");
            for (depth, level) in levels.iter().enumerate() {
                println!("  {depth}: {}", join(level));
            }
        } else {
            let order = bfs.run(&graph, cli.start)?;
            println!("Parallel BFS: {}", join(&order));
        }
    }

    if matches!(cli.algorithm, Algorithm::Dfs | Algorithm::Both) {
        let order = TaskDfs::new(config).run(&graph, cli.start)?;
        println!("Parallel DFS: {}", join(&order));
    }

    Ok(())
}
