use std::fs::File;
use std::io::BufReader;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use connprop::count::connected::{CountOptions, connect_terminals, count_connected_subsets};
use connprop::graph::Graph;
use connprop::graph::dimacs::{parse_graph_reader, to_dimacs_graph};
use connprop::graph::random::random_graph;

#[derive(Debug, Parser)]
#[command(name = "connprop")]
#[command(about = "Connected-vertex-set propagation over DIMACS graphs")]
struct Cli {
    /// Log propagation events (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    Parse { path: String },
    /// Count vertex subsets that induce a connected subgraph.
    Count {
        path: String,
        #[arg(long, default_value_t = usize::MAX)]
        cap: usize,
        /// 1-based vertices that must be in the set.
        #[arg(long, value_delimiter = ',')]
        require: Vec<usize>,
        /// 1-based vertices that must stay out of the set.
        #[arg(long, value_delimiter = ',')]
        forbid: Vec<usize>,
    },
    /// Find a small connected set joining the required vertices.
    Solve {
        path: String,
        #[arg(long, value_delimiter = ',')]
        require: Vec<usize>,
        #[arg(long, value_delimiter = ',')]
        forbid: Vec<usize>,
    },
    Gen {
        #[arg(long)]
        vertices: usize,
        #[arg(long, default_value_t = 0.3)]
        p: f64,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long)]
        emit: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;
    match cli.command {
        Cmd::Parse { path } => parse_cmd(&path)?,
        Cmd::Count {
            path,
            cap,
            require,
            forbid,
        } => count_cmd(&path, cap, &require, &forbid)?,
        Cmd::Solve {
            path,
            require,
            forbid,
        } => solve_cmd(&path, &require, &forbid)?,
        Cmd::Gen {
            vertices,
            p,
            seed,
            emit,
        } => gen_cmd(vertices, p, seed, &emit)?,
    }
    Ok(())
}

fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn load_graph(path: &str) -> Result<Graph> {
    let file = File::open(path)?;
    parse_graph_reader(BufReader::new(file))?.build()
}

fn to_zero_based(vertices: &[usize]) -> Result<Vec<usize>> {
    vertices
        .iter()
        .map(|&v| {
            if v == 0 {
                bail!("vertices are numbered from 1");
            }
            Ok(v - 1)
        })
        .collect()
}

fn parse_cmd(path: &str) -> Result<()> {
    let graph = load_graph(path)?;
    let max_degree = (0..graph.num_vertices())
        .map(|v| graph.neighbors(v).len())
        .max()
        .unwrap_or(0);
    println!(
        "vertices={} edges={} max_degree={}",
        graph.num_vertices(),
        graph.num_edges(),
        max_degree
    );
    Ok(())
}

fn count_cmd(path: &str, cap: usize, require: &[usize], forbid: &[usize]) -> Result<()> {
    let graph = load_graph(path)?;
    let report = count_connected_subsets(
        &graph,
        &CountOptions {
            cap,
            required: to_zero_based(require)?,
            forbidden: to_zero_based(forbid)?,
        },
    )?;
    println!(
        "vertices={} edges={} count={} hit_cap={}",
        report.vertices, report.edges, report.count, report.hit_cap
    );
    println!(
        "decisions={} propagations={} conflicts={}",
        report.stats.decisions, report.stats.propagations, report.stats.conflicts
    );
    Ok(())
}

fn solve_cmd(path: &str, require: &[usize], forbid: &[usize]) -> Result<()> {
    let graph = load_graph(path)?;
    match connect_terminals(&graph, &to_zero_based(require)?, &to_zero_based(forbid)?)? {
        Some(set) => {
            let shown = set
                .iter()
                .map(|v| (v + 1).to_string())
                .collect::<Vec<_>>()
                .join(" ");
            println!("SAT size={} vertices: {}", set.len(), shown);
        }
        None => println!("UNSAT"),
    }
    Ok(())
}

fn gen_cmd(vertices: usize, p: f64, seed: u64, emit: &str) -> Result<()> {
    let graph = random_graph(vertices, p, seed)?;
    std::fs::write(emit, to_dimacs_graph(&graph))?;
    println!("vertices={} edges={} seed={}", graph.num_vertices(), graph.num_edges(), seed);
    Ok(())
}
