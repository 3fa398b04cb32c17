//! Meld facts CLI
//!
//! Command-line front end for database dumps written by the Meld runtime:
//! - summaries and canonical re-dumps (text or JSON)
//! - graph coloring checks
//! - predicate argument totals
//! - benchmark graph generation

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use colored::Colorize;
use meld_facts::analysis::{check_coloring, sum_argument, ColoringPredicates};
use meld_facts::digest::database_digest_v1;
use meld_facts::generate::GraphWriter;
use std::collections::BTreeMap;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod input;

use input::{name_filter, Source};

#[derive(Parser)]
#[command(name = "meld-facts")]
#[command(author, version, about = "Inspect, check and generate Meld fact files")]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` wins when set.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct DumpInput {
    /// Database dump; `-` or omitted reads stdin
    input: Option<PathBuf>,
    /// Keep only facts with this predicate name (repeatable)
    #[arg(long = "only", value_name = "NAME")]
    only: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Node, fact and per-predicate counts plus the database digest.
    Summary {
        #[command(flatten)]
        input: DumpInput,
    },

    /// Re-emit the database in canonical dump form.
    Dump {
        #[command(flatten)]
        input: DumpInput,
        /// Emit JSON instead of dump text
        #[arg(long)]
        json: bool,
    },

    /// Check that the database holds a valid graph coloring.
    CheckColoring {
        /// Database dump; `-` or omitted reads stdin
        input: Option<PathBuf>,
        /// Predicate whose first argument is a neighbor
        #[arg(long, default_value = "edge")]
        edge: String,
        /// Predicate whose first argument is the node color
        #[arg(long, default_value = "color")]
        color: String,
    },

    /// Sum one argument of a predicate over all nodes.
    Total {
        predicate: String,
        /// Argument position, starting at 1
        position: usize,
        /// Database dump; `-` or omitted reads stdin
        input: Option<PathBuf>,
    },

    /// Write benchmark graph facts to stdout.
    Generate {
        #[command(subcommand)]
        shape: GenerateCommands,
    },
}

#[derive(Subcommand)]
enum GenerateCommands {
    /// A chain 0 -> 1 -> ... -> N-1.
    Chain {
        nodes: usize,
        /// Integer weight appended to every edge
        #[arg(long)]
        weight: Option<i64>,
    },
    /// A WIDTH x HEIGHT grid with coordinates (HEIGHT defaults to WIDTH).
    Grid {
        width: usize,
        height: Option<usize>,
        /// Integer weight appended to every edge
        #[arg(long)]
        weight: Option<i64>,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Summary { input } => cmd_summary(input),
        Commands::Dump { input, json } => cmd_dump(input, json),
        Commands::CheckColoring { input, edge, color } => {
            cmd_check_coloring(Source::new(input), ColoringPredicates { edge, color })
        }
        Commands::Total {
            predicate,
            position,
            input,
        } => cmd_total(Source::new(input), &predicate, position),
        Commands::Generate { shape } => cmd_generate(shape),
    }
}

fn cmd_summary(input: DumpInput) -> Result<()> {
    let source = Source::new(input.input);
    let db = source.load(name_filter(&input.only).as_ref())?;

    let mut per_predicate: BTreeMap<&str, usize> = BTreeMap::new();
    for (_, facts) in &db {
        for fact in facts {
            *per_predicate.entry(fact.name.as_str()).or_default() += 1;
        }
    }

    println!("{} {}", "Parsed".green().bold(), source.label());
    println!("  Nodes: {}", db.len());
    println!("  Facts: {}", db.fact_count());
    println!("  Digest: {}", database_digest_v1(&db).cyan());
    for (name, count) in per_predicate {
        println!("    {}: {count}", name.yellow());
    }
    Ok(())
}

fn cmd_dump(input: DumpInput, json: bool) -> Result<()> {
    let db = Source::new(input.input).load(name_filter(&input.only).as_ref())?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    if json {
        serde_json::to_writer_pretty(&mut out, &db).context("failed to write JSON")?;
        writeln!(out)?;
    } else {
        write!(out, "{db}")?;
    }
    out.flush()?;
    Ok(())
}

fn cmd_check_coloring(source: Source, predicates: ColoringPredicates) -> Result<()> {
    let filter = name_filter(&[predicates.edge.clone(), predicates.color.clone()]);
    let db = source.load(filter.as_ref())?;

    let report = check_coloring(&db, &predicates)
        .with_context(|| format!("coloring check failed for {}", source.label()))?;
    tracing::info!(
        nodes = report.nodes,
        edges = report.edges,
        colors = report.colors.len(),
        "coloring verified"
    );
    println!("{}", "ALL OK".green().bold());
    Ok(())
}

fn cmd_total(source: Source, predicate: &str, position: usize) -> Result<()> {
    let db = source.load(name_filter(&[predicate.to_string()]).as_ref())?;
    let total = sum_argument(&db, predicate, position)?;
    tracing::info!(predicate, facts = total.facts, "summed argument {position}");
    println!("{}", total.total);
    Ok(())
}

fn cmd_generate(shape: GenerateCommands) -> Result<()> {
    let stdout = io::stdout();
    let out = BufWriter::new(stdout.lock());
    let mut out = match shape {
        GenerateCommands::Chain { nodes, weight } => {
            let mut writer = GraphWriter::new(out).with_weight(weight);
            writer.chain(nodes)?;
            writer.into_inner()
        }
        GenerateCommands::Grid {
            width,
            height,
            weight,
        } => {
            let mut writer = GraphWriter::new(out).with_weight(weight);
            writer.grid(width, height.unwrap_or(width))?;
            writer.into_inner()
        }
    };
    out.flush()?;
    Ok(())
}
