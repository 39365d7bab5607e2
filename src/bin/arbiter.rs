//! Arbiter CLI: the `arbiter` command.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use arbiter::{ClassResolver, ComposerDirSource, Config, MemorySource, MergedClassMap, ProjectSource};

#[derive(Parser)]
#[command(
    name = "arbiter",
    about = "Merge classmaps of co-installed Composer vendor trees, newest copies first",
    version
)]
struct Cli {
    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Read loaders and installed state from a JSON snapshot instead of disk
    #[arg(long, global = true, conflicts_with_all = ["vendor", "scan"])]
    snapshot: Option<PathBuf>,

    /// Vendor directory of a registered project (repeatable)
    #[arg(long, global = true)]
    vendor: Vec<PathBuf>,

    /// Directory to walk for unregistered projects (repeatable)
    #[arg(long, global = true)]
    scan: Vec<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the merged class → file table
    Merge {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve class names against the merged table
    Lookup {
        /// Fully qualified class names
        #[arg(required = true)]
        names: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print project roots in precedence order with their scores
    Rank {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print class names defined by more than one project
    Conflicts {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("ARBITER_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });
    config.vendor_dirs.extend(cli.vendor);
    config.scan_roots.extend(cli.scan);

    let source: Box<dyn ProjectSource> = match &cli.snapshot {
        Some(path) => Box::new(MemorySource::from_snapshot_file(path).unwrap_or_else(|e| {
            eprintln!("error: {e}");
            std::process::exit(1);
        })),
        None => Box::new(ComposerDirSource::from_config(&config)),
    };

    let resolver = ClassResolver::with_config(source, &config);
    let merged = resolver.run().unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });

    let (output, missing) = match cli.command {
        Commands::Merge { json } => (render_merge(&merged, json), false),
        Commands::Lookup { names, json } => render_lookup(&merged, &names, json),
        Commands::Rank { json } => (render_rank(&merged, json), false),
        Commands::Conflicts { json } => (render_conflicts(&merged, json), false),
    };

    emit(output);
    if missing {
        std::process::exit(2);
    }
}

/// What a subcommand prints.
#[derive(Debug, PartialEq)]
enum Output {
    Json(serde_json::Value),
    Text(Vec<String>),
}

fn emit(output: Output) {
    match output {
        Output::Json(payload) => match serde_json::to_string_pretty(&payload) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("error: failed to encode output: {e}");
                std::process::exit(1);
            }
        },
        Output::Text(lines) => {
            for line in lines {
                println!("{line}");
            }
        }
    }
}

fn render_merge(merged: &MergedClassMap, json_output: bool) -> Output {
    if json_output {
        let entries: serde_json::Map<String, serde_json::Value> = merged
            .iter()
            .map(|(name, path)| (name.to_string(), json!(path)))
            .collect();
        Output::Json(serde_json::Value::Object(entries))
    } else {
        Output::Text(
            merged
                .iter()
                .map(|(name, path)| format!("{name} => {path}"))
                .collect(),
        )
    }
}

/// Also reports whether any name was not found.
fn render_lookup(merged: &MergedClassMap, names: &[String], json_output: bool) -> (Output, bool) {
    let missing = names.iter().any(|name| merged.entry(name).is_none());

    let output = if json_output {
        let entries: Vec<_> = names
            .iter()
            .map(|name| {
                let entry = merged.entry(name);
                json!({
                    "class": name,
                    "path": entry.map(|e| e.path.as_str()),
                    "root": entry.map(|e| e.root.as_str()),
                })
            })
            .collect();
        Output::Json(json!(entries))
    } else {
        Output::Text(
            names
                .iter()
                .map(|name| match merged.entry(name) {
                    Some(entry) => format!("{name} => {} ({})", entry.path, entry.root),
                    None => format!("{name} => not found"),
                })
                .collect(),
        )
    };

    (output, missing)
}

fn render_rank(merged: &MergedClassMap, json_output: bool) -> Output {
    let precedence = merged.precedence();
    if json_output {
        let entries: Vec<_> = precedence
            .iter()
            .map(|(root, score)| json!({ "root": root.as_str(), "score": score.to_string() }))
            .collect();
        Output::Json(json!(entries))
    } else {
        Output::Text(
            precedence
                .iter()
                .enumerate()
                .map(|(position, (root, score))| format!("{:>3}. {root} (score {score})", position + 1))
                .collect(),
        )
    }
}

fn render_conflicts(merged: &MergedClassMap, json_output: bool) -> Output {
    if json_output {
        let entries: Vec<_> = merged
            .conflicts()
            .map(|(name, winner, losers)| {
                json!({
                    "class": name.as_str(),
                    "winner": { "path": winner.path.as_str(), "root": winner.root.as_str() },
                    "shadowed": losers
                        .iter()
                        .map(|l| json!({ "path": l.path.as_str(), "root": l.root.as_str() }))
                        .collect::<Vec<_>>(),
                })
            })
            .collect();
        Output::Json(json!(entries))
    } else {
        let mut lines = Vec::new();
        for (name, winner, losers) in merged.conflicts() {
            lines.push(name.to_string());
            lines.push(format!("  + {} ({})", winner.path, winner.root));
            for loser in losers {
                lines.push(format!("  - {} ({})", loser.path, loser.root));
            }
        }
        Output::Text(lines)
    }
}
