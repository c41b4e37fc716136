//! Pullgraph CLI: run traversals against a serialized graph
//!
//! Graphs come either from a JSON file (`--graph`) or from the file store
//! configured under `persistence.data_dir` (`--stored`).

use anyhow::{anyhow, Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use pullgraph::persistence::{self, FileStore, PersistenceManager};
use pullgraph::{init_tracing, run_traversal, Config, Graph, Registry};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Parser)]
#[command(name = "pullgraph", version, about = "Pullgraph traversal CLI")]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true, env = "PULLGRAPH_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(ClapArgs)]
struct GraphSource {
    /// Serialized graph file
    #[arg(long, conflicts_with = "stored")]
    graph: Option<PathBuf>,

    /// Name of a graph saved in the configured data directory
    #[arg(long)]
    stored: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a traversal, e.g. `v(1).in("knows").property("name")`
    Query {
        traversal: String,

        #[command(flatten)]
        source: GraphSource,
    },
    /// Vertex and edge counts
    Stats {
        #[command(flatten)]
        source: GraphSource,
    },
    /// List registered operators, including configured aliases
    Operators,
    /// Save a graph file into the configured data directory
    Save {
        /// Serialized graph file
        file: PathBuf,

        /// Name to save under (defaults to the configured default name)
        #[arg(long)]
        name: Option<String>,
    },
    /// Start an interactive REPL over one graph
    Shell {
        #[command(flatten)]
        source: GraphSource,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => Config::default(),
    };
    init_tracing(&config.logging);

    let mut registry = Registry::builtin();
    registry.register_configured_aliases(&config.aliases);

    match cli.command {
        Commands::Query { traversal, source } => {
            let graph = load_graph(&config, &source)?;
            run_query(&graph, &registry, &traversal, &cli.format)
        }
        Commands::Stats { source } => {
            let graph = load_graph(&config, &source)?;
            run_stats(&graph, &cli.format)
        }
        Commands::Operators => run_operators(&registry, &cli.format),
        Commands::Save { file, name } => run_save(&config, &file, name.as_deref()),
        Commands::Shell { source } => {
            let graph = load_graph(&config, &source)?;
            run_shell(&graph, &registry, &cli.format)
        }
    }
}

fn file_store(config: &Config) -> Result<PersistenceManager<FileStore>> {
    let dir = config
        .persistence
        .data_dir
        .as_ref()
        .ok_or_else(|| anyhow!("persistence.data_dir is not configured"))?;
    let store = FileStore::open(dir)?;
    Ok(PersistenceManager::with_config(store, &config.persistence))
}

fn load_graph(config: &Config, source: &GraphSource) -> Result<Graph> {
    match (&source.graph, &source.stored) {
        (Some(path), _) => {
            debug!(path = ?path, "Loading graph file");
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Ok(persistence::from_json(&text)?)
        }
        (None, Some(name)) => Ok(file_store(config)?.depersist(Some(name))?),
        (None, None) => Err(anyhow!("either --graph or --stored is required")),
    }
}

fn run_query(graph: &Graph, registry: &Registry, traversal: &str, format: &OutputFormat) -> Result<()> {
    let execution = run_traversal(graph, registry, traversal)?;
    for warning in &execution.warnings {
        eprintln!("Warning: {}", warning);
    }
    let rows: Vec<serde_json::Value> = execution.values.iter().map(|v| v.to_json()).collect();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        OutputFormat::Csv => {
            for row in &rows {
                println!("{}", format_csv_value(row));
            }
        }
        OutputFormat::Table => {
            if rows.is_empty() {
                println!("(no results)");
                return Ok(());
            }

            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["#", "type", "result"]);

            for (i, (value, row)) in execution.values.iter().zip(&rows).enumerate() {
                table.add_row(vec![i.to_string(), value.type_name().to_string(), format_table_value(row)]);
            }

            println!("{}", table);
            println!("{} row(s)", rows.len());
        }
    }

    Ok(())
}

fn run_stats(graph: &Graph, format: &OutputFormat) -> Result<()> {
    let properties: usize = graph.vertices().map(|v| v.property_count()).sum();
    match format {
        OutputFormat::Json => {
            let stats = serde_json::json!({
                "vertices": graph.vertex_count(),
                "edges": graph.edge_count(),
                "vertex_properties": properties,
            });
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        _ => {
            println!("Vertices:   {}", graph.vertex_count());
            println!("Edges:      {}", graph.edge_count());
            println!("Properties: {}", properties);
        }
    }

    Ok(())
}

fn run_operators(registry: &Registry, format: &OutputFormat) -> Result<()> {
    let names = registry.pipetype_names();
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&names)?),
        _ => {
            for name in names {
                println!("{}", name);
            }
        }
    }
    Ok(())
}

fn run_save(config: &Config, file: &Path, name: Option<&str>) -> Result<()> {
    let text = std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let graph = persistence::from_json(&text)?;
    let mut manager = file_store(config)?;
    manager.persist(&graph, name)?;
    println!(
        "Saved {} vertices and {} edges as {}",
        graph.vertex_count(),
        graph.edge_count(),
        manager.key(name)
    );
    Ok(())
}

fn run_shell(graph: &Graph, registry: &Registry, format: &OutputFormat) -> Result<()> {
    println!("Pullgraph Interactive Shell");
    println!("Type traversals, or :help for commands. :quit to exit.\n");

    let stdin = std::io::stdin();
    let mut line = String::new();

    loop {
        eprint!("pullgraph> ");

        line.clear();
        if stdin.read_line(&mut line)? == 0 {
            break; // EOF
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match trimmed {
            ":quit" | ":exit" | ":q" => break,
            ":help" | ":h" => {
                println!("Commands:");
                println!("  :stats      Show vertex, edge and property counts");
                println!("  :operators  List operators");
                println!("  :quit       Exit shell");
                println!("  <traversal> Run a traversal");
            }
            ":stats" => {
                if let Err(e) = run_stats(graph, format) {
                    eprintln!("Error: {:#}", e);
                }
            }
            ":operators" => {
                if let Err(e) = run_operators(registry, format) {
                    eprintln!("Error: {:#}", e);
                }
            }
            traversal => {
                if let Err(e) = run_query(graph, registry, traversal, format) {
                    eprintln!("Error: {:#}", e);
                }
            }
        }
    }

    println!("Bye!");
    Ok(())
}

fn format_table_value(v: &serde_json::Value) -> String {
    match v {
        serde_json::Value::Null => "null".to_string(),
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Object(map) => {
            // Vertices show as (id) followed by their properties
            match map.get("_id") {
                Some(id) => {
                    let rest: serde_json::Map<String, serde_json::Value> = map
                        .iter()
                        .filter(|(k, _)| k.as_str() != "_id")
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect();
                    format!("({}) {}", id, serde_json::Value::Object(rest))
                }
                None => v.to_string(),
            }
        }
        serde_json::Value::Array(_) => v.to_string(),
    }
}

fn format_csv_value(v: &serde_json::Value) -> String {
    match v {
        serde_json::Value::Null => "".to_string(),
        serde_json::Value::String(s) => {
            if s.contains(',') || s.contains('"') || s.contains('\n') {
                format!("\"{}\"", s.replace('"', "\"\""))
            } else {
                s.clone()
            }
        }
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        _ => format!("\"{}\"", v.to_string().replace('"', "\"\"")),
    }
}
