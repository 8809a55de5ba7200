use ahash::AHashSet;
use clap::{Parser, Subcommand};
use itertools::Itertools;
use senryaku::prelude::*;
use std::time::Instant;

/// Validate, inspect and synchronize saved strategy graphs
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a strategy graph and list its errors and warnings
    Validate {
        /// Path to the strategy graph JSON file
        graph_path: String,
        /// Print the result as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the conditions of every signal and exit node as readable text
    Format {
        /// Path to the strategy graph JSON file
        graph_path: String,
        /// Only format this node
        #[arg(short, long)]
        node: Option<String>,
    },
    /// Print the smallest re-entry group number not yet in use
    NextGroup {
        /// Path to the strategy graph JSON file
        graph_path: String,
    },
    /// Plan (and optionally apply) a re-entry group edit
    Sync {
        /// Path to the strategy graph JSON file
        graph_path: String,
        /// Id of the exit or retry node being edited
        #[arg(short, long)]
        node: String,
        /// New maxReEntries for the node and its group
        #[arg(long, conflicts_with_all = ["group", "enable", "disable"])]
        max: Option<u32>,
        /// Move the node into this group
        #[arg(long, conflicts_with_all = ["enable", "disable"])]
        group: Option<u32>,
        /// Enable re-entry on an exit node
        #[arg(long, conflicts_with = "disable")]
        enable: bool,
        /// Disable re-entry on an exit node
        #[arg(long)]
        disable: bool,
        /// Write the synchronized graph back to the file
        #[arg(short, long)]
        write: bool,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Validate { graph_path, json } => run_validate(&graph_path, json),
        Command::Format { graph_path, node } => run_format(&graph_path, node.as_deref()),
        Command::NextGroup { graph_path } => {
            let doc = load_document(&graph_path);
            println!("{}", next_available_group_number(&doc.nodes));
        }
        Command::Sync {
            graph_path,
            node,
            max,
            group,
            enable,
            disable,
            write,
        } => {
            let command = match (max, group, enable, disable) {
                (Some(max_re_entries), _, _, _) => SyncCommand::SetMaxReEntries {
                    node_id: node,
                    max_re_entries,
                },
                (None, Some(group_number), _, _) => SyncCommand::SetGroupNumber {
                    node_id: node,
                    group_number,
                },
                (None, None, true, _) => SyncCommand::SetReEntryEnabled {
                    node_id: node,
                    enabled: true,
                },
                (None, None, false, true) => SyncCommand::SetReEntryEnabled {
                    node_id: node,
                    enabled: false,
                },
                (None, None, false, false) => {
                    exit_with_error("One of --max, --group, --enable or --disable is required.")
                }
            };
            run_sync(&graph_path, command, write);
        }
    }
}

fn run_validate(graph_path: &str, json: bool) {
    let doc = load_document(graph_path);

    let start = Instant::now();
    let result = validate_workflow(&doc.nodes, &doc.edges);
    let duration = start.elapsed();

    if json {
        let out = serde_json::to_string_pretty(&result)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize result: {}", e)));
        println!("{}", out);
    } else {
        println!(
            "Validated {} nodes and {} edges in {:?}",
            doc.nodes.len(),
            doc.edges.len(),
            duration
        );
        for error in &result.errors {
            println!("  error   {}", error);
        }
        for warning in &result.warnings {
            println!("  warning {}", warning);
        }
        println!("\nStrategy is {}", if result.valid { "VALID" } else { "INVALID" });
    }

    if !result.valid {
        std::process::exit(2);
    }
}

fn run_format(graph_path: &str, only: Option<&str>) {
    let doc = load_document(graph_path);
    let ctx = doc.format_context();

    let selected = doc
        .nodes
        .iter()
        .filter(|n| only.is_none_or(|id| n.id == id))
        .filter(|n| matches!(n.node_type, NodeType::Signal | NodeType::Exit));

    for node in selected {
        let payload = match node.node_type {
            NodeType::Exit => node.data.exit_conditions.as_deref(),
            _ => node.data.conditions.as_deref(),
        };
        let Some(groups) = payload else {
            continue;
        };

        let mut indicators = AHashSet::new();
        for group in groups {
            group.referenced_indicators(&mut indicators);
        }

        println!("{} ({})", node.id, node.node_type);
        println!("  {}", ConditionFormatter::format_conditions(groups, &ctx));
        if !indicators.is_empty() {
            println!("  indicators: {}", indicators.iter().sorted().join(", "));
        }
    }
}

fn run_sync(graph_path: &str, command: SyncCommand, write: bool) {
    let doc = load_document(graph_path);

    let mut queue = SyncQueue::new(doc);
    let report = queue
        .submit(command)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to apply plan: {}", e)));

    if let Some((_, e)) = report.rejected.first() {
        exit_with_error(&e.to_string());
    }

    let out = serde_json::to_string_pretty(&report.applied)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize plan: {}", e)));
    println!("{}", out);

    if write {
        queue
            .into_store()
            .save(graph_path)
            .unwrap_or_else(|e| exit_with_error(&e.to_string()));
        println!("Wrote synchronized graph to '{}'", graph_path);
    }
}

fn load_document(path: &str) -> GraphDocument {
    GraphDocument::from_file(path).unwrap_or_else(|e| exit_with_error(&e.to_string()))
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
