use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use lens_protocol::ErrorEnvelope;
use lens_scanner::LensConfig;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod output;

use output::{classify_error, CommandOutput, CommandResponse};

#[derive(Parser)]
#[command(name = "lens")]
#[command(about = "Inspect workflow status and generated artifacts of a project", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Project root (overrides LENS_ROOT/LENS_PROJECT_ROOT; default: current directory)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Print the full result as pretty JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalized status of every workflow in the project
    Status,

    /// Show a generated document, or the catalog when NAME is omitted
    Doc(DocArgs),

    /// Show decision records, or one record by name
    Decisions(DecisionsArgs),

    /// Show an audit artifact
    Audit(AuditArgs),

    /// Search documents, decisions, and audit files
    Search(SearchArgs),

    /// Suggest the next action
    Suggest,

    /// Browse bundled knowledge bases
    #[command(subcommand)]
    Knowledge(KnowledgeCommand),
}

#[derive(Args)]
struct DocArgs {
    /// Document name (exact match first, then substring)
    name: Option<String>,
}

#[derive(Args)]
struct DecisionsArgs {
    /// One record by name (exact match first, then substring)
    name: Option<String>,

    /// Keep records whose name or content mentions this topic
    #[arg(long)]
    topic: Option<String>,
}

#[derive(Args)]
struct AuditArgs {
    /// report, findings, subsystem, state, or list
    #[arg(long = "type", default_value = "report")]
    artifact_type: String,

    /// Subsystem name (for --type subsystem)
    #[arg(long)]
    subsystem: Option<String>,

    /// Severity keyword filter for findings/subsystem files
    #[arg(long)]
    severity: Option<String>,

    /// Archived audit id (default: current run)
    #[arg(long)]
    audit: Option<String>,
}

#[derive(Args)]
struct SearchArgs {
    /// Text to find (case-sensitive)
    query: String,

    /// documents, audit, decisions, or all
    #[arg(long, default_value = "all")]
    scope: String,

    /// Treat QUERY as a regular expression
    #[arg(long)]
    regex: bool,

    /// Maximum number of matching artifacts (1-500; default: all)
    #[arg(long)]
    max_results: Option<usize>,
}

#[derive(Subcommand)]
enum KnowledgeCommand {
    /// List knowledge bases, or one base by id
    List {
        /// Knowledge base id
        id: Option<String>,
    },
    /// Read a file from a knowledge base (its index when PATH is omitted)
    Read {
        /// Knowledge base id
        id: String,
        /// Path inside the knowledge base
        path: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .init();

    let json = cli.json;
    match run(cli) {
        Ok(output) => {
            if json {
                print_json(&CommandResponse::ok(output.data));
            } else {
                print!("{}", output.text);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            let envelope = classify_error(&err);
            let code = exit_code(&envelope);
            if json {
                print_json(&CommandResponse::error(envelope));
            } else {
                eprintln!("error: {}", envelope.message);
                if let Some(hint) = envelope.hint.as_deref() {
                    eprintln!("hint: {hint}");
                }
            }
            code
        }
    }
}

fn run(cli: Cli) -> Result<CommandOutput> {
    let config = LensConfig::from_env(None).context("Failed to resolve configuration")?;
    // Validated like an MCP `path` argument.
    let config = match cli.root.as_deref() {
        Some(root) => config.for_root(root)?,
        None => config,
    };
    log::debug!("Project root: {}", config.root().display());

    match cli.command {
        Commands::Status => commands::status(&config),
        Commands::Doc(args) => commands::doc(&config, args.name.as_deref()),
        Commands::Decisions(args) => {
            commands::decisions(&config, args.name.as_deref(), args.topic.as_deref())
        }
        Commands::Audit(args) => commands::audit(
            &config,
            commands::AuditSelection {
                artifact_type: args.artifact_type,
                subsystem: args.subsystem,
                severity: args.severity,
                audit: args.audit,
            },
        ),
        Commands::Search(args) => {
            commands::search(&config, &args.query, &args.scope, args.regex, args.max_results)
        }
        Commands::Suggest => commands::suggest(&config),
        Commands::Knowledge(KnowledgeCommand::List { id }) => {
            commands::knowledge_list(&config, id.as_deref())
        }
        Commands::Knowledge(KnowledgeCommand::Read { id, path }) => {
            commands::knowledge_read(&config, &id, path.as_deref())
        }
    }
}

fn exit_code(envelope: &ErrorEnvelope) -> ExitCode {
    if envelope.code == lens_protocol::codes::INVALID_REQUEST {
        ExitCode::from(2)
    } else {
        ExitCode::FAILURE
    }
}

fn print_json(response: &CommandResponse) {
    match serde_json::to_string_pretty(response) {
        Ok(body) => println!("{body}"),
        Err(err) => eprintln!("error: failed to serialize response: {err}"),
    }
}
