//! Symtrace CLI
//!
//! Builds path-conditioned traces for every function defined in the given
//! C files and prints them.
//!
//! # Usage
//!
//! ```bash
//! # Text dump of every block
//! cargo run --bin symtrace -- src/parse.c
//!
//! # JSON for one function, with a custom config
//! cargo run --bin symtrace -- src/parse.c --config symtrace.yaml --format json --function parse_header
//!
//! # Debug logging (conditions, accesses, completed blocks)
//! RUST_LOG=symtrace_core=debug cargo run --bin symtrace -- src/parse.c
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use symtrace_core::{
    BlockRegistry, CodeBlock, GuardFailurePolicy, SymtraceError, TraceBuildingUseCase,
    TraceBuildingUseCaseImpl, TraceConfig,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "symtrace")]
#[command(about = "Path-conditioned symbolic traces for C functions", long_about = None)]
struct Cli {
    /// C source files
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// YAML config (version: 1)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Only print blocks for this function
    #[arg(long)]
    function: Option<String>,

    /// Override the guard failure policy (skip_statement | traverse_unconstrained)
    #[arg(long)]
    guard_failure_policy: Option<String>,

    /// Print the resolved value snapshot after each block (text format)
    #[arg(long)]
    values: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    run(cli)?;
    Ok(())
}

fn run(cli: Cli) -> Result<(), SymtraceError> {
    let mut config = match &cli.config {
        Some(path) => TraceConfig::from_yaml(path)?,
        None => TraceConfig::default(),
    };
    if let Some(policy) = &cli.guard_failure_policy {
        config = config.guard_failure_policy(policy.parse::<GuardFailurePolicy>()?);
    }
    config.validate()?;

    let mut usecase = TraceBuildingUseCaseImpl::for_c(config)?;
    let registry = usecase.build_registry_from_files(&cli.files)?;

    let selected: Vec<&CodeBlock> = select(&registry, cli.function.as_deref());
    if selected.is_empty() {
        if let Some(name) = &cli.function {
            tracing::warn!(function = %name, "no definition found");
        }
    }

    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&selected)?);
        }
        OutputFormat::Text => {
            for block in selected {
                print!("{}", block.dump());
                if cli.values {
                    let snapshot = usecase.snapshot(block, block.actions().len());
                    for (variable, state) in snapshot.resolved_all() {
                        println!("  value {} = {}", variable, state);
                    }
                }
                println!();
            }
        }
    }
    Ok(())
}

fn select<'a>(registry: &'a BlockRegistry, function: Option<&'a str>) -> Vec<&'a CodeBlock> {
    match function {
        Some(name) => registry.find_by_name(name).collect(),
        None => registry.iter().collect(),
    }
}
