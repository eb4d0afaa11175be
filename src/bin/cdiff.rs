//! cdiff - Control tree diff CLI tool
//!
//! Loads a current and a base control tree from YAML/JSON files and prints
//! the deltas between them.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use control_merge_diff::{ir, ControlDiff, ControlNode, Deltas, EditorStateStore};
use tracing::{debug, info};

#[derive(Debug, Parser)]
#[command(name = "cdiff")]
#[command(about = "Compute merge deltas between two versions of a control tree")]
#[command(version)]
struct Cli {
    /// Current (edited) control tree
    #[arg(long, value_name = "FILE")]
    current: PathBuf,

    /// Base control tree; omit to treat the whole document as added
    #[arg(long, value_name = "FILE")]
    base: Option<PathBuf>,

    /// Editor control state store
    #[arg(long, value_name = "FILE")]
    states: Option<PathBuf>,

    /// Flag deltas as belonging to a component definition
    #[arg(long)]
    in_component: bool,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Output location. Use '-' for stdout
    #[arg(long, short, default_value = "-")]
    output: String,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
    Yaml,
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let current = load_tree(&cli.current)?;
    let base = cli.base.as_deref().map(load_tree).transpose()?;
    let store = match cli.states.as_deref() {
        Some(path) => load_states(path)?,
        None => EditorStateStore::new(),
    };
    debug!(states = store.len(), "loaded control states");

    let deltas = ControlDiff::builder()
        .in_component(cli.in_component)
        .build()
        .diff(&current, base.as_ref(), &store)
        .map_err(|e| format!("Diff failed: {}", e))?;
    info!(deltas = deltas.len(), "computed deltas");

    let mut output: Box<dyn Write> = if cli.output == "-" {
        Box::new(io::stdout())
    } else {
        Box::new(
            fs::File::create(&cli.output)
                .map_err(|e| format!("Failed to create output file {:?}: {}", cli.output, e))?,
        )
    };

    write_deltas(&deltas, cli.format, &mut output)
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn load_tree(path: &Path) -> Result<ControlNode, Box<dyn std::error::Error>> {
    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read control tree {:?}: {}", path, e))?;
    let tree = if is_json(path) {
        ir::from_json(&content).map_err(|e| format!("Failed to parse {:?}: {}", path, e))?
    } else {
        ir::from_yaml(&content).map_err(|e| format!("Failed to parse {:?}: {}", path, e))?
    };
    Ok(tree)
}

fn load_states(path: &Path) -> Result<EditorStateStore, Box<dyn std::error::Error>> {
    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read state store {:?}: {}", path, e))?;
    let store = if is_json(path) {
        EditorStateStore::from_json(&content).map_err(|e| format!("Failed to parse {:?}: {}", path, e))?
    } else {
        EditorStateStore::from_yaml(&content).map_err(|e| format!("Failed to parse {:?}: {}", path, e))?
    };
    Ok(store)
}

fn write_deltas(
    deltas: &Deltas,
    format: OutputFormat,
    output: &mut dyn Write,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Text => {
            if deltas.is_empty() {
                writeln!(output, "No changes")?;
            } else {
                writeln!(output, "{}", deltas)?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *output, deltas)?;
            writeln!(output)?;
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(deltas)
                .map_err(|e| format!("Failed to serialize deltas: {}", e))?;
            write!(output, "{}", yaml)?;
        }
    }
    Ok(())
}
