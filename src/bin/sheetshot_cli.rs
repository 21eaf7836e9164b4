//! CLI tool for sheetshot - renders a grid payload to PNG
//!
//! Usage:
//!   sheetshot_cli <payload.json> -o out.png            # Render a snapshot
//!   sheetshot_cli <payload.json> --dry-run             # Print draw statistics only
//!   sheetshot_cli reconcile <old.json> <new.json> --key lead_id

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde::Deserialize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sheetshot::reconcile::{reconcile, RecordSet};
use sheetshot::snapshot::{dry_run, render_snapshot};
use sheetshot::{parser, RenderConfig, SheetshotError, SnapshotRequest};

/// Render spreadsheet grid payloads to PNG snapshots
#[derive(Parser, Debug)]
#[command(name = "sheetshot_cli", version, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    render: RenderArgs,

    /// Log filter, e.g. "debug" or "sheetshot=trace" (overrides RUST_LOG)
    #[arg(long, global = true, value_name = "FILTER")]
    log: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Overlay a newer record set onto an older one and print the result
    Reconcile(ReconcileArgs),
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Data-source payload (JSON)
    #[arg(value_name = "PAYLOAD")]
    payload: Option<PathBuf>,

    /// Output PNG path
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Render config (JSON)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// 1-based sheet row of the window's first row
    #[arg(long, value_name = "N")]
    row_start: Option<u32>,

    /// Column letters of the window's first column
    #[arg(long, value_name = "LETTERS")]
    column_start: Option<String>,

    /// Attribution owner shown in the footer
    #[arg(long, value_name = "NAME")]
    owner: Option<String>,

    /// Fail unless the attribution owner equals NAME
    #[arg(long, value_name = "NAME")]
    expect_owner: Option<String>,

    /// Plan and draw without rasterizing; print statistics
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args, Debug)]
struct ReconcileArgs {
    /// Older record set
    old: PathBuf,

    /// Newer record set
    new: PathBuf,

    /// Unique key column
    #[arg(long, default_value = "lead_id")]
    key: String,

    /// Write the result here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

/// Record files may be a `{columns, rows}` table or a list of objects.
#[derive(Deserialize)]
#[serde(untagged)]
enum RecordFile {
    Table(RecordSet),
    Objects(Vec<serde_json::Map<String, serde_json::Value>>),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match &cli.log {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    let result = match &cli.command {
        Some(Command::Reconcile(args)) => run_reconcile(args),
        None => run_render(&cli.render),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run_render(args: &RenderArgs) -> Result<(), SheetshotError> {
    let Some(payload_path) = &args.payload else {
        return Err(SheetshotError::Config(
            "missing PAYLOAD argument (see --help)".to_string(),
        ));
    };

    let mut config = match &args.config {
        Some(path) => RenderConfig::from_json_file(path)?,
        None => RenderConfig::default(),
    };
    if let Some(owner) = &args.owner {
        config.attribution.owner.clone_from(owner);
    }
    if let Some(expected) = &args.expect_owner {
        config.attribution.verify(expected)?;
    }

    let mut request = SnapshotRequest {
        row_start: args.row_start,
        ..SnapshotRequest::default()
    };
    if let Some(letters) = &args.column_start {
        request = request.with_column_start(letters)?;
    }

    let data = fs::read(payload_path)?;
    let window = parser::parse_window(&data)?;

    if args.dry_run {
        config.validate()?;
        let (_, stats) = dry_run(&window, &request, &config);
        println!("{stats:#?}");
        return Ok(());
    }

    let Some(output) = &args.output else {
        return Err(SheetshotError::Config(
            "missing --output (or pass --dry-run)".to_string(),
        ));
    };

    let image = render_snapshot(&window, &request, &config)?;
    image.write_to(output)?;
    eprintln!("Written: {} ({}x{})", output.display(), image.width, image.height);
    Ok(())
}

fn run_reconcile(args: &ReconcileArgs) -> Result<(), SheetshotError> {
    let old = read_records(&args.old)?;
    let new = read_records(&args.new)?;
    let merged = reconcile(&old, &new, &args.key)?;
    let json = serde_json::to_string_pretty(&merged)?;

    match &args.output {
        Some(path) => {
            fs::write(path, &json)?;
            eprintln!("Written: {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn read_records(path: &Path) -> Result<RecordSet, SheetshotError> {
    let data = fs::read(path)?;
    Ok(match serde_json::from_slice::<RecordFile>(&data)? {
        RecordFile::Table(set) => set,
        RecordFile::Objects(objects) => RecordSet::from_objects(&objects),
    })
}
