use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use comfy_table::Table;
use payprep_core::{outputs, pipeline, report};
use payprep_loader::{load_transactions_with_mapping, ColumnMapping};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Payment transaction feature pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Derive retry-chain and calendar features from a raw transaction export
    Features(FeaturesArgs),
    /// Print structural information about a raw transaction export
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
struct FeaturesArgs {
    /// Raw transaction export (CSV)
    input: PathBuf,

    /// Where to write the feature table
    #[arg(short, long)]
    output: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Parquet)]
    format: OutputFormat,

    /// TOML file overriding the raw-header column mapping
    #[arg(long)]
    mapping: Option<PathBuf>,

    /// Also write the data-quality report as JSON
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Raw transaction export (CSV)
    input: PathBuf,

    /// TOML file overriding the raw-header column mapping
    #[arg(long)]
    mapping: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum OutputFormat {
    Parquet,
    Csv,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Features(args) => run_features(args),
        Command::Inspect(args) => run_inspect(args),
    }
}

fn run_features(args: FeaturesArgs) -> Result<()> {
    let mapping = load_mapping(args.mapping.as_deref())?;
    let raw = load_transactions_with_mapping(&args.input, &mapping)
        .with_context(|| format!("failed to load {}", args.input.display()))?;

    let result = pipeline::derive_features(&raw)?;

    match args.format {
        OutputFormat::Parquet => outputs::write_parquet(&result.dataframe, &args.output),
        OutputFormat::Csv => outputs::write_csv(&result.dataframe, &args.output),
    }
    .with_context(|| format!("failed to write {}", args.output.display()))?;

    if let Some(report_path) = &args.report {
        let json = serde_json::to_string_pretty(&result.report)?;
        std::fs::write(report_path, json)
            .with_context(|| format!("failed to write report {}", report_path.display()))?;
    }

    info!(
        rows = result.report.rows,
        unparseable_timestamps = result.report.unparseable_timestamps,
        output = %args.output.display(),
        "feature table written"
    );
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    let mapping = load_mapping(args.mapping.as_deref())?;
    let df = load_transactions_with_mapping(&args.input, &mapping)
        .with_context(|| format!("failed to load {}", args.input.display()))?;

    println!("shape: {} rows x {} columns", df.height(), df.width());

    let mut table = Table::new();
    table.set_header(vec!["column", "dtype", "distinct", "nulls"]);
    for summary in report::summarize_columns(&df)? {
        table.add_row(vec![
            summary.name,
            summary.dtype,
            summary.distinct.to_string(),
            summary.nulls.to_string(),
        ]);
    }
    println!("{table}");

    Ok(())
}

fn load_mapping(path: Option<&Path>) -> Result<ColumnMapping> {
    match path {
        None => Ok(ColumnMapping::default()),
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read mapping file {}", path.display()))?;
            toml::from_str(&text)
                .with_context(|| format!("invalid column mapping in {}", path.display()))
        }
    }
}
