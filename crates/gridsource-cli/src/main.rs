use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gridsource_catalog::JsonDocumentAdapter;
use gridsource_core::GridConfig;
use gridsource_engine::{GridExport, GridSource};

/// Environment variable naming the data document when --data is omitted
const DATA_ENV: &str = "GRIDSOURCE_DATA";

/// Gridsource - reconcile grid columns and stream grid rows
#[derive(Parser)]
#[command(name = "gridsource")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: grid.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// JSON document with `columns` and `rows`
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the effective column list
    Columns {
        /// Include every source column, not only configured ones
        #[arg(long)]
        keep_all: bool,
    },

    /// Stream all rows as JSON lines, header first
    Rows {
        /// Rows fetched per page
        #[arg(short, long)]
        page_size: Option<usize>,

        /// Exact-match filter, as field=value (repeatable)
        #[arg(short, long = "filter")]
        filters: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Load config if specified
    let mut config = if let Some(config_path) = &cli.config {
        GridConfig::from_file(config_path)?
    } else if Path::new("grid.toml").exists() {
        GridConfig::from_file(Path::new("grid.toml"))?
    } else {
        if cli.verbose {
            eprintln!("{}", "No config file found, using defaults".yellow());
        }
        GridConfig::default()
    };

    let data_path = match &cli.data {
        Some(path) => path.clone(),
        None => std::env::var(DATA_ENV)
            .map(PathBuf::from)
            .with_context(|| format!("No data document given; pass --data or set {}", DATA_ENV))?,
    };

    if cli.verbose {
        eprintln!("{} {}", "Loading data from:".cyan(), data_path.display());
    }

    let adapter = JsonDocumentAdapter::from_file(&data_path)?;
    tracing::info!(rows = adapter.row_count(), "loaded data document");

    match cli.command {
        Commands::Columns { keep_all } => {
            config.keep_all_source_cols |= keep_all;
            columns_command(&config, adapter, cli.verbose).await
        }
        Commands::Rows { page_size, filters } => {
            if let Some(page_size) = page_size {
                config.page_size = page_size;
            }
            config.validate()?;
            rows_command(&config, adapter, &filters, cli.verbose).await
        }
    }
}

/// Columns command - print the reconciled column list
async fn columns_command(config: &GridConfig, adapter: JsonDocumentAdapter, verbose: bool) -> Result<()> {
    let source = GridSource::new(adapter);
    let configured = config.column_definitions(source.factory())?;

    if verbose {
        eprintln!(
            "{} {} configured column(s), keep all source columns: {}",
            "Reconciling".cyan(),
            configured.len(),
            config.keep_all_source_cols
        );
    }

    let columns = source
        .extract_column_definitions(&configured, config.keep_all_source_cols)
        .await?;

    println!("{}", format!("{:<6} {:<24} {}", "ORDER", "KEY", "LABEL").bold());
    for column in &columns {
        println!(
            "{:<6} {:<24} {}",
            column.sort_order().unwrap_or_default(),
            column.key(),
            column.display_label()
        );
    }

    if verbose {
        eprintln!("{} {} column(s)", "✓".green(), columns.len());
    }

    Ok(())
}

/// Rows command - stream header and rows as JSON lines
async fn rows_command(
    config: &GridConfig,
    adapter: JsonDocumentAdapter,
    filters: &[String],
    verbose: bool,
) -> Result<()> {
    let mut source = GridSource::new(adapter);
    let configured = config.column_definitions(source.factory())?;

    let mut criteria = config.search_criteria();
    for filter in filters {
        let (field, value) = filter
            .split_once('=')
            .with_context(|| format!("Invalid filter '{}', expected field=value", filter))?;
        criteria.set_filter(field, value);
    }

    let mut export = GridExport::new(
        &mut source,
        &configured,
        config.keep_all_source_cols,
        criteria,
        config.export.clone(),
    )
    .await?
    .with_page_size(config.page_size);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", serde_json::to_string(&export.header())?)?;

    while let Some(row) = export.next_row().await {
        writeln!(out, "{}", serde_json::to_string(&row?)?)?;
    }
    out.flush()?;

    if verbose {
        eprintln!("{} {} row(s)", "✓ Streamed".green(), export.rows_written());
    }

    Ok(())
}
