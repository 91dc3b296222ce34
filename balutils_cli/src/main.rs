use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result, bail};
use balutils_core::catalog::{
    Catalog, DEFAULT_SHAPE_PATH, DetectionCatalog, JoinedCatalog, ShapeSelector,
};
use balutils_core::source::{ColumnarReader, ParquetReader, ParquetStoreOpener};
use balutils_core::table::format_table;
use balutils_core::{GoldVariant, JoinOptions};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "balutils", about = "Load, cut and join Balrog measurement catalogs")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Left-join a shape-measurement catalog onto its detection catalog.
    Join {
        /// JSON file with join options; flags below are ignored when given.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Shape-measurement store.
        #[arg(long)]
        shape: Option<PathBuf>,

        /// Detection table.
        #[arg(long)]
        detection: Option<PathBuf>,

        /// Group inside the shape store holding the columns.
        #[arg(long, default_value = DEFAULT_SHAPE_PATH)]
        shape_path: String,

        /// Gold flag variant: default, mof_only or sof_only.
        #[arg(long, default_value = "default")]
        match_type: String,

        /// Shape column to load. Can be repeated.
        #[arg(long = "shape-col")]
        shape_cols: Vec<String>,

        /// Detection column to load (all when omitted). Can be repeated.
        #[arg(long = "det-col")]
        det_cols: Vec<String>,

        /// Apply gold cuts after the join.
        #[arg(long)]
        gold: bool,

        /// Apply shape cuts after the join.
        #[arg(long)]
        shape_cuts: bool,

        /// Rows to print.
        #[arg(long, default_value = "10")]
        head: usize,
    },

    /// Load a detection catalog, repairing duplicated ids.
    Detection {
        /// Detection table.
        path: PathBuf,

        /// Column to load (all when omitted). Can be repeated.
        #[arg(long = "col")]
        cols: Vec<String>,

        /// Gold flag variant: default, mof_only or sof_only.
        #[arg(long, default_value = "default")]
        match_type: String,

        /// Apply gold cuts after loading.
        #[arg(long)]
        gold: bool,

        /// Rows to print.
        #[arg(long, default_value = "10")]
        head: usize,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Join {
            config,
            shape,
            detection,
            shape_path,
            match_type,
            shape_cols,
            det_cols,
            gold,
            shape_cuts,
            head,
        } => {
            let options = match config {
                Some(path) => JoinOptions::load_from_path(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => {
                    let (Some(shape), Some(detection)) = (shape, detection) else {
                        bail!("join needs --config or both --shape and --detection");
                    };
                    let mut options = JoinOptions::new(shape, detection)
                        .with_shape_path(shape_path)
                        .with_match_type(match_type);
                    if !shape_cols.is_empty() {
                        options = options.with_shape_columns(shape_cols);
                    }
                    if !det_cols.is_empty() {
                        options = options.with_detection_columns(det_cols);
                    }
                    options
                }
            };

            tracing::debug!(?options, "join options");
            let reader = columnar_reader(&options.detection_source);
            let mut joined = load_joined(&options, reader.as_ref())?;
            if !joined.duplicates().is_clean() {
                println!(
                    "repaired {} duplicate bal_id(s) in detection catalog",
                    joined.duplicates().removed
                );
            }
            if gold {
                joined.apply_gold_cuts().context("applying gold cuts")?;
            }
            if shape_cuts {
                joined
                    .catalog_mut()
                    .apply_policy(&ShapeSelector)
                    .context("applying shape cuts")?;
            }
            print_summary(joined.catalog(), head)
        }
        Commands::Detection {
            path,
            cols,
            match_type,
            gold,
            head,
        } => {
            let variant: GoldVariant = match_type.parse()?;
            let columns = (!cols.is_empty()).then_some(cols);
            let reader = columnar_reader(&path);
            let mut detection = DetectionCatalog::load(reader.as_ref(), &path, columns, variant)
                .with_context(|| format!("loading detection catalog {}", path.display()))?;
            let report = detection.duplicates();
            if !report.is_clean() {
                println!(
                    "removed {} duplicate row(s) for ids {:?}",
                    report.removed, report.duplicate_ids
                );
            }
            if gold {
                detection.apply_gold_cuts().context("applying gold cuts")?;
            }
            print_summary(detection.catalog(), head)
        }
    }
}

fn load_joined(options: &JoinOptions, reader: &dyn ColumnarReader) -> Result<JoinedCatalog> {
    #[cfg(feature = "hdf5")]
    let loaded = if has_extension(&options.shape_source, &["h5", "hdf5"]) {
        JoinedCatalog::load(options, reader, &balutils_core::source::H5Opener)
    } else {
        JoinedCatalog::load(options, reader, &ParquetStoreOpener)
    };
    #[cfg(not(feature = "hdf5"))]
    let loaded = JoinedCatalog::load(options, reader, &ParquetStoreOpener);

    loaded.with_context(|| {
        format!(
            "joining {} onto {}",
            options.shape_source.display(),
            options.detection_source.display()
        )
    })
}

#[cfg_attr(not(feature = "fits"), allow(unused_variables))]
fn columnar_reader(path: &Path) -> Box<dyn ColumnarReader> {
    #[cfg(feature = "fits")]
    if has_extension(path, &["fits", "fit", "fz"]) {
        return Box::new(balutils_core::source::FitsReader);
    }
    Box::new(ParquetReader)
}

#[cfg(any(feature = "fits", feature = "hdf5"))]
fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.iter().any(|x| e.eq_ignore_ascii_case(x)))
}

fn print_summary(catalog: &Catalog, head: usize) -> Result<()> {
    println!("rows: {}", catalog.row_count());
    println!("columns: {}", catalog.column_names().join(", "));
    println!("{}", format_table(catalog.table(), Some(head))?);
    Ok(())
}
