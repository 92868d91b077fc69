use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use chrono::Local;
use clap::Parser;
use env_logger::Env;
use log::{info, LevelFilter};

use iogen::adapters::csv_tags::{CsvTagSource, DEFAULT_DELIMITER};
use iogen::adapters::l5x::L5xTagSource;
use iogen::adapters::render::compact::render_compact;
use iogen::adapters::render::cspt::render_cspt;
use iogen::adapters::render::grid::render_grid;
use iogen::adapters::render::points_outside;
use iogen::adapters::render::xlsx::{write_xlsx, XlsxMeta};
use iogen::{IngestReport, IngestService, IoSession, IogenConfig, SourceError, SubstitutionTable};

const DEFAULT_CONFIG: &str = "iogen.json";

#[derive(Parser, Debug)]
#[command(
    name = "iogen",
    version,
    about = "Build a chassis/slot/channel I/O table from a controller tag export"
)]
struct Cli {
    /// Tag export: `.csv` (tag export) or `.l5x` (project export).
    input: PathBuf,

    /// Address substitution rules, `<prefix> <replacement>` per line.
    map: Option<PathBuf>,

    /// Input uses the legacy field delimiter.
    #[arg(long)]
    old: bool,

    /// Do not write the xlsx workbook.
    #[arg(long)]
    noxls: bool,

    /// Workbook path; default `<outputDir or input dir>/<input stem>.xlsx`.
    #[arg(long, value_name = "PATH")]
    out: Option<PathBuf>,

    /// Print the full grid table.
    #[arg(long)]
    print: bool,

    /// Print occupied slots only, with descriptions.
    #[arg(long)]
    print_compact: bool,

    /// Print a Chassis,Slot,Point,Tagname listing.
    #[arg(long)]
    print_csv: bool,

    /// Write the ingestion report as JSON.
    #[arg(long, value_name = "PATH")]
    report_json: Option<PathBuf>,

    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG)]
    config: PathBuf,

    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputKind {
    Csv,
    L5x,
}

impl InputKind {
    fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(InputKind::Csv),
            "l5x" => Ok(InputKind::L5x),
            _ => bail!(
                "unsupported input '{}': expected .csv or .l5x",
                path.display()
            ),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let config = IogenConfig::load_from_file(&cli.config)
        .with_context(|| format!("failed to load config {}", cli.config.display()))?;

    if !cli.input.is_file() {
        bail!("input file not found: {}", cli.input.display());
    }
    let kind = InputKind::from_path(&cli.input)?;

    let table = match &cli.map {
        Some(path) if !path.is_file() => bail!("map file not found: {}", path.display()),
        Some(path) => SubstitutionTable::load(path)
            .with_context(|| format!("failed to load map file {}", path.display()))?,
        None => SubstitutionTable::default(),
    };

    let session = IoSession::new(IngestService::new(table));
    let report = run_ingest(&session, kind, &cli, &config)?;
    println!("{report}");

    let created = Local::now().naive_local();
    if cli.print {
        let layout = config.grid_layout();
        let (text, omitted) = session.read(|map| {
            (
                render_grid(map, layout, &created),
                points_outside(map, layout).len(),
            )
        });
        println!("{text}");
        if omitted > 0 {
            println!("{omitted} points outside the grid layout are not shown");
        }
    }
    if cli.print_compact {
        println!("{}", session.read(|map| render_compact(map, &created)));
    }
    if cli.print_csv {
        println!("{}", session.read(|map| render_cspt(map, ',', &created)));
    }

    if let Some(path) = &cli.report_json {
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(path, json)
            .with_context(|| format!("failed to write report {}", path.display()))?;
        info!("report written to '{}'", path.display());
    }

    if !cli.noxls {
        let out_path = cli
            .out
            .clone()
            .unwrap_or_else(|| default_xlsx_path(&cli.input, config.output_dir.as_deref()));
        let meta = XlsxMeta {
            created,
            source_name: file_name(&cli.input),
            slots: config.xlsx_slots,
        };
        let omitted = session
            .read(|map| write_xlsx(map, &out_path, &meta))
            .with_context(|| format!("failed to write {}", out_path.display()))?;
        if omitted > 0 {
            println!("{omitted} points have no cell in {}", out_path.display());
        }
    }

    Ok(())
}

fn init_logging(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };
    let mut builder =
        env_logger::Builder::from_env(Env::default().default_filter_or(default_level.as_str()));
    builder.format_timestamp_millis();
    let _ = builder.try_init();
}

fn run_ingest(
    session: &IoSession,
    kind: InputKind,
    cli: &Cli,
    config: &IogenConfig,
) -> Result<IngestReport> {
    let handle = match kind {
        InputKind::Csv => {
            let delimiter = if cli.old {
                config.legacy_delimiter_byte()
            } else {
                DEFAULT_DELIMITER
            };
            session.spawn_ingest(CsvTagSource::new(&cli.input).with_delimiter(delimiter))
        }
        InputKind::L5x => session.spawn_ingest(L5xTagSource::new(&cli.input)),
    };
    let result: Result<IngestReport, SourceError> = handle
        .join()
        .map_err(|_| anyhow!("ingestion worker panicked"))?;
    result.with_context(|| format!("failed to ingest {}", cli.input.display()))
}

fn default_xlsx_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let dir = output_dir
        .or_else(|| input.parent())
        .unwrap_or_else(|| Path::new(""));
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "iogen".to_string());
    dir.join(format!("{stem}.xlsx"))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
