use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueHint};
use ng_report::{AnalysisOptions, Analyzer, ArtifactStore, PresentationMode};
use std::fs::{self, File};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Rank NG test failures of a production test-result workbook", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate a workbook against its limits and print the report as JSON
    Analyse(AnalyseArgs),
}

#[derive(Parser, Debug)]
struct AnalyseArgs {
    /// Test-result workbook (.xlsx or .xlsm)
    #[arg(value_hint = ValueHint::FilePath)]
    file: PathBuf,

    #[arg(long, value_enum, default_value_t = PresentationMode::Structured)]
    mode: PresentationMode,

    /// JSON file with analysis options; flags below override it
    #[arg(long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Directory receiving chart artifacts
    #[arg(long, default_value = "plots", value_hint = ValueHint::DirPath)]
    artifact_dir: PathBuf,

    /// Glob pattern selecting the worksheet
    #[arg(long)]
    sheet: Option<String>,

    /// Number of ranked tests to report
    #[arg(long)]
    top: Option<usize>,

    /// Compare missing, not-available and non-finite cells as 0
    #[arg(long, action = ArgAction::SetTrue)]
    normalize_invalid: bool,

    /// Merge test names differing only in a " (unit)" suffix
    #[arg(long, action = ArgAction::SetTrue)]
    strip_unit_suffix: bool,

    #[arg(long, action = ArgAction::SetTrue)]
    pretty: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, value_hint = ValueHint::FilePath)]
    log_file: Option<PathBuf>,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let Command::Analyse(args) = cli.command;

    if let Err(e) = init_logging(&args) {
        eprintln!("{e:#}");
        return ExitCode::FAILURE;
    }
    match handle_analyse(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(args: &AnalyseArgs) -> Result<()> {
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = match &args.log_file {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("Failed to create log file '{}'", path.display()))?;
            builder.with_writer(Mutex::new(file)).with_ansi(false).try_init()
        }
        None => builder.with_writer(io::stderr).try_init(),
    };
    if let Err(e) = installed {
        eprintln!("Failed to install log subscriber: {e}");
    }
    Ok(())
}

fn handle_analyse(args: AnalyseArgs) -> Result<()> {
    let mut options = match &args.config {
        Some(path) => AnalysisOptions::from_file(path)?,
        None => AnalysisOptions::default(),
    };
    if let Some(sheet) = args.sheet {
        options.sheet = Some(sheet);
    }
    if let Some(top) = args.top {
        options.top_k = top;
    }
    options.normalize_invalid |= args.normalize_invalid;
    options.strip_unit_suffix |= args.strip_unit_suffix;

    let bytes = fs::read(&args.file).with_context(|| format!("Failed to read '{}'", args.file.display()))?;
    let filename = args
        .file
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow!("Invalid file name '{}'", args.file.display()))?;

    let analyzer = Analyzer::new(options, ArtifactStore::new(args.artifact_dir));
    let output = analyzer.analyse(&bytes, filename, args.mode)?;
    let json = if args.pretty { serde_json::to_string_pretty(&output)? } else { serde_json::to_string(&output)? };
    println!("{json}");
    Ok(())
}
