//! board-rectify CLI: unproject a numbered directory of annotated renders.

use std::path::PathBuf;

use board_rectify::{BatchRunner, BorderMode, RunConfig};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser, Debug)]
#[command(name = "board-rectify")]
#[command(
    about = "Unproject annotated board renders ({i}.jpg + {i}.json) into top-down {i}_unwrapped.jpg views"
)]
#[command(version)]
struct Cli {
    /// JSON run configuration; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding `{i}.jpg` and `{i}.json`.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Directory receiving `{i}_unwrapped.jpg` (created if missing).
    #[arg(long)]
    output: Option<PathBuf>,

    /// Number of indices to process (default: discovered from the input directory).
    #[arg(long)]
    count: Option<usize>,

    /// First index to process.
    #[arg(long)]
    start: Option<usize>,

    /// Outward growth of the board quad around its diagonal center.
    #[arg(long, allow_negative_numbers = true)]
    growth: Option<f64>,

    /// Output canvas width in pixels.
    #[arg(long)]
    width: Option<usize>,

    /// Output canvas height in pixels.
    #[arg(long)]
    height: Option<usize>,

    /// Sampling policy outside the source image.
    #[arg(long, value_enum)]
    border: Option<BorderArg>,

    /// Fill value for `--border constant`.
    #[arg(long)]
    fill: Option<u8>,

    /// JPEG quality of the written images (1-100).
    #[arg(long)]
    jpeg_quality: Option<u8>,

    /// Write a JSON report of processed and failed indices.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Log level.
    #[arg(long, value_enum, default_value_t = LogLevelArg::Info)]
    log_level: LogLevelArg,

    /// Draw a progress bar instead of per-index log lines (logging is capped at `warn`).
    #[arg(long)]
    progress: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BorderArg {
    Constant,
    Replicate,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Off => LevelFilter::Off,
            LogLevelArg::Error => LevelFilter::Error,
            LogLevelArg::Warn => LevelFilter::Warn,
            LogLevelArg::Info => LevelFilter::Info,
            LogLevelArg::Debug => LevelFilter::Debug,
            LogLevelArg::Trace => LevelFilter::Trace,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> CliResult<()> {
    let level = LevelFilter::from(cli.log_level);
    init_logging(if cli.progress {
        level.min(LevelFilter::Warn)
    } else {
        level
    })?;

    let cfg = resolve_config(cli)?;
    cfg.validate()?;

    let source = cfg.source();
    let sink = cfg.sink();
    let indices = cfg.indices(&source);
    log::info!(
        "unprojecting {} samples from {} into {}",
        indices.len(),
        cfg.input_dir.display(),
        cfg.output_dir.display()
    );

    let bar = if cli.progress {
        let bar = ProgressBar::new(indices.len() as u64);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} samples",
            )?
            .progress_chars("#>-"),
        );
        bar
    } else {
        ProgressBar::hidden()
    };
    let report = BatchRunner::new(cfg.rectify.clone()).run_with_progress(
        &source,
        &sink,
        indices,
        |done, _| bar.set_position(done as u64),
    );
    bar.finish_and_clear();

    if let Some(path) = &cfg.report_path {
        report.write_json(path)?;
        log::info!("wrote report to {}", path.display());
    }

    println!(
        "{} processed, {} failed",
        report.processed.len(),
        report.failures.len()
    );
    Ok(())
}

fn resolve_config(cli: &Cli) -> CliResult<RunConfig> {
    let mut cfg = match &cli.config {
        Some(path) => RunConfig::load_json(path)?,
        None => RunConfig::default(),
    };

    if let Some(input) = &cli.input {
        cfg.input_dir = input.clone();
    }
    if let Some(output) = &cli.output {
        cfg.output_dir = output.clone();
    }
    if cli.count.is_some() {
        cfg.count = cli.count;
    }
    if let Some(start) = cli.start {
        cfg.start = start;
    }
    if let Some(growth) = cli.growth {
        cfg.rectify.growth_factor = growth;
    }
    if let Some(width) = cli.width {
        cfg.rectify.canvas_width = width;
    }
    if let Some(height) = cli.height {
        cfg.rectify.canvas_height = height;
    }
    match (cli.border, cli.fill) {
        (Some(BorderArg::Replicate), _) => cfg.rectify.border = BorderMode::Replicate,
        (Some(BorderArg::Constant), fill) => {
            cfg.rectify.border = BorderMode::Constant(fill.unwrap_or(0))
        }
        (None, Some(fill)) => cfg.rectify.border = BorderMode::Constant(fill),
        (None, None) => {}
    }
    if let Some(quality) = cli.jpeg_quality {
        cfg.jpeg_quality = quality;
    }
    if cli.report.is_some() {
        cfg.report_path = cli.report.clone();
    }
    Ok(cfg)
}

#[cfg(feature = "tracing")]
fn init_logging(level: LevelFilter) -> CliResult<()> {
    board_rectify::core::init_tracing(false, level);
    Ok(())
}

#[cfg(not(feature = "tracing"))]
fn init_logging(level: LevelFilter) -> CliResult<()> {
    board_rectify::core::init_with_level(level)?;
    Ok(())
}
