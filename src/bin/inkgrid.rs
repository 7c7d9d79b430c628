use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "inkgrid", version)]
struct Cli {
    /// Canvas/export settings JSON. Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a pointer-event log and save the full-resolution canvas as PNG.
    Snapshot(SnapshotArgs),
    /// Replay a pointer-event log and write the exported tensor as JSON.
    Export(ExportArgs),
}

#[derive(Parser, Debug)]
struct SnapshotArgs {
    /// Pointer-event log (JSON array of {"type": "down"|"move"|"up"|"clear", ...}).
    #[arg(long)]
    events: PathBuf,

    /// Output PNG path.
    #[arg(long, default_value = inkgrid::DEFAULT_SNAPSHOT_FILE)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Pointer-event log (JSON array of {"type": "down"|"move"|"up"|"clear", ...}).
    #[arg(long)]
    events: PathBuf,

    /// Output tensor JSON path.
    #[arg(long)]
    out: PathBuf,

    /// Numeric domain; unknown tags fall back to uint8 with a warning.
    #[arg(long)]
    dtype: Option<String>,

    /// Export raster width.
    #[arg(long)]
    width: Option<u32>,

    /// Export raster height.
    #[arg(long)]
    height: Option<u32>,

    /// Target tensor shape, e.g. `1,28,28,1`.
    #[arg(long)]
    shape: Option<inkgrid::TargetShape>,

    /// Resampling filter.
    #[arg(long, value_enum)]
    filter: Option<FilterChoice>,

    /// Also save the full-resolution canvas as PNG.
    #[arg(long)]
    png: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FilterChoice {
    Nearest,
    Area,
}

impl From<FilterChoice> for inkgrid::Filter {
    fn from(f: FilterChoice) -> Self {
        match f {
            FilterChoice::Nearest => Self::Nearest,
            FilterChoice::Area => Self::Area,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = load_config(cli.config.as_deref())?;
    match cli.cmd {
        Command::Snapshot(args) => cmd_snapshot(&cfg, args),
        Command::Export(args) => cmd_export(cfg, args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<inkgrid::PadConfig> {
    let mut cfg = match path {
        Some(p) => inkgrid::PadConfig::from_path(p)?,
        None => inkgrid::PadConfig::default(),
    };
    cfg.apply_overrides(|k| std::env::var(k).ok())?;
    Ok(cfg)
}

fn read_events(path: &Path) -> anyhow::Result<Vec<inkgrid::PointerEvent>> {
    let f = File::open(path).with_context(|| format!("open events '{}'", path.display()))?;
    let events: Vec<inkgrid::PointerEvent> = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse events '{}'", path.display()))?;
    Ok(events)
}

fn replay(cfg: &inkgrid::PadConfig, events: &Path) -> anyhow::Result<inkgrid::StrokeRecorder> {
    let events = read_events(events)?;
    let mut recorder = inkgrid::StrokeRecorder::new(cfg.build_canvas()?);
    recorder.replay(&events);
    recorder.redraw();
    tracing::info!(
        events = events.len(),
        strokes = recorder.canvas().history().len(),
        "replayed pointer events"
    );
    Ok(recorder)
}

fn cmd_snapshot(cfg: &inkgrid::PadConfig, args: SnapshotArgs) -> anyhow::Result<()> {
    let mut recorder = replay(cfg, &args.events)?;
    recorder.snapshot().save_png(&args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_export(mut cfg: inkgrid::PadConfig, args: ExportArgs) -> anyhow::Result<()> {
    if let Some(dtype) = args.dtype {
        cfg.export.dtype = dtype;
    }
    if let Some(w) = args.width {
        cfg.export.target_width = w;
    }
    if let Some(h) = args.height {
        cfg.export.target_height = h;
    }
    if let Some(shape) = args.shape {
        cfg.export.target_shape = Some(shape);
    }
    if let Some(filter) = args.filter {
        cfg.export.filter = filter.into();
    }
    cfg.validate()?;

    let mut recorder = replay(&cfg, &args.events)?;
    let tensor = recorder.export(&cfg.export_request())?;
    for w in &tensor.warnings {
        eprintln!("warning: {w}");
    }

    if let Some(png) = &args.png {
        recorder.snapshot().save_png(png)?;
        eprintln!("wrote {}", png.display());
    }

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let f = File::create(&args.out)
        .with_context(|| format!("create tensor file '{}'", args.out.display()))?;
    serde_json::to_writer(f, &tensor).with_context(|| "write tensor JSON")?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
