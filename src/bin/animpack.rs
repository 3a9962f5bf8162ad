use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "animpack", version)]
struct Cli {
    /// Log per-frame details.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pack a PNG or SVG frame sequence into an animated PNG.
    Apng(ApngArgs),
}

#[derive(Parser, Debug)]
struct ApngArgs {
    /// Input frames: one directory, or a list of .png/.svg files in display order.
    #[arg(short, long = "input", required = true, num_args = 1..)]
    inputs: Vec<PathBuf>,

    /// Output APNG path.
    #[arg(short, long)]
    output: PathBuf,

    /// JSON config file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of times to play the animation (0 = infinite).
    #[arg(long)]
    repeat: Option<u32>,

    /// Frame rate of the input sequence.
    #[arg(long)]
    fps: Option<f64>,

    /// Maximum output frame rate; faster inputs drop frames.
    #[arg(long)]
    max_fps: Option<f64>,

    /// Playback speed multiplier.
    #[arg(long)]
    speed: Option<f64>,

    /// Raster width for SVG inputs.
    #[arg(long)]
    width: Option<u32>,

    /// Raster height for SVG inputs.
    #[arg(long)]
    height: Option<u32>,

    /// Background for SVG inputs, #RRGGBB or #RRGGBBAA.
    #[arg(long)]
    background: Option<animpack::Rgba8>,

    /// Fail on the first malformed input frame instead of writing it empty.
    #[arg(long)]
    strict: bool,

    /// Refuse to replace an existing output file.
    #[arg(long)]
    no_overwrite: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Apng(args) => cmd_apng(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(args: &ApngArgs) -> anyhow::Result<animpack::ConvertConfig> {
    let mut cfg = match &args.config {
        Some(path) => animpack::ConvertConfig::from_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => animpack::ConvertConfig::default(),
    };

    if let Some(v) = args.repeat {
        cfg.repeat = v;
    }
    if let Some(v) = args.fps {
        cfg.fps = v;
    }
    if let Some(v) = args.max_fps {
        cfg.max_fps = v;
    }
    if let Some(v) = args.speed {
        cfg.speed = v;
    }
    if args.width.is_some() {
        cfg.width = args.width;
    }
    if args.height.is_some() {
        cfg.height = args.height;
    }
    if args.background.is_some() {
        cfg.background = args.background;
    }
    cfg.strict |= args.strict;
    if args.no_overwrite {
        cfg.overwrite = false;
    }

    cfg.validate()?;
    Ok(cfg)
}

fn cmd_apng(args: ApngArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args)?;
    let (kind, paths) = animpack::collect_inputs(&args.inputs)?;

    let mut source: Box<dyn animpack::FrameSource> = match kind {
        animpack::InputKind::Png => Box::new(animpack::PngSequence::new(paths)),
        animpack::InputKind::Svg => Box::new(animpack::SvgSequence::new(
            paths,
            cfg.width,
            cfg.height,
            cfg.background,
        )),
    };

    let stats = animpack::write_apng(source.as_mut(), &cfg, &args.output)
        .with_context(|| format!("convert to '{}'", args.output.display()))?;

    tracing::info!(
        output = %args.output.display(),
        frames = stats.frames_written,
        dropped = stats.frames_dropped,
        "conversion finished"
    );
    Ok(())
}
