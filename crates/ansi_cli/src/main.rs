use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use ansi_render::{
    present_static, DecodedFrames, DelayPolicy, EscapeCodes, FrameSeries, FrameSource, Gradient,
    InterruptibleSleeper, LayoutPolicy, Player, Rasterizer, RenderOptions, StaticFrame,
    SystemClock, DEFAULT_CELL_ASPECT, DEFAULT_SCALE, MIN_FRAME_TIME,
};
use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use signal_hook::consts::{SIGINT, SIGTERM};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(author, version, about = "Render images as truecolor ANSI art and play animations")]
struct Cli {
    /// Increase log verbosity (logs go to stderr)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play an animation (GIF or directory of frames) in a loop, or show a still image
    Play(PlayArgs),
    /// Render the first frame of an image once, to the terminal or a file
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct PlayArgs {
    /// Input path (GIF, still image or directory of images)
    input: PathBuf,
    /// Delay in milliseconds for frames without readable timing metadata
    #[arg(long, env = "ANSI_FALLBACK_DELAY", default_value_t = MIN_FRAME_TIME.as_millis() as u64)]
    fallback_delay: u64,
    /// Do not show pre-render progress
    #[arg(long, default_value_t = false)]
    no_progress: bool,
    #[command(flatten)]
    settings: RenderSettings,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input image path
    input: PathBuf,
    /// Write the rendered text to this file instead of the terminal
    #[arg(short, long)]
    output: Option<PathBuf>,
    #[command(flatten)]
    settings: RenderSettings,
}

#[derive(Parser, Debug, Clone)]
struct RenderSettings {
    /// Emit bare glyphs without truecolor escapes
    #[arg(long, default_value_t = false)]
    no_color: bool,
    /// Columns per source pixel column
    #[arg(long, env = "ANSI_SCALE", default_value_t = DEFAULT_SCALE)]
    scale: f64,
    /// Fixed column count, overrides --scale
    #[arg(long)]
    width: Option<u32>,
    /// Glyph ramp preset
    #[arg(long, value_enum, default_value = "density")]
    gradient: GradientPreset,
    /// Custom glyph ramp, lightest glyph first
    #[arg(long, conflicts_with = "gradient")]
    ramp: Option<String>,
    /// Cell width / height ratio of the terminal font
    #[arg(long, default_value_t = DEFAULT_CELL_ASPECT)]
    cell_aspect: f64,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum GradientPreset {
    Density,
    Detailed,
    Standard,
    Blocks,
    Binary,
}

enum Input {
    Still(StaticFrame),
    Animation(DecodedFrames),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Play(args) => play(args),
        Commands::Render(args) => render(args),
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env("ANSI_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn play(args: PlayArgs) -> Result<()> {
    let rasterizer = args.settings.to_rasterizer()?;
    let layout = args.settings.layout();
    let escapes = rasterizer.options().escapes.clone();

    let frames = match load_input(&args.input)? {
        Input::Still(still) => {
            let frame = still.frame(0).context("failed to decode still image")?;
            let frame = rasterizer
                .render_image(&frame, layout)
                .with_context(|| format!("failed to render {:?}", args.input))?;
            let mut stdout = io::stdout().lock();
            return present_static(&mut stdout, &frame, &escapes).context("failed to write frame");
        },
        Input::Animation(frames) => frames,
    };

    let policy = DelayPolicy { fallback: Duration::from_millis(args.fallback_delay) };
    let progress = progress_bar(frames.frame_count(), args.no_progress)?;
    let series =
        FrameSeries::prerender_with_progress(&frames, &rasterizer, layout, policy, |done, _| {
            progress.set_position(done as u64)
        })
        .with_context(|| format!("failed to render {:?}", args.input))?;
    progress.finish_and_clear();
    drop(frames);

    let interrupted = Arc::new(AtomicBool::new(false));
    for signal in [SIGINT, SIGTERM] {
        signal_hook::flag::register(signal, Arc::clone(&interrupted))
            .context("failed to install signal handler")?;
    }

    let stdout = BufWriter::with_capacity(1 << 16, io::stdout().lock());
    let mut player =
        Player::new(stdout, SystemClock, InterruptibleSleeper::new(interrupted), escapes);
    let summary = player.play(&series).context("playback failed")?;
    info!("presented {} frames", summary.frames_presented);
    Ok(())
}

fn render(args: RenderArgs) -> Result<()> {
    let rasterizer = args.settings.to_rasterizer()?;
    let layout = args.settings.layout();

    let frame = match load_input(&args.input)? {
        Input::Still(still) => still.frame(0),
        Input::Animation(frames) => frames.frame(0),
    }
    .with_context(|| format!("failed to decode {:?}", args.input))?;
    let frame = rasterizer
        .render_image(&frame, layout)
        .with_context(|| format!("failed to render {:?}", args.input))?;

    match args.output {
        Some(path) => {
            ensure_parent(&path)
                .with_context(|| format!("failed to create parent of {:?}", path))?;
            let mut file =
                File::create(&path).with_context(|| format!("failed to create {:?}", path))?;
            file.write_all(frame.text().as_bytes())?;
        },
        None => {
            let mut stdout = io::stdout().lock();
            present_static(&mut stdout, &frame, &rasterizer.options().escapes)?;
        },
    }
    Ok(())
}

fn progress_bar(len: usize, hidden: bool) -> Result<ProgressBar> {
    if hidden || len <= 1 {
        return Ok(ProgressBar::hidden());
    }
    let progress = ProgressBar::new(len as u64);
    progress.set_style(
        ProgressStyle::with_template(
            "{spinner} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} frames",
        )?
        .progress_chars("=> "),
    );
    Ok(progress)
}

fn load_input(path: &Path) -> Result<Input> {
    if path.is_dir() {
        return load_frames_from_directory(path).map(Input::Animation);
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();
    if extension == "gif" {
        load_frames_from_gif(path).map(Input::Animation)
    } else {
        let image = image::open(path).with_context(|| format!("failed to open image {:?}", path))?;
        Ok(Input::Still(StaticFrame::new(image)))
    }
}

fn load_frames_from_gif(path: &Path) -> Result<DecodedFrames> {
    let file = File::open(path).with_context(|| format!("failed to open GIF {:?}", path))?;
    let frames = DecodedFrames::from_gif(BufReader::new(file))
        .with_context(|| format!("failed to decode GIF {:?}", path))?;
    if frames.is_empty() {
        anyhow::bail!("GIF {:?} contains no frames", path);
    }
    debug!("decoded {} frames from {:?}", frames.frame_count(), path);
    Ok(frames)
}

fn load_frames_from_directory(path: &Path) -> Result<DecodedFrames> {
    let mut entries: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path().to_path_buf())
        .collect();
    entries.sort();
    if entries.is_empty() {
        anyhow::bail!("no image files found in {:?}", path);
    }

    let mut images = Vec::with_capacity(entries.len());
    for entry in entries {
        let image =
            image::open(&entry).with_context(|| format!("failed to open image {:?}", entry))?;
        images.push(image);
    }
    debug!("loaded {} frames from {:?}", images.len(), path);
    Ok(DecodedFrames::from_images(images))
}

impl RenderSettings {
    fn to_rasterizer(&self) -> Result<Rasterizer> {
        let gradient = match &self.ramp {
            Some(ramp) => Gradient::try_new(ramp.as_str()).context("invalid --ramp")?,
            None => self.gradient.to_gradient(),
        };
        Ok(Rasterizer::new(RenderOptions {
            gradient,
            color: !self.no_color,
            cell_aspect: self.cell_aspect.max(0.1),
            escapes: EscapeCodes::default(),
        }))
    }

    fn layout(&self) -> LayoutPolicy {
        match self.width {
            Some(columns) => LayoutPolicy::FixedColumns(columns),
            None => LayoutPolicy::Scale(self.scale),
        }
    }
}

impl GradientPreset {
    fn to_gradient(self) -> Gradient {
        match self {
            GradientPreset::Density => Gradient::density(),
            GradientPreset::Detailed => Gradient::detailed(),
            GradientPreset::Standard => Gradient::standard(),
            GradientPreset::Blocks => Gradient::blocks(),
            GradientPreset::Binary => Gradient::binary(),
        }
    }
}

fn ensure_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
