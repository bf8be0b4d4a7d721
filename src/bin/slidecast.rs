use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use slidecast::{
    AspectMode, AudioBlob, BitratePolicy, CancelToken, EncodeConfig, Fps, Resolution,
    SlidecastResult, SlideshowEncoder, SourceImage, SyncMode, VideoExtendMode,
};

/// Encode still images (and optional audio) into an MP4 slideshow.
///
/// Requires `ffmpeg` on PATH.
#[derive(Parser, Debug)]
#[command(name = "slidecast", version)]
struct Cli {
    /// Input images, in display order.
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Optional audio track.
    #[arg(long)]
    audio: Option<PathBuf>,

    /// JSON config file; flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output frame rate (1-60).
    #[arg(long)]
    fps: Option<u32>,

    /// Quality (1-100).
    #[arg(long)]
    quality: Option<u32>,

    /// `source` or a preset: 360p, 480p, 720p, 1080p, 1440p, 4k, 8k.
    #[arg(long)]
    resolution: Option<Resolution>,

    #[arg(long, value_enum)]
    aspect: Option<AspectMode>,

    #[arg(long, value_enum)]
    sync: Option<SyncMode>,

    /// How to fill the video when the audio outlasts the images.
    #[arg(long, value_enum)]
    extend: Option<VideoExtendMode>,

    #[arg(long, value_enum)]
    bitrate_policy: Option<BitratePolicy>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = build_config(&cli)?;
    let images = cli
        .images
        .iter()
        .map(|p| SourceImage::from_path(p))
        .collect::<Result<Vec<_>, _>>()?;
    let audio = cli.audio.as_deref().map(AudioBlob::from_path).transpose()?;

    let cancel = CancelToken::new();
    let on_interrupt = cancel.clone();
    ctrlc::set_handler(move || on_interrupt.cancel()).context("install Ctrl-C handler")?;

    let encoder = SlideshowEncoder::new();
    let mut last_pct = None;
    let result = encoder.encode(
        &images,
        &config,
        audio.as_ref(),
        |current, total| {
            let pct = current * 100 / total.max(1);
            if last_pct != Some(pct) {
                last_pct = Some(pct);
                eprint!("\rencoding {current}/{total} ({pct}%)");
            }
        },
        &cancel,
    );
    eprintln!();

    match write_output(result, &cli.out)? {
        Some(len) => eprintln!("wrote {} ({len} bytes)", cli.out.display()),
        None => eprintln!("cancelled; nothing written"),
    }
    Ok(())
}

/// Write the encoded bytes to `out`. Returns `None` without touching `out` when the run was
/// cancelled.
fn write_output(result: SlidecastResult<Vec<u8>>, out: &Path) -> anyhow::Result<Option<usize>> {
    let bytes = match result {
        Ok(bytes) => bytes,
        Err(e) if e.is_cancelled() => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(out, &bytes).with_context(|| format!("write mp4 '{}'", out.display()))?;
    Ok(Some(bytes.len()))
}

fn build_config(cli: &Cli) -> anyhow::Result<EncodeConfig> {
    let mut config = match cli.config.as_deref() {
        Some(path) => read_config_json(path)?,
        None => EncodeConfig::default(),
    };
    if let Some(fps) = cli.fps {
        config.fps = Fps::new(fps)?;
    }
    if let Some(quality) = cli.quality {
        anyhow::ensure!((1..=100).contains(&quality), "--quality must be in 1..=100");
        config.quality = quality;
    }
    if let Some(resolution) = cli.resolution {
        config.resolution = resolution;
    }
    if let Some(aspect) = cli.aspect {
        config.aspect_mode = aspect;
    }
    if let Some(sync) = cli.sync {
        config.sync_mode = sync;
    }
    if let Some(extend) = cli.extend {
        config.video_extend_mode = extend;
    }
    if let Some(policy) = cli.bitrate_policy {
        config.bitrate_policy = policy;
    }
    Ok(config)
}

fn read_config_json(path: &Path) -> anyhow::Result<EncodeConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config '{}'", path.display()))?;
    EncodeConfig::from_json_str(&text).with_context(|| format!("parse config '{}'", path.display()))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}
