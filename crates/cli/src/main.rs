use std::path::PathBuf;
use std::process;

use clap::Parser;

use facewatch_core::capture::domain::capture_device::CaptureSource;
use facewatch_core::capture::infrastructure::ffmpeg_capture::FfmpegCapture;
use facewatch_core::detection::infrastructure::cascade_loader::CascadeFileLoader;
use facewatch_core::display::domain::display_surface::DisplaySurface;
use facewatch_core::display::infrastructure::headless_display::HeadlessDisplay;
use facewatch_core::pipeline::live_config::{LiveConfig, ViewMode};
use facewatch_core::pipeline::live_detection_loop::{
    ExitReason, LiveDetectionLoop, LoopError, LoopReport,
};
use facewatch_core::pipeline::pipeline_logger::StdoutPipelineLogger;

/// Live face detection on a webcam or video file.
#[derive(Parser, Debug)]
#[command(name = "facewatch")]
struct Cli {
    /// Camera device name (default: the platform's first camera).
    #[arg(long, conflicts_with = "file")]
    device: Option<String>,

    /// Input device format: v4l2, avfoundation or dshow.
    #[arg(long, requires = "device")]
    input_format: Option<String>,

    /// Read frames from a video file instead of a camera.
    #[arg(long)]
    file: Option<PathBuf>,

    /// Haar cascade XML file.
    #[arg(long)]
    cascade: Option<PathBuf>,

    /// JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Working frame scale applied to captured frames.
    #[arg(long)]
    scale: Option<f64>,

    /// Pyramid step between detection scales (> 1.0).
    #[arg(long)]
    scale_factor: Option<f64>,

    /// Overlapping hits a face needs to be reported.
    #[arg(long)]
    min_neighbors: Option<u32>,

    /// Smallest face to look for, as WxH.
    #[arg(long, value_parser = parse_size)]
    min_size: Option<(u32, u32)>,

    /// Largest face to look for, as WxH.
    #[arg(long, value_parser = parse_size)]
    max_size: Option<(u32, u32)>,

    /// Bounding box line thickness in pixels.
    #[arg(long)]
    line_thickness: Option<u32>,

    /// What to show: working, skin or quad.
    #[arg(long, value_parser = parse_view)]
    view: Option<ViewMode>,

    /// Key wait per frame in milliseconds.
    #[arg(long)]
    wait_ms: Option<u64>,

    /// Stop after this many frames.
    #[arg(long)]
    max_frames: Option<usize>,

    /// Run without a window.
    #[arg(long)]
    headless: bool,
}

/// Shows per-face lines, camera status and the session summary unless
/// `RUST_LOG` says otherwise.
const DEFAULT_LOG_FILTER: &str = "info";

fn main() {
    logger_builder(env_logger::Env::default()).init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = LiveConfig::load(cli.config.as_deref())?;
    apply_overrides(&cli, &mut config);
    config.validate()?;

    let source = capture_source(&cli);
    log::info!("Capture source: {source}");

    let report = if cli.headless {
        run_session(source, cli.cascade, HeadlessDisplay::new(), config)?
    } else {
        let title = config.window_title.clone();
        facewatch_viewer::run_with_window(&title, move |display| {
            run_session(source, cli.cascade, display, config)
        })??
    };

    print_report(&report);
    Ok(())
}

fn logger_builder(env: env_logger::Env<'_>) -> env_logger::Builder {
    env_logger::Builder::from_env(env.default_filter_or(DEFAULT_LOG_FILTER))
}

fn run_session(
    source: CaptureSource,
    cascade: Option<PathBuf>,
    display: impl DisplaySurface + 'static,
    config: LiveConfig,
) -> Result<LoopReport, LoopError> {
    let mut live = LiveDetectionLoop::new(
        Box::new(FfmpegCapture::new(source)),
        Box::new(CascadeFileLoader::new(cascade)),
        Box::new(display),
        config,
        Box::new(StdoutPipelineLogger::default()),
    );
    live.run()
}

fn apply_overrides(cli: &Cli, config: &mut LiveConfig) {
    if let Some(scale) = cli.scale {
        config.working_scale = scale;
    }
    if let Some(factor) = cli.scale_factor {
        config.detector.scale_factor = factor;
    }
    if let Some(n) = cli.min_neighbors {
        config.detector.min_neighbors = n;
    }
    if let Some(size) = cli.min_size {
        config.detector.min_size = size;
    }
    if cli.max_size.is_some() {
        config.detector.max_size = cli.max_size;
    }
    if let Some(thickness) = cli.line_thickness {
        config.line_thickness = thickness;
    }
    if let Some(view) = cli.view {
        config.view = view;
    }
    if let Some(ms) = cli.wait_ms {
        config.key_wait_ms = ms;
    }
    if cli.max_frames.is_some() {
        config.max_frames = cli.max_frames;
    }
}

fn capture_source(cli: &Cli) -> CaptureSource {
    if let Some(path) = &cli.file {
        return CaptureSource::File(path.clone());
    }
    match (&cli.device, CaptureSource::default_camera()) {
        (Some(name), CaptureSource::Device { input_format, .. }) => CaptureSource::Device {
            input_format: cli.input_format.clone().unwrap_or(input_format),
            name: name.clone(),
        },
        (_, default) => default,
    }
}

fn print_report(report: &LoopReport) {
    let reason = match &report.exit_reason {
        ExitReason::QuitKey => "quit key pressed".to_string(),
        ExitReason::WindowClosed => "window closed".to_string(),
        ExitReason::FrameLimit => "frame limit reached".to_string(),
        ExitReason::CaptureEnded(e) => format!("capture ended ({e})"),
    };
    println!(
        "{} frames, {} faces, {} failed frames; stopped: {reason}",
        report.frames, report.faces, report.failed_frames
    );
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got '{s}'"))?;
    let w = w.trim().parse().map_err(|_| format!("invalid width in '{s}'"))?;
    let h = h.trim().parse().map_err(|_| format!("invalid height in '{s}'"))?;
    Ok((w, h))
}

fn parse_view(s: &str) -> Result<ViewMode, String> {
    ViewMode::ALL
        .iter()
        .copied()
        .find(|mode| mode.to_string() == s)
        .ok_or_else(|| format!("view must be one of: working, skin, quad, got '{s}'"))
}
