use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use serde::Serialize;

use facegate_core::camera::infrastructure::image_sequence_source::{
    is_image, ImageSequenceSource,
};
use facegate_core::detection::domain::camera_status::CameraStatus;
use facegate_core::detection::domain::region_stats::FrameMetrics;
use facegate_core::detection::infrastructure::heuristic_face_gate::HeuristicFaceGate;
use facegate_core::session::camera_session::{
    CameraSession, Detection, SessionError, SessionEvent,
};
use facegate_core::session::gate_logger::StdoutGateLogger;
use facegate_core::session::session_config::SessionConfig;

/// Checks whether camera frames show a face framed well enough to capture.
#[derive(Parser)]
#[command(name = "facegate")]
struct Cli {
    /// Image files or directories of images (sorted by name).
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Run a timed camera session over the inputs instead of a single pass.
    #[arg(long)]
    watch: bool,

    /// Milliseconds between detection ticks (with --watch).
    #[arg(long, default_value = "300")]
    interval_ms: u64,

    /// Milliseconds to wait before the first tick (with --watch).
    #[arg(long, default_value = "500")]
    warmup_ms: u64,

    /// Cycle through the inputs until interrupted (with --watch).
    #[arg(long = "loop")]
    looping: bool,

    /// Print one JSON object per evaluated frame.
    #[arg(long)]
    json: bool,

    /// Include gate metrics in text output.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize, Debug, PartialEq)]
struct MetricsRecord {
    avg_brightness: f64,
    top_brightness: f64,
    middle_brightness: f64,
    bottom_brightness: f64,
    top_skin_ratio: f64,
    middle_skin_ratio: f64,
    bottom_skin_ratio: f64,
    edge_count: u64,
    symmetry_ratio: f64,
}

impl From<&FrameMetrics> for MetricsRecord {
    fn from(m: &FrameMetrics) -> Self {
        Self {
            avg_brightness: m.avg_brightness,
            top_brightness: m.top_brightness,
            middle_brightness: m.middle_brightness,
            bottom_brightness: m.bottom_brightness,
            top_skin_ratio: m.top_skin_ratio,
            middle_skin_ratio: m.middle_skin_ratio,
            bottom_skin_ratio: m.bottom_skin_ratio,
            edge_count: m.edge_count,
            symmetry_ratio: m.symmetry_ratio,
        }
    }
}

#[derive(Serialize, Debug, PartialEq)]
struct EvaluationRecord {
    path: String,
    frame_index: usize,
    detected: bool,
    reason: Option<&'static str>,
    status: &'static str,
    icon: &'static str,
    level: &'static str,
    metrics: Option<MetricsRecord>,
}

impl EvaluationRecord {
    fn new(path: &Path, detection: &Detection) -> Self {
        let result = detection.report.result;
        let status = result.status();
        Self {
            path: path.display().to_string(),
            frame_index: detection.frame_index,
            detected: result.capture_enabled(),
            reason: result.reason().map(|reason| reason.as_str()),
            status: status.message,
            icon: status.icon,
            level: status.level.as_str(),
            metrics: detection.report.metrics.as_ref().map(MetricsRecord::from),
        }
    }
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let paths = collect_images(&cli.inputs)?;
    log::info!("Checking {} image(s)", paths.len());

    let source = ImageSequenceSource::new(paths.clone()).looping(cli.looping);
    let config = SessionConfig::default()
        .with_interval(Duration::from_millis(cli.interval_ms))
        .with_warmup(Duration::from_millis(cli.warmup_ms));
    let mut session = CameraSession::new(
        Box::new(source),
        Arc::new(HeuristicFaceGate::new()),
        config,
    )
    .with_logger(Box::new(StdoutGateLogger::default()));

    let printer = Printer {
        paths: &paths,
        json: cli.json,
        verbose: cli.verbose,
    };
    if cli.watch {
        run_watch(&mut session, &printer)
    } else {
        run_once(&mut session, &printer)
    }
}

/// Frames gated and frames the source failed to produce in a single pass.
#[derive(Debug, Default, PartialEq, Eq)]
struct PassCounts {
    checked: usize,
    failed: usize,
}

fn run_once(
    session: &mut CameraSession,
    printer: &Printer,
) -> Result<(), Box<dyn std::error::Error>> {
    let counts = check_each(session, printer)?;
    session.stop()?;
    if counts.failed > 0 {
        return Err(format!(
            "{} of {} image(s) could not be checked",
            counts.failed,
            counts.checked + counts.failed
        )
        .into());
    }
    Ok(())
}

/// Gates every frame the source yields. A frame the source fails to
/// produce is reported and skipped.
fn check_each(
    session: &mut CameraSession,
    printer: &Printer,
) -> Result<PassCounts, Box<dyn std::error::Error>> {
    let mut counts = PassCounts::default();
    loop {
        match session.detect() {
            Ok(Some(detection)) => {
                printer.print(&detection)?;
                counts.checked += 1;
            }
            Ok(None) => return Ok(counts),
            Err(SessionError::Source(e)) => {
                eprintln!("Warning: {e}");
                counts.failed += 1;
            }
            Err(e) => return Err(access_error(e).into()),
        }
    }
}

fn run_watch(
    session: &mut CameraSession,
    printer: &Printer,
) -> Result<(), Box<dyn std::error::Error>> {
    let events = session.start().map_err(access_error)?;

    for event in events.iter() {
        match event {
            SessionEvent::Started => {
                if !printer.json {
                    println!("{}", CameraStatus::initializing());
                }
            }
            SessionEvent::Evaluated(detection) => printer.print(&detection)?,
            SessionEvent::SourceError(message) => eprintln!("Warning: {message}"),
            SessionEvent::Ended => break,
        }
    }

    session.stop()?;
    Ok(())
}

/// Shows the camera-denied status before surfacing a source failure.
fn access_error(e: SessionError) -> SessionError {
    if matches!(e, SessionError::Open(_)) {
        eprintln!("{}", CameraStatus::access_denied());
    }
    e
}

struct Printer<'a> {
    paths: &'a [PathBuf],
    json: bool,
    verbose: bool,
}

impl Printer<'_> {
    fn print(&self, detection: &Detection) -> Result<(), Box<dyn std::error::Error>> {
        let path = self.path_for(detection.frame_index);
        if self.json {
            println!(
                "{}",
                serde_json::to_string(&EvaluationRecord::new(path, detection))?
            );
        } else {
            println!("{}", format_line(path, detection, self.verbose));
        }
        Ok(())
    }

    /// Frame indices keep counting when the sequence loops.
    fn path_for(&self, frame_index: usize) -> &Path {
        &self.paths[frame_index % self.paths.len()]
    }
}

fn format_line(path: &Path, detection: &Detection, verbose: bool) -> String {
    let status = detection.report.result.status();
    let mut line = format!("{}: {status}", path.display());
    if verbose {
        if let Some(m) = &detection.report.metrics {
            line.push_str(&format!(
                "  [brightness {:.1}, skin {:.2}/{:.2}/{:.2}, edges {}, symmetry {:.2}]",
                m.avg_brightness,
                m.top_skin_ratio,
                m.middle_skin_ratio,
                m.bottom_skin_ratio,
                m.edge_count,
                m.symmetry_ratio
            ));
        }
    }
    line
}

/// Expands directories into their images, keeping the command-line order.
fn collect_images(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut paths = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let source = ImageSequenceSource::from_dir(input)?;
            paths.extend_from_slice(source.paths());
        } else if is_image(input) {
            paths.push(input.clone());
        } else {
            return Err(format!("Unsupported input: {}", input.display()).into());
        }
    }
    if paths.is_empty() {
        return Err("No images found in the given inputs".into());
    }
    Ok(paths)
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    for input in &cli.inputs {
        if !input.exists() {
            return Err(format!("Input not found: {}", input.display()).into());
        }
    }
    if cli.interval_ms == 0 {
        return Err("Interval must be at least 1ms".into());
    }
    if cli.looping && !cli.watch {
        return Err("--loop requires --watch".into());
    }
    Ok(())
}
