use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crossbeam_channel::{select, Receiver, Sender, TrySendError};
use thiserror::Error;

use crate::camera::domain::frame_source::{FramePoll, FrameSource, SourceError};
use crate::camera::infrastructure::frame_downsampler::FrameDownsampler;
use crate::detection::domain::detection_result::GateReport;
use crate::detection::domain::face_gate::FaceGate;
use crate::shared::frame::Frame;

use super::gate_logger::{GateLogger, NullGateLogger};
use super::session_config::SessionConfig;

/// Events kept for a receiver that is not draining; older ones are dropped.
const EVENT_CAPACITY: usize = 8;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("camera session is already running")]
    AlreadyRunning,
    #[error("camera session is running; stop it first")]
    Running,
    #[error("failed to open frame source: {0}")]
    Open(#[source] SourceError),
    #[error("frame source failed: {0}")]
    Source(#[source] SourceError),
    #[error("invalid session config: {0}")]
    InvalidConfig(String),
    #[error("camera session worker panicked")]
    WorkerPanicked,
}

/// One gated frame, identified by the source's frame index.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detection {
    pub frame_index: usize,
    pub report: GateReport,
}

#[derive(Debug)]
pub enum SessionEvent {
    /// The worker is running; the first tick follows after the warm-up.
    Started,
    Evaluated(Detection),
    /// Polling failed on this tick; the session keeps running.
    SourceError(String),
    /// The source has no more frames and the worker has exited.
    Ended,
}

/// Full-resolution frame together with the verdict on its downsampled copy.
struct AnalysedFrame {
    frame: Frame,
    report: GateReport,
}

/// What the worker borrows from the session and hands back on join.
struct SessionParts {
    source: Box<dyn FrameSource>,
    logger: Box<dyn GateLogger>,
}

#[derive(Clone)]
struct GateContext {
    gate: Arc<dyn FaceGate>,
    downsampler: FrameDownsampler,
    last: Arc<Mutex<Option<AnalysedFrame>>>,
}

impl GateContext {
    /// Downsamples, gates and records one frame as the latest analysed.
    fn analyse(&self, frame: Frame, logger: &mut dyn GateLogger) -> Detection {
        let started = Instant::now();
        let report = match self.downsampler.downsample(&frame) {
            Ok(small) => self.gate.inspect(&small),
            Err(e) => {
                log::debug!("Frame {} could not be downsampled: {e}", frame.index());
                GateReport::malformed()
            }
        };
        let detection = Detection {
            frame_index: frame.index(),
            report,
        };
        logger.evaluated(
            detection.frame_index,
            report.result,
            started.elapsed().as_secs_f64() * 1000.0,
        );
        *lock(&self.last) = Some(AnalysedFrame { frame, report });
        detection
    }
}

/// Sending half of the event channel. A full queue drops its oldest event,
/// so the newest result and `Ended` always reach a slow receiver.
struct EventQueue {
    tx: Sender<SessionEvent>,
    overflow: Receiver<SessionEvent>,
}

impl EventQueue {
    fn bounded(capacity: usize) -> (Self, Receiver<SessionEvent>) {
        let (tx, rx) = crossbeam_channel::bounded(capacity.max(1));
        let queue = Self {
            tx,
            overflow: rx.clone(),
        };
        (queue, rx)
    }

    fn publish(&self, event: SessionEvent) {
        let mut event = event;
        loop {
            match self.tx.try_send(event) {
                Ok(()) | Err(TrySendError::Disconnected(_)) => return,
                Err(TrySendError::Full(rejected)) => {
                    let _ = self.overflow.try_recv();
                    event = rejected;
                }
            }
        }
    }
}

struct Worker {
    stop_tx: Sender<()>,
    handle: JoinHandle<SessionParts>,
}

/// Owns a camera stream, the detection timer that gates it, and the last
/// analysed frame.
///
/// While running, the source lives on a worker thread that polls it every
/// `interval` after an initial `warmup`; `stop` joins the worker and takes
/// the source back. Dropping a running session stops it.
pub struct CameraSession {
    parts: Option<SessionParts>,
    context: GateContext,
    config: SessionConfig,
    worker: Option<Worker>,
    source_open: bool,
}

impl CameraSession {
    pub fn new(source: Box<dyn FrameSource>, gate: Arc<dyn FaceGate>, config: SessionConfig) -> Self {
        Self {
            parts: Some(SessionParts {
                source,
                logger: Box::new(NullGateLogger),
            }),
            context: GateContext {
                gate,
                downsampler: FrameDownsampler::new(config.analysis_width, config.analysis_height),
                last: Arc::new(Mutex::new(None)),
            },
            config,
            worker: None,
            source_open: false,
        }
    }

    pub fn with_logger(mut self, logger: Box<dyn GateLogger>) -> Self {
        if let Some(parts) = self.parts.as_mut() {
            parts.logger = logger;
        }
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// True while the worker thread is alive.
    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|worker| !worker.handle.is_finished())
    }

    /// Opens the source and starts the detection timer.
    pub fn start(&mut self) -> Result<Receiver<SessionEvent>, SessionError> {
        if self.worker.is_some() {
            return Err(SessionError::AlreadyRunning);
        }
        self.config.validate().map_err(SessionError::InvalidConfig)?;
        self.open_source()?;

        let mut parts = self.parts.take().ok_or(SessionError::WorkerPanicked)?;
        parts.logger.info(&format!(
            "Camera session started (interval {}ms, warm-up {}ms)",
            self.config.interval.as_millis(),
            self.config.warmup.as_millis()
        ));

        let (events, event_rx) = EventQueue::bounded(EVENT_CAPACITY);
        let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(1);
        let context = self.context.clone();
        let config = self.config;
        let handle = thread::spawn(move || run_worker(parts, context, config, stop_rx, events));

        self.worker = Some(Worker { stop_tx, handle });
        Ok(event_rx)
    }

    /// Stops the timer, releases the source and clears the capture buffer.
    ///
    /// Safe to call when not running.
    pub fn stop(&mut self) -> Result<(), SessionError> {
        let mut result = Ok(());
        if let Some(worker) = self.worker.take() {
            drop(worker.stop_tx);
            match worker.handle.join() {
                Ok(parts) => self.parts = Some(parts),
                Err(_) => result = Err(SessionError::WorkerPanicked),
            }
        }

        if let Some(parts) = self.parts.as_mut() {
            if self.source_open {
                parts.source.stop();
                parts.logger.info("Camera session stopped");
                parts.logger.summary();
            }
        }
        self.source_open = false;
        *lock(&self.context.last) = None;
        result
    }

    /// Gates the source's current frame synchronously.
    ///
    /// Only valid while the timer is stopped. Returns `None` when the
    /// source has no frame to offer.
    pub fn detect(&mut self) -> Result<Option<Detection>, SessionError> {
        if self.worker.is_some() {
            return Err(SessionError::Running);
        }
        self.open_source()?;
        let parts = self.parts.as_mut().ok_or(SessionError::WorkerPanicked)?;

        match parts.source.poll().map_err(SessionError::Source)? {
            FramePoll::Ready(frame) => Ok(Some(self.context.analyse(frame, parts.logger.as_mut()))),
            FramePoll::Pending | FramePoll::Ended => Ok(None),
        }
    }

    /// The last analysed frame, at source resolution, if it passed the gate.
    pub fn capture(&self) -> Option<Frame> {
        lock(&self.context.last)
            .as_ref()
            .filter(|analysed| analysed.report.result.capture_enabled())
            .map(|analysed| analysed.frame.clone())
    }

    /// Verdict on the last analysed frame, if any.
    pub fn last_report(&self) -> Option<GateReport> {
        lock(&self.context.last)
            .as_ref()
            .map(|analysed| analysed.report)
    }

    fn open_source(&mut self) -> Result<(), SessionError> {
        if self.source_open {
            return Ok(());
        }
        let parts = self.parts.as_mut().ok_or(SessionError::WorkerPanicked)?;
        if let Err(e) = parts.source.start() {
            log::warn!("Camera access failed: {e}");
            return Err(SessionError::Open(e));
        }
        self.source_open = true;
        Ok(())
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            log::warn!("Camera session did not stop cleanly: {e}");
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn run_worker(
    mut parts: SessionParts,
    context: GateContext,
    config: SessionConfig,
    stop_rx: Receiver<()>,
    events: EventQueue,
) -> SessionParts {
    events.publish(SessionEvent::Started);

    select! {
        recv(stop_rx) -> _ => return parts,
        recv(crossbeam_channel::after(config.warmup)) -> _ => {}
    }

    let ticker = crossbeam_channel::tick(config.interval);
    loop {
        select! {
            recv(stop_rx) -> _ => break,
            recv(ticker) -> _ => {}
        }

        match parts.source.poll() {
            Ok(FramePoll::Ready(frame)) => {
                let detection = context.analyse(frame, parts.logger.as_mut());
                events.publish(SessionEvent::Evaluated(detection));
            }
            Ok(FramePoll::Pending) => parts.logger.skipped(),
            Ok(FramePoll::Ended) => {
                parts.logger.info("Frame source ended");
                events.publish(SessionEvent::Ended);
                break;
            }
            Err(e) => {
                log::warn!("Frame source error: {e}");
                events.publish(SessionEvent::SourceError(e.to_string()));
            }
        }
    }

    parts
}
