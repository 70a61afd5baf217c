use std::time::Instant;

use thiserror::Error;

use crate::capture::domain::capture_device::{CaptureDevice, CaptureError, StreamInfo};
use crate::detection::domain::detector_loader::{DetectorLoadError, DetectorLoader};
use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::object_detector::ObjectDetector;
use crate::display::domain::display_surface::{DisplaySurface, KeyCode};
use crate::pipeline::live_config::{ConfigError, LiveConfig, ViewMode};
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::shared::frame::{ColorSpace, Frame};
use crate::transform::frame_transform::{
    compose_quad, compose_side_by_side, gray_to_bgr, mask_by_color_range, scale, to_gray, to_hsv,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Starting,
    Running,
    Stopping,
    Stopped,
}

/// Why the running phase ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitReason {
    QuitKey,
    WindowClosed,
    FrameLimit,
    /// The source gave no frame or failed to read. Never retried.
    CaptureEnded(CaptureError),
}

#[derive(Error, Debug)]
pub enum LoopError {
    #[error(transparent)]
    CaptureOpen(CaptureError),
    #[error(transparent)]
    DetectorLoad(#[from] DetectorLoadError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("detection loop has already run")]
    AlreadyRun,
}

/// Outcome of a completed session.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopReport {
    pub stream: StreamInfo,
    /// Frames read from the source, including failed ones.
    pub frames: usize,
    pub faces: usize,
    pub failed_frames: usize,
    pub exit_reason: ExitReason,
}

/// Reads, detects, annotates and shows frames until told to stop.
///
/// Owns its collaborators. The capture device is released and the display
/// closed exactly once on every way out of [`run`](Self::run), including
/// errors and panics.
pub struct LiveDetectionLoop {
    capture: Box<dyn CaptureDevice>,
    loader: Box<dyn DetectorLoader>,
    display: Box<dyn DisplaySurface>,
    config: LiveConfig,
    logger: Box<dyn PipelineLogger>,
    history: Vec<LoopState>,
}

impl LiveDetectionLoop {
    pub fn new(
        capture: Box<dyn CaptureDevice>,
        loader: Box<dyn DetectorLoader>,
        display: Box<dyn DisplaySurface>,
        config: LiveConfig,
        logger: Box<dyn PipelineLogger>,
    ) -> Self {
        Self {
            capture,
            loader,
            display,
            config,
            logger,
            history: Vec::new(),
        }
    }

    /// Every state entered so far, in order.
    pub fn history(&self) -> &[LoopState] {
        &self.history
    }

    pub fn state(&self) -> Option<LoopState> {
        self.history.last().copied()
    }

    pub fn run(&mut self) -> Result<LoopReport, LoopError> {
        if !self.history.is_empty() {
            return Err(LoopError::AlreadyRun);
        }

        let (result, camera_on) = {
            let mut guard = ReleaseGuard {
                capture: &mut *self.capture,
                display: &mut *self.display,
            };
            let mut session = Session {
                config: &self.config,
                logger: &mut *self.logger,
                history: &mut self.history,
                camera_on: false,
            };
            let result = session.drive(&mut guard, &mut *self.loader);
            (result, session.camera_on)
        };

        if camera_on {
            self.logger.info("Camera Off");
        }
        self.enter(LoopState::Stopped);
        self.logger.summary();
        result
    }

    fn enter(&mut self, state: LoopState) {
        log::debug!("Loop state: {state:?}");
        self.history.push(state);
    }
}

/// Releases the capture device and closes the display when dropped.
struct ReleaseGuard<'a> {
    capture: &'a mut dyn CaptureDevice,
    display: &'a mut dyn DisplaySurface,
}

impl Drop for ReleaseGuard<'_> {
    fn drop(&mut self) {
        self.capture.release();
        self.display.close();
    }
}

/// Borrowed loop state for the duration of one run.
struct Session<'a> {
    config: &'a LiveConfig,
    logger: &'a mut dyn PipelineLogger,
    history: &'a mut Vec<LoopState>,
    camera_on: bool,
}

impl Session<'_> {
    fn enter(&mut self, state: LoopState) {
        log::debug!("Loop state: {state:?}");
        self.history.push(state);
    }

    fn drive(
        &mut self,
        guard: &mut ReleaseGuard<'_>,
        loader: &mut dyn DetectorLoader,
    ) -> Result<LoopReport, LoopError> {
        self.enter(LoopState::Starting);
        self.config.validate()?;

        let stream = guard.capture.open().map_err(|e| {
            LoopError::CaptureOpen(CaptureError::OpenFailed {
                source_name: guard.capture.source_name(),
                reason: e.to_string(),
            })
        })?;
        self.camera_on = true;
        self.logger.info("Camera On");
        log::info!(
            "Capturing {} at {}x{} ({:.1} fps)",
            stream.description,
            stream.width,
            stream.height,
            stream.fps
        );

        let mut detector = loader.load()?;
        let face_detector = FaceDetector::new(self.config.line_thickness);

        self.enter(LoopState::Running);
        let mut frames = 0usize;
        let mut faces = 0usize;
        let mut failed_frames = 0usize;
        let exit_reason = loop {
            let started = Instant::now();
            let captured = match guard.capture.read_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    break ExitReason::CaptureEnded(CaptureError::ReadFailed {
                        index: frames,
                        reason: "no frame available".to_string(),
                    })
                }
                Err(e) => {
                    break ExitReason::CaptureEnded(CaptureError::ReadFailed {
                        index: frames,
                        reason: e.to_string(),
                    })
                }
            };
            self.logger.timing("capture", elapsed_ms(started));
            frames += 1;

            match self.process(captured, &face_detector, detector.as_mut(), guard) {
                Ok(count) => {
                    faces += count;
                    self.logger.metric("faces", count as f64);
                }
                Err(e) => {
                    failed_frames += 1;
                    log::error!("Frame {} failed: {e}", frames - 1);
                }
            }
            self.logger.progress(frames);

            match guard.display.poll_key(self.config.key_wait()) {
                Some(KeyCode::WindowClosed) => break ExitReason::WindowClosed,
                Some(key) if key.is_quit(self.config.quit_key) => break ExitReason::QuitKey,
                _ => {}
            }
            if self.config.max_frames.is_some_and(|max| frames >= max) {
                break ExitReason::FrameLimit;
            }
        };

        if let ExitReason::CaptureEnded(reason) = &exit_reason {
            log::warn!("Capture ended: {reason}");
        }
        self.enter(LoopState::Stopping);

        Ok(LoopReport {
            stream,
            frames,
            faces,
            failed_frames,
            exit_reason,
        })
    }

    /// One iteration after the read: working frame, derived views,
    /// detection, composition, display. Returns the face count.
    fn process(
        &mut self,
        captured: Frame,
        face_detector: &FaceDetector,
        detector: &mut dyn ObjectDetector,
        guard: &mut ReleaseGuard<'_>,
    ) -> Result<usize, Box<dyn std::error::Error>> {
        let config = self.config;

        let started = Instant::now();
        let mut working = scale(&captured, config.working_scale, config.working_scale)?;
        let derived = Derived::compute(&working, config)?;
        self.logger.timing("transform", elapsed_ms(started));

        let started = Instant::now();
        let count = face_detector.detect_and_annotate(&mut working, detector, &config.detector)?;
        self.logger.timing("detect", elapsed_ms(started));

        let started = Instant::now();
        let view = derived.compose(working, config.view)?;
        guard.display.show(&config.window_title, &view)?;
        self.logger.timing("display", elapsed_ms(started));

        Ok(count)
    }
}

/// Representations taken from the unannotated working frame.
struct Derived {
    skin: Option<Frame>,
    gray: Option<Frame>,
    hsv: Option<Frame>,
}

impl Derived {
    fn compute(working: &Frame, config: &LiveConfig) -> Result<Self, Box<dyn std::error::Error>> {
        if config.view == ViewMode::Working {
            return Ok(Self {
                skin: None,
                gray: None,
                hsv: None,
            });
        }
        let hsv = to_hsv(working)?;
        let skin = mask_by_color_range(working, &hsv, config.skin_lower, config.skin_upper)?;
        let gray = match config.view {
            ViewMode::Quad => Some(to_gray(working)?),
            _ => None,
        };
        Ok(Self {
            skin: Some(skin),
            gray,
            hsv: Some(hsv),
        })
    }

    fn compose(self, annotated: Frame, view: ViewMode) -> Result<Frame, Box<dyn std::error::Error>> {
        let frame = match (view, self.skin, self.gray, self.hsv) {
            (ViewMode::Working, ..) => annotated,
            (ViewMode::Skin, Some(skin), _, _) => compose_side_by_side(&annotated, &skin)?,
            (ViewMode::Quad, Some(skin), Some(gray), Some(hsv)) => {
                // HSV bytes are shown raw, as if they were BGR.
                let (w, h, index) = (hsv.width(), hsv.height(), hsv.index());
                let hsv_raw = Frame::new(hsv.into_data(), w, h, ColorSpace::Bgr, index)?;
                compose_quad(&annotated, &skin, &gray_to_bgr(&gray)?, &hsv_raw)?
            }
            (view, ..) => return Err(format!("derived frames missing for {view} view").into()),
        };
        Ok(frame)
    }
}

fn elapsed_ms(since: Instant) -> f64 {
    since.elapsed().as_secs_f64() * 1000.0
}
