use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::shared::frame::Frame;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("failed to open capture source {source_name}: {reason}")]
    OpenFailed { source_name: String, reason: String },
    #[error("failed to read frame {index}: {reason}")]
    ReadFailed { index: usize, reason: String },
}

/// Where frames come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CaptureSource {
    /// A camera opened through a platform input device format
    /// (`v4l2`, `avfoundation`, `dshow`).
    Device { input_format: String, name: String },
    /// A video file, played once from start to end.
    File(PathBuf),
}

impl CaptureSource {
    /// The first camera on this platform.
    pub fn default_camera() -> Self {
        #[cfg(target_os = "macos")]
        let (input_format, name) = ("avfoundation", "0");
        #[cfg(target_os = "windows")]
        let (input_format, name) = ("dshow", "video=Integrated Camera");
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        let (input_format, name) = ("v4l2", "/dev/video0");

        CaptureSource::Device {
            input_format: input_format.to_string(),
            name: name.to_string(),
        }
    }
}

impl fmt::Display for CaptureSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureSource::Device { input_format, name } => write!(f, "{input_format}:{name}"),
            CaptureSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// What the device reports once opened.
#[derive(Clone, Debug, PartialEq)]
pub struct StreamInfo {
    pub width: u32,
    pub height: u32,
    /// Nominal frame rate; 0.0 when the source does not say.
    pub fps: f64,
    pub description: String,
}

/// A source of BGR frames, read one at a time.
///
/// `read_frame` returning `Ok(None)` means the source has no further frame
/// to give (end of file, camera unplugged). Callers treat that and any error
/// as the end of the stream.
pub trait CaptureDevice: Send {
    /// Human-readable name of the source, for error messages.
    fn source_name(&self) -> String {
        "capture device".to_string()
    }

    fn open(&mut self) -> Result<StreamInfo, Box<dyn std::error::Error>>;

    fn read_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>>;

    /// Releases the device. Safe to call more than once.
    fn release(&mut self);
}
