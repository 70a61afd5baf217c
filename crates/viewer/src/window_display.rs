use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError};

use facewatch_core::display::domain::display_surface::{DisplaySurface, KeyCode};
use facewatch_core::shared::frame::Frame;
use facewatch_core::transform::frame_transform::to_rgba;

/// An RGBA image ready for the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramePixels {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// The window's ends of the channels a [`WindowDisplay`] talks through.
pub struct ViewerLink {
    pub frames: Receiver<FramePixels>,
    pub keys: Sender<KeyCode>,
}

/// Display surface backed by the viewer window on another thread.
///
/// Holds at most one undelivered frame: when the window falls behind, newer
/// frames are dropped until it catches up.
pub struct WindowDisplay {
    frames: Option<Sender<FramePixels>>,
    keys: Receiver<KeyCode>,
    dropped: usize,
}

impl WindowDisplay {
    pub fn connect() -> (Self, ViewerLink) {
        let (frame_tx, frame_rx) = crossbeam_channel::bounded(1);
        let (key_tx, key_rx) = crossbeam_channel::unbounded();
        let display = Self {
            frames: Some(frame_tx),
            keys: key_rx,
            dropped: 0,
        };
        let link = ViewerLink {
            frames: frame_rx,
            keys: key_tx,
        };
        (display, link)
    }

    /// Frames not delivered because the window was still busy.
    pub fn dropped_frames(&self) -> usize {
        self.dropped
    }
}

impl DisplaySurface for WindowDisplay {
    fn show(&mut self, window: &str, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        let sender = self
            .frames
            .as_ref()
            .ok_or_else(|| format!("window \"{window}\" is closed"))?;
        let pixels = FramePixels {
            width: frame.width(),
            height: frame.height(),
            rgba: to_rgba(frame)?,
        };
        match sender.try_send(pixels) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                self.dropped += 1;
                log::trace!("Viewer busy, dropped frame {}", frame.index());
                Ok(())
            }
            Err(TrySendError::Disconnected(_)) => {
                Err(format!("window \"{window}\" was closed").into())
            }
        }
    }

    fn poll_key(&mut self, wait: Duration) -> Option<KeyCode> {
        match self.keys.recv_timeout(wait) {
            Ok(key) => Some(key),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(KeyCode::WindowClosed),
        }
    }

    fn close(&mut self) {
        if self.frames.take().is_some() {
            log::debug!("Closing viewer window");
        }
    }
}
