use std::time::Duration;

use crate::display::domain::display_surface::{DisplaySurface, KeyCode};
use crate::shared::frame::Frame;

/// Display surface without a screen: counts frames, never reports a key.
///
/// Still sleeps for the requested wait so a headless run is paced like a
/// windowed one.
#[derive(Debug, Default)]
pub struct HeadlessDisplay {
    shown: usize,
    last_size: Option<(u32, u32)>,
    closed: bool,
}

impl HeadlessDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames_shown(&self) -> usize {
        self.shown
    }

    pub fn last_size(&self) -> Option<(u32, u32)> {
        self.last_size
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl DisplaySurface for HeadlessDisplay {
    fn show(&mut self, window: &str, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        if self.closed {
            return Err(format!("display closed, cannot show {window}").into());
        }
        self.shown += 1;
        self.last_size = Some((frame.width(), frame.height()));
        log::trace!("{window}: frame {} ({}x{})", frame.index(), frame.width(), frame.height());
        Ok(())
    }

    fn poll_key(&mut self, wait: Duration) -> Option<KeyCode> {
        if !wait.is_zero() {
            std::thread::sleep(wait);
        }
        None
    }

    fn close(&mut self) {
        self.closed = true;
    }
}
