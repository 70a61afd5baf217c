use std::time::Duration;

use crate::shared::frame::Frame;

/// Key events a display surface can report back to the loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCode {
    Char(char),
    Escape,
    /// The user closed the window; no further frames will be seen.
    WindowClosed,
}

impl KeyCode {
    /// Whether this key ends the session for the given quit key.
    pub fn is_quit(self, quit_key: char) -> bool {
        match self {
            KeyCode::Char(c) => c == quit_key,
            KeyCode::Escape => false,
            KeyCode::WindowClosed => true,
        }
    }
}

/// Presents frames in a named window and reports key presses.
pub trait DisplaySurface: Send {
    fn show(&mut self, window: &str, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Waits up to `wait` for a key press. This is the loop's only pacing
    /// point.
    fn poll_key(&mut self, wait: Duration) -> Option<KeyCode>;

    /// Closes every window. Safe to call more than once.
    fn close(&mut self);
}
