use crate::shared::frame::Frame;

/// Frame extents as `(width, height)`.
pub fn dimensions(frame: &Frame) -> (u32, u32) {
    (frame.width(), frame.height())
}
