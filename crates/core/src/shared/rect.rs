use std::fmt;

/// Axis-aligned detection region in pixel coordinates of the frame it was
/// detected in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rectangle {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rectangle {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top_left(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Opposite corner, exclusive of the last covered pixel.
    pub fn bottom_right(&self) -> (i32, i32) {
        (self.x + self.width, self.y + self.height)
    }

    /// Label used for console feedback and on-frame annotation.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Coordinate: ({}, {}) - Size: ({}, {})",
            self.x, self.y, self.width, self.height
        )
    }
}
