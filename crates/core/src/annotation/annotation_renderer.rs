use std::convert::Infallible;

use embedded_graphics::{
    draw_target::DrawTarget,
    mono_font::{
        ascii::{FONT_10X20, FONT_6X10, FONT_8X13},
        MonoFont, MonoTextStyle,
    },
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle as EgRectangle},
    text::{Baseline, Text},
};

use crate::shared::frame::{ColorSpace, Frame};
use crate::transform::color::{bgr_to_hsv, bgr_to_luma};

/// Annotation color in BGR order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub b: u8,
    pub g: u8,
    pub r: u8,
}

impl Color {
    pub const BLACK: Color = Color::bgr(0, 0, 0);
    pub const WHITE: Color = Color::bgr(255, 255, 255);
    /// Face box color.
    pub const HIGHLIGHT: Color = Color::bgr(255, 53, 18);

    pub const fn bgr(b: u8, g: u8, r: u8) -> Self {
        Self { b, g, r }
    }

    /// Channel bytes as stored in a frame of the given color space.
    fn encode(self, color_space: ColorSpace) -> [u8; 3] {
        match color_space {
            ColorSpace::Bgr => [self.b, self.g, self.r],
            ColorSpace::Gray => {
                let luma = bgr_to_luma(self.b, self.g, self.r);
                [luma, luma, luma]
            }
            ColorSpace::Hsv => bgr_to_hsv(self.b, self.g, self.r),
        }
    }
}

impl From<Color> for Rgb888 {
    fn from(c: Color) -> Self {
        Rgb888::new(c.r, c.g, c.b)
    }
}

impl From<Rgb888> for Color {
    fn from(c: Rgb888) -> Self {
        Color::bgr(c.b(), c.g(), c.r())
    }
}

/// Monospace label fonts, smallest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LabelFont {
    #[default]
    Plain,
    Simplex,
    Large,
}

impl LabelFont {
    fn mono_font(self) -> &'static MonoFont<'static> {
        match self {
            LabelFont::Plain => &FONT_6X10,
            LabelFont::Simplex => &FONT_8X13,
            LabelFont::Large => &FONT_10X20,
        }
    }

    /// Glyph cell size in pixels at scale 1.
    pub fn glyph_size(self) -> (u32, u32) {
        let size = self.mono_font().character_size;
        (size.width, size.height)
    }
}

/// Draws the outline of the rectangle spanning `top_left..=bottom_right`.
///
/// The stroke is centred on the edges and clipped at the frame border.
pub fn draw_rectangle(
    frame: &mut Frame,
    top_left: (i32, i32),
    bottom_right: (i32, i32),
    color: Color,
    thickness: u32,
) {
    if thickness == 0 {
        return;
    }
    let rect = EgRectangle::with_corners(
        Point::new(top_left.0, top_left.1),
        Point::new(bottom_right.0, bottom_right.1),
    );
    let mut target = FrameTarget::new(frame);
    match rect
        .into_styled(PrimitiveStyle::with_stroke(color.into(), thickness))
        .draw(&mut target)
    {
        Ok(()) => {}
        Err(infallible) => match infallible {},
    }
}

/// Draws `text` with its baseline starting at `position`.
///
/// `scale` is rounded to a whole pixel multiple (at least 1); `thickness`
/// emboldens by re-drawing the glyphs shifted one pixel to the right.
pub fn draw_text(
    frame: &mut Frame,
    text: &str,
    position: (i32, i32),
    font: LabelFont,
    scale: f64,
    color: Color,
    thickness: u32,
) {
    let scale = scale.round().max(1.0) as i32;
    let origin = Point::new(position.0, position.1);
    let style = MonoTextStyle::new(font.mono_font(), Rgb888::from(color));

    for dx in 0..thickness as i32 {
        let mut target = FrameTarget {
            frame: &mut *frame,
            origin,
            scale,
            offset: Point::new(dx, 0),
        };
        match Text::with_baseline(text, origin, style, Baseline::Alphabetic).draw(&mut target) {
            Ok(_) => {}
            Err(infallible) => match infallible {},
        }
    }
}

/// Draw target writing into a [`Frame`] in its own color space.
///
/// Logical pixels are magnified by `scale` around `origin`, then shifted by
/// `offset`. Anything outside the frame is dropped.
struct FrameTarget<'a> {
    frame: &'a mut Frame,
    origin: Point,
    scale: i32,
    offset: Point,
}

impl<'a> FrameTarget<'a> {
    fn new(frame: &'a mut Frame) -> Self {
        Self {
            frame,
            origin: Point::zero(),
            scale: 1,
            offset: Point::zero(),
        }
    }

    fn put(&mut self, x: i32, y: i32, encoded: &[u8; 3]) {
        if x < 0 || y < 0 || x >= self.frame.width() as i32 || y >= self.frame.height() as i32 {
            return;
        }
        let channels = self.frame.channels() as usize;
        self.frame
            .pixel_mut(x as u32, y as u32)
            .copy_from_slice(&encoded[..channels]);
    }
}

impl OriginDimensions for FrameTarget<'_> {
    fn size(&self) -> Size {
        Size::new(self.frame.width(), self.frame.height())
    }
}

impl DrawTarget for FrameTarget<'_> {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let color_space = self.frame.color_space();
        for Pixel(point, color) in pixels {
            let encoded = Color::from(color).encode(color_space);
            let base_x = self.origin.x + (point.x - self.origin.x) * self.scale + self.offset.x;
            let base_y = self.origin.y + (point.y - self.origin.y) * self.scale + self.offset.y;
            for sy in 0..self.scale {
                for sx in 0..self.scale {
                    self.put(base_x + sx, base_y + sy, &encoded);
                }
            }
        }
        Ok(())
    }
}
