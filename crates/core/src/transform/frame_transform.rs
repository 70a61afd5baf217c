//! Derived representations of a frame.
//!
//! Every transform returns a new [`Frame`]; inputs are never modified.

use image::imageops::{self, FilterType};
use image::{GrayImage, RgbImage};
use ndarray::{concatenate, Axis};

use crate::shared::frame::{ColorSpace, Frame, FrameError};
use crate::transform::color::{bgr_to_hsv, bgr_to_luma};

/// Single-channel intensity. Gray input is returned unchanged.
pub fn to_gray(frame: &Frame) -> Result<Frame, FrameError> {
    ensure_non_empty(frame, "to_gray")?;
    match frame.color_space() {
        ColorSpace::Gray => Ok(frame.clone()),
        ColorSpace::Bgr => {
            let data = frame
                .data()
                .chunks_exact(3)
                .map(|p| bgr_to_luma(p[0], p[1], p[2]))
                .collect();
            Frame::new(
                data,
                frame.width(),
                frame.height(),
                ColorSpace::Gray,
                frame.index(),
            )
        }
        ColorSpace::Hsv => Err(FrameError::invalid("to_gray expects a BGR or gray frame")),
    }
}

/// Hue/saturation/value with the 8-bit hue convention.
pub fn to_hsv(frame: &Frame) -> Result<Frame, FrameError> {
    ensure_non_empty(frame, "to_hsv")?;
    ensure_color_space(frame, ColorSpace::Bgr, "to_hsv")?;
    let data = frame
        .data()
        .chunks_exact(3)
        .flat_map(|p| bgr_to_hsv(p[0], p[1], p[2]))
        .collect();
    Frame::new(
        data,
        frame.width(),
        frame.height(),
        ColorSpace::Hsv,
        frame.index(),
    )
}

/// Resizes by independent horizontal and vertical factors (bilinear).
///
/// Output extents are `width * fx` by `height * fy`, rounded half to even
/// so a 641-wide frame halves to 320.
pub fn scale(frame: &Frame, fx: f64, fy: f64) -> Result<Frame, FrameError> {
    ensure_non_empty(frame, "scale")?;
    if !(fx.is_finite() && fy.is_finite() && fx > 0.0 && fy > 0.0) {
        return Err(FrameError::invalid(format!(
            "scale factors must be positive, got ({fx}, {fy})"
        )));
    }

    let width = (frame.width() as f64 * fx).round_ties_even() as u32;
    let height = (frame.height() as f64 * fy).round_ties_even() as u32;
    if width == 0 || height == 0 {
        return Err(FrameError::invalid(format!(
            "scaling {}x{} by ({fx}, {fy}) leaves no pixels",
            frame.width(),
            frame.height()
        )));
    }
    if width == frame.width() && height == frame.height() {
        return Ok(frame.clone());
    }

    let resized = match frame.color_space() {
        ColorSpace::Gray => {
            let img = GrayImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
                .ok_or_else(|| FrameError::invalid("gray buffer does not match dimensions"))?;
            imageops::resize(&img, width, height, FilterType::Triangle).into_raw()
        }
        // Channel order is opaque to the resampler.
        ColorSpace::Bgr | ColorSpace::Hsv => {
            let img = RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
                .ok_or_else(|| FrameError::invalid("color buffer does not match dimensions"))?;
            imageops::resize(&img, width, height, FilterType::Triangle).into_raw()
        }
    };

    Frame::new(
        resized,
        width,
        height,
        frame.color_space(),
        frame.index(),
    )
}

/// Keeps the pixels of `frame` whose HSV value (taken from `hsv_frame`) lies
/// inside `[lower, upper]` on every channel; all other pixels become zero.
pub fn mask_by_color_range(
    frame: &Frame,
    hsv_frame: &Frame,
    lower: [u8; 3],
    upper: [u8; 3],
) -> Result<Frame, FrameError> {
    ensure_non_empty(frame, "mask_by_color_range")?;
    ensure_color_space(hsv_frame, ColorSpace::Hsv, "mask_by_color_range")?;
    if (frame.width(), frame.height()) != (hsv_frame.width(), hsv_frame.height()) {
        return Err(FrameError::invalid(format!(
            "mask size {}x{} differs from frame size {}x{}",
            hsv_frame.width(),
            hsv_frame.height(),
            frame.width(),
            frame.height()
        )));
    }

    let channels = frame.channels() as usize;
    let mut data = vec![0u8; frame.data().len()];
    for ((out, src), hsv) in data
        .chunks_exact_mut(channels)
        .zip(frame.data().chunks_exact(channels))
        .zip(hsv_frame.data().chunks_exact(3))
    {
        let inside = (0..3).all(|c| lower[c] <= hsv[c] && hsv[c] <= upper[c]);
        if inside {
            out.copy_from_slice(src);
        }
    }

    Frame::new(
        data,
        frame.width(),
        frame.height(),
        frame.color_space(),
        frame.index(),
    )
}

/// Concatenates two frames of equal height horizontally.
pub fn compose_side_by_side(left: &Frame, right: &Frame) -> Result<Frame, FrameError> {
    ensure_non_empty(left, "compose_side_by_side")?;
    ensure_non_empty(right, "compose_side_by_side")?;
    ensure_same_color_space(left, right)?;
    if left.height() != right.height() {
        return Err(FrameError::invalid(format!(
            "cannot place heights {} and {} side by side",
            left.height(),
            right.height()
        )));
    }

    let joined = concatenate(Axis(1), &[left.as_ndarray(), right.as_ndarray()])
        .map_err(|e| FrameError::invalid(e.to_string()))?;
    Frame::new(
        joined.iter().copied().collect(),
        left.width() + right.width(),
        left.height(),
        left.color_space(),
        left.index(),
    )
}

/// 2x2 grid: `top_left | top_right` above `bottom_left | bottom_right`.
pub fn compose_quad(
    top_left: &Frame,
    top_right: &Frame,
    bottom_left: &Frame,
    bottom_right: &Frame,
) -> Result<Frame, FrameError> {
    let top = compose_side_by_side(top_left, top_right)?;
    let bottom = compose_side_by_side(bottom_left, bottom_right)?;
    ensure_same_color_space(&top, &bottom)?;
    if top.width() != bottom.width() {
        return Err(FrameError::invalid(format!(
            "row widths {} and {} differ",
            top.width(),
            bottom.width()
        )));
    }

    let stacked = concatenate(Axis(0), &[top.as_ndarray(), bottom.as_ndarray()])
        .map_err(|e| FrameError::invalid(e.to_string()))?;
    Frame::new(
        stacked.iter().copied().collect(),
        top.width(),
        top.height() + bottom.height(),
        top.color_space(),
        top.index(),
    )
}

/// Replicates intensity into three BGR channels so a gray frame can be
/// composed with color frames.
pub fn gray_to_bgr(frame: &Frame) -> Result<Frame, FrameError> {
    ensure_non_empty(frame, "gray_to_bgr")?;
    match frame.color_space() {
        ColorSpace::Bgr => Ok(frame.clone()),
        ColorSpace::Gray => Frame::new(
            frame.data().iter().flat_map(|&v| [v, v, v]).collect(),
            frame.width(),
            frame.height(),
            ColorSpace::Bgr,
            frame.index(),
        ),
        ColorSpace::Hsv => Err(FrameError::invalid("gray_to_bgr expects a gray frame")),
    }
}

/// RGBA bytes for presentation. Three-channel frames are presented as BGR
/// regardless of their tag, the way an image window shows raw buffers.
pub fn to_rgba(frame: &Frame) -> Result<Vec<u8>, FrameError> {
    ensure_non_empty(frame, "to_rgba")?;
    let rgba = match frame.color_space() {
        ColorSpace::Gray => frame.data().iter().flat_map(|&v| [v, v, v, 255]).collect(),
        ColorSpace::Bgr | ColorSpace::Hsv => frame
            .data()
            .chunks_exact(3)
            .flat_map(|p| [p[2], p[1], p[0], 255])
            .collect(),
    };
    Ok(rgba)
}

fn ensure_non_empty(frame: &Frame, op: &str) -> Result<(), FrameError> {
    if frame.is_empty() {
        return Err(FrameError::invalid(format!(
            "{op} given a zero-area frame ({}x{})",
            frame.width(),
            frame.height()
        )));
    }
    Ok(())
}

fn ensure_color_space(frame: &Frame, expected: ColorSpace, op: &str) -> Result<(), FrameError> {
    if frame.color_space() != expected {
        return Err(FrameError::invalid(format!(
            "{op} expects a {expected:?} frame, got {:?}",
            frame.color_space()
        )));
    }
    Ok(())
}

fn ensure_same_color_space(a: &Frame, b: &Frame) -> Result<(), FrameError> {
    if a.color_space() != b.color_space() {
        return Err(FrameError::invalid(format!(
            "cannot compose {:?} with {:?}",
            a.color_space(),
            b.color_space()
        )));
    }
    Ok(())
}
