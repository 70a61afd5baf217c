//! Per-pixel color conversions shared by transforms and annotation.

/// BT.601 luma weights in 14-bit fixed point (sum to `1 << 14`).
const LUMA_R: u32 = 4899;
const LUMA_G: u32 = 9617;
const LUMA_B: u32 = 1868;
const LUMA_SHIFT: u32 = 14;

/// Intensity of a BGR pixel, rounded to nearest.
pub fn bgr_to_luma(b: u8, g: u8, r: u8) -> u8 {
    let acc = r as u32 * LUMA_R + g as u32 * LUMA_G + b as u32 * LUMA_B;
    ((acc + (1 << (LUMA_SHIFT - 1))) >> LUMA_SHIFT) as u8
}

/// 8-bit HSV of a BGR pixel: hue is halved to fit [0, 180).
pub fn bgr_to_hsv(b: u8, g: u8, r: u8) -> [u8; 3] {
    let max = b.max(g).max(r);
    let min = b.min(g).min(r);
    let diff = (max - min) as f32;

    let v = max;
    let s = if max == 0 {
        0
    } else {
        (255.0 * diff / max as f32).round() as u8
    };

    if diff == 0.0 {
        return [0, s, v];
    }

    let (bf, gf, rf) = (b as f32, g as f32, r as f32);
    let mut hue = if max == r {
        60.0 * (gf - bf) / diff
    } else if max == g {
        120.0 + 60.0 * (bf - rf) / diff
    } else {
        240.0 + 60.0 * (rf - gf) / diff
    };
    if hue < 0.0 {
        hue += 360.0;
    }
    let h = (hue / 2.0).round() as u16;
    [if h >= 180 { 0 } else { h as u8 }, s, v]
}
