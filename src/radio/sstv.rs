//! SSTV line conversion
//!
//! Converts image rows into the 24-bit `0x00RRGGBB` pixels the SSTV
//! encoder transmits.

use crate::config::{SSTV_HEIGHT, SSTV_WIDTH};

/// Pixels per image
pub const SSTV_PIXELS: usize = SSTV_WIDTH * SSTV_HEIGHT;

/// One encoded line
pub type SstvLine = [u32; SSTV_WIDTH];

/// Expand an RGB565 pixel to 24-bit RGB with rounding
#[must_use]
pub const fn rgb565_to_rgb888(pixel: u16) -> u32 {
    let r = ((pixel >> 11) & 0x1F) as u32;
    let g = ((pixel >> 5) & 0x3F) as u32;
    let b = (pixel & 0x1F) as u32;

    let r = (r * 255 + 15) / 31;
    let g = (g * 255 + 31) / 63;
    let b = (b * 255 + 15) / 31;

    (r << 16) | (g << 8) | b
}

/// Replicate an 8-bit gray level into all three channels
#[must_use]
pub const fn gray_to_rgb888(level: u8) -> u32 {
    let v = level as u32;
    (v << 16) | (v << 8) | v
}

/// Convert row `row` of an RGB565 image
///
/// # Panics
///
/// Panics if `image` holds fewer than `row + 1` full rows.
pub fn rgb565_line(image: &[u16], row: usize, line: &mut SstvLine) {
    let start = row * SSTV_WIDTH;
    for (out, &px) in line.iter_mut().zip(&image[start..start + SSTV_WIDTH]) {
        *out = rgb565_to_rgb888(px);
    }
}

/// Convert row `row` of an 8-bit grayscale image
///
/// # Panics
///
/// Panics if `image` holds fewer than `row + 1` full rows.
pub fn gray_line(image: &[u8], row: usize, line: &mut SstvLine) {
    let start = row * SSTV_WIDTH;
    for (out, &level) in line.iter_mut().zip(&image[start..start + SSTV_WIDTH]) {
        *out = gray_to_rgb888(level);
    }
}
