//! Grayscale drawing surface.
//!
//! Every primitive clips against the canvas bounds: coordinates that fall outside are ignored
//! on write and clamped on read, so callers never bounds-check themselves.

use crate::config::{CaptchaError, Result};
use image::{GrayImage, ImageBuffer, Luma};
use imageproc::drawing::{draw_filled_ellipse_mut, draw_filled_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

/// Background intensity (white).
pub const BACKGROUND: u8 = 255;
/// Foreground intensity (black) used for text and noise.
pub const FOREGROUND: u8 = 0;

/// Mutable 8-bit grayscale pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    img: GrayImage,
}

impl Canvas {
    /// Creates a canvas filled with [`BACKGROUND`].
    ///
    /// # Errors
    ///
    /// Returns `CaptchaError::InvalidDimensions` if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CaptchaError::InvalidDimensions { width, height });
        }
        Ok(Self {
            img: ImageBuffer::from_pixel(width, height, Luma([BACKGROUND])),
        })
    }

    /// Creates a background-filled canvas with the same dimensions as `self`.
    #[must_use]
    pub fn blank_like(&self) -> Self {
        Self {
            img: ImageBuffer::from_pixel(self.img.width(), self.img.height(), Luma([BACKGROUND])),
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.img.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.img.height()
    }

    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.img.dimensions()
    }

    /// Fills the whole canvas.
    pub fn fill(&mut self, color: u8) {
        for pixel in self.img.pixels_mut() {
            *pixel = Luma([color]);
        }
    }

    /// Fills the rectangle spanned by two inclusive corners, given in any order.
    pub fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u8) {
        let (left, right) = (x0.min(x1), x0.max(x1));
        let (top, bottom) = (y0.min(y1), y0.max(y1));
        let width = right.abs_diff(left).saturating_add(1);
        let height = bottom.abs_diff(top).saturating_add(1);
        draw_filled_rect_mut(
            &mut self.img,
            Rect::at(left, top).of_size(width, height),
            Luma([color]),
        );
    }

    /// Draws a one pixel wide segment between two points.
    #[allow(clippy::cast_precision_loss)]
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u8) {
        draw_line_segment_mut(
            &mut self.img,
            (x0 as f32, y0 as f32),
            (x1 as f32, y1 as f32),
            Luma([color]),
        );
    }

    /// Fills an axis-aligned ellipse with radii `rx` and `ry`.
    pub fn fill_ellipse(&mut self, cx: i32, cy: i32, rx: i32, ry: i32, color: u8) {
        draw_filled_ellipse_mut(&mut self.img, (cx, cy), rx.max(0), ry.max(0), Luma([color]));
    }

    /// Sets one pixel. Out-of-bounds coordinates are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u8) {
        if let Some((x, y)) = self.in_bounds(x, y) {
            self.img.put_pixel(x, y, Luma([color]));
        }
    }

    /// Reads one pixel. Out-of-bounds coordinates are clamped to the nearest edge.
    #[must_use]
    pub fn get_pixel(&self, x: i32, y: i32) -> u8 {
        let max_x = self.img.width().saturating_sub(1);
        let max_y = self.img.height().saturating_sub(1);
        let x = u32::try_from(x.max(0)).unwrap_or(0).min(max_x);
        let y = u32::try_from(y.max(0)).unwrap_or(0).min(max_y);
        self.img.get_pixel(x, y)[0]
    }

    /// Mixes `color` into an existing pixel by `coverage` in `[0, 1]`.
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: u8, coverage: f32) {
        let Some((x, y)) = self.in_bounds(x, y) else {
            return;
        };
        let coverage = coverage.clamp(0.0, 1.0);
        let current = f32::from(self.img.get_pixel(x, y)[0]);
        let mixed = (f32::from(color) - current).mul_add(coverage, current);
        self.img.put_pixel(x, y, Luma([intensity(mixed)]));
    }

    /// Borrows the underlying image, e.g. for encoding.
    #[must_use]
    pub const fn as_image(&self) -> &GrayImage {
        &self.img
    }

    #[must_use]
    pub fn into_image(self) -> GrayImage {
        self.img
    }

    fn in_bounds(&self, x: i32, y: i32) -> Option<(u32, u32)> {
        let x = u32::try_from(x).ok()?;
        let y = u32::try_from(y).ok()?;
        (x < self.img.width() && y < self.img.height()).then_some((x, y))
    }
}

/// Truncates a float intensity into `[0, 255]`.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn intensity(value: f32) -> u8 {
    value.clamp(0.0, 255.0) as u8
}
