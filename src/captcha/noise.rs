//! Random dot and line noise.

use super::canvas::Canvas;
use rand::Rng;

/// Dot diameter in pixels.
const DOT_SIZE: i32 = 2;

/// How much noise one pass draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoiseSpec {
    pub dot_count: usize,
    pub line_count: usize,
}

/// Stamps `spec.dot_count` dots and `spec.line_count` segments at uniformly random positions.
///
/// Dots near the border are clipped by the canvas.
pub fn add_noise(canvas: &mut Canvas, spec: NoiseSpec, color: u8, rng: &mut impl Rng) {
    let width = i32::try_from(canvas.width()).unwrap_or(i32::MAX);
    let height = i32::try_from(canvas.height()).unwrap_or(i32::MAX);

    for _ in 0..spec.dot_count {
        let cx = rng.random_range(0..width);
        let cy = rng.random_range(0..height);
        stamp_dot(canvas, cx, cy, color);
    }

    for _ in 0..spec.line_count {
        let x0 = rng.random_range(0..width);
        let y0 = rng.random_range(0..height);
        let x1 = rng.random_range(0..width);
        let y1 = rng.random_range(0..height);
        canvas.draw_line(x0, y0, x1, y1, color);
    }
}

/// Fills the `DOT_SIZE` square whose top-left corner is `(cx, cy)`.
fn stamp_dot(canvas: &mut Canvas, cx: i32, cy: i32, color: u8) {
    canvas.fill_rect(cx, cy, cx + DOT_SIZE - 1, cy + DOT_SIZE - 1, color);
}
