//! Sinusoidal wave distortion with edge antialiasing.
//!
//! Every destination pixel is inverse-mapped through two independent sine fields to a source
//! position. The 2x2 source neighbourhood around that position is then classified: pure
//! background is skipped, pure foreground is copied solid, and only mixed neighbourhoods (glyph
//! edges) are bilinear-blended.

use super::canvas::{BACKGROUND, Canvas, FOREGROUND};
use rand::Rng;

/// Frequencies are `uniform_int(FREQ_MIN..=FREQ_MAX) / FREQ_DIVISOR`.
const FREQ_MIN: u32 = 700_000;
const FREQ_MAX: u32 = 1_000_000;
const FREQ_DIVISOR: f64 = 15_000_000.0;

/// Phases are `uniform_int(0..=PHASE_MAX) / PHASE_DIVISOR`, roughly `[0, pi]`.
const PHASE_MAX: u32 = 3_141_592;
const PHASE_DIVISOR: f64 = 1_000_000.0;

const AMP_MIN: f64 = 3.0;
const AMP_MAX: f64 = 7.0;

/// Warp parameters, sampled once per image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistortionParameters {
    /// `[f1, f2, f3, f4]`: f1/f2 act along x, f3/f4 along y.
    pub freq: [f64; 4],
    pub phase: [f64; 4],
    pub amp_x: f64,
    pub amp_y: f64,
}

impl DistortionParameters {
    /// Samples a fresh parameter set from the fixed ranges.
    pub fn random(rng: &mut impl Rng) -> Self {
        let mut freq = [0.0; 4];
        let mut phase = [0.0; 4];
        for f in &mut freq {
            *f = f64::from(rng.random_range(FREQ_MIN..=FREQ_MAX)) / FREQ_DIVISOR;
        }
        for p in &mut phase {
            *p = f64::from(rng.random_range(0..=PHASE_MAX)) / PHASE_DIVISOR;
        }
        Self {
            freq,
            phase,
            amp_x: rng.random_range(AMP_MIN..=AMP_MAX),
            amp_y: rng.random_range(AMP_MIN..=AMP_MAX),
        }
    }

    /// Source position sampled for destination pixel `(x, y)`.
    #[must_use]
    pub fn source_coords(&self, x: u32, y: u32) -> (f64, f64) {
        let (fx, fy) = (f64::from(x), f64::from(y));
        let [f1, f2, f3, f4] = self.freq;
        let [p1, p2, p3, p4] = self.phase;
        let sx = fx + (fx.mul_add(f1, p1).sin() + fy.mul_add(f3, p3).sin()) * self.amp_x;
        let sy = fy + (fx.mul_add(f2, p2).sin() + fy.mul_add(f4, p4).sin()) * self.amp_y;
        (sx, sy)
    }
}

/// Warps `source` with freshly sampled parameters.
pub fn distort(source: &Canvas, rng: &mut impl Rng) -> Canvas {
    let params = DistortionParameters::random(rng);
    distort_with(source, &params)
}

/// Warps `source` with fixed parameters. Output has the same dimensions.
///
/// Destination pixels whose source falls outside the usable area keep the background color.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn distort_with(source: &Canvas, params: &DistortionParameters) -> Canvas {
    let (width, height) = source.dimensions();
    let mut dest = source.blank_like();

    // The 2x2 neighbourhood needs one pixel of headroom on the right and bottom.
    let max_x = f64::from(width.saturating_sub(1));
    let max_y = f64::from(height.saturating_sub(1));

    for y in 0..height {
        for x in 0..width {
            let (sx, sy) = params.source_coords(x, y);
            if sx < 0.0 || sy < 0.0 {
                continue;
            }
            let (ix, iy) = (sx.floor(), sy.floor());
            if ix >= max_x || iy >= max_y {
                continue;
            }
            // Bounded by the checks above.
            let (ix, iy) = (ix as i32, iy as i32);

            let c = source.get_pixel(ix, iy);
            let c_x = source.get_pixel(ix + 1, iy);
            let c_y = source.get_pixel(ix, iy + 1);
            let c_xy = source.get_pixel(ix + 1, iy + 1);

            let (dx, dy) = (x.cast_signed(), y.cast_signed());
            if [c, c_x, c_y, c_xy] == [BACKGROUND; 4] {
                continue;
            }
            if [c, c_x, c_y, c_xy] == [FOREGROUND; 4] {
                dest.set_pixel(dx, dy, FOREGROUND);
                continue;
            }

            let frac_x = sx - sx.floor();
            let frac_y = sy - sy.floor();
            let value = bilinear(c, c_x, c_y, c_xy, frac_x, frac_y);
            dest.set_pixel(dx, dy, clamp_intensity(value));
        }
    }

    dest
}

fn bilinear(c: u8, c_x: u8, c_y: u8, c_xy: u8, frac_x: f64, frac_y: f64) -> f64 {
    let inv_x = 1.0 - frac_x;
    let inv_y = 1.0 - frac_y;
    f64::from(c) * inv_x * inv_y
        + f64::from(c_x) * frac_x * inv_y
        + f64::from(c_y) * inv_x * frac_y
        + f64::from(c_xy) * frac_x * frac_y
}

#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_intensity(value: f64) -> u8 {
    value.clamp(0.0, 255.0) as u8
}
