//! Centered text rendering.
//!
//! Layout and rasterization are delegated to a [`GlyphEngine`]; this module owns the background
//! fill and the centering arithmetic.

use super::canvas::Canvas;
use crate::config::{CaptchaError, Result};
use ab_glyph::{Font, FontVec, GlyphId, OutlinedGlyph, PxScale, Rect, ScaleFont, point};
use std::path::Path;

/// Tight ink bounds of a rendered string, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextBounds {
    pub width: f32,
    pub height: f32,
}

/// Glyph measurement and drawing.
pub trait GlyphEngine: Send + Sync {
    /// Tight bounding box of `text` at `size` px.
    fn measure(&self, text: &str, size: f32) -> TextBounds;

    /// Draws `text` so that its tight bounding box starts at `origin`.
    fn draw(&self, canvas: &mut Canvas, text: &str, size: f32, origin: (i32, i32), color: u8);
}

/// Top-left origin that centers `bounds` on a `canvas_width` x `canvas_height` canvas.
///
/// Negative when the text is larger than the canvas.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn centered_origin(canvas_width: u32, canvas_height: u32, bounds: TextBounds) -> (i32, i32) {
    let x = ((canvas_width as f32 - bounds.width) / 2.0).floor();
    let y = ((canvas_height as f32 - bounds.height) / 2.0).floor();
    (x as i32, y as i32)
}

/// Fills the canvas with `background`, then draws `word` centered in `text_color`.
pub fn draw_centered_text(
    canvas: &mut Canvas,
    engine: &dyn GlyphEngine,
    word: &str,
    font_size: f32,
    text_color: u8,
    background: u8,
) {
    canvas.fill(background);
    let bounds = engine.measure(word, font_size);
    let origin = centered_origin(canvas.width(), canvas.height(), bounds);
    engine.draw(canvas, word, font_size, origin, text_color);
}

/// [`GlyphEngine`] backed by an `ab_glyph` outline font.
pub struct AbGlyphEngine {
    font: FontVec,
}

impl AbGlyphEngine {
    /// Loads a TrueType/OpenType font file.
    ///
    /// # Errors
    ///
    /// Returns `CaptchaError::Font` if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)
            .map_err(|e| CaptchaError::Font(format!("{}: {e}", path.display())))?;
        Self::from_bytes(data)
            .map_err(|e| CaptchaError::Font(format!("{}: {e}", path.display())))
    }

    /// Parses font data already in memory.
    ///
    /// # Errors
    ///
    /// Returns `CaptchaError::Font` if the data is not a supported font.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let font = FontVec::try_from_vec(data).map_err(|e| CaptchaError::Font(e.to_string()))?;
        Ok(Self { font })
    }

    /// Lays `text` out on one line with kerning; glyphs without outlines (spaces) are skipped.
    fn layout(&self, text: &str, size: f32) -> Vec<OutlinedGlyph> {
        let scale = PxScale::from(size);
        let scaled = self.font.as_scaled(scale);
        let mut caret = 0.0_f32;
        let mut previous: Option<GlyphId> = None;
        let mut outlined = Vec::with_capacity(text.len());

        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = previous {
                caret += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(scale, point(caret, scaled.ascent()));
            caret += scaled.h_advance(id);
            previous = Some(id);
            if let Some(g) = self.font.outline_glyph(glyph) {
                outlined.push(g);
            }
        }
        outlined
    }
}

fn ink_bounds(glyphs: &[OutlinedGlyph]) -> Option<Rect> {
    glyphs.iter().map(OutlinedGlyph::px_bounds).reduce(|acc, b| Rect {
        min: point(acc.min.x.min(b.min.x), acc.min.y.min(b.min.y)),
        max: point(acc.max.x.max(b.max.x), acc.max.y.max(b.max.y)),
    })
}

impl GlyphEngine for AbGlyphEngine {
    fn measure(&self, text: &str, size: f32) -> TextBounds {
        ink_bounds(&self.layout(text, size)).map_or_else(TextBounds::default, |r| TextBounds {
            width: r.width(),
            height: r.height(),
        })
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn draw(&self, canvas: &mut Canvas, text: &str, size: f32, origin: (i32, i32), color: u8) {
        let glyphs = self.layout(text, size);
        let Some(bounds) = ink_bounds(&glyphs) else {
            return;
        };
        let shift_x = origin.0 as f32 - bounds.min.x;
        let shift_y = origin.1 as f32 - bounds.min.y;

        for glyph in &glyphs {
            let px = glyph.px_bounds();
            let left = (px.min.x + shift_x).round() as i32;
            let top = (px.min.y + shift_y).round() as i32;
            glyph.draw(|gx, gy, coverage| {
                let x = left.saturating_add_unsigned(gx);
                let y = top.saturating_add_unsigned(gy);
                canvas.blend_pixel(x, y, color, coverage);
            });
        }
    }
}
