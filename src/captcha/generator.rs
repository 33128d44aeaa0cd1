//! CAPTCHA image pipeline.
//!
//! Renders the challenge word centered on a white canvas, adds a first noise pass, warps the
//! result and adds a second noise pass on top of the warped image.

use super::canvas::{BACKGROUND, Canvas, FOREGROUND};
use super::challenge::{ArtifactProbe, Challenge, generate_challenge};
use super::distort::distort;
use super::noise::{NoiseSpec, add_noise};
use super::text::{AbGlyphEngine, GlyphEngine, draw_centered_text};
use crate::config::{Config, Result};
use rand::Rng;
use std::sync::Arc;

/// Generates distorted text CAPTCHAs.
pub struct CaptchaGenerator {
    config: Arc<Config>,
    glyphs: Box<dyn GlyphEngine>,
}

impl CaptchaGenerator {
    /// Creates a generator using the font at `config.render.font_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the font cannot be loaded.
    pub fn new(config: Arc<Config>) -> Result<Self> {
        config.validate()?;
        let glyphs = AbGlyphEngine::from_path(&config.render.font_path)?;
        Ok(Self::with_glyph_engine(config, Box::new(glyphs)))
    }

    /// Creates a generator with a caller-supplied glyph engine.
    #[must_use]
    pub fn with_glyph_engine(config: Arc<Config>, glyphs: Box<dyn GlyphEngine>) -> Self {
        Self { config, glyphs }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Noise drawn by each of the two passes.
    #[must_use]
    pub fn noise(&self) -> NoiseSpec {
        NoiseSpec {
            dot_count: self.config.render.dot_noise_level,
            line_count: self.config.render.line_noise_level,
        }
    }

    /// Generates a challenge and its rendered image.
    ///
    /// `probe` is consulted to avoid reusing an id that already has an artifact.
    ///
    /// # Errors
    ///
    /// Returns `CaptchaError::InvalidDimensions` if the configured canvas is empty.
    pub fn generate(
        &self,
        probe: &dyn ArtifactProbe,
        rng: &mut impl Rng,
    ) -> Result<(Challenge, Canvas)> {
        let render = &self.config.render;
        let challenge = generate_challenge(render.word_length, probe, rng);

        let mut img = Canvas::new(render.width, render.height)?;
        draw_centered_text(
            &mut img,
            self.glyphs.as_ref(),
            &challenge.word,
            render.font_size,
            FOREGROUND,
            BACKGROUND,
        );

        let noise = self.noise();
        add_noise(&mut img, noise, FOREGROUND, rng);
        let mut img = distort(&img, rng);
        add_noise(&mut img, noise, FOREGROUND, rng);

        Ok((challenge, img))
    }
}
