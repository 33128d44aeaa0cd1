//! CAPTCHA generation.
//!
//! Implements the image pipeline (text, noise, wave distortion) and the challenge lifecycle.

pub mod canvas;
pub mod challenge;
pub mod distort;
pub mod generator;
pub mod manager;
pub mod noise;
pub mod text;

pub use canvas::{BACKGROUND, Canvas, FOREGROUND};
pub use challenge::{ArtifactProbe, Challenge, generate_challenge};
pub use distort::{DistortionParameters, distort, distort_with};
pub use generator::CaptchaGenerator;
pub use manager::CaptchaManager;
pub use noise::{NoiseSpec, add_noise};
pub use text::{AbGlyphEngine, GlyphEngine, TextBounds, centered_origin, draw_centered_text};
