//! Library definitions.
//!
//! Exports the CAPTCHA pipeline, its configuration and the storage collaborators.

pub mod captcha;
pub mod config;
pub mod store;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;
pub use captcha::{
    AbGlyphEngine, ArtifactProbe, Canvas, CaptchaGenerator, CaptchaManager, Challenge,
    DistortionParameters, GlyphEngine, NoiseSpec, TextBounds,
};
pub use config::{CaptchaError, Config, OutputFormat, RenderConfig, Result};
pub use store::{ArtifactCache, MemorySessionStore, SessionStore};
