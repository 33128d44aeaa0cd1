//! Test utilities and shared configuration.
//!
//! This module provides common helpers for unit and integration tests,
//! reducing duplication across the codebase.

#[cfg(any(test, feature = "testing"))]
use crate::captcha::{ArtifactProbe, Canvas, GlyphEngine, TextBounds};
#[cfg(any(test, feature = "testing"))]
use crate::config::{Config, OutputFormat, RenderConfig};
#[cfg(any(test, feature = "testing"))]
use std::path::Path;
#[cfg(any(test, feature = "testing"))]
use std::sync::Arc;
#[cfg(any(test, feature = "testing"))]
use std::sync::Mutex;
#[cfg(any(test, feature = "testing"))]
use std::sync::atomic::{AtomicUsize, Ordering};

/// Creates a standard configuration for testing purposes.
///
/// This configuration has:
/// - A 215x80 canvas and 6 character words
/// - A font path that does not exist (pair with [`BlockGlyphs`])
/// - PNG artifacts under `cache_dir`
#[cfg(any(test, feature = "testing"))]
#[must_use]
pub fn create_test_config(cache_dir: impl AsRef<Path>) -> Arc<Config> {
    Arc::new(Config {
        render: RenderConfig {
            width: 215,
            height: 80,
            font_path: "/nonexistent/captcha-test.ttf".into(),
            font_size: 24.0,
            word_length: 6,
            dot_noise_level: 25,
            line_noise_level: 3,
        },
        cache_dir: cache_dir.as_ref().to_path_buf(),
        output_format: OutputFormat::Png,
        session_key: "captcha_answer".to_string(),
        case_sensitive: true,
        log_format: "pretty".to_string(),
    })
}

/// Glyph engine that renders every character as a solid block.
#[cfg(any(test, feature = "testing"))]
pub struct BlockGlyphs {
    char_width: f32,
    char_height: f32,
}

#[cfg(any(test, feature = "testing"))]
impl BlockGlyphs {
    #[must_use]
    pub const fn new(char_width: f32, char_height: f32) -> Self {
        Self {
            char_width,
            char_height,
        }
    }
}

#[cfg(any(test, feature = "testing"))]
impl GlyphEngine for BlockGlyphs {
    #[allow(clippy::cast_precision_loss)]
    fn measure(&self, text: &str, _size: f32) -> TextBounds {
        TextBounds {
            width: self.char_width * text.chars().count() as f32,
            height: self.char_height,
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn draw(&self, canvas: &mut Canvas, text: &str, _size: f32, origin: (i32, i32), color: u8) {
        let w = self.char_width as i32;
        let h = self.char_height as i32;
        let mut x = origin.0;
        for _ in text.chars() {
            canvas.fill_rect(x, origin.1, x + w - 1, origin.1 + h - 1, color);
            x += w;
        }
    }
}

/// Probe that reports a fixed number of collisions and counts every check.
#[cfg(any(test, feature = "testing"))]
pub struct CountingProbe {
    collisions: usize,
    calls: AtomicUsize,
    first_seen: Mutex<Option<String>>,
}

#[cfg(any(test, feature = "testing"))]
impl CountingProbe {
    /// Every id collides.
    #[must_use]
    pub fn always() -> Self {
        Self::collide_times(usize::MAX)
    }

    /// No id collides.
    #[must_use]
    pub fn never() -> Self {
        Self::collide_times(0)
    }

    /// The first `collisions` checks collide.
    #[must_use]
    pub fn collide_times(collisions: usize) -> Self {
        Self {
            collisions,
            calls: AtomicUsize::new(0),
            first_seen: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// First id that was checked.
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    #[must_use]
    pub fn first_seen(&self) -> Option<String> {
        self.first_seen.lock().unwrap().clone()
    }
}

#[cfg(any(test, feature = "testing"))]
impl ArtifactProbe for CountingProbe {
    fn exists(&self, id: &str) -> bool {
        let previous = self.calls.fetch_add(1, Ordering::SeqCst);
        if previous == 0 {
            *self.first_seen.lock().unwrap() = Some(id.to_string());
        }
        previous < self.collisions
    }
}
