//! Configuration settings.
//!
//! Defines the main `Config` struct, the image rendering settings it carries and the
//! environment variable loading logic.

use super::error::{CaptchaError, Result};
use image::ImageFormat;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

const DEFAULT_WIDTH: u32 = 215;
const DEFAULT_HEIGHT: u32 = 80;
const DEFAULT_WORD_LENGTH: usize = 6;
const DEFAULT_FONT_RATIO: f32 = 0.4;
const DEFAULT_DOT_NOISE: usize = 25;
const DEFAULT_LINE_NOISE: usize = 3;

fn get_env(key: &str) -> Result<String> {
    env::var(key).map_err(|_| CaptchaError::Config(format!("{key} must be set in environment")))
}

fn get_env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn get_env_bool_or(key: &str, default: bool) -> bool {
    env::var(key).map_or(default, |v| v.to_lowercase() == "true" || v == "1")
}

/// Reads and parses `key`, falling back to `default` when unset.
///
/// A value that is present but unparsable is a configuration error rather than a silent default.
fn get_env_parse_or<T: FromStr>(key: &str, default: T) -> Result<T> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| CaptchaError::Config(format!("{key} has an invalid value: {raw:?}"))),
        Err(_) => Ok(default),
    }
}

/// Lossless artifact encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Bmp,
}

impl OutputFormat {
    /// Parses a file extension. Lossy or unknown formats are rejected.
    fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "png" => Some(Self::Png),
            "bmp" => Some(Self::Bmp),
            _ => None,
        }
    }

    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Bmp => "bmp",
        }
    }

    #[must_use]
    pub const fn image_format(self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Bmp => ImageFormat::Bmp,
        }
    }

    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Bmp => "image/bmp",
        }
    }
}

/// Settings read by every rendering stage. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// TrueType/OpenType font used for the challenge word.
    pub font_path: PathBuf,
    /// Font size in pixels.
    pub font_size: f32,
    /// Number of characters in the challenge word.
    pub word_length: usize,
    /// Dots stamped per noise pass.
    pub dot_noise_level: usize,
    /// Line segments drawn per noise pass.
    pub line_noise_level: usize,
}

/// Application configuration loaded from environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Image rendering settings.
    pub render: RenderConfig,
    /// Directory holding rendered artifacts until they are delivered.
    pub cache_dir: PathBuf,
    /// Artifact encoding, selected by file extension.
    pub output_format: OutputFormat,
    /// Session-store key the expected answer is written under.
    pub session_key: String,
    /// Whether answers must match letter case exactly.
    pub case_sensitive: bool,
    /// Logging format: "json" or "pretty".
    pub log_format: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `CaptchaError::Config` if `CAPTCHA_FONT_PATH` is missing, a numeric variable
    /// cannot be parsed, `CAPTCHA_FILE_EXT` names a lossy or unknown format, or the resulting
    /// settings fail [`Config::validate`].
    pub fn from_env() -> Result<Arc<Self>> {
        let width = get_env_parse_or("CAPTCHA_WIDTH", DEFAULT_WIDTH)?;
        let height = get_env_parse_or("CAPTCHA_HEIGHT", DEFAULT_HEIGHT)?;
        #[allow(clippy::cast_precision_loss)]
        let default_font_size = height as f32 * DEFAULT_FONT_RATIO;

        let render = RenderConfig {
            width,
            height,
            font_path: PathBuf::from(get_env("CAPTCHA_FONT_PATH")?),
            font_size: get_env_parse_or("CAPTCHA_FONT_SIZE", default_font_size)?,
            word_length: get_env_parse_or("CAPTCHA_WORD_LENGTH", DEFAULT_WORD_LENGTH)?,
            dot_noise_level: get_env_parse_or("CAPTCHA_DOT_NOISE", DEFAULT_DOT_NOISE)?,
            line_noise_level: get_env_parse_or("CAPTCHA_LINE_NOISE", DEFAULT_LINE_NOISE)?,
        };

        let ext = get_env_or("CAPTCHA_FILE_EXT", "png");
        let output_format = OutputFormat::from_extension(&ext).ok_or_else(|| {
            CaptchaError::Config(format!(
                "CAPTCHA_FILE_EXT must name a lossless format (png, bmp), got {ext:?}"
            ))
        })?;

        let cache_dir = env::var("CAPTCHA_CACHE_DIR")
            .map_or_else(|_| env::temp_dir().join("captcha-cache"), PathBuf::from);

        let config = Self {
            render,
            cache_dir,
            output_format,
            session_key: get_env_or("CAPTCHA_SESSION_KEY", "captcha_answer"),
            case_sensitive: get_env_bool_or("CAPTCHA_CASE_SENSITIVE", true),
            log_format: get_env_or("LOG_FORMAT", "json"),
        };
        config.validate()?;
        Ok(Arc::new(config))
    }

    /// Checks the settings that would make rendering impossible.
    ///
    /// # Errors
    ///
    /// Returns `CaptchaError::InvalidDimensions` for a zero width or height and
    /// `CaptchaError::Config` for an empty word, a non-positive font size or an empty
    /// session key.
    pub fn validate(&self) -> Result<()> {
        let render = &self.render;
        if render.width == 0 || render.height == 0 {
            return Err(CaptchaError::InvalidDimensions {
                width: render.width,
                height: render.height,
            });
        }
        if render.word_length == 0 {
            return Err(CaptchaError::Config(
                "word length must be at least 1".to_string(),
            ));
        }
        if !render.font_size.is_finite() || render.font_size <= 0.0 {
            return Err(CaptchaError::Config(format!(
                "font size must be positive, got {}",
                render.font_size
            )));
        }
        if self.session_key.is_empty() {
            return Err(CaptchaError::Config(
                "session key must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
