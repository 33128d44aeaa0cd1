//! Error types and result aliases.
//!
//! Defines the core `CaptchaError` enumeration and common `Result` type.

use thiserror::Error;

/// CAPTCHA rendering and lifecycle errors.
#[derive(Debug, Error)]
pub enum CaptchaError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Canvas dimensions that cannot hold an image.
    #[error("invalid canvas dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Font file missing, unreadable or not a font.
    #[error("font error: {0}")]
    Font(String),

    /// Image encoding or decoding failed.
    #[error("image encode error: {0}")]
    Encode(#[from] image::ImageError),

    /// Cache filesystem error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// No artifact is stored under the requested id.
    #[error("artifact not found: {0}")]
    NotFound(String),
}

/// Result type alias for `CaptchaError`.
pub type Result<T> = std::result::Result<T, CaptchaError>;
