//! Configuration management.
//!
//! Loads configuration from environment variables (the binary reads `.env` through dotenvy
//! first). Settings are validated once and shared behind an `Arc`.

mod error;
mod settings;

pub use error::{CaptchaError, Result};
pub use settings::{Config, OutputFormat, RenderConfig};
