//! Artifact cache directory.
//!
//! Each rendered challenge is encoded to `<dir>/<id>.<ext>` and removed again the first time it
//! is read.

use crate::captcha::canvas::Canvas;
use crate::captcha::challenge::{ArtifactProbe, is_valid_id};
use crate::config::{CaptchaError, OutputFormat, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ArtifactCache {
    dir: PathBuf,
    format: OutputFormat,
}

impl ArtifactCache {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            dir: dir.into(),
            format,
        }
    }

    /// Creates the cache directory if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `CaptchaError::Io` if the directory cannot be created.
    pub fn ensure_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub const fn format(&self) -> OutputFormat {
        self.format
    }

    #[must_use]
    pub fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.{}", self.format.extension()))
    }

    /// Encodes `canvas` losslessly under `id`, replacing any previous artifact.
    ///
    /// # Errors
    ///
    /// Returns `CaptchaError::Encode` if encoding or writing the file fails.
    pub fn store(&self, id: &str, canvas: &Canvas) -> Result<PathBuf> {
        let path = self.path_for(id);
        canvas
            .as_image()
            .save_with_format(&path, self.format.image_format())?;
        debug!(id = %id, path = %path.display(), "Artifact stored");
        Ok(path)
    }

    /// Reads the artifact for `id` and deletes it.
    ///
    /// # Errors
    ///
    /// Returns `CaptchaError::NotFound` if no artifact exists (or `id` is not a generated id),
    /// and `CaptchaError::Io` for other filesystem failures.
    pub fn take(&self, id: &str) -> Result<Vec<u8>> {
        if !is_valid_id(id) {
            return Err(CaptchaError::NotFound(id.to_string()));
        }
        let path = self.path_for(id);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(CaptchaError::NotFound(id.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        match std::fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(id = %id, "Artifact removed concurrently");
            }
            Err(e) => return Err(e.into()),
        }
        debug!(id = %id, bytes = bytes.len(), "Artifact delivered");
        Ok(bytes)
    }
}

impl ArtifactProbe for ArtifactCache {
    fn exists(&self, id: &str) -> bool {
        let path = self.path_for(id);
        path.try_exists().unwrap_or_else(|e| {
            debug!(id = %id, error = %e, "Artifact existence check failed");
            false
        })
    }
}
