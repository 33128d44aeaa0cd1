//! CAPTCHA lifecycle management.
//!
//! Coordinates generation, artifact storage, one-shot delivery and answer verification.

use crate::captcha::challenge::Challenge;
use crate::captcha::generator::CaptchaGenerator;
use crate::config::{Config, Result};
use crate::store::{ArtifactCache, SessionStore};
use base64::{Engine, engine::general_purpose::STANDARD};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct CaptchaManager {
    generator: CaptchaGenerator,
    cache: ArtifactCache,
    store: Arc<dyn SessionStore>,
}

impl CaptchaManager {
    /// Creates a new `CaptchaManager` with configuration and a session-store handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the font cannot be loaded or the cache
    /// directory cannot be created.
    pub fn new(config: &Arc<Config>, store: Arc<dyn SessionStore>) -> Result<Self> {
        let generator = CaptchaGenerator::new(config.clone())?;
        Self::with_generator(generator, store)
    }

    /// Creates a manager around an already built generator.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache directory cannot be created.
    pub fn with_generator(
        generator: CaptchaGenerator,
        store: Arc<dyn SessionStore>,
    ) -> Result<Self> {
        let config = generator.config();
        let cache = ArtifactCache::new(config.cache_dir.clone(), config.output_format);
        cache.ensure_dir()?;
        Ok(Self {
            generator,
            cache,
            store,
        })
    }

    #[must_use]
    pub const fn cache(&self) -> &ArtifactCache {
        &self.cache
    }

    /// Generates a new CAPTCHA challenge.
    ///
    /// The rendered image is written to the cache under the challenge id and the word is stored
    /// in the session store, replacing any pending answer.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails or the image cannot be encoded to the cache.
    pub fn generate(&self) -> Result<Challenge> {
        let mut rng = rand::rng();
        let (challenge, img) = self.generator.generate(&self.cache, &mut rng)?;
        self.cache.store(&challenge.id, &img)?;
        self.store.set(
            &self.generator.config().session_key,
            challenge.word.clone(),
        );
        debug!(id = %challenge.id, "CAPTCHA generated");
        Ok(challenge)
    }

    /// Path the artifact for `id` is written to.
    #[must_use]
    pub fn artifact_path(&self, id: &str) -> PathBuf {
        self.cache.path_for(id)
    }

    /// Returns the encoded image for `id` and deletes it from the cache.
    ///
    /// # Errors
    ///
    /// Returns `CaptchaError::NotFound` if the artifact was already delivered or never written.
    pub fn deliver(&self, id: &str) -> Result<Vec<u8>> {
        self.cache.take(id)
    }

    /// Like [`CaptchaManager::deliver`], encoded as a `data:` URI for inline `<img>` use.
    ///
    /// # Errors
    ///
    /// Returns `CaptchaError::NotFound` if the artifact was already delivered or never written.
    pub fn deliver_data_uri(&self, id: &str) -> Result<String> {
        let bytes = self.cache.take(id)?;
        Ok(format!(
            "data:{};base64,{}",
            self.cache.format().mime_type(),
            STANDARD.encode(bytes)
        ))
    }

    /// Verifies a CAPTCHA answer against the pending one.
    ///
    /// The pending answer is invalidated by every attempt, successful or not.
    #[must_use]
    pub fn verify(&self, candidate: &str) -> bool {
        let config = self.generator.config();
        let Some(expected) = self.store.remove(&config.session_key) else {
            debug!("CAPTCHA verification without pending answer");
            return false;
        };

        let candidate = candidate.trim();
        let ok = if config.case_sensitive {
            expected == candidate
        } else {
            expected.eq_ignore_ascii_case(candidate)
        };

        if ok {
            info!("CAPTCHA verified");
        } else {
            warn!(answer_len = candidate.len(), "CAPTCHA verification failed");
        }
        ok
    }

    /// Drops the pending answer without checking anything.
    pub fn invalidate(&self) {
        self.store.remove(&self.generator.config().session_key);
    }
}
