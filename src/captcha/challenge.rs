//! Challenge word and identifier generation.
//!
//! Identifiers are checked against the artifact cache before use. The check is best-effort: after
//! [`ID_ATTEMPTS`] colliding candidates the last one is used anyway.

use rand::Rng;
use rand::distr::Alphanumeric;
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// Candidate identifiers tried before accepting a collision.
pub const ID_ATTEMPTS: usize = 5;

/// Hex characters in a generated identifier.
pub const ID_LEN: usize = 64;

/// Existence check against wherever rendered artifacts are kept.
///
/// Answers may be stale; a `false` is not a reservation.
pub trait ArtifactProbe {
    fn exists(&self, id: &str) -> bool;
}

/// One generated verification attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    /// Cache key of the rendered artifact.
    pub id: String,
    /// Expected answer.
    pub word: String,
    /// Unix seconds at generation.
    pub created_at: u64,
}

/// Generates a word and a collision-checked identifier.
pub fn generate_challenge(
    word_length: usize,
    probe: &dyn ArtifactProbe,
    rng: &mut impl Rng,
) -> Challenge {
    let word = generate_word(word_length, rng);
    let id = generate_id(probe, rng);
    let created_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    Challenge {
        id,
        word,
        created_at,
    }
}

/// Draws `length` characters uniformly from `[A-Za-z0-9]`.
pub fn generate_word(length: usize, rng: &mut impl Rng) -> String {
    (0..length)
        .map(|_| char::from(rng.sample(Alphanumeric)))
        .collect()
}

/// Returns the first candidate id the probe does not know, or the last candidate.
pub fn generate_id(probe: &dyn ArtifactProbe, rng: &mut impl Rng) -> String {
    let mut candidate = random_id(rng);
    for attempt in 1..=ID_ATTEMPTS {
        if !probe.exists(&candidate) {
            return candidate;
        }
        if attempt == ID_ATTEMPTS {
            break;
        }
        debug!(id = %candidate, attempt, "Artifact id collision, regenerating");
        candidate = random_id(rng);
    }
    warn!(
        id = %candidate,
        attempts = ID_ATTEMPTS,
        "Artifact id still colliding, using last candidate"
    );
    candidate
}

/// Lowercase hex SHA-256 of 32 random bytes.
fn random_id(rng: &mut impl Rng) -> String {
    let seed: [u8; 32] = rng.random();
    format!("{:x}", Sha256::digest(seed))
}

/// Whether `id` has the shape of a generated identifier.
#[must_use]
pub fn is_valid_id(id: &str) -> bool {
    id.len() == ID_LEN && id.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
