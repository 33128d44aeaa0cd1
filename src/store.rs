//! Persistence collaborators.
//!
//! Rendered artifacts live in a cache directory until delivered once; expected answers live in
//! an injected key-value session store.

pub mod cache;
pub mod session;

pub use cache::ArtifactCache;
pub use session::{MemorySessionStore, SessionStore};
