use std::path::PathBuf;
use std::sync::Arc;
use wavecaptcha::test_utils::BlockGlyphs;
use wavecaptcha::{CaptchaGenerator, CaptchaManager, Config, MemorySessionStore};

pub use wavecaptcha::test_utils::{CountingProbe, create_test_config};

pub const BLOCK_WIDTH: f32 = 14.0;
pub const BLOCK_HEIGHT: f32 = 28.0;

/// Manager drawing every character as a solid block, so tests do not depend on installed fonts.
pub fn create_block_manager(config: Arc<Config>) -> (CaptchaManager, Arc<MemorySessionStore>) {
    let generator = CaptchaGenerator::with_glyph_engine(
        config,
        Box::new(BlockGlyphs::new(BLOCK_WIDTH, BLOCK_HEIGHT)),
    );
    let store = Arc::new(MemorySessionStore::new());
    let manager = CaptchaManager::with_generator(generator, store.clone()).unwrap();
    (manager, store)
}

/// A TrueType font from `CAPTCHA_TEST_FONT` or a common system location, if any.
pub fn find_system_font() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("CAPTCHA_TEST_FONT") {
        return Some(PathBuf::from(path));
    }
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/Library/Fonts/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ]
    .iter()
    .map(PathBuf::from)
    .find(|p| p.is_file())
}

pub fn is_hex_id(id: &str) -> bool {
    id.len() == 64 && id.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}
