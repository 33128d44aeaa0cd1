use crate::common::{
    BLOCK_HEIGHT, BLOCK_WIDTH, create_block_manager, create_test_config, find_system_font,
    is_hex_id,
};
use std::sync::Arc;
use wavecaptcha::captcha::{TextBounds, centered_origin};
use wavecaptcha::{CaptchaError, CaptchaManager, MemorySessionStore, OutputFormat};

#[test]
fn test_end_to_end_word_id_and_dimensions() {
    let dir = tempfile::tempdir().unwrap();
    let (manager, _) = create_block_manager(create_test_config(dir.path()));

    let challenge = manager.generate().unwrap();
    assert_eq!(challenge.word.len(), 6);
    assert!(challenge.word.chars().all(|c| c.is_ascii_alphanumeric()));
    assert!(is_hex_id(&challenge.id));

    let bytes = manager.deliver(&challenge.id).unwrap();
    let img = image::load_from_memory(&bytes).unwrap();
    assert_eq!((img.width(), img.height()), (215, 80));
}

#[test]
fn test_end_to_end_various_sizes() {
    for (width, height) in [(10, 10), (64, 24), (400, 150)] {
        let dir = tempfile::tempdir().unwrap();
        let mut config = (*create_test_config(dir.path())).clone();
        config.render.width = width;
        config.render.height = height;
        let (manager, _) = create_block_manager(Arc::new(config));

        let challenge = manager.generate().unwrap();
        let img = image::load_from_memory(&manager.deliver(&challenge.id).unwrap()).unwrap();
        assert_eq!((img.width(), img.height()), (width, height));
    }
}

#[test]
fn test_text_is_centered_before_warp() {
    let bounds = TextBounds {
        width: 80.0,
        height: 20.0,
    };
    assert_eq!(centered_origin(200, 50, bounds), (60, 15));

    let six_blocks = TextBounds {
        width: BLOCK_WIDTH * 6.0,
        height: BLOCK_HEIGHT,
    };
    assert_eq!(centered_origin(215, 80, six_blocks), (65, 26));
}

#[test]
fn test_rendered_image_contains_ink() {
    let dir = tempfile::tempdir().unwrap();
    let (manager, _) = create_block_manager(create_test_config(dir.path()));

    let challenge = manager.generate().unwrap();
    let img = image::load_from_memory(&manager.deliver(&challenge.id).unwrap())
        .unwrap()
        .into_luma8();

    let black = img.pixels().filter(|p| p[0] == 0).count();
    let white = img.pixels().filter(|p| p[0] == 255).count();
    assert!(black > 500, "text strokes survive distortion");
    assert!(white > black, "background dominates");
}

#[test]
fn test_bmp_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = (*create_test_config(dir.path())).clone();
    config.output_format = OutputFormat::Bmp;
    let (manager, _) = create_block_manager(Arc::new(config));

    let challenge = manager.generate().unwrap();
    assert!(
        manager
            .artifact_path(&challenge.id)
            .to_string_lossy()
            .ends_with(".bmp")
    );
    let uri = manager.deliver_data_uri(&challenge.id).unwrap();
    assert!(uri.starts_with("data:image/bmp;base64,"));
}

#[test]
fn test_missing_font_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(dir.path());
    let result = CaptchaManager::new(&config, Arc::new(MemorySessionStore::new()));
    assert!(matches!(result, Err(CaptchaError::Font(_))));
}

#[test]
fn test_end_to_end_with_system_font() {
    let Some(font) = find_system_font() else {
        eprintln!("no system font found, set CAPTCHA_TEST_FONT to run this test");
        return;
    };
    let dir = tempfile::tempdir().unwrap();
    let mut config = (*create_test_config(dir.path())).clone();
    config.render.font_path = font;
    let config = Arc::new(config);
    let store = Arc::new(MemorySessionStore::new());
    let manager = CaptchaManager::new(&config, store).unwrap();

    let challenge = manager.generate().unwrap();
    let img = image::load_from_memory(&manager.deliver(&challenge.id).unwrap())
        .unwrap()
        .into_luma8();
    assert_eq!(img.dimensions(), (215, 80));
    assert!(img.pixels().any(|p| p[0] < 128));
    assert!(manager.verify(&challenge.word));
}
