use crate::common::{CountingProbe, create_block_manager, create_test_config};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use wavecaptcha::captcha::challenge::{ID_ATTEMPTS, generate_id};
use wavecaptcha::{CaptchaError, SessionStore};

#[test]
fn test_always_colliding_cache_gives_up_after_five_attempts() {
    let probe = CountingProbe::always();
    let mut rng = StdRng::seed_from_u64(200);
    for _ in 0..1000 {
        let id = generate_id(&probe, &mut rng);
        assert_eq!(id.len(), 64);
    }
    assert_eq!(ID_ATTEMPTS, 5);
    assert_eq!(probe.calls(), 5000);
}

#[test]
fn test_verify_is_single_use() {
    let dir = tempfile::tempdir().unwrap();
    let (manager, store) = create_block_manager(create_test_config(dir.path()));
    manager.generate().unwrap();
    store.set("captcha_answer", "Ab3dF9".to_string());

    assert!(manager.verify("Ab3dF9"));
    assert!(!manager.verify("Ab3dF9"));
}

#[test]
fn test_wrong_answer_burns_challenge() {
    let dir = tempfile::tempdir().unwrap();
    let (manager, _) = create_block_manager(create_test_config(dir.path()));
    let challenge = manager.generate().unwrap();

    assert!(!manager.verify("not-it"));
    assert!(!manager.verify(&challenge.word));
}

#[test]
fn test_wrong_case_rejected_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let (manager, store) = create_block_manager(create_test_config(dir.path()));

    store.set("captcha_answer", "Ab3dF9".to_string());
    assert!(!manager.verify("ab3df9"));
}

#[test]
fn test_case_insensitive_configuration() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = (*create_test_config(dir.path())).clone();
    config.case_sensitive = false;
    let (manager, store) = create_block_manager(Arc::new(config));

    store.set("captcha_answer", "Ab3dF9".to_string());
    assert!(manager.verify("AB3DF9"));
}

#[test]
fn test_artifact_delivered_once() {
    let dir = tempfile::tempdir().unwrap();
    let (manager, _) = create_block_manager(create_test_config(dir.path()));
    let challenge = manager.generate().unwrap();

    assert!(manager.deliver(&challenge.id).is_ok());
    assert!(matches!(
        manager.deliver(&challenge.id),
        Err(CaptchaError::NotFound(_))
    ));
}

#[test]
fn test_unknown_and_malformed_ids_are_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let (manager, _) = create_block_manager(create_test_config(dir.path()));

    assert!(matches!(
        manager.deliver(&"ab".repeat(32)),
        Err(CaptchaError::NotFound(_))
    ));
    assert!(matches!(
        manager.deliver("../../etc/passwd"),
        Err(CaptchaError::NotFound(_))
    ));
}

#[test]
fn test_cache_directory_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("captcha").join("cache");
    let (manager, _) = create_block_manager(create_test_config(&nested));
    assert!(nested.is_dir());

    let challenge = manager.generate().unwrap();
    assert!(manager.artifact_path(&challenge.id).starts_with(&nested));
}
