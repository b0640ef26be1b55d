use std::fs;

use mfsession::{ModelSession, SessionConfig};

use crate::fixture::{configure, FakeModflow};

#[test]
fn test_release_temporary_is_idempotent() {
    let mut session = ModelSession::new().unwrap();
    let root = session.working_path().to_path_buf();

    session.release_temporary().unwrap();
    assert!(!root.exists());
    assert!(!session.is_temporary());
    session.release_temporary().unwrap();
}

#[test]
fn test_drop_removes_temporary_dir() {
    let session = ModelSession::new().unwrap();
    let root = session.working_path().to_path_buf();
    drop(session);
    assert!(!root.exists());
}

#[test]
fn test_redirect_deletes_temp_and_keeps_packages() {
    let dir = tempfile::tempdir().unwrap();
    let fake = FakeModflow::new((1, 2, 2), 6.0);
    let mut session = ModelSession::new().unwrap().with_executor(fake.clone());
    let root = session.working_path().to_path_buf();
    configure(&mut session, (1, 2, 2));

    session.redirect(dir.path(), "moved").unwrap();
    assert!(!root.exists());
    assert!(!session.is_temporary());
    assert_eq!(session.model_dir(), dir.path().join("moved"));
    assert_eq!(session.model().model_ws(), dir.path().join("moved"));

    session.run(true, true).unwrap();
    assert!(dir.path().join("moved/mfpy.nam").is_file());
    assert_eq!(fake.calls()[0].dir, dir.path().join("moved"));
}

#[test]
fn test_redirect_never_deletes_caller_dir() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    let mut session =
        ModelSession::create("a", "mfpy", "mf2005", Some(first.path().to_path_buf())).unwrap();
    fs::create_dir(first.path().join("a")).unwrap();

    session.redirect(second.path(), "b").unwrap();
    assert!(first.path().join("a").is_dir());
    drop(session);
    assert!(first.path().is_dir());
}

#[test]
fn test_set_label_moves_model_dir() {
    let dir = tempfile::tempdir().unwrap();
    let mut session =
        ModelSession::create("a", "mfpy", "mf2005", Some(dir.path().to_path_buf()))
            .unwrap()
            .with_executor(FakeModflow::new((1, 1, 2), 0.0));
    configure(&mut session, (1, 1, 2));

    session.set_label("b").unwrap();
    session.run(true, true).unwrap();

    assert_eq!(session.label(), "b");
    assert!(dir.path().join("b/mfpy.nam").is_file());
    assert!(!dir.path().join("a").exists());
}

#[test]
fn test_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = SessionConfig {
        label: "valley".into(),
        working_path: Some(dir.path().to_path_buf()),
        ..Default::default()
    };

    let session = ModelSession::from_config(&config).unwrap();
    assert_eq!(session.label(), "valley");
    assert_eq!(session.run_name(), "mfpy");
    assert!(!session.is_temporary());
    assert_eq!(session.model_dir(), dir.path().join("valley"));

    let temp = ModelSession::from_config(&SessionConfig::default()).unwrap();
    assert!(temp.is_temporary());
}
