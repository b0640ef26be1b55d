use std::fs;
use std::path::Path;

use mfsession::{Error, ModelSession, PackageKind, Precision};

use crate::fixture::{configure, head_bytes, FakeModflow};

const NAM: &str = "\
LIST 2 steady.list
DIS 11 steady.dis
BAS6 13 steady.bas
DATA(BINARY) 51 steady.hds REPLACE
";

const DIS: &str = "\
1 2 3 1 4 2
0
CONSTANT 100.0
CONSTANT 100.0
CONSTANT 0.0
CONSTANT -10.0
1.0 1 1.0 SS
";

const BAS: &str = "\
FREE
CONSTANT 1
-999.99
CONSTANT 5.0
";

/// Lay out `<working>/<label>/steady.*` as a previous run would have.
fn write_model(working: &Path, label: &str, with_outputs: bool) {
    let model_dir = working.join(label);
    fs::create_dir_all(&model_dir).unwrap();
    fs::write(model_dir.join("steady.nam"), NAM).unwrap();
    fs::write(model_dir.join("steady.dis"), DIS).unwrap();
    fs::write(model_dir.join("steady.bas"), BAS).unwrap();
    if with_outputs {
        let heads = head_bytes(Precision::Single, (1, 2, 3), 1.0, 5.0);
        fs::write(model_dir.join("steady.hds"), heads).unwrap();
        fs::write(model_dir.join("CHD.chk"), "check output").unwrap();
    }
}

#[test]
fn test_load_from_name_file_derives_names() {
    let dir = tempfile::tempdir().unwrap();
    write_model(dir.path(), "valley", true);

    let mut session = ModelSession::new().unwrap();
    let temp_root = session.working_path().to_path_buf();
    session
        .load(dir.path().join("valley/steady.nam"), None, None)
        .unwrap();

    assert_eq!(session.label(), "valley");
    assert_eq!(session.run_name(), "steady");
    assert_eq!(
        session.working_path(),
        fs::canonicalize(dir.path()).unwrap()
    );
    assert!(!session.is_temporary());
    assert!(!temp_root.exists());

    assert!(session.package(&PackageKind::Dis).is_some());
    assert!(session.package(&PackageKind::Bas6).is_some());
    assert!(!dir.path().join("valley/CHD.chk").exists());

    let heads = session.heads().expect("existing head file is opened");
    assert_eq!(heads.shape(), (1, 2, 3));
}

#[test]
fn test_load_from_directory_uses_given_names() {
    let dir = tempfile::tempdir().unwrap();
    write_model(dir.path(), "valley", false);

    let mut session = ModelSession::new().unwrap();
    session
        .load(dir.path(), Some("valley"), Some("steady"))
        .unwrap();

    assert_eq!(session.label(), "valley");
    assert_eq!(session.run_name(), "steady");
    assert!(session.heads().is_none());
    assert_eq!(session.packages().len(), 2);
}

#[test]
fn test_load_directory_falls_back_to_session_names() {
    let dir = tempfile::tempdir().unwrap();
    write_model(dir.path(), "valley", false);

    let mut session = ModelSession::create("valley", "steady", "mf2005", None).unwrap();
    session.load(dir.path(), None, None).unwrap();

    assert_eq!(session.label(), "valley");
    assert_eq!(session.run_name(), "steady");
}

#[test]
fn test_open_does_not_allocate_temp() {
    let dir = tempfile::tempdir().unwrap();
    write_model(dir.path(), "valley", true);

    let session = ModelSession::open(dir.path().join("valley/steady.nam")).unwrap();
    assert!(!session.is_temporary());
    assert_eq!(session.exe_name(), "mf2005");
    assert!(session.heads().is_some());
}

#[test]
fn test_load_invalid_path() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = ModelSession::new().unwrap();
    let temp_root = session.working_path().to_path_buf();

    let err = session
        .load(dir.path().join("missing"), None, None)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
    assert!(session.is_temporary());
    assert!(temp_root.is_dir());
}

#[test]
fn test_load_missing_name_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = ModelSession::new().unwrap();

    let err = session
        .load(dir.path(), Some("nowhere"), Some("steady"))
        .unwrap_err();
    assert!(matches!(err, Error::Io(ref e) if e.kind() == std::io::ErrorKind::NotFound));
}

#[test]
fn test_loaded_model_runs_and_rewrites() {
    let dir = tempfile::tempdir().unwrap();
    write_model(dir.path(), "valley", false);

    let fake = FakeModflow::new((1, 2, 3), 4.0);
    let mut session = ModelSession::new().unwrap().with_executor(fake.clone());
    session
        .load(dir.path().join("valley/steady.nam"), None, None)
        .unwrap();
    session.set_pcg();
    session.run(true, true).unwrap();

    let model_dir = session.model_dir();
    assert_eq!(fs::read_to_string(model_dir.join("steady.dis")).unwrap(), DIS);
    assert!(model_dir.join("steady.pcg").is_file());
    let nam = fs::read_to_string(model_dir.join("steady.nam")).unwrap();
    assert!(nam.contains("PCG"));
    assert!(nam.contains("steady.hds"));
    assert_eq!(session.heads().unwrap().get_data(None).unwrap()[[0, 1, 2]], 4.0);
}

#[test]
fn test_reload_after_run() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = ModelSession::create("fresh", "mfpy", "mf2005", Some(dir.path().into()))
        .unwrap()
        .with_executor(FakeModflow::new((1, 1, 3), 2.0));
    configure(&mut session, (1, 1, 3));
    session.run(true, true).unwrap();

    let reopened = ModelSession::open(dir.path().join("fresh/mfpy.nam")).unwrap();
    assert_eq!(reopened.model().package_list(), session.model().package_list());
    assert_eq!(reopened.heads().unwrap().shape(), (1, 1, 3));
}

#[test]
fn test_load_own_run_keeps_temporary_dir() {
    let mut session = ModelSession::new()
        .unwrap()
        .with_executor(FakeModflow::new((1, 2, 2), 3.0));
    configure(&mut session, (1, 2, 2));
    session.run(true, true).unwrap();

    let root = session.working_path().to_path_buf();
    let nam = session.model_dir().join("mfpy.nam");
    session.load(&nam, None, None).unwrap();

    assert!(session.is_temporary());
    assert!(root.is_dir());
    assert!(nam.is_file());
    assert_eq!(session.label(), "testing");
    assert!(session.heads().is_some());
}
