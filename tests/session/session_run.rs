use std::fs;

use mfsession::{Error, ModelSession, NameFile, PackageKind, Precision};

use crate::fixture::{configure, FakeModflow};

#[test]
fn test_run_writes_input_and_reads_heads() {
    let fake = FakeModflow::new((2, 3, 4), 7.5);
    let mut session = ModelSession::new().unwrap().with_executor(fake.clone());
    configure(&mut session, (2, 3, 4));

    session.run(true, true).unwrap();

    let model_dir = session.model_dir();
    assert!(model_dir.join("mfpy.nam").is_file());
    assert!(model_dir.join("mfpy.dis").is_file());
    assert!(model_dir.join("mfpy.bas").is_file());
    assert!(model_dir.join("mfpy.chd").is_file());

    let heads = session.heads().expect("heads after run");
    assert_eq!(heads.shape(), (2, 3, 4));
    let data = heads.get_data(None).unwrap();
    assert!(data.iter().all(|h| *h == 7.5));

    let calls = fake.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].name_file, "mfpy.nam");
    assert_eq!(calls[0].dir, model_dir);
    assert!(calls[0].exe.ends_with("mf2005"));
}

#[test]
fn test_run_reads_double_precision_heads() {
    let dir = tempfile::tempdir().unwrap();
    let fake = FakeModflow::new((2, 2, 3), 12.000000001).double();
    let mut session =
        ModelSession::create("dbl", "mfpy", "mf2005dbl", Some(dir.path().to_path_buf()))
            .unwrap()
            .with_executor(fake.clone());
    configure(&mut session, (2, 2, 3));

    session.run(true, true).unwrap();

    let heads = session.heads().unwrap();
    assert_eq!(heads.precision(), Precision::Double);
    assert_eq!(heads.shape(), (2, 2, 3));
    assert_eq!(heads.get_data(None).unwrap()[[1, 1, 2]], 12.000000001);
    assert!(fake.calls()[0].exe.ends_with("mf2005dbl"));
}

#[test]
fn test_run_leaves_process_cwd_alone() {
    let before = std::env::current_dir().unwrap();
    let fake = FakeModflow::new((1, 2, 2), 1.0);
    let mut session = ModelSession::new().unwrap().with_executor(fake.clone());
    configure(&mut session, (1, 2, 2));

    session.run(true, true).unwrap();

    assert_eq!(std::env::current_dir().unwrap(), before);
    assert_eq!(fake.calls()[0].cwd, before);
}

#[test]
fn test_name_file_lists_packages_and_heads() {
    let mut session = ModelSession::new()
        .unwrap()
        .with_executor(FakeModflow::new((1, 2, 2), 1.0));
    configure(&mut session, (1, 2, 2));
    session.run(true, true).unwrap();

    let nam = NameFile::read(&session.model_dir().join("mfpy.nam")).unwrap();
    let ftypes: Vec<&str> = nam.entries.iter().map(|e| e.ftype.as_str()).collect();
    assert_eq!(ftypes[0], "LIST");
    for ftype in ["DIS", "BAS6", "LPF", "CHD", "OC", "PCG"] {
        assert!(ftypes.contains(&ftype), "{} missing from {:?}", ftype, ftypes);
    }
    assert!(nam.entries.iter().any(|e| e.unit == 51 && e.file == "mfpy.hds"));
}

#[test]
fn test_run_without_write_uses_existing_input() {
    let fake = FakeModflow::new((1, 2, 2), 3.0);
    let mut session = ModelSession::new().unwrap().with_executor(fake.clone());
    configure(&mut session, (1, 2, 2));
    session.run(true, true).unwrap();

    let dis_path = session.model_dir().join("mfpy.dis");
    fs::write(&dis_path, "edited by hand\n").unwrap();
    session.run(false, true).unwrap();

    assert_eq!(fs::read_to_string(&dis_path).unwrap(), "edited by hand\n");
    assert_eq!(fake.calls().len(), 2);
}

#[test]
fn test_run_creates_missing_model_dir() {
    let dir = tempfile::tempdir().unwrap();
    let fake = FakeModflow::new((1, 1, 2), 0.0);
    let mut session =
        ModelSession::create("valley", "steady", "mf2005", Some(dir.path().join("runs")))
            .unwrap()
            .with_executor(fake.clone());
    configure(&mut session, (1, 1, 2));

    session.run(true, true).unwrap();

    assert!(dir.path().join("runs/valley/steady.nam").is_file());
    assert!(dir.path().join("runs/valley/steady.hds").is_file());
    assert_eq!(fake.calls()[0].name_file, "steady.nam");
}

#[test]
fn test_run_without_dis_fails_before_executing() {
    let fake = FakeModflow::new((1, 1, 1), 0.0);
    let mut session = ModelSession::new().unwrap().with_executor(fake.clone());
    session.set_bas(1i32, 0.0f64);

    assert!(matches!(
        session.run(true, true),
        Err(Error::MissingPackage(_))
    ));
    assert!(fake.calls().is_empty());
    assert!(session.heads().is_none());
}

#[test]
fn test_setters_replace_by_kind() {
    let mut session = ModelSession::new().unwrap();
    session.set_pcg();
    session.set_pcg();
    session.set_oc(Default::default());

    assert_eq!(session.packages().len(), 2);
    assert!(session.package(&PackageKind::Pcg).is_some());
    assert!(session.package(&PackageKind::Wel).is_none());
    assert_eq!(
        session.model().package_list(),
        vec![PackageKind::Oc, PackageKind::Pcg]
    );
}
