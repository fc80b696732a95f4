mod common;

use std::process::{Command, Output};

fn zwf(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_zwf"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

#[test]
fn list_prints_paths_and_sizes() {
    let work = tempfile::tempdir().unwrap();
    let wad = common::write_wad(
        work.path(),
        "a.wad",
        &[("models/bike.dat", b"DEAD"), ("world/road.bin", b"xy")],
    );
    let wad = wad.to_str().unwrap();

    let short = zwf(&["list", wad]);
    assert!(short.status.success());
    assert_eq!(stdout(&short), "models/bike.dat\nworld/road.bin\n");

    let long = zwf(&["list", "-l", wad]);
    assert!(long.status.success());
    assert_eq!(stdout(&long), "4 models/bike.dat\n2 world/road.bin\n");
}

#[test]
fn extract_with_glob_and_verbose() {
    let work = tempfile::tempdir().unwrap();
    let wad = common::write_wad(
        work.path(),
        "a.wad",
        &[("models/bike.dat", b"DEAD"), ("world/road.bin", b"xy")],
    );
    let dest = work.path().join("out");
    std::fs::create_dir(&dest).unwrap();

    let output = zwf(&[
        "extract",
        "--verbose",
        wad.to_str().unwrap(),
        dest.to_str().unwrap(),
        "models/*",
    ]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("Destination:"));
    assert!(stderr(&output).contains("models/bike.dat"));
    assert_eq!(std::fs::read(dest.join("models/bike.dat")).unwrap(), b"DEAD");
    assert!(!dest.join("world").exists());
}

#[test]
fn non_empty_destination_is_fatal() {
    let work = tempfile::tempdir().unwrap();
    let wad = common::write_wad(work.path(), "a.wad", &[("x", b"1")]);

    // the destination already holds a.wad
    let output = zwf(&[
        "extract",
        wad.to_str().unwrap(),
        work.path().to_str().unwrap(),
    ]);
    assert!(!output.status.success());
    assert!(stderr(&output).starts_with("Fatal: "));
    assert!(stderr(&output).contains("is not empty"));
}

#[test]
fn trailing_bytes_warn_but_list() {
    let work = tempfile::tempdir().unwrap();
    let path = work.path().join("padded.wad");
    let mut bytes = common::build_wad(&[("x", b"1")]);
    bytes.extend_from_slice(&[0; 16]);
    std::fs::write(&path, bytes).unwrap();

    let output = zwf(&["list", path.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "x\n");
    assert!(stderr(&output).contains("larger than header implies"));
}

#[test]
fn traceback_prints_error_chain() {
    let work = tempfile::tempdir().unwrap();
    let missing = work.path().join("missing.wad");

    let output = zwf(&["list", "--traceback", missing.to_str().unwrap()]);
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.starts_with("Fatal: Cannot open"));
    assert!(err.contains("Traceback follows"));
}
