use clap::Parser;
use dupewalk::cli::Cli;
use dupewalk::config::LoggingConfig;
use dupewalk::error::ExitCode;
use std::fs;
use tempfile::tempdir;

fn run(args: &[&str]) -> anyhow::Result<ExitCode> {
    let cli = Cli::try_parse_from(args).unwrap();
    dupewalk::run_app(cli)
}

#[test]
fn test_exit_code_no_duplicates() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("unique.txt"), b"unique").unwrap();

    let code = run(&["dupewalk", "--no-color", dir.path().to_str().unwrap()]).unwrap();
    assert_eq!(code, ExitCode::NoDuplicates);
}

#[test]
fn test_exit_code_duplicates_found_json() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"same").unwrap();
    fs::write(dir.path().join("b"), b"same").unwrap();

    let code = run(&["dupewalk", "-o", "json", dir.path().to_str().unwrap()]).unwrap();
    assert_eq!(code, ExitCode::Success);
}

#[test]
fn test_exit_code_partial_success() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"same").unwrap();
    fs::write(dir.path().join("b"), b"same").unwrap();
    let missing = dir.path().join("missing");

    let code = run(&[
        "dupewalk",
        "--summary",
        dir.path().to_str().unwrap(),
        missing.to_str().unwrap(),
    ])
    .unwrap();
    assert_eq!(code, ExitCode::PartialSuccess);
}

#[test]
fn test_strict_missing_root_is_an_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing");

    let err = run(&["dupewalk", "--strict", missing.to_str().unwrap()]).unwrap_err();
    assert!(format!("{err:#}").contains("Path not found"));
}

#[test]
fn test_test_flag_exits_without_scanning() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing");

    let code = run(&["dupewalk", "-t", "--strict", missing.to_str().unwrap()]).unwrap();
    assert_eq!(code, ExitCode::Success);
}

#[test]
fn test_logging_config_is_picked_up() {
    let dir = tempdir().unwrap();
    let conf = dir.path().join("logging.toml");
    fs::write(&conf, "level = \"warn\"\ntimestamps = false\n").unwrap();
    fs::write(dir.path().join("x"), b"x").unwrap();

    let (found, config) = LoggingConfig::discover(&conf).unwrap();
    assert_eq!(found, Some(conf.clone()));
    assert_eq!(config.level.as_deref(), Some("warn"));

    let code = run(&[
        "dupewalk",
        "-c",
        conf.to_str().unwrap(),
        dir.path().to_str().unwrap(),
    ])
    .unwrap();
    assert_eq!(code, ExitCode::NoDuplicates);
}

#[test]
fn test_broken_logging_config_does_not_fail_run() {
    let dir = tempdir().unwrap();
    let conf = dir.path().join("logging.toml");
    fs::write(&conf, "this is = = not toml").unwrap();
    let data = dir.path().join("data");
    fs::create_dir(&data).unwrap();

    assert!(LoggingConfig::discover(&conf).is_err());

    let code = run(&[
        "dupewalk",
        "-c",
        conf.to_str().unwrap(),
        data.to_str().unwrap(),
    ])
    .unwrap();
    assert_eq!(code, ExitCode::NoDuplicates);
}
