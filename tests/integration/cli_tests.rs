use clap::Parser;
use simdupe::cli::{Cli, OutputFormat};
use simdupe::config::Config;
use simdupe::duplicates::{Finder, FinderConfig, GroupListExt, ScanMode};
use simdupe::error::ExitCode;
use simdupe::output::JsonOutput;
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn test_cli_flags_override_config_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "mode = \"simple\"\nby_name = true\nby_size = false\nby_hash = false\n").unwrap();
    let config = Config::load(Some(&path));

    let cli = Cli::try_parse_from(["simdupe", "/tmp"]).unwrap();
    assert_eq!(config.resolve_scan_mode(&cli), ScanMode::simple(true, false, false));

    let cli = Cli::try_parse_from(["simdupe", "--smart", "/tmp"]).unwrap();
    assert_eq!(config.resolve_scan_mode(&cli), ScanMode::Smart);
}

#[test]
fn test_malformed_config_falls_back_to_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "mode = [not valid").unwrap();

    assert_eq!(Config::load(Some(&path)), Config::default());
}

#[test]
fn test_missing_root_exit_code() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing");
    let cli =
        Cli::try_parse_from(["simdupe", "--output", "json", "-q", missing.to_str().unwrap()])
            .unwrap();
    assert_eq!(cli.output, OutputFormat::Json);

    let err = simdupe::run_app(cli).unwrap_err();
    let code = ExitCode::for_error(&err);

    assert_eq!(code, ExitCode::InvalidRoot);
    assert_eq!(code.as_i32(), 1);
}

#[test]
fn test_json_report_contents() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"dup").unwrap();
    fs::write(dir.path().join("b.txt"), b"dup").unwrap();

    let mode = ScanMode::simple(false, true, true);
    let finder = Finder::new(FinderConfig::default().with_mode(mode));
    let mut groups = finder.scan(dir.path()).unwrap();
    groups.keep_newest();

    let report = JsonOutput::new(&groups, &mode, finder.backend(), Duration::from_millis(5));
    let mut buf = Vec::new();
    report.write_to(&mut buf, false).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

    assert_eq!(value["summary"]["total_groups"], 1);
    assert_eq!(value["summary"]["total_items"], 2);
    assert_eq!(value["summary"]["total_selected_items"], 1);
    assert_eq!(value["summary"]["reclaimable"], 3);
    assert_eq!(value["groups"][0]["badge"], "HASH");
    assert_eq!(value["groups"][0]["items"].as_array().unwrap().len(), 2);
}

#[test]
fn test_json_report_groups_largest_first() {
    let dir = tempdir().unwrap();
    for (i, len) in [3usize, 40, 7, 25, 1, 12].iter().enumerate() {
        let content = vec![b'a' + i as u8; *len];
        fs::write(dir.path().join(format!("g{}_a.bin", i)), &content).unwrap();
        fs::write(dir.path().join(format!("g{}_b.bin", i)), &content).unwrap();
    }

    let finder = Finder::new(FinderConfig::default().with_mode(ScanMode::simple(false, true, true)));
    let report = JsonOutput::from_scan(&finder, dir.path()).unwrap();

    let sizes: Vec<u64> = report.groups.iter().map(|g| g.total_size).collect();
    assert_eq!(sizes, vec![80, 50, 24, 14, 6, 2]);
    assert_eq!(report.summary.total_groups, 6);
}
