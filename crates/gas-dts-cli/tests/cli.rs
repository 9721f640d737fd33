use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

const DB: &str = r#"{
    "categories": {
        "base": {"name": "Base", "decls": {
            "Logger": {"kind": "class", "doc": "Writes to the log.",
                "url": "https://example.com/base/logger",
                "methods": [{"name": "log", "detailedDoc": "Logs a message.",
                    "params": [{"name": "message", "type": "String"}],
                    "return": {"name": "Logger"}}]},
            "console": {"kind": "class", "url": "https://example.com/base/console"}
        }},
        "drive": {"name": "Drive", "decls": {
            "Access": {"kind": "enum", "members": ["ANYONE", "DOMAIN"]},
            "File": {"kind": "class", "methods": [{"name": "getBlob",
                "return": {"name": "Logger", "category": "base"}}]}
        }}
    },
    "services": {
        "logger": "https://example.com/base/logger",
        "console": "https://example.com/base/console"
    }
}"#;

fn gas_dts(dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("gas-dts").unwrap();
    cmd.current_dir(dir.path()).env_remove("RUST_LOG");
    cmd
}

#[test]
fn generate_writes_one_file_per_category() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("db.json"), DB).unwrap();

    gas_dts(&dir)
        .args(["generate", "--input", "db.json", "--out-dir", "out", "--date", "2024-03-04"])
        .assert()
        .success();

    let base = fs::read_to_string(dir.path().join("out/google-apps-script.base.d.ts")).unwrap();
    let drive = fs::read_to_string(dir.path().join("out/google-apps-script.drive.d.ts")).unwrap();

    assert!(base.starts_with("// Type definitions for Google Apps Script 2024-03-04\n"));
    assert!(base.contains("      log(message: string): Logger;\n"));
    assert!(base.contains("declare var Logger: GoogleAppsScript.Base.Logger;\n"));
    assert!(base.contains("// declare var console: GoogleAppsScript.Base.console;\n"));
    assert!(drive.contains("/// <reference path=\"google-apps-script.base.d.ts\" />\n"));
    assert!(drive.contains("      getBlob(): Base.Logger;\n"));
    assert!(drive.contains("    enum Access { ANYONE, DOMAIN }\n"));
}

#[test]
fn generate_reads_stdin_and_prints_to_stdout() {
    let dir = tempfile::tempdir().unwrap();

    gas_dts(&dir)
        .args(["generate", "--stdout", "--date", "2024-03-04"])
        .write_stdin(DB)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "// ==> google-apps-script.base.d.ts\n",
        ))
        .stdout(predicate::str::contains(
            "// ==> google-apps-script.drive.d.ts\n",
        ));

    assert!(!dir.path().join("dist").exists());
}

#[test]
fn malformed_input_fails_without_writing() {
    let dir = tempfile::tempdir().unwrap();

    gas_dts(&dir)
        .args(["generate", "--out-dir", "out"])
        .write_stdin(r#"{"categories": {"base": {"decls": {"X": {"kind": "struct"}}}}}"#)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error"))
        .stderr(predicate::str::contains("malformed documentation database"));

    assert!(!dir.path().join("out").exists());
}

#[test]
fn missing_input_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();

    gas_dts(&dir)
        .args(["generate", "--input", "missing.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to open missing.json"));
}

#[test]
fn invalid_date_is_rejected() {
    let dir = tempfile::tempdir().unwrap();

    gas_dts(&dir)
        .args(["generate", "--date", "yesterday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("YYYY-MM-DD"));
}

#[test]
fn config_file_in_working_directory_is_used() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("gas-dts.toml"),
        "root_namespace = \"Gas\"\nfile_prefix = \"gas\"\n",
    )
    .unwrap();

    gas_dts(&dir)
        .args(["generate", "--stdout", "--date", "2024-03-04"])
        .write_stdin(DB)
        .assert()
        .success()
        .stdout(predicate::str::contains("// ==> gas.drive.d.ts\n"))
        .stdout(predicate::str::contains("declare namespace Gas {\n"))
        .stdout(predicate::str::contains("/// <reference path=\"gas.types.d.ts\" />"));
}

#[test]
fn explicit_config_with_header_template() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("header.txt"), "// Generated {{date}}\n").unwrap();
    fs::write(
        dir.path().join("custom.toml"),
        format!(
            "header_template = {:?}\n",
            dir.path().join("header.txt").display().to_string()
        ),
    )
    .unwrap();

    gas_dts(&dir)
        .args(["--config", "custom.toml", "generate", "--stdout", "--date", "2024-03-04"])
        .write_stdin(DB)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "// ==> google-apps-script.base.d.ts\n// Generated 2024-03-04\n\n",
        ));
}

#[test]
fn invalid_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("gas-dts.toml"), "indent_size = \"wide\"\n").unwrap();

    gas_dts(&dir)
        .args(["generate", "--stdout"])
        .write_stdin(DB)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid configuration"));
}

#[test]
fn default_config_round_trips() {
    let dir = tempfile::tempdir().unwrap();

    let output = gas_dts(&dir).arg("default-config").output().unwrap();
    assert!(output.status.success());
    let toml = String::from_utf8(output.stdout).unwrap();
    assert!(toml.contains("root_namespace = \"GoogleAppsScript\""));
    assert!(toml.contains("[[extends]]"));

    fs::write(dir.path().join("gas-dts.toml"), &toml).unwrap();
    gas_dts(&dir)
        .args(["generate", "--stdout"])
        .write_stdin(DB)
        .assert()
        .success();
}

#[test]
fn inspect_summarizes_database() {
    let dir = tempfile::tempdir().unwrap();

    gas_dts(&dir)
        .arg("inspect")
        .write_stdin(DB)
        .assert()
        .success()
        .stdout(predicate::str::contains("base (Base): 2 interfaces, 0 enums\n"))
        .stdout(predicate::str::contains("  entry point: Logger\n"))
        .stdout(predicate::str::contains(
            "  entry point: console (binding commented out)\n",
        ))
        .stdout(predicate::str::contains("drive (Drive): 1 interfaces, 1 enums\n"))
        .stdout(predicate::str::contains(
            "2 categories, 4 declarations, 2 entry points\n",
        ));
}
