//! Binary-level failure paths that never reach the network.

use assert_cmd::Command;
use predicates::str::contains;
use tempfile::NamedTempFile;

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("labs-validator").unwrap();
    cmd.env_remove("LABS_AUTH")
        .env_remove("LABS_ENV")
        .env_remove("DEBUG");
    cmd
}

#[test]
fn missing_auth_variable() {
    let report = NamedTempFile::new().unwrap();
    cmd()
        .args(["trivy", "--json"])
        .arg(report.path())
        .assert()
        .code(1)
        .stdout(contains("Missing environment variable LABS_AUTH"));
}

#[test]
fn missing_report_file() {
    cmd()
        .env("LABS_AUTH", "irrelevant")
        .args(["trivy", "--json", "/no/such/trivy-report.json"])
        .assert()
        .code(1)
        .stdout(contains("issue reading file"));
}

#[test]
fn single_dash_file_flag_still_accepted() {
    cmd()
        .env("LABS_AUTH", "irrelevant")
        .args(["trivy", "-json=/no/such/trivy-report.json", "-debug"])
        .assert()
        .code(1)
        .stdout(contains("issue reading file"));

    cmd()
        .env("LABS_AUTH", "irrelevant")
        .args(["webconfig-easy", "-xml", "/no/such/web.config"])
        .assert()
        .code(1)
        .stdout(contains("issue reading file"));
}

#[test]
fn help_documents_flag_spelling() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("--json <FILE>"))
        .stdout(contains("-json=<FILE>"));
}

#[test]
fn missing_file_flag() {
    cmd()
        .arg("webconfig-easy")
        .assert()
        .code(1)
        .stdout(contains("missing --xml file"));
}

#[test]
fn untrusted_auth_token() {
    let config = NamedTempFile::new().unwrap();
    cmd()
        .env("LABS_AUTH", "eyJhbGciOiJub25lIn0.e30.")
        .args(["webconfig-easy", "--xml"])
        .arg(config.path())
        .assert()
        .code(1)
        .stdout(contains("Parsing claims from jwt"));
}

#[test]
fn help_lists_subcommands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("trivy"))
        .stdout(contains("webconfig-easy"));
}
