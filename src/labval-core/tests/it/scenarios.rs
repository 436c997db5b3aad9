//! End-to-end command scenarios against a mock verification service.

use std::io::Write;

use base64::Engine;
use labval_core::{execute, run, ErrorCategory, SourceCommand, SourceKind, ValidatorError};
use tempfile::NamedTempFile;

use crate::common::{auth_token, env, issuer_keys, mint_with, result_token, ROGUE_PRIVATE};

const CLEAN_REPORT: &str = r#"{
    "SchemaVersion": 2,
    "ArtifactName": ".",
    "ArtifactType": "filesystem",
    "Results": [{
        "Target": "Dockerfile",
        "Class": "config",
        "MisconfSummary": {"Successes": 22, "Failures": 0, "Exceptions": 0}
    }]
}"#;

fn input(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn trivy(file: &NamedTempFile) -> SourceCommand {
    SourceCommand {
        source: SourceKind::Trivy,
        path: Some(file.path().to_path_buf()),
    }
}

fn finding(id: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "Dockerfile Security Check",
        "id": id,
        "title": format!("{id} title"),
        "message": format!("{id} message"),
        "description": format!("{id} description"),
        "severity": "HIGH",
    })
}

#[test]
fn clean_report_reaches_follow_up() {
    let mut server = mockito::Server::new();
    let callback = format!("{}/exercise/squirrel/scm_api_callback", server.url());
    let result = result_token("validation_token", "https://labs.test/validate");
    let mock = server
        .mock("POST", "/exercise/squirrel/scm_api_callback")
        .with_body(serde_json::json!({ "result": result }).to_string())
        .create();

    let report = input(CLEAN_REPORT);
    let token = auth_token("scm_token", &callback);
    let mut out = Vec::new();
    let code = execute(
        &trivy(&report),
        env(&[("LABS_AUTH", token.as_str())]),
        &issuer_keys(),
        &mut out,
    );

    mock.assert();
    let stdout = String::from_utf8(out).unwrap();
    let encoded = base64::engine::general_purpose::URL_SAFE.encode(&result);
    assert_eq!(code, 0);
    assert!(stdout.starts_with("labs validation success!\n"));
    assert!(stdout.contains(&format!("https://labs.test/validate?{encoded}")));
}

struct ClosedPipe;

impl Write for ClosedPipe {
    fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
        Err(std::io::ErrorKind::BrokenPipe.into())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn lost_success_token_is_a_failure() {
    let mut server = mockito::Server::new();
    let callback = format!("{}/cb", server.url());
    let result = result_token("validation_token", "https://labs.test/validate");
    let mock = server
        .mock("POST", "/cb")
        .with_body(serde_json::json!({ "result": result }).to_string())
        .create();

    let report = input(CLEAN_REPORT);
    let token = auth_token("scm_token", &callback);
    let code = execute(
        &trivy(&report),
        env(&[("LABS_AUTH", token.as_str())]),
        &issuer_keys(),
        &mut ClosedPipe,
    );

    mock.assert();
    assert_eq!(code, 1);
}

#[test]
fn submitted_payload_is_the_normalized_report() {
    let mut server = mockito::Server::new();
    let callback = format!("{}/cb", server.url());
    let token = auth_token("scm_token", &callback);
    let expected = SourceKind::Trivy.build_payload(CLEAN_REPORT.as_bytes()).unwrap();
    let mock = server
        .mock("POST", "/cb")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "auth": token,
            "data": base64::engine::general_purpose::STANDARD.encode(&expected),
        })))
        .with_body("{}")
        .create();

    let report = input(CLEAN_REPORT);
    let outcome = run(&trivy(&report), env(&[("LABS_AUTH", token.as_str())]), &issuer_keys()).unwrap();

    mock.assert();
    assert_eq!(outcome, None);
}

#[test]
fn rejection_renders_findings_table() {
    let mut server = mockito::Server::new();
    let callback = format!("{}/cb", server.url());
    let _mock = server
        .mock("POST", "/cb")
        .with_status(400)
        .with_body(
            serde_json::json!({
                "error": "3 failing checks",
                "findings": [finding("DS001"), finding("DS002"), finding("DS026")],
            })
            .to_string(),
        )
        .create();

    let report = input(CLEAN_REPORT);
    let token = auth_token("scm_token", &callback);
    let mut out = Vec::new();
    let code = execute(
        &trivy(&report),
        env(&[("LABS_AUTH", token.as_str())]),
        &issuer_keys(),
        &mut out,
    );

    let stdout = String::from_utf8(out).unwrap();
    assert_eq!(code, 1);
    assert!(stdout.contains("There was an error validating your scanner results"));
    assert!(stdout.contains("Error message: '3 failing checks'"));
    assert!(stdout.contains("Outstanding Findings:"));
    for id in ["DS001", "DS002", "DS026"] {
        assert!(stdout.contains(&format!("{id} title")));
        assert!(stdout.contains(&format!("{id} description")));
        assert!(stdout.contains(&format!("{id} message")));
    }
    let row_rules = stdout
        .lines()
        .filter(|l| l.starts_with('|') && l.contains("+-"))
        .count();
    assert_eq!(row_rules, 8);
}

#[test]
fn mismatched_state_sends_to_empty_endpoint() {
    let mut server = mockito::Server::new();
    let callback = format!("{}/cb", server.url());
    let mock = server.mock("POST", "/cb").expect(0).create();

    let report = input(CLEAN_REPORT);
    let token = auth_token("validation_token", &callback);
    let err = run(&trivy(&report), env(&[("LABS_AUTH", token.as_str())]), &issuer_keys()).unwrap_err();

    mock.assert();
    assert!(matches!(err, ValidatorError::Io { .. }));
    assert!(err.to_string().contains("Sending HTTP request"));
}

#[test]
fn environment_override_bypasses_callback() {
    let mut server = mockito::Server::new();
    let callback = format!("{}/cb", server.url());
    let mock = server.mock("POST", "/cb").expect(0).create();

    let report = input(CLEAN_REPORT);
    let token = auth_token("scm_token", &callback);
    let err = run(
        &trivy(&report),
        env(&[("LABS_AUTH", token.as_str()), ("LABS_ENV", "local")]),
        &issuer_keys(),
    )
    .unwrap_err();

    mock.assert();
    assert!(
        matches!(err, ValidatorError::Io { .. } | ValidatorError::Timeout { .. }),
        "unexpected error: {err}"
    );
    assert!(err
        .to_string()
        .contains("localhost/exercise/squirrel/scm_api_callback"));
}

#[test]
fn forged_auth_token_never_reaches_network() {
    let mut server = mockito::Server::new();
    let callback = format!("{}/cb", server.url());
    let mock = server.mock("POST", "/cb").expect(0).create();

    let forged = mint_with(
        ROGUE_PRIVATE,
        &serde_json::json!({"Lstate": "scm_token", "Lcb": callback}),
    );
    let report = input(CLEAN_REPORT);
    let err = run(&trivy(&report), env(&[("LABS_AUTH", forged.as_str())]), &issuer_keys()).unwrap_err();

    mock.assert();
    assert_eq!(err.category(), ErrorCategory::Crypto);
}

#[test]
fn forged_result_token_is_rejected() {
    let mut server = mockito::Server::new();
    let callback = format!("{}/cb", server.url());
    let forged = mint_with(
        ROGUE_PRIVATE,
        &serde_json::json!({"Lstate": "validation_token", "Lvurl": "https://evil.test"}),
    );
    let _mock = server
        .mock("POST", "/cb")
        .with_body(serde_json::json!({ "result": forged }).to_string())
        .create();

    let report = input(CLEAN_REPORT);
    let token = auth_token("scm_token", &callback);
    let mut out = Vec::new();
    let code = execute(
        &trivy(&report),
        env(&[("LABS_AUTH", token.as_str())]),
        &issuer_keys(),
        &mut out,
    );

    let stdout = String::from_utf8(out).unwrap();
    assert_eq!(code, 1);
    assert!(stdout.contains("Parsing claims from jwt"));
    assert!(!stdout.contains("evil.test"));
}

#[test]
fn webconfig_rejection_without_findings() {
    let mut server = mockito::Server::new();
    let callback = format!("{}/cb", server.url());
    let mock = server
        .mock("POST", "/cb")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "data": base64::engine::general_purpose::STANDARD.encode(br#"{"requiressl":"false"}"#),
        })))
        .with_body(r#"{"error":"requireSSL is not enabled"}"#)
        .create();

    let config = input(
        r#"<configuration><system.web><httpCookies requireSSL="false"/></system.web></configuration>"#,
    );
    let command = SourceCommand {
        source: SourceKind::WebConfigEasy,
        path: Some(config.path().to_path_buf()),
    };
    let token = auth_token("scm_token", &callback);
    let mut out = Vec::new();
    let code = execute(&command, env(&[("LABS_AUTH", token.as_str())]), &issuer_keys(), &mut out);

    mock.assert();
    assert_eq!(code, 1);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "There was an error validating your config\nError message: 'requireSSL is not enabled'\n"
    );
}
