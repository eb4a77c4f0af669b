//! End-to-end tests for the tglogin binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use tglogin_crypto::{CallbackParams, SharedSecret};

const TOKEN: &str = "123456:AAE-test-token";
const ANN_QUERY: &str =
    "id=42&first_name=Ann&hash=9e62f16467e2ecbfc2490a56204f6bd31a2fd6c00c026e85c06c054245fdf74f";

/// Command isolated from any user or project configuration.
fn tglogin(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tglogin").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .env_remove("TELEGRAM_TOKEN")
        .env_remove("TELEGRAM_NAME")
        .env_remove("TELEGRAM_CALLBACK_URL")
        .env_remove("TGLOGIN_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

fn signed_query(fields: &[(&str, &str)]) -> String {
    let params: CallbackParams = fields.iter().copied().collect();
    params.signed(&SharedSecret::new(TOKEN)).to_query()
}

#[test]
fn verify_accepts_fixture() {
    let home = TempDir::new().unwrap();
    tglogin(&home)
        .env("TELEGRAM_TOKEN", "mysecret")
        .args(["verify", ANN_QUERY])
        .assert()
        .success()
        .stdout(predicate::str::contains("authentic"));
}

#[test]
fn verify_accepts_full_callback_url() {
    let home = TempDir::new().unwrap();
    let url = format!("https://example.com/oauth2/telegram?{ANN_QUERY}");
    tglogin(&home)
        .env("TELEGRAM_TOKEN", "mysecret")
        .args(["verify", &url])
        .assert()
        .success();
}

#[test]
fn verify_rejects_tampered_callback() {
    let home = TempDir::new().unwrap();
    let tampered = ANN_QUERY.replace("id=42", "id=43");
    tglogin(&home)
        .env("TELEGRAM_TOKEN", "mysecret")
        .args(["--json", "verify", &tampered])
        .assert()
        .code(5)
        .stdout(predicate::str::contains("\"authentic\": false"));
}

#[test]
fn verify_reads_stdin() {
    let home = TempDir::new().unwrap();
    tglogin(&home)
        .env("TELEGRAM_TOKEN", "mysecret")
        .args(["verify", "-"])
        .write_stdin(format!("{ANN_QUERY}\n"))
        .assert()
        .success();
}

#[test]
fn verify_requires_token() {
    let home = TempDir::new().unwrap();
    tglogin(&home)
        .args(["verify", ANN_QUERY])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("TELEGRAM_TOKEN"));
}

#[test]
fn verify_rejects_duplicate_fields() {
    let home = TempDir::new().unwrap();
    tglogin(&home)
        .env("TELEGRAM_TOKEN", "mysecret")
        .args(["verify", "id=1&id=2&hash=00"])
        .assert()
        .code(2);
}

#[test]
fn sign_output_verifies() {
    let home = TempDir::new().unwrap();
    let output = tglogin(&home)
        .env("TELEGRAM_TOKEN", TOKEN)
        .args(["sign", "id=7&first_name=Bob&auth_date=1700000000"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let signed = String::from_utf8(output.stdout).unwrap();

    tglogin(&home)
        .env("TELEGRAM_TOKEN", TOKEN)
        .args(["verify", signed.trim()])
        .assert()
        .success();
}

#[test]
fn canonical_prints_sorted_blob() {
    let home = TempDir::new().unwrap();
    tglogin(&home)
        .args(["canonical", ANN_QUERY])
        .assert()
        .success()
        .stdout("first_name=Ann\nid=42\n");
}

#[test]
fn login_prints_user() {
    let home = TempDir::new().unwrap();
    let now = unix_now().to_string();
    let query = signed_query(&[
        ("id", "42"),
        ("first_name", "Ann"),
        ("username", "ann_t"),
        ("auth_date", &now),
    ]);

    let output = tglogin(&home)
        .env("TELEGRAM_TOKEN", TOKEN)
        .args(["--json", "login", &query])
        .output()
        .unwrap();
    assert!(output.status.success());

    let user: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(user["id"], 42);
    assert_eq!(user["username"], "ann_t");
}

#[test]
fn login_rejects_stale_callback() {
    let home = TempDir::new().unwrap();
    let query = signed_query(&[("id", "42"), ("first_name", "Ann"), ("auth_date", "1700000000")]);

    tglogin(&home)
        .env("TELEGRAM_TOKEN", TOKEN)
        .args(["login", &query])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("expired"));

    tglogin(&home)
        .env("TELEGRAM_TOKEN", TOKEN)
        .args(["login", "--max-age", "0", &query])
        .assert()
        .success();
}

#[test]
fn login_rejects_future_callback_without_max_age() {
    let home = TempDir::new().unwrap();
    let query = signed_query(&[("id", "42"), ("first_name", "Ann"), ("auth_date", "4102444800")]);

    tglogin(&home)
        .env("TELEGRAM_TOKEN", TOKEN)
        .args(["login", "--max-age", "0", &query])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("expired"));
}

#[test]
fn sign_refuses_undecodable_escape() {
    let home = TempDir::new().unwrap();
    tglogin(&home)
        .env("TELEGRAM_TOKEN", TOKEN)
        .args(["sign", "first_name=%FF&id=1"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("%EF%BF%BD").not());
}

#[test]
fn config_file_is_picked_up_and_token_redacted() {
    let home = TempDir::new().unwrap();
    std::fs::write(
        home.path().join(".tglogin.toml"),
        "[bot]\nname = \"my_login_bot\"\n\n[limits]\nmax_fields = 2\n",
    )
    .unwrap();

    tglogin(&home)
        .env("TELEGRAM_TOKEN", TOKEN)
        .args(["--json", "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("my_login_bot"))
        .stdout(predicate::str::contains("123456:****"))
        .stdout(predicate::str::contains("AAE-test-token").not());

    // Three fields exceed the configured limit of two.
    tglogin(&home)
        .env("TELEGRAM_TOKEN", "mysecret")
        .args(["verify", ANN_QUERY])
        .assert()
        .code(2);
}

#[test]
fn config_reports_invalid_settings() {
    let home = TempDir::new().unwrap();
    tglogin(&home)
        .env("TELEGRAM_CALLBACK_URL", "ftp://example.com")
        .args(["config"])
        .assert()
        .code(2);
}

fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}
