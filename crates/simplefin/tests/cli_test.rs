//! CLI tests for paths that never reach the network.

use assert_cmd::Command;
use predicates::prelude::*;

fn simplefin() -> Command {
    let mut cmd = Command::cargo_bin("simplefin").unwrap();
    cmd.env_remove("SIMPLEFIN_ACCESS_URL")
        .env_remove("SIMPLEFIN_TIMEOUT")
        .env_remove("SIMPLEFIN_RETRIES")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    simplefin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("claim"))
        .stdout(predicate::str::contains("accounts"));
}

#[test]
fn test_accounts_requires_access_url() {
    simplefin()
        .arg("accounts")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No access URL"));
}

#[test]
fn test_accounts_rejects_invalid_access_url() {
    simplefin()
        .args(["accounts", "--access-url", "http://u:p@beta-bridge.simplefin.org/simplefin"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid access URL"))
        .stderr(predicate::str::contains("not HTTPS"));
}

#[test]
fn test_accounts_reads_access_url_from_env() {
    simplefin()
        .env("SIMPLEFIN_ACCESS_URL", "https://u:p@example.com/simplefin")
        .arg("accounts")
        .assert()
        .failure()
        .stderr(predicate::str::contains("wrong host"));
}

#[test]
fn test_accounts_rejects_bad_date() {
    simplefin()
        .args(["accounts", "--demo", "--start-date", "2024-13-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("YYYY-MM-DD"));
}

#[test]
fn test_accounts_days_conflicts_with_start_date() {
    simplefin()
        .args(["accounts", "--demo", "--days", "5", "--start-date", "2024-01-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_accounts_rejects_days_out_of_range() {
    simplefin()
        .args(["accounts", "--demo", "--days", "4294967295"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("earliest supported date"));
}

#[test]
fn test_claim_rejects_malformed_token() {
    simplefin()
        .args(["claim", "%%% not base64 %%%"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to claim setup token"))
        .stderr(predicate::str::contains("base64"));
}

#[test]
fn test_claim_requires_token() {
    simplefin().arg("claim").assert().failure();
}
