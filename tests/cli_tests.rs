/// Command-line tests for the workflow binary
///
/// Runs the real executable against the built-in table and the fixture tables.
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

fn erp_workflow() -> Command {
    let mut cmd = Command::cargo_bin("erp-workflow").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn test_actions_json_for_director_on_checked_job_order() {
    let output = erp_workflow()
        .args([
            "actions",
            "--document-type",
            "job_order",
            "--status",
            "checked",
            "--role",
            "Director",
            "--json",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let actions: Vec<String> = serde_json::from_slice(&output).unwrap();
    assert_eq!(actions, vec!["approve", "reject"]);
}

#[test]
fn test_actions_on_terminal_status() {
    erp_workflow()
        .args([
            "actions",
            "--document-type",
            "job_order",
            "--status",
            "approved",
            "--role",
            "owner",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("terminal"));
}

#[test]
fn test_perform_submit_prints_record() {
    let output = erp_workflow()
        .args([
            "perform",
            "--document-type",
            "cash_disbursement_request",
            "--status",
            "draft",
            "--role",
            "finance_manager",
            "--action",
            "submit",
            "--actor-id",
            "u-42",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["new_status"], "pending_check");
    assert_eq!(json["record"]["from"], "draft");
    assert_eq!(json["record"]["actor_id"], "u-42");
}

#[test]
fn test_perform_reject_without_reason_fails() {
    erp_workflow()
        .args([
            "perform",
            "--document-type",
            "job_order",
            "--status",
            "checked",
            "--role",
            "owner",
            "--action",
            "reject",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"error_kind\": \"validation_error\""))
        .stdout(predicate::str::contains("reason required"));
}

#[test]
fn test_perform_with_fixture_table() {
    erp_workflow()
        .args([
            "--permissions",
            &fixture("permissions.toml"),
            "perform",
            "--document-type",
            "job_order",
            "--status",
            "draft",
            "--role",
            "ops",
            "--action",
            "submit",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("permission_denied"));
}

#[test]
fn test_check_table() {
    erp_workflow()
        .args(["check-table", &fixture("permissions.toml")])
        .assert()
        .success()
        .stdout(predicate::str::contains("5 rules"));

    erp_workflow()
        .args(["check-table", &fixture("invalid_permissions.toml")])
        .assert()
        .failure();
}

#[test]
fn test_table_json_lists_standard_rules() {
    let output = erp_workflow()
        .args(["table", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["rule"].as_array().unwrap().len(), 15);
}

#[test]
fn test_unknown_status_is_rejected_by_parser() {
    erp_workflow()
        .args([
            "actions",
            "--document-type",
            "job_order",
            "--status",
            "archived",
            "--role",
            "ops",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("archived"));
}
