//! End-to-end tests that run the `excise` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const SNAPSHOT: &str = r#"DROP TABLE IF EXISTS "CustomerMeasurements" CASCADE;
DROP TABLE IF EXISTS "Order" CASCADE;

-- CustomerMeasurements (NEW)
CREATE TABLE "CustomerMeasurements" (
  "id" TEXT PRIMARY KEY
);
CREATE INDEX "CustomerMeasurements_customerId_idx" ON "CustomerMeasurements"("customerId");
CREATE INDEX "CustomerMeasurements_tenantId_idx" ON "CustomerMeasurements"("tenantId");

-- Order
CREATE TABLE "Order" ("id" TEXT PRIMARY KEY);
ALTER TABLE "CustomerMeasurements" ENABLE ROW LEVEL SECURITY;
-- CustomerMeasurements
CREATE POLICY "Tenant isolation for CustomerMeasurements" ON "CustomerMeasurements"
  USING ("tenantId" = get_current_tenant_id())
  WITH CHECK ("tenantId" = get_current_tenant_id());
"#;

const SNAPSHOT_CLEANED: &str = r#"DROP TABLE IF EXISTS "Order" CASCADE;


-- Order
CREATE TABLE "Order" ("id" TEXT PRIMARY KEY);
"#;

/// Get a Command for the excise binary
fn excise_cmd() -> Command {
    Command::cargo_bin("excise").expect("Failed to find excise binary")
}

fn write_file(dir: &TempDir, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, body).unwrap();
    path
}

// ============================================================================
// Help and discovery
// ============================================================================

#[test]
fn test_help_exits_zero() {
    excise_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("apply"));
}

#[test]
fn test_list_rules_shows_builtins() {
    excise_cmd()
        .arg("list-rules")
        .assert()
        .success()
        .stdout(predicate::str::contains("customer-measurements-snapshot"))
        .stdout(predicate::str::contains("customer-measurements-migration"));
}

#[test]
fn test_list_rules_json_is_valid() {
    let output = excise_cmd().args(["list-rules", "--json"]).output().unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 2);
}

#[test]
fn test_show_rules_round_trips_through_rules_file() {
    let dir = TempDir::new().unwrap();
    let output = excise_cmd()
        .args(["show-rules", "customer-measurements-snapshot"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let rules = dir.path().join("snapshot.toml");
    fs::write(&rules, &output.stdout).unwrap();
    let target = write_file(&dir, "schema_snapshot.sql", SNAPSHOT);

    excise_cmd()
        .arg("apply")
        .arg(&target)
        .arg("--rules-file")
        .arg(&rules)
        .arg("--strict")
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&target).unwrap(), SNAPSHOT_CLEANED);
}

// ============================================================================
// apply
// ============================================================================

#[test]
fn test_apply_builtin_rewrites_file() {
    let dir = TempDir::new().unwrap();
    let target = write_file(&dir, "schema_snapshot.sql", SNAPSHOT);

    excise_cmd()
        .arg("apply")
        .arg(&target)
        .args(["--rules", "customer-measurements-snapshot"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Matched 4 of 4 rules"))
        .stdout(predicate::str::contains("Checksum: sha256:"))
        .stdout(predicate::str::contains(" -> sha256:"));

    assert_eq!(fs::read_to_string(&target).unwrap(), SNAPSHOT_CLEANED);
}

#[test]
fn test_second_run_succeeds_without_changes() {
    let dir = TempDir::new().unwrap();
    let target = write_file(&dir, "schema_snapshot.sql", SNAPSHOT_CLEANED);

    excise_cmd()
        .arg("apply")
        .arg(&target)
        .args(["--rules", "customer-measurements-snapshot"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to remove"))
        .stdout(predicate::str::contains("Checksum: sha256:").and(predicate::str::contains(" -> ").not()));

    assert_eq!(fs::read_to_string(&target).unwrap(), SNAPSHOT_CLEANED);
}

#[test]
fn test_strict_miss_exits_two_and_keeps_file() {
    let dir = TempDir::new().unwrap();
    let body = "-- Original Migration: 20260205000002_customer_measurements.sql\nCREATE TABLE x ();\n";
    let target = write_file(&dir, "init_v2.sql", body);

    excise_cmd()
        .arg("apply")
        .arg(&target)
        .args(["--rules", "customer-measurements-migration", "--strict"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("measurements-section"));

    assert_eq!(fs::read_to_string(&target).unwrap(), body);
}

#[test]
fn test_missing_file_exits_one() {
    let dir = TempDir::new().unwrap();

    excise_cmd()
        .arg("apply")
        .arg(dir.path().join("absent.sql"))
        .args(["--literal", "x"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_unknown_rule_set_exits_one() {
    let dir = TempDir::new().unwrap();
    let target = write_file(&dir, "schema.sql", "content\n");

    excise_cmd()
        .arg("apply")
        .arg(&target)
        .args(["--rules", "customer-orders"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown rule set"));
}

#[test]
fn test_inline_rules_with_escapes() {
    let dir = TempDir::new().unwrap();
    let target = write_file(&dir, "schema.sql", "A\nTARGET\nB\nSTART\nmiddle\nEND\nafter\n");

    excise_cmd()
        .arg("apply")
        .arg(&target)
        .args(["--literal", r"TARGET\n", "--range", r"START\n", r"END\n"])
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&target).unwrap(), "A\nB\nEND\nafter\n");
}

#[test]
fn test_dry_run_prints_diff_and_keeps_file() {
    let dir = TempDir::new().unwrap();
    let target = write_file(&dir, "schema.sql", "keep\ndrop me\nkeep too\n");

    excise_cmd()
        .arg("apply")
        .arg(&target)
        .args(["--literal", r"drop me\n", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-drop me"))
        .stdout(predicate::str::contains("no changes written"));

    assert_eq!(
        fs::read_to_string(&target).unwrap(),
        "keep\ndrop me\nkeep too\n"
    );
}

#[test]
fn test_json_report() {
    let dir = TempDir::new().unwrap();
    let target = write_file(&dir, "schema.sql", "keep\ndrop me\n");

    let output = excise_cmd()
        .arg("apply")
        .arg(&target)
        .args(["--literal", r"drop me\n", "--literal", "absent", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["rule_set"], "inline");
    assert_eq!(report["written"], true);
    assert_eq!(report["all_matched"], false);
    assert_eq!(report["rules"][0]["status"], "removed");
    assert_eq!(report["rules"][1]["reason"], "literal-absent");
    assert_eq!(fs::read_to_string(&target).unwrap(), "keep\n");
}

#[test]
fn test_apply_without_rules_is_usage_error() {
    excise_cmd()
        .args(["apply", "schema.sql"])
        .assert()
        .failure();
}

#[cfg(unix)]
#[test]
fn test_read_only_target_exits_one_and_keeps_file() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let body = "keep\ndrop me\n";
    let target = write_file(&dir, "schema.sql", body);
    fs::set_permissions(&target, fs::Permissions::from_mode(0o444)).unwrap();

    // Privileged users can open read-only files for writing anyway.
    if fs::OpenOptions::new().write(true).open(&target).is_ok() {
        return;
    }

    excise_cmd()
        .arg("apply")
        .arg(&target)
        .args(["--literal", r"drop me\n"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error"));

    assert_eq!(fs::read_to_string(&target).unwrap(), body);
}
