mod common;

use common::{entry, path_arg, MockBackend, Workspace};
use serde_json::Value;
use std::fs;

const RECORDS: &str = r#"[
  {"name": "Squat", "imageFileName": "squat.png"},
  {"name": "Lunge", "imageFileName": "dog.png"},
  {"name": "Plank"}
]"#;

/// Plan the default records against `SQUAT.PNG` and `cat.png`.
fn planned_workspace() -> Workspace {
    let ws = Workspace::new();
    let records = ws.write_records(RECORDS);
    let sheet = ws.write_input("exercises.xlsx", b"xlsx-bytes");
    ws.write_input("photos/SQUAT.PNG", b"squat-bytes");
    ws.write_input("photos/cat.png", b"cat-bytes");
    let photos = ws.scratch("photos");
    ws.run_ok(
        "plan",
        &[
            "--records",
            path_arg(&records),
            "--sheet",
            path_arg(&sheet),
            "--images",
            path_arg(&photos),
        ],
    );
    ws
}

#[test]
fn plan_auto_matches_and_check_reports_unresolved_rows() {
    let ws = planned_workspace();

    let status = ws.status_json();
    assert_eq!(status["record_count"], 3);
    assert_eq!(status["entries"].as_array().expect("entries").len(), 2);
    let squat = entry(&status, 2);
    assert_eq!(squat["asset_index"], 0);
    assert_eq!(squat["asset_name"], "SQUAT.PNG");
    assert_eq!(squat["source"], "auto");
    assert_eq!(entry(&status, 3)["asset_index"], Value::Null);
    assert_eq!(status["validation"]["status"], "incomplete");
    assert_eq!(status["validation"]["unresolved_row_indexes"][0], 3);

    let stderr = ws.run_err("check", &[]);
    assert!(stderr.contains("rows 3"), "stderr: {stderr}");
}

#[test]
fn manual_match_completes_and_assemble_publishes_renamed_files() {
    let ws = planned_workspace();

    let stdout = ws.run_ok("match", &["--row", "3", "--asset", "CAT.PNG"]);
    assert!(stdout.contains("row 3: dog.png -> #1 cat.png"), "stdout: {stdout}");
    ws.run_ok("check", &[]);
    ws.run_ok("assemble", &[]);

    let payload = ws.root().join("payload");
    assert_eq!(fs::read(payload.join("squat.png")).expect("squat"), b"squat-bytes");
    assert_eq!(fs::read(payload.join("dog.png")).expect("dog"), b"cat-bytes");
    assert!(!payload.join("cat.png").exists());
    assert!(!ws.root().join("import/txn").exists());

    let manifest: Value = serde_json::from_slice(
        &fs::read(payload.join("manifest.json")).expect("read manifest"),
    )
    .expect("parse manifest");
    assert_eq!(manifest["file_count"], 2);
    assert_eq!(manifest["renamed_count"], 2);
    assert_eq!(manifest["files"][1]["name"], "dog.png");
    assert_eq!(manifest["files"][1]["source_name"], "cat.png");
    assert_eq!(manifest["files"][1]["renamed"], true);
}

#[test]
fn assemble_leaves_a_shared_txn_dir_in_place() {
    let ws = planned_workspace();
    ws.run_ok("match", &["--row", "3", "--clear"]);
    let txn = ws.root().join("import/txn");
    fs::create_dir_all(txn.join("other-run")).expect("create other txn");

    ws.run_ok("assemble", &[]);

    assert!(txn.join("other-run").is_dir());
    assert_eq!(fs::read_dir(&txn).expect("read txn").count(), 1);
    assert!(ws.root().join("payload/squat.png").exists());
}

#[test]
fn override_survives_replan_until_reference_changes() {
    let ws = planned_workspace();
    ws.run_ok("match", &["--row", "3", "--index", "1"]);

    let records = ws.write_records(RECORDS);
    ws.run_ok("plan", &["--records", path_arg(&records)]);
    let kept = entry(&ws.status_json(), 3);
    assert_eq!(kept["asset_index"], 1);
    assert_eq!(kept["source"], "manual");

    let edited = RECORDS.replace("dog.png", "bird.png");
    let records = ws.write_records(&edited);
    ws.run_ok("plan", &["--records", path_arg(&records)]);
    let recomputed = entry(&ws.status_json(), 3);
    assert_eq!(recomputed["asset_reference"], "bird.png");
    assert_eq!(recomputed["asset_index"], Value::Null);
    assert_eq!(recomputed["source"], "auto");
}

#[test]
fn replanning_rows_and_images_together_matches_against_new_images() {
    let ws = Workspace::new();
    ws.write_input("old/a.png", b"old-a");
    ws.write_input("old/b.png", b"old-b");
    let records = ws.write_records("[]");
    let old = ws.scratch("old");
    ws.run_ok("plan", &["--records", path_arg(&records), "--images", path_arg(&old)]);

    ws.write_input("new/b.png", b"new-b");
    ws.write_input("new/x.png", b"new-x");
    let records = ws.write_records(r#"[{"imageFileName": "b.png"}]"#);
    let new = ws.scratch("new");
    ws.run_ok("plan", &["--records", path_arg(&records), "--images", path_arg(&new)]);

    let matched = entry(&ws.status_json(), 2);
    assert_eq!(matched["asset_index"], 0);
    assert_eq!(matched["asset_name"], "b.png");
    assert_eq!(matched["source"], "auto");

    ws.run_ok("assemble", &[]);
    let payload = ws.root().join("payload");
    assert_eq!(fs::read(payload.join("b.png")).expect("b"), b"new-b");
    assert!(!payload.join("x.png").exists());
}

#[test]
fn clearing_images_unresolves_every_row() {
    let ws = planned_workspace();
    ws.run_ok("match", &["--row", "3", "--index", "1"]);

    ws.run_ok("plan", &["--clear-images"]);

    let status = ws.status_json();
    assert!(status["assets"].as_array().expect("assets").is_empty());
    assert_eq!(entry(&status, 2)["asset_index"], Value::Null);
    assert_eq!(entry(&status, 3)["asset_index"], Value::Null);
}

#[test]
fn match_rejects_unknown_rows_and_images() {
    let ws = planned_workspace();

    let stderr = ws.run_err("match", &["--row", "4", "--clear"]);
    assert!(stderr.contains("row 4 does not name an image"), "stderr: {stderr}");

    let stderr = ws.run_err("match", &["--row", "3", "--asset", "bird.png"]);
    assert!(stderr.contains("no selected image is named"), "stderr: {stderr}");

    let stderr = ws.run_err("match", &["--row", "3", "--index", "9"]);
    assert!(stderr.contains("out of range"), "stderr: {stderr}");
}

#[test]
fn assemble_fails_when_an_image_changed_after_plan() {
    let ws = planned_workspace();
    ws.run_ok("match", &["--row", "3", "--clear"]);
    let records = ws.write_records(r#"[{"imageFileName": "squat.png"}]"#);
    ws.run_ok("plan", &["--records", path_arg(&records)]);
    ws.write_input("photos/SQUAT.PNG", b"edited");

    let stderr = ws.run_err("assemble", &[]);

    assert!(stderr.contains("changed since it was selected"), "stderr: {stderr}");
    assert!(!ws.root().join("payload").exists());
}

#[test]
fn undecodable_records_leave_an_empty_row_set() {
    let ws = Workspace::new();
    let records = ws.write_records("not json at all");

    let output = ws.run("plan", &["--records", path_arg(&records), "--json"]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("could not read spreadsheet rows"));
    let status = ws.status_json();
    assert!(status["decode_error"].as_str().is_some());
    assert!(status["entries"].as_array().expect("entries").is_empty());
    assert_eq!(status["validation"]["status"], "complete");
}

#[test]
fn status_without_plan_points_at_plan() {
    let ws = Workspace::new();

    let stderr = ws.run_err("status", &[]);

    assert!(stderr.contains("cimport plan"), "stderr: {stderr}");
}

#[test]
fn submit_sends_sheet_and_payload_then_records_report() {
    let ws = planned_workspace();
    ws.run_ok("match", &["--row", "3", "--index", "1"]);
    let backend = MockBackend::serve_once(
        "200 OK",
        r#"{"successCount":2,"failureCount":1,"errors":["Row 4: name is required"]}"#,
    );
    ws.run_ok("init", &["--api-base", &backend.api_base]);

    let stdout = ws.run_ok("submit", &["--token", "secret"]);
    let request = backend.request();

    assert!(stdout.contains("imported 2 exercises, 1 failed"), "stdout: {stdout}");
    assert!(stdout.contains("Row 4: name is required"));
    assert!(request.starts_with("POST /api/exercises/import "));
    assert!(request.to_ascii_lowercase().contains("authorization: bearer secret"));
    assert_eq!(request.matches("name=\"file\"").count(), 1);
    assert!(request.contains("name=\"file\"; filename=\"exercises.xlsx\""));
    assert_eq!(request.matches("name=\"images\"").count(), 2);
    assert!(request.contains("filename=\"dog.png\""));
    assert!(request.contains("cat-bytes"));

    let report: Value = serde_json::from_slice(
        &fs::read(ws.root().join("import/report.json")).expect("read report"),
    )
    .expect("parse report");
    assert_eq!(report["file_count"], 2);
    assert_eq!(report["response"]["successCount"], 2);
    let history = fs::read_to_string(ws.root().join("import/history.jsonl")).expect("history");
    assert_eq!(history.lines().count(), 1);
}

#[test]
fn submit_refuses_incomplete_sessions_without_contacting_backend() {
    let ws = planned_workspace();

    let stderr = ws.run_err("submit", &["--api-base", "http://127.0.0.1:9"]);

    assert!(stderr.contains("image not selected for rows 3"), "stderr: {stderr}");
    assert!(!ws.root().join("import/history.jsonl").exists());
}
