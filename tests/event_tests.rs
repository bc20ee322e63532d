use predicates::str::contains;
use serde_json::json;

mod common;
use common::{add_event, hl, init_db, json, setup_test_db};

#[test]
fn test_event_lifecycle() {
    let db_path = setup_test_db("event_lifecycle");
    init_db(&db_path);

    let created = json(
        &db_path,
        &[
            "event", "add", "--user", "alice", "--date", "2024-03-01", "--name", "Alice",
            "--reason", "PTO", "--hours", "8",
        ],
    );
    assert_eq!(created, json!({"status": "OK"}));

    let got = json(&db_path, &["event", "get", "alice", "2024-03-01"]);
    assert_eq!(
        got,
        json!({
            "user_id": "alice",
            "event_date": "2024-03-01",
            "user_name": "Alice",
            "reason": "PTO",
            "hours": "8",
        })
    );

    let deleted = json(&db_path, &["event", "del", "alice", "2024-03-01"]);
    assert_eq!(deleted, json!({"status": "OK"}));

    // second delete is a successful no-op
    let again = json(&db_path, &["event", "del", "alice", "2024-03-01"]);
    assert_eq!(again, json!({"status": "OK"}));

    let gone = json(&db_path, &["event", "get", "alice", "2024-03-01"]);
    assert_eq!(gone, json!({}));
}

#[test]
fn test_overwrite_keeps_latest_record() {
    let db_path = setup_test_db("event_overwrite");
    init_db(&db_path);

    add_event(&db_path, "u1", "2024-01-01", "4");
    add_event(&db_path, "u1", "2024-01-01", "6");

    let all = json(&db_path, &["event", "list"]);
    assert_eq!(all.as_array().map(Vec::len), Some(1));
    assert_eq!(all[0]["hours"], "6");
}

#[test]
fn test_list_filters() {
    let db_path = setup_test_db("event_filters");
    init_db(&db_path);

    add_event(&db_path, "a", "2024-01-01", "8");
    add_event(&db_path, "b", "2024-01-02", "8");
    add_event(&db_path, "a", "2024-01-20", "8");
    add_event(&db_path, "a", "2024-02-01", "8");

    let all = json(&db_path, &["event", "list"]);
    assert_eq!(all.as_array().map(Vec::len), Some(4));

    let by_user = json(&db_path, &["event", "list", "--user", "a"]);
    let by_user = by_user.as_array().expect("list");
    assert_eq!(by_user.len(), 3);
    assert!(by_user.iter().all(|e| e["user_id"] == "a"));

    let by_date = json(&db_path, &["event", "list", "--date", "2024-01-02"]);
    assert_eq!(by_date, json!([{
        "user_id": "b",
        "event_date": "2024-01-02",
        "user_name": "b",
        "reason": "work",
        "hours": "8",
    }]));

    let range = json(
        &db_path,
        &["event", "list", "--user", "a", "--from", "2024-01-01", "--to", "2024-01-31"],
    );
    let dates: Vec<_> = range
        .as_array()
        .expect("list")
        .iter()
        .map(|e| e["event_date"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(dates, ["2024-01-01", "2024-01-20"]);
}

#[test]
fn test_range_needs_user() {
    let db_path = setup_test_db("event_range_user");
    init_db(&db_path);

    hl().args([
        "--db", &db_path, "event", "list", "--from", "2024-01-01", "--to", "2024-01-31",
    ])
    .assert()
    .failure()
    .stderr(contains("--user"));
}

#[test]
fn test_users_are_distinct_in_first_seen_order() {
    let db_path = setup_test_db("event_users");
    init_db(&db_path);

    add_event(&db_path, "u1", "2024-01-01", "8");
    add_event(&db_path, "u1", "2024-01-02", "8");
    add_event(&db_path, "u1", "2024-01-03", "8");
    add_event(&db_path, "u2", "2024-01-01", "8");

    assert_eq!(json(&db_path, &["users"]), json!(["u1", "u2"]));
    assert_eq!(
        json(&db_path, &["user", "u2"]),
        json!({"message": "u2 exists", "status": "OK"})
    );
    assert_eq!(
        json(&db_path, &["user", "ghost"]),
        json!({"message": "ghost does not exist", "status": "NOT FOUND"})
    );
}

#[test]
fn test_bulk_delete_by_user_and_date() {
    let db_path = setup_test_db("event_bulk");
    init_db(&db_path);

    add_event(&db_path, "u1", "2024-01-01", "8");
    add_event(&db_path, "u1", "2024-01-02", "8");
    add_event(&db_path, "u1", "2024-01-03", "8");
    add_event(&db_path, "u2", "2024-01-03", "8");

    let by_user = json(&db_path, &["event", "del", "--user", "u1"]);
    assert_eq!(
        by_user,
        json!({"method": "DELETE", "user_id": "u1", "count": 3, "status": "OK"})
    );
    assert_eq!(json(&db_path, &["event", "list", "--user", "u1"]), json!([]));

    let by_date = json(&db_path, &["event", "del", "--date", "2024-01-03"]);
    assert_eq!(by_date["date"], "2024-01-03");
    assert_eq!(by_date["count"], 1);
    assert_eq!(json(&db_path, &["users"]), json!([]));
}

#[test]
fn test_record_json_input() {
    let db_path = setup_test_db("event_record_json");
    init_db(&db_path);

    let record = r#"{"user_id": "carol", "event_date": "2024-05-05", "reason": "Sick", "hours": 4}"#;
    assert_eq!(
        json(&db_path, &["event", "add", "--record", record]),
        json!({"status": "OK"})
    );

    let got = json(&db_path, &["event", "get", "carol", "2024-05-05"]);
    assert_eq!(got["hours"], "4");
    assert_eq!(got["user_name"], "");
}

#[test]
fn test_bad_input_returns_error_payload() {
    let db_path = setup_test_db("event_bad_input");
    init_db(&db_path);

    let unparseable = json(&db_path, &["event", "add", "--record", "{user_id: alice"]);
    assert_eq!(unparseable["status"], "ERROR");

    let missing_key = json(
        &db_path,
        &["event", "add", "--record", r#"{"user_id": "alice"}"#],
    );
    assert_eq!(missing_key["status"], "ERROR");
    assert!(
        missing_key["error"]
            .as_str()
            .unwrap_or_default()
            .contains("event_date")
    );

    let bad_hours = json(
        &db_path,
        &["event", "add", "--user", "alice", "--date", "2024-01-01", "--hours", "many"],
    );
    assert_eq!(bad_hours["status"], "ERROR");

    assert_eq!(json(&db_path, &["event", "list"]), json!([]));
}

#[test]
fn test_get_missing_event_is_empty() {
    let db_path = setup_test_db("event_missing");
    init_db(&db_path);

    assert_eq!(
        json(&db_path, &["event", "get", "nonexistent", "2024-01-01"]),
        json!({})
    );
}

#[test]
fn test_del_requires_scope() {
    let db_path = setup_test_db("event_del_scope");
    init_db(&db_path);

    hl().args(["--db", &db_path, "event", "del"])
        .assert()
        .failure();
}
