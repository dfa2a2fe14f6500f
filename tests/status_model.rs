// tests/status_model.rs

use proptest::prelude::*;
use procpool::display::{format_seconds, status_table};
use procpool::errors::PoolError;
use procpool::status::Status;

#[test]
fn to_json_writes_all_five_fields() {
    let status = Status {
        uptime: 12,
        running: 1,
        queued: 0,
        failed: 3,
        succeeded: 4,
    };

    let json = status.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["uptime"], 12);
    assert_eq!(value["running"], 1);
    assert_eq!(value["queued"], 0);
    assert_eq!(value["failed"], 3);
    assert_eq!(value["succeeded"], 4);
}

#[test]
fn from_json_of_empty_object_yields_all_missing() {
    let status = Status::from_json("{}").unwrap();

    assert_eq!(
        status,
        Status {
            uptime: -1,
            running: -1,
            queued: -1,
            failed: -1,
            succeeded: -1,
        }
    );
}

#[test]
fn from_json_substitutes_only_missing_fields() {
    let status = Status::from_json(r#"{"uptime": 5, "running": 2, "failed": null}"#).unwrap();

    assert_eq!(status.uptime, 5);
    assert_eq!(status.running, 2);
    assert_eq!(status.queued, Status::MISSING);
    assert_eq!(status.failed, Status::MISSING);
    assert_eq!(status.succeeded, Status::MISSING);
}

#[test]
fn from_json_tolerates_trailing_newline() {
    let status = Status::from_json("{\"uptime\":1,\"running\":0,\"queued\":0,\"failed\":0,\"succeeded\":9}\n")
        .unwrap();
    assert_eq!(status.succeeded, 9);
}

#[test]
fn from_json_rejects_invalid_json_and_non_objects() {
    assert!(matches!(Status::from_json("not json"), Err(PoolError::JsonError(_))));
    assert!(matches!(Status::from_json("[1, 2]"), Err(PoolError::Protocol(_))));
}

proptest! {
    #[test]
    fn status_json_round_trip(
        uptime in 0i64..i64::MAX,
        running in 0i64..10_000,
        queued in 0i64..10_000,
        failed in 0i64..i64::MAX,
        succeeded in 0i64..i64::MAX,
    ) {
        let status = Status { uptime, running, queued, failed, succeeded };
        let parsed = Status::from_json(&status.to_json().unwrap()).unwrap();
        prop_assert_eq!(parsed, status);
    }
}

#[test]
fn format_seconds_picks_largest_whole_unit() {
    assert_eq!(format_seconds(0), "0 seconds");
    assert_eq!(format_seconds(1), "1 second");
    assert_eq!(format_seconds(59), "59 seconds");
    assert_eq!(format_seconds(60), "1 minute");
    assert_eq!(format_seconds(150), "2 minutes");
    assert_eq!(format_seconds(3600), "1 hour");
    assert_eq!(format_seconds(2 * 86_400), "2 days");
    assert_eq!(format_seconds(30 * 86_400), "4 weeks");
    assert_eq!(format_seconds(40 * 86_400), "1 month");
    assert_eq!(format_seconds(800 * 86_400), "2 years");
}

#[test]
fn status_table_lists_every_row() {
    let table = status_table(&Status {
        uptime: 120,
        running: 1,
        queued: 2,
        failed: 3,
        succeeded: 4,
    });

    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines.len(), 7);
    assert!(lines[0].starts_with("+-"));
    assert!(lines[1].contains("Uptime") && lines[1].contains("2 minutes"));
    assert!(lines[2].contains("Running") && lines[2].contains('1'));
    assert!(lines[5].contains("Succeeded") && lines[5].contains('4'));
    // All rows share one width.
    assert!(lines.iter().all(|l| l.len() == lines[0].len()));
}
