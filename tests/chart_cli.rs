use std::path::PathBuf;
use std::process::{Command, Output};

fn run_chart(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_chart_generator"))
        .args(args)
        .env("RENDER_FONT_DIR", "/nonexistent/font/dir")
        .env("RUST_LOG", "off")
        .output()
        .unwrap()
}

fn out_path(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("supreme_chart_cli_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir.join(name)
}

#[test]
fn malformed_json_reports_error() {
    let path = out_path("malformed.png");
    let output = run_chart(&["{not json", path.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("ERROR:"), "stdout: {}", stdout);
    assert_eq!(stdout.lines().count(), 1);
    assert!(!path.exists());
}

#[test]
fn wrong_argument_count_prints_usage() {
    let output = run_chart(&["{}"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8(output.stdout).unwrap().starts_with("Usage:"));
}

#[test]
fn single_entry_history_succeeds() {
    let path = out_path("single.png");
    let path_arg = path.to_str().unwrap();
    let json = r#"{"itemName":"World Lock","priceHistory":[{"timestamp":1700000000000,"price":1}]}"#;

    let output = run_chart(&[json, path_arg]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8(output.stdout).unwrap(), format!("SUCCESS:{}\n", path_arg));
    assert!(std::fs::read(&path).unwrap().starts_with(b"\x89PNG"));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn full_payload_succeeds() {
    let path = out_path("full.png");
    let path_arg = path.to_str().unwrap();
    let json = r#"{
        "itemName": "Diamond Lock",
        "priceHistory": [
            {"timestamp": 1700000000000, "price": 100},
            {"timestamp": 1700086400000, "price": 104}
        ],
        "predictions": {
            "predicted1Month": {"min": 100, "max": 110},
            "predicted6Months": {"min": 95, "max": 130},
            "predicted1Year": {"min": 90, "max": 160},
            "confidence": 65
        },
        "stats": {"currentPrice": 104, "trend": "Rising"}
    }"#;

    let output = run_chart(&[json, path_arg]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8(output.stdout).unwrap().trim_end(), format!("SUCCESS:{}", path_arg));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn missing_history_reports_error() {
    let path = out_path("missing.png");
    let output = run_chart(&[r#"{"itemName":"Dirt"}"#, path.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("ERROR:"));
    assert!(stdout.contains("priceHistory"));
}

#[test]
fn timestamps_at_calendar_limit_report_error() {
    let max_millis = chrono::DateTime::<chrono::Utc>::MAX_UTC.timestamp_millis();
    let near_max_millis = max_millis - 100 * 86_400_000;
    let payloads = [
        format!(r#"{{"itemName":"Dirt","priceHistory":[{{"timestamp":{},"price":1}}]}}"#, max_millis),
        format!(
            r#"{{"itemName":"Dirt","priceHistory":[{{"timestamp":{},"price":1}}],
                "predictions":{{"predicted1Month":{{"min":1,"max":2}},"predicted6Months":{{"min":1,"max":3}},
                "predicted1Year":{{"min":1,"max":4}},"confidence":50}}}}"#,
            near_max_millis
        ),
    ];

    for (i, json) in payloads.iter().enumerate() {
        let path = out_path(&format!("limit_{}.png", i));
        let output = run_chart(&[json, path.to_str().unwrap()]);

        assert_eq!(output.status.code(), Some(1), "payload {}", i);
        let stdout = String::from_utf8(output.stdout).unwrap();
        assert!(stdout.starts_with("ERROR:"), "stdout: {}", stdout);
        assert_eq!(stdout.lines().count(), 1);
        assert!(!path.exists());
    }
}

#[test]
fn large_prices_with_narrow_spread_succeed() {
    let path = out_path("large.png");
    let path_arg = path.to_str().unwrap();
    let json = r#"{"itemName":"Dirt","priceHistory":[
        {"timestamp":1700000000000,"price":100000000000000000},
        {"timestamp":1700086400000,"price":100000000000000016}
    ]}"#;

    let output = run_chart(&[json, path_arg]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8(output.stdout).unwrap().trim_end(), format!("SUCCESS:{}", path_arg));
    let _ = std::fs::remove_file(&path);
}
