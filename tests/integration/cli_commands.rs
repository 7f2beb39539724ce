//! The `callsite` binary end to end.

use std::process::{Command, Output};

fn callsite(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_callsite"))
        .env_remove("CALLSITE_LOG")
        .env_remove("CALLSITE_LOG_FORMAT")
        .env_remove("CALLSITE_LOG_OUTPUT")
        .env_remove("CALLSITE_LOG_MODULES")
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn test_config_show_prints_effective_config() {
    let output = callsite(&["--depth", "3", "config", "show"]);
    assert!(
        output.status.success(),
        "config show should succeed: stderr={:?}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[logging.enrichment]"));
    assert!(stdout.contains("stack_trace_depth = 3"));
}

#[test]
fn test_config_validate_rejects_zero_depth() {
    let output = callsite(&["--depth", "0", "config", "validate"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid stack trace depth: 0"), "stderr={}", stderr);
}

#[test]
fn test_demo_emits_enriched_json() {
    let output = callsite(&["--properties", "Caller|StackTrace", "demo", "--format", "json"]);
    assert!(
        output.status.success(),
        "demo should succeed: stderr={:?}",
        String::from_utf8_lossy(&output.stderr)
    );

    let events: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let events = events.as_array().unwrap();
    assert!(!events.is_empty());
    for event in events {
        let properties = &event["properties"];
        assert!(properties.get("ClassName").is_some());
        assert!(properties.get("StackTrace").is_some());
        assert!(properties.get("StackTraceDepth").is_some());
    }
    assert_eq!(events[0]["message"], "sign-in started");
    assert_eq!(events[0]["properties"]["MethodName"], "sign_in");
}
