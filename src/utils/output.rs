//! Response shaping for the five tool contracts.
//!
//! The raw-command tool always answers with a structured envelope, even when
//! the execution itself failed. The four file-operation tools answer with the
//! script's own textual report, and degrade to a single plain-text failure
//! line on any thrown error. The asymmetry is part of the contract.

use crate::errors::ToolError;
use crate::managers::ssh::ExecutionOutcome;
use serde_json::Value;

pub fn command_envelope(host: &str, command: &str, outcome: &ExecutionOutcome) -> Value {
    serde_json::json!({
        "success": outcome.exit_code == 0,
        "output": outcome.stdout,
        "error": if outcome.stderr.is_empty() { Value::Null } else { Value::String(outcome.stderr.clone()) },
        "exitCode": outcome.exit_code,
        "host": host,
        "command": command,
    })
}

pub fn command_failure(host: &str, command: &str, err: &ToolError) -> Value {
    serde_json::json!({
        "success": false,
        "output": "",
        "error": err.message,
        "exitCode": 0,
        "host": host,
        "command": command,
    })
}

pub fn render_envelope(envelope: &Value) -> String {
    serde_json::to_string(envelope).unwrap_or_else(|_| "{}".to_string())
}

/// The script's own report is the whole response body. Diagnostics land on
/// stdout; stderr is the fallback when a script dies before reporting.
pub fn script_report(outcome: &ExecutionOutcome) -> String {
    if !outcome.stdout.is_empty() {
        outcome.stdout.clone()
    } else {
        outcome.stderr.clone()
    }
}

pub fn failure_line(err: &ToolError) -> String {
    format!("Error: {}", err.message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(stdout: &str, stderr: &str, exit_code: i32) -> ExecutionOutcome {
        ExecutionOutcome {
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            exit_code,
            signal: None,
        }
    }

    #[test]
    fn envelope_success_tracks_exit_code() {
        let value = command_envelope("h", "true", &outcome("ok", "", 0));
        assert_eq!(value["success"], serde_json::json!(true));
        assert_eq!(value["error"], serde_json::Value::Null);

        let value = command_envelope("h", "false", &outcome("", "boom", 1));
        assert_eq!(value["success"], serde_json::json!(false));
        assert_eq!(value["error"], serde_json::json!("boom"));
        assert_eq!(value["exitCode"], serde_json::json!(1));
    }

    #[test]
    fn failure_envelope_never_raises() {
        let err = ToolError::connection("unreachable");
        let value = command_failure("h", "id", &err);
        assert_eq!(value["success"], serde_json::json!(false));
        assert_eq!(value["error"], serde_json::json!("unreachable"));
        assert_eq!(value["exitCode"], serde_json::json!(0));
    }

    #[test]
    fn script_report_prefers_stdout() {
        assert_eq!(script_report(&outcome("report", "noise", 0)), "report");
        assert_eq!(script_report(&outcome("", "died", 2)), "died");
    }

    #[test]
    fn failure_line_is_single_line() {
        let err = ToolError::key_resolution("No readable SSH private key");
        assert_eq!(failure_line(&err), "Error: No readable SSH private key");
        assert!(!failure_line(&err).contains('\n'));
    }
}
