use sshops::errors::ToolErrorKind;
use sshops::tools::{ToolRequest, WriteMode};

fn base(extra: serde_json::Value) -> serde_json::Value {
    let mut args = serde_json::json!({"host": "example.org", "user": "deploy"});
    if let (Some(map), Some(extra)) = (args.as_object_mut(), extra.as_object()) {
        for (key, value) in extra {
            map.insert(key.clone(), value.clone());
        }
    }
    args
}

#[test]
fn remote_ssh_defaults_port() {
    let request = ToolRequest::parse("remote-ssh", &base(serde_json::json!({"command": "id"})))
        .expect("valid request");
    let ToolRequest::RemoteSsh(args) = request else {
        panic!("wrong variant");
    };
    assert_eq!(args.target.port, 22);
    assert_eq!(args.target.private_key_path, None);
    assert_eq!(args.command, "id");
}

#[test]
fn read_lines_defaults() {
    let request = ToolRequest::parse(
        "read-lines",
        &base(serde_json::json!({"filePath": "/tmp/a.txt"})),
    )
    .expect("valid request");
    let ToolRequest::ReadLines(args) = request else {
        panic!("wrong variant");
    };
    assert_eq!(args.start_line, 1);
    assert_eq!(args.end_line, None);
    assert_eq!(args.max_lines, 100);
}

#[test]
fn search_code_defaults() {
    let request = ToolRequest::parse(
        "search-code",
        &base(serde_json::json!({"path": "/srv/app", "pattern": "fn main"})),
    )
    .expect("valid request");
    let ToolRequest::SearchCode(args) = request else {
        panic!("wrong variant");
    };
    assert!(!args.ignore_case);
    assert_eq!(args.max_results, 50);
    assert_eq!(args.context_lines, 2);
    assert_eq!(args.file_pattern, None);
}

#[test]
fn write_chunk_mode_parses_and_defaults() {
    let request = ToolRequest::parse(
        "write-chunk",
        &base(serde_json::json!({"filePath": "/tmp/x", "content": "hi", "mode": "append"})),
    )
    .expect("valid request");
    let ToolRequest::WriteChunk(args) = request else {
        panic!("wrong variant");
    };
    assert_eq!(args.mode, WriteMode::Append);

    let request = ToolRequest::parse(
        "write-chunk",
        &base(serde_json::json!({"filePath": "/tmp/x", "content": "hi"})),
    )
    .expect("valid request");
    let ToolRequest::WriteChunk(args) = request else {
        panic!("wrong variant");
    };
    assert_eq!(args.mode, WriteMode::Rewrite);
}

#[test]
fn edit_block_defaults_expected_replacements() {
    let request = ToolRequest::parse(
        "edit-block",
        &base(serde_json::json!({"filePath": "/tmp/x", "oldText": "a", "newText": "b"})),
    )
    .expect("valid request");
    let ToolRequest::EditBlock(args) = request else {
        panic!("wrong variant");
    };
    assert_eq!(args.expected_replacements, 1);
}

#[test]
fn missing_required_field_is_rejected_before_any_network_use() {
    let err = ToolRequest::parse(
        "remote-ssh",
        &serde_json::json!({"host": "example.org", "user": "deploy"}),
    )
    .expect_err("command is required");
    assert_eq!(err.kind, ToolErrorKind::InvalidParams);
}

#[test]
fn empty_host_is_rejected() {
    let err = ToolRequest::parse(
        "remote-ssh",
        &serde_json::json!({"host": "  ", "user": "deploy", "command": "id"}),
    )
    .expect_err("blank host");
    assert_eq!(err.kind, ToolErrorKind::InvalidParams);
    assert!(err.message.contains("host"));
}

#[test]
fn end_line_must_not_precede_start_line() {
    let err = ToolRequest::parse(
        "read-lines",
        &base(serde_json::json!({"filePath": "/tmp/a", "startLine": 9, "endLine": 3})),
    )
    .expect_err("inverted range");
    assert_eq!(err.kind, ToolErrorKind::InvalidParams);
}

#[test]
fn zero_max_lines_is_rejected() {
    let err = ToolRequest::parse(
        "read-lines",
        &base(serde_json::json!({"filePath": "/tmp/a", "maxLines": 0})),
    )
    .expect_err("zero maxLines");
    assert!(err.message.contains("maxLines"));
}

#[test]
fn unknown_tool_names_the_known_set() {
    let err = ToolRequest::parse("rm-rf", &serde_json::json!({})).expect_err("unknown tool");
    assert!(err.message.contains("Unknown tool"));
    assert!(err.message.contains("write-chunk"));
}
