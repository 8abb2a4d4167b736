use crate::app::App;
use crate::errors::{ErrorCode, McpError, ToolError};
use crate::mcp::catalog::{is_tool, tool_catalog, validate_tool_args};
use crate::mcp::protocol::{JsonRpcRequest, JsonRpcResponse};
use crate::tools::{ToolRequest, TOOL_NAMES, TOOL_REMOTE_SSH};
use crate::utils::output;
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};

const PROTOCOL_VERSION: &str = "2025-06-18";
const SERVER_NAME: &str = "sshops";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A failure inside a known tool follows that tool's contract: the raw
/// command tool answers with a success:false envelope, the file tools with
/// one plain-text line. Only unknown tools and malformed envelopes surface
/// as protocol errors.
fn tool_failure_text(tool: &str, args: &Value, err: &ToolError) -> String {
    if tool == TOOL_REMOTE_SSH {
        let host = args.get("host").and_then(|v| v.as_str()).unwrap_or("");
        let command = args.get("command").and_then(|v| v.as_str()).unwrap_or("");
        output::render_envelope(&output::command_failure(host, command, err))
    } else {
        output::failure_line(err)
    }
}

pub struct McpServer {
    app: Arc<App>,
}

impl McpServer {
    pub fn new() -> Result<Self, ToolError> {
        let app = App::initialize()?;
        Ok(Self { app: Arc::new(app) })
    }

    fn handle_initialize(&self) -> Value {
        serde_json::json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {"tools": {"list": true, "call": true}},
            "serverInfo": {"name": SERVER_NAME, "version": SERVER_VERSION},
        })
    }

    fn handle_tools_list(&self) -> Value {
        serde_json::json!({ "tools": tool_catalog() })
    }

    async fn handle_tools_call(&self, name: &str, args: Value) -> Result<Value, McpError> {
        if !is_tool(name) {
            return Err(McpError::new(
                ErrorCode::InvalidRequest,
                format!(
                    "Unknown tool: {}. Known tools: {}",
                    name,
                    TOOL_NAMES.join(", ")
                ),
            ));
        }

        let call_id = uuid::Uuid::new_v4().to_string();
        self.app.logger.info(
            "tools/call",
            Some(&serde_json::json!({"tool": name, "call_id": call_id})),
        );

        let parsed = validate_tool_args(name, &args).and_then(|_| ToolRequest::parse(name, &args));
        let text = match parsed {
            Ok(request) => self.app.ssh.dispatch(request).await,
            Err(err) => {
                self.app.logger.warn(
                    "tool call rejected",
                    Some(&serde_json::json!({"tool": name, "call_id": call_id, "code": err.code})),
                );
                tool_failure_text(name, &args, &err)
            }
        };

        Ok(serde_json::json!({
            "content": [ { "type": "text", "text": text } ]
        }))
    }

    pub async fn run_stdio(&self) -> Result<(), ToolError> {
        let stdin = tokio::io::stdin();
        let stdout = tokio::io::stdout();
        let mut reader = BufReader::new(stdin).lines();
        let mut writer = BufWriter::new(stdout);

        while let Some(line) = reader
            .next_line()
            .await
            .map_err(|err| ToolError::internal(err.to_string()))?
        {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let parsed: Value = match serde_json::from_str(trimmed) {
                Ok(value) => value,
                Err(_) => {
                    let response = JsonRpcResponse::failure(
                        Value::Null,
                        ErrorCode::ParseError.as_i32(),
                        "Parse error".to_string(),
                    );
                    write_response(&mut writer, &response).await?;
                    continue;
                }
            };

            let request: JsonRpcRequest = match serde_json::from_value(parsed) {
                Ok(request) => request,
                Err(_) => {
                    let response = JsonRpcResponse::failure(
                        Value::Null,
                        ErrorCode::InvalidRequest.as_i32(),
                        "Invalid request".to_string(),
                    );
                    write_response(&mut writer, &response).await?;
                    continue;
                }
            };

            let response = match request.method.as_str() {
                _ if request.method.starts_with("notifications/") => None,
                "initialize" => request
                    .id
                    .map(|id| JsonRpcResponse::success(id, self.handle_initialize())),
                "tools/list" => request
                    .id
                    .map(|id| JsonRpcResponse::success(id, self.handle_tools_list())),
                "tools/call" => match request.id {
                    Some(id) => {
                        let params = request.params.as_object().cloned().unwrap_or_default();
                        let name = params.get("name").and_then(|v| v.as_str()).unwrap_or("");
                        if name.is_empty() {
                            Some(JsonRpcResponse::failure(
                                id,
                                ErrorCode::InvalidParams.as_i32(),
                                "Missing tool name".to_string(),
                            ))
                        } else {
                            let args = params
                                .get("arguments")
                                .cloned()
                                .unwrap_or(Value::Object(Default::default()));
                            Some(match self.handle_tools_call(name, args).await {
                                Ok(result) => JsonRpcResponse::success(id, result),
                                Err(err) => {
                                    JsonRpcResponse::failure(id, err.code.as_i32(), err.message)
                                }
                            })
                        }
                    }
                    None => None,
                },
                _ => request.id.map(|id| {
                    JsonRpcResponse::failure(
                        id,
                        ErrorCode::MethodNotFound.as_i32(),
                        "Method not found".to_string(),
                    )
                }),
            };

            if let Some(response) = response {
                write_response(&mut writer, &response).await?;
            }
        }

        Ok(())
    }
}

async fn write_response(
    writer: &mut BufWriter<tokio::io::Stdout>,
    response: &JsonRpcResponse,
) -> Result<(), ToolError> {
    let payload = serde_json::to_string(response).unwrap_or_default();
    writer.write_all(payload.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}

pub async fn run_stdio() -> Result<(), ToolError> {
    let server = McpServer::new()?;
    server.run_stdio().await
}
