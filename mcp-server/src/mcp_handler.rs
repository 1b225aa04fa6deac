use anyhow::Result;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::io::{self, BufRead, BufReader, Write};
use std::sync::Arc;
use tracing::{info, warn};

use xoso_lookup::api::DrawSource;
use xoso_lookup::ticket_reader::TicketReader;

use crate::use_cases::{LotteryUseCase, TicketUseCase};

const JSONRPC_VERSION: &str = "2.0";

const PARSE_ERROR: i32 = -32700;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;
const INTERNAL_ERROR: i32 = -32603;

#[derive(Debug, serde::Deserialize)]
struct JsonRpcRequest {
    method: String,
    params: Option<Value>,
    id: Option<Value>,
}

#[derive(Debug, serde::Serialize)]
struct JsonRpcResponse {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
    id: Option<Value>,
}

impl JsonRpcResponse {
    fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: Some(result),
            error: None,
            id: Some(id),
        }
    }

    fn failure(id: Value, code: i32, message: String) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(JsonRpcError {
                code,
                message,
                data: None,
            }),
            id: Some(id),
        }
    }
}

#[derive(Debug, serde::Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

#[derive(Debug, serde::Serialize)]
struct Tool {
    name: String,
    description: String,
    #[serde(rename = "inputSchema")]
    input_schema: Value,
}

pub struct MCPHandler<S, R> {
    lottery_use_case: Arc<LotteryUseCase<S>>,
    ticket_use_case: Arc<TicketUseCase<R>>,
}

impl<S: DrawSource, R: TicketReader> MCPHandler<S, R> {
    pub fn new(lottery_use_case: Arc<LotteryUseCase<S>>, ticket_use_case: Arc<TicketUseCase<R>>) -> Self {
        Self {
            lottery_use_case,
            ticket_use_case,
        }
    }

    pub async fn serve<In, Out>(self, reader: In, mut writer: Out) -> Result<()>
    where
        In: BufRead,
        Out: Write,
    {
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let response = match serde_json::from_str::<JsonRpcRequest>(&line) {
                Ok(request) => {
                    // Notifications never get a response
                    if request.id.is_none() || request.method.starts_with("notifications/") {
                        if request.method == "notifications/initialized" {
                            info!("🎟️ Client initialized");
                        }
                        continue;
                    }
                    self.handle_request(request).await
                }
                Err(e) => {
                    warn!("Failed to parse request: {} - Line: {}", e, line);
                    JsonRpcResponse {
                        jsonrpc: JSONRPC_VERSION.to_string(),
                        result: None,
                        error: Some(JsonRpcError {
                            code: PARSE_ERROR,
                            message: "Parse error".to_string(),
                            data: Some(json!(e.to_string())),
                        }),
                        id: None,
                    }
                }
            };

            writeln!(writer, "{}", serde_json::to_string(&response)?)?;
            writer.flush()?;
        }

        Ok(())
    }

    async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.unwrap_or(json!(1));
        match request.method.as_str() {
            "initialize" => {
                info!("🎟️ Initializing xoso MCP server");
                JsonRpcResponse::success(
                    id,
                    json!({
                        "protocolVersion": "2024-11-05",
                        "capabilities": {
                            "tools": {}
                        },
                        "serverInfo": {
                            "name": "xoso-mcp-server",
                            "version": env!("CARGO_PKG_VERSION")
                        }
                    }),
                )
            }
            "tools/list" => JsonRpcResponse::success(id, json!({ "tools": self.get_tools() })),
            "tools/call" => self.handle_call_tool(request.params, id).await,
            other => JsonRpcResponse::failure(id, METHOD_NOT_FOUND, format!("Method not found: {}", other)),
        }
    }

    async fn handle_call_tool(&self, params: Option<Value>, id: Value) -> JsonRpcResponse {
        let Some(params) = params else {
            return JsonRpcResponse::failure(id, INVALID_PARAMS, "Missing params".to_string());
        };
        let Some(tool_name) = params.get("name").and_then(|n| n.as_str()) else {
            return JsonRpcResponse::failure(id, INVALID_PARAMS, "Missing tool name".to_string());
        };

        let arguments = params.get("arguments").cloned().unwrap_or(json!({}));
        let arguments_map: HashMap<String, Value> = serde_json::from_value(arguments).unwrap_or_default();

        match self.execute_tool(tool_name, &arguments_map).await {
            Ok(content) => JsonRpcResponse::success(
                id,
                json!({
                    "content": [
                        {
                            "type": "text",
                            "text": content
                        }
                    ]
                }),
            ),
            Err(e) => {
                warn!(tool = tool_name, "tool failed: {:#}", e);
                JsonRpcResponse::failure(id, INTERNAL_ERROR, format!("Tool execution error: {}", e))
            }
        }
    }

    async fn execute_tool(&self, tool_name: &str, arguments: &HashMap<String, Value>) -> Result<String> {
        match tool_name {
            "list_provinces" => self.lottery_use_case.list_provinces(arguments).await,
            "check_ticket" => self.lottery_use_case.check_ticket(arguments).await,
            "read_ticket_image" => self.ticket_use_case.read_ticket_image(arguments).await,
            _ => Err(anyhow::anyhow!("Unknown tool: {}", tool_name)),
        }
    }

    fn get_tools(&self) -> Vec<Tool> {
        vec![
            Tool {
                name: "list_provinces".to_string(),
                description: "List southern provinces and their draw days, optionally only those drawing on a date"
                    .to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "date": {
                            "type": "string",
                            "description": "Optional date in YYYY-MM-DD format"
                        }
                    }
                }),
            },
            Tool {
                name: "check_ticket".to_string(),
                description: "Check a ticket number against one province's draw and return the prize table"
                    .to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "province_code": {
                            "type": "string",
                            "description": "Province code, e.g. tphc"
                        },
                        "date": {
                            "type": "string",
                            "description": "Draw date in YYYY-MM-DD format"
                        },
                        "number": {
                            "type": "string",
                            "description": "Ticket number, 2 to 6 digits"
                        }
                    },
                    "required": ["province_code", "date", "number"]
                }),
            },
            Tool {
                name: "read_ticket_image".to_string(),
                description: "Read a ticket photo and suggest the number, province and draw date to check"
                    .to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "image_base64": {
                            "type": "string",
                            "description": "Base64-encoded image bytes"
                        },
                        "mime_type": {
                            "type": "string",
                            "description": "Image mime type (default: image/jpeg)"
                        },
                        "province_code": {
                            "type": "string",
                            "description": "Province already chosen, kept unless the photo shows one"
                        },
                        "date": {
                            "type": "string",
                            "description": "Date already chosen in YYYY-MM-DD format"
                        },
                        "number": {
                            "type": "string",
                            "description": "Number already entered"
                        }
                    },
                    "required": ["image_base64"]
                }),
            },
        ]
    }
}

pub fn stdio() -> (BufReader<io::Stdin>, io::Stdout) {
    (BufReader::new(io::stdin()), io::stdout())
}
