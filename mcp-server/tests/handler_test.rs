use chrono::Local;
use serde_json::{Value, json};
use std::io::Cursor;
use std::sync::Arc;

use xoso_lookup::UpstreamError;
use xoso_lookup::api::DrawSource;
use xoso_lookup::error::TicketReaderError;
use xoso_lookup::ticket_reader::{TicketImage, TicketReader};
use xoso_lookup::types::TicketReading;
use xoso_lookup::utils::format_iso_date;
use xoso_mcp::{LotteryUseCase, MCPHandler, TicketUseCase};

struct FakeSource;

impl DrawSource for FakeSource {
    fn history_url(&self, province_code: &str) -> String {
        format!("https://provider.test/{}", province_code)
    }

    async fn fetch_history(&self, province_code: &str) -> Result<String, UpstreamError> {
        match province_code {
            "tphc" => Ok(json!({
                "success": true,
                "code": 0,
                "msg": "ok",
                "t": {
                    "name": "TP. HCM",
                    "code": "tphc",
                    "issueList": [{
                        "turnNum": "15/07/2024",
                        "detail": json!(["111111", "22222", "33333", "44444,55555", "66666", "7777", "8888", "999", "45"]).to_string()
                    }]
                }
            })
            .to_string()),
            _ => Err(UpstreamError::Transport("HTTP 500 Internal Server Error".to_string())),
        }
    }
}

struct FakeReader(Result<TicketReading, TicketReaderError>);

impl TicketReader for FakeReader {
    async fn read_ticket(
        &self,
        _image: &TicketImage,
        province_names: &[String],
    ) -> Result<TicketReading, TicketReaderError> {
        assert!(province_names.iter().any(|n| n == "Cà Mau"));
        match &self.0 {
            Ok(reading) => Ok(reading.clone()),
            Err(e) => Err(TicketReaderError::Rejected(e.to_string())),
        }
    }
}

fn reading_for_today() -> TicketReading {
    TicketReading {
        lottery_number: Some("123456".to_string()),
        province_name: Some("Ca Mau".to_string()),
        draw_date: Some(format_iso_date(Local::now().date_naive())),
        raw_text: None,
    }
}

async fn exchange(reader: FakeReader, requests: &[Value]) -> Vec<Value> {
    let handler = MCPHandler::new(
        Arc::new(LotteryUseCase::new(FakeSource)),
        Arc::new(TicketUseCase::new(reader)),
    );
    let input: String = requests.iter().map(|r| format!("{}\n", r)).collect();
    let mut output = Vec::new();
    handler.serve(Cursor::new(input), &mut output).await.unwrap();

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

async fn call_tool(reader: FakeReader, name: &str, arguments: Value) -> Value {
    let responses = exchange(
        reader,
        &[json!({"jsonrpc": "2.0", "id": 7, "method": "tools/call", "params": {"name": name, "arguments": arguments}})],
    )
    .await;
    assert_eq!(responses.len(), 1);
    let text = responses[0]["result"]["content"][0]["text"]
        .as_str()
        .unwrap_or_else(|| panic!("no tool result: {}", responses[0]));
    serde_json::from_str(text).unwrap()
}

#[tokio::test]
async fn test_initialize_and_list_tools_skipping_notifications() {
    let responses = exchange(
        FakeReader(Ok(TicketReading::default())),
        &[
            json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}),
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
            json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
        ],
    )
    .await;

    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["result"]["serverInfo"]["name"], "xoso-mcp-server");
    let names: Vec<&str> = responses[1]["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["list_provinces", "check_ticket", "read_ticket_image"]);
}

#[tokio::test]
async fn test_protocol_errors() {
    let handler = MCPHandler::new(
        Arc::new(LotteryUseCase::new(FakeSource)),
        Arc::new(TicketUseCase::new(FakeReader(Ok(TicketReading::default())))),
    );
    let input = "not json\n{\"jsonrpc\":\"2.0\",\"id\":3,\"method\":\"resources/list\"}\n{\"jsonrpc\":\"2.0\",\"id\":4,\"method\":\"tools/call\"}\n";
    let mut output = Vec::new();
    handler.serve(Cursor::new(input), &mut output).await.unwrap();

    let codes: Vec<i64> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str::<Value>(line).unwrap()["error"]["code"].as_i64().unwrap())
        .collect();
    assert_eq!(codes, vec![-32700, -32601, -32602]);
}

#[tokio::test]
async fn test_check_ticket_tool_reports_win() {
    let result = call_tool(
        FakeReader(Ok(TicketReading::default())),
        "check_ticket",
        json!({"province_code": "tphc", "date": "2024-07-15", "number": "12345"}),
    )
    .await;

    assert_eq!(result["success"], true);
    assert_eq!(result["status"], "won");
    assert_eq!(result["winning_result"]["prize_name"], "Eighth Prize");
    assert_eq!(result["prizes"].as_array().unwrap().len(), 9);
    assert!(result["report_html"].as_str().unwrap().contains("<td><span class=\"match\">45</span></td>"));
}

#[tokio::test]
async fn test_check_ticket_tool_reports_failures_with_status() {
    let invalid = call_tool(
        FakeReader(Ok(TicketReading::default())),
        "check_ticket",
        json!({"province_code": "tphc", "date": "15/07/2024", "number": "45"}),
    )
    .await;
    assert_eq!(invalid["success"], false);
    assert_eq!(invalid["status"], "input_error");

    let missing = call_tool(
        FakeReader(Ok(TicketReading::default())),
        "check_ticket",
        json!({"province_code": "tphc", "date": "2024-07-14", "number": "45"}),
    )
    .await;
    assert_eq!(missing["status"], "no_draw_data");

    let upstream = call_tool(
        FakeReader(Ok(TicketReading::default())),
        "check_ticket",
        json!({"province_code": "cama", "date": "2024-07-15", "number": "45"}),
    )
    .await;
    assert_eq!(upstream["status"], "upstream_error");
}

#[tokio::test]
async fn test_missing_tool_argument_is_internal_error() {
    let responses = exchange(
        FakeReader(Ok(TicketReading::default())),
        &[json!({"jsonrpc": "2.0", "id": 9, "method": "tools/call", "params": {"name": "check_ticket", "arguments": {"province_code": "tphc"}}})],
    )
    .await;

    assert_eq!(responses[0]["error"]["code"], -32603);
    assert_eq!(responses[0]["id"], 9);
}

#[tokio::test]
async fn test_list_provinces_tool_filters_by_weekday() {
    // 2024-07-15 is a Monday
    let result = call_tool(
        FakeReader(Ok(TicketReading::default())),
        "list_provinces",
        json!({"date": "2024-07-15"}),
    )
    .await;

    let codes: Vec<&str> = result["provinces"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["code"].as_str().unwrap())
        .collect();
    assert!(codes.contains(&"tphc"));
    assert!(codes.contains(&"cama"));
    assert!(!codes.contains(&"dona"));
}

#[tokio::test]
async fn test_read_ticket_image_merges_into_form() {
    let result = call_tool(
        FakeReader(Ok(reading_for_today())),
        "read_ticket_image",
        json!({"image_base64": "aGVsbG8=", "mime_type": "image/png", "province_code": "tphc"}),
    )
    .await;

    assert_eq!(result["success"], true);
    assert_eq!(result["applied"], true);
    assert_eq!(result["form"]["province_code"], "cama");
    assert_eq!(result["form"]["number"], "123456");
    assert_eq!(result["ready_to_check"], true);
}

#[tokio::test]
async fn test_read_ticket_image_reader_error_and_empty_reading() {
    let rejected = call_tool(
        FakeReader(Err(TicketReaderError::Rejected("blurry".to_string()))),
        "read_ticket_image",
        json!({"image_base64": "aGVsbG8="}),
    )
    .await;
    assert_eq!(rejected["success"], false);
    assert!(rejected["message"].as_str().unwrap().contains("blurry"));

    let empty = call_tool(
        FakeReader(Ok(TicketReading::default())),
        "read_ticket_image",
        json!({"image_base64": "aGVsbG8="}),
    )
    .await;
    assert_eq!(empty["success"], false);
}
