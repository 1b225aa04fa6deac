//! Reconciles the provider's loosely-typed response with [`NormalizedPayload`].
//!
//! Three outcomes are kept apart: the provider failed or rejected the request
//! (error), the provider confirmed success but has nothing for the query
//! ([`NormalizedPayload::Empty`]), and a populated payload.

use serde_json::{Map, Value};
use tracing::warn;

use crate::error::UpstreamError;
use crate::types::{DrawRecord, LotteryPayload, NormalizedPayload};

/// Decodes a raw response body and normalizes it.
pub fn normalize_body(
    body: &str,
    requested_province: &str,
) -> Result<NormalizedPayload, UpstreamError> {
    let raw: Value = serde_json::from_str(body)
        .map_err(|e| UpstreamError::Protocol(format!("response body is not valid JSON: {}", e)))?;
    normalize(&raw, requested_province)
}

pub fn normalize(raw: &Value, requested_province: &str) -> Result<NormalizedPayload, UpstreamError> {
    let response = raw
        .as_object()
        .ok_or_else(|| UpstreamError::Protocol(format!("expected a JSON object, got {}", json_type(raw))))?;

    let success = response.get("success");
    let code = response.get("code");

    if success.and_then(Value::as_bool) != Some(true) || code.and_then(read_code) != Some(0) {
        let message = response
            .get("msg")
            .or_else(|| response.get("message"))
            .and_then(Value::as_str);
        return Err(UpstreamError::ApiRejected(rejection_message(success, code, message)));
    }

    let payload = match response.get("t").or_else(|| response.get("data")) {
        None | Some(Value::Null) => {
            warn!(
                "provider reported success for {} but sent no payload; treating as no data",
                requested_province
            );
            return Ok(NormalizedPayload::Empty {
                province_code: requested_province.to_string(),
            });
        }
        Some(Value::Object(payload)) => payload,
        Some(other) => {
            return Err(UpstreamError::Protocol(format!(
                "'t' must be an object, got {}",
                json_type(other)
            )));
        }
    };

    let issue_list = match payload.get("issueList") {
        None | Some(Value::Null) => {
            warn!(
                "payload for {} has no 't.issueList'; normalizing to an empty list",
                requested_province
            );
            Vec::new()
        }
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| match draw_record(index, item) {
                Ok(record) => Some(record),
                Err(reason) => {
                    warn!("skipping draw for {}: {}", requested_province, reason);
                    None
                }
            })
            .collect(),
        Some(other) => {
            return Err(UpstreamError::MalformedData(format!(
                "'t.issueList' must be an array, got {}",
                json_type(other)
            )));
        }
    };

    Ok(NormalizedPayload::Populated(LotteryPayload {
        province_name: string_field(payload, "name").unwrap_or_else(|| requested_province.to_string()),
        province_code: string_field(payload, "code").unwrap_or_else(|| requested_province.to_string()),
        turn_num: string_field(payload, "turnNum"),
        open_time: string_field(payload, "openTime"),
        server_time: string_field(payload, "serverTime"),
        sort: payload.get("sort").and_then(Value::as_f64),
        nav_cate: string_field(payload, "navCate"),
        issue_list,
    }))
}

fn rejection_message(success: Option<&Value>, code: Option<&Value>, message: Option<&str>) -> String {
    let trimmed = message.map(str::trim).unwrap_or_default();
    let generic = trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("ok")
        || trimmed.eq_ignore_ascii_case("success");

    if generic {
        format!(
            "provider rejected the request (success: {}, code: {}); the data is invalid or the server had a problem",
            raw_or_missing(success),
            raw_or_missing(code)
        )
    } else {
        trimmed.to_string()
    }
}

fn raw_or_missing(value: Option<&Value>) -> String {
    value.map_or_else(|| "missing".to_string(), Value::to_string)
}

/// Entries that cannot be a draw are reported back as the reason they were skipped.
fn draw_record(index: usize, item: &Value) -> Result<DrawRecord, String> {
    let record = item
        .as_object()
        .ok_or_else(|| format!("issueList[{}] must be an object, got {}", index, json_type(item)))?;

    let turn_num = string_field(record, "turnNum")
        .ok_or_else(|| format!("issueList[{}] has no string 'turnNum'", index))?;

    Ok(DrawRecord {
        turn_num,
        detail: string_field(record, "detail"),
        id: record.get("id").and_then(read_code),
        code: string_field(record, "code"),
        province_name: string_field(record, "provinceName"),
        open_num: string_field(record, "openNum"),
        open_time: string_field(record, "openTime"),
        open_time_stamp: record.get("openTimeStamp").and_then(read_code),
        status: record.get("status").and_then(read_code),
    })
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Integers sometimes arrive as `0.0`.
fn read_code(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.is_finite())
            .map(|f| f as i64)
    })
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
