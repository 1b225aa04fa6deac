use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One entry of the provider's `t.issueList`: a single day's draw for one province.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawRecord {
    /// Date key, `DD/MM/YYYY`.
    pub turn_num: String,
    /// JSON-encoded array of comma-joined prize numbers, one slot per tier.
    pub detail: Option<String>,
    pub id: Option<i64>,
    pub code: Option<String>,
    pub province_name: Option<String>,
    pub open_num: Option<String>,
    pub open_time: Option<String>,
    pub open_time_stamp: Option<i64>,
    pub status: Option<i64>,
}

/// The provider's `t` object after normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LotteryPayload {
    pub province_name: String,
    pub province_code: String,
    pub turn_num: Option<String>,
    pub open_time: Option<String>,
    pub server_time: Option<String>,
    pub sort: Option<f64>,
    pub nav_cate: Option<String>,
    pub issue_list: Vec<DrawRecord>,
}

/// A provider response that passed the success check.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedPayload {
    /// `success && code == 0` with no `t` object: nothing published for this query.
    Empty { province_code: String },
    Populated(LotteryPayload),
}

impl NormalizedPayload {
    pub fn issue_list(&self) -> &[DrawRecord] {
        match self {
            NormalizedPayload::Empty { .. } => &[],
            NormalizedPayload::Populated(payload) => &payload.issue_list,
        }
    }

    pub fn province_code(&self) -> &str {
        match self {
            NormalizedPayload::Empty { province_code } => province_code,
            NormalizedPayload::Populated(payload) => &payload.province_code,
        }
    }

    pub fn province_name(&self) -> &str {
        match self {
            NormalizedPayload::Empty { province_code } => province_code,
            NormalizedPayload::Populated(payload) => &payload.province_name,
        }
    }

    /// Exact string match on the `DD/MM/YYYY` date key.
    pub fn find_draw(&self, turn_num: &str) -> Option<&DrawRecord> {
        self.issue_list().iter().find(|draw| draw.turn_num == turn_num)
    }
}

/// One prize tier of a draw with its winning numbers in listed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedPrizeDetail {
    pub prize_name: String,
    pub numbers: Vec<String>,
}

/// The highest tier a ticket won and the number it matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WinningResult {
    pub prize_name: String,
    pub matched_number: String,
    pub user_number: String,
    pub prize_value: String,
}

#[derive(Serialize, Debug)]
pub struct TicketReaderRequest<'a> {
    #[serde(rename = "base64ImageData")]
    pub base64_image_data: String,
    #[serde(rename = "mimeType")]
    pub mime_type: &'a str,
    #[serde(rename = "provinceNames")]
    pub province_names: &'a [String],
}

/// Raw reader reply. Fields of an unexpected JSON type are kept as their JSON
/// text so they fail validation one by one instead of the whole reply.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TicketReaderResponse {
    #[serde(rename = "lotteryNumber", default, deserialize_with = "lenient_text")]
    pub lottery_number: Option<String>,
    #[serde(rename = "provinceName", default, deserialize_with = "lenient_text")]
    pub province_name: Option<String>,
    /// `YYYY-MM-DD` as claimed by the reader.
    #[serde(rename = "drawDate", default, deserialize_with = "lenient_text")]
    pub draw_date: Option<String>,
    /// Only a string counts as a reported error.
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(rename = "rawText", default, deserialize_with = "lenient_text")]
    pub raw_text: Option<String>,
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    })
}

/// Best-effort guess from the ticket reader. Every field is unvalidated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketReading {
    pub lottery_number: Option<String>,
    pub province_name: Option<String>,
    pub draw_date: Option<String>,
    pub raw_text: Option<String>,
}
