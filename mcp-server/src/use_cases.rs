use anyhow::Result;
use chrono::Local;
use serde_json::{Value, json};
use std::collections::HashMap;

use xoso_lookup::api::DrawSource;
use xoso_lookup::lookup::{Lookup, LookupRequest, LookupSession, SessionUpdate};
use xoso_lookup::provinces::{self, PROVINCES, Province};
use xoso_lookup::reports::generate_html_report;
use xoso_lookup::suggestion::{TicketForm, validate_reading};
use xoso_lookup::ticket_reader::{TicketImage, TicketReader};
use xoso_lookup::utils::{format_iso_date, parse_iso_date, weekday_label_vi};

fn required_str<'a>(arguments: &'a HashMap<String, Value>, key: &str) -> Result<&'a str> {
    arguments
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow::anyhow!("Missing {} parameter", key))
}

fn optional_str<'a>(arguments: &'a HashMap<String, Value>, key: &str) -> Option<&'a str> {
    arguments
        .get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn province_json(province: &Province) -> Value {
    json!({
        "name": province.name,
        "code": province.code,
        "days": province.days.iter().map(|d| weekday_label_vi(*d)).collect::<Vec<_>>(),
    })
}

pub struct LotteryUseCase<S> {
    lookup: Lookup<S>,
    session: LookupSession,
}

impl<S: DrawSource> LotteryUseCase<S> {
    pub fn new(source: S) -> Self {
        Self {
            lookup: Lookup::new(source),
            session: LookupSession::new(),
        }
    }

    pub async fn list_provinces(&self, arguments: &HashMap<String, Value>) -> Result<String> {
        let provinces: Vec<&Province> = match optional_str(arguments, "date") {
            Some(raw) => {
                let date = parse_iso_date(raw)
                    .ok_or_else(|| anyhow::anyhow!("date must be YYYY-MM-DD, got {}", raw))?;
                provinces::provinces_drawing_on(date)
            }
            None => PROVINCES.iter().collect(),
        };

        Ok(json!({
            "success": true,
            "provinces": provinces.into_iter().map(province_json).collect::<Vec<_>>()
        })
        .to_string())
    }

    pub async fn check_ticket(&self, arguments: &HashMap<String, Value>) -> Result<String> {
        let request = LookupRequest::new(
            required_str(arguments, "province_code")?,
            required_str(arguments, "date")?,
            required_str(arguments, "number")?,
        );

        let response = match self.session.run(&self.lookup, &request).await {
            SessionUpdate::Applied(Ok(outcome)) => json!({
                "success": true,
                "status": outcome.status_label(),
                "province": outcome.province_name,
                "date": outcome.turn_num,
                "ticket_number": outcome.ticket_number,
                "winning_result": outcome.winning_result(),
                "prizes": outcome.prizes,
                "report_html": generate_html_report(&outcome),
            }),
            SessionUpdate::Applied(Err(e)) => json!({
                "success": false,
                "status": e.status_label(),
                "stage": format!("{:?}", e.stage()),
                "message": e.to_string(),
            }),
            SessionUpdate::Stale => json!({
                "success": false,
                "status": "stale",
                "message": "a newer lookup replaced this one",
            }),
        };

        Ok(response.to_string())
    }
}

pub struct TicketUseCase<R> {
    reader: R,
}

impl<R: TicketReader> TicketUseCase<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    pub async fn read_ticket_image(&self, arguments: &HashMap<String, Value>) -> Result<String> {
        let image_data = required_str(arguments, "image_base64")?;
        let mime_type = optional_str(arguments, "mime_type").unwrap_or("image/jpeg");
        let image = TicketImage::from_base64(image_data, mime_type)?;

        let mut form = TicketForm {
            province_code: optional_str(arguments, "province_code")
                .and_then(provinces::find_by_code)
                .map(|p| p.code.to_string()),
            draw_date: optional_str(arguments, "date").and_then(parse_iso_date),
            ticket_number: optional_str(arguments, "number").map(str::to_string),
        };

        let reading = match self.reader.read_ticket(&image, &provinces::province_names()).await {
            Ok(reading) => reading,
            Err(e) => {
                return Ok(json!({
                    "success": false,
                    "message": e.to_string(),
                })
                .to_string());
            }
        };

        let today = Local::now().date_naive();
        let suggestion = validate_reading(&reading, today);
        if suggestion.is_empty() {
            return Ok(json!({
                "success": false,
                "message": "Nothing could be recognised on the ticket. Please try a clearer photo.",
            })
            .to_string());
        }

        form.merge(&suggestion);

        Ok(json!({
            "success": true,
            "applied": suggestion.has_accepted_fields(),
            "notes": suggestion.notes,
            "suggestion": {
                "number": suggestion.ticket_number,
                "province_code": suggestion.province.map(|p| p.code),
                "date": suggestion.draw_date.map(format_iso_date),
            },
            "form": form_json(&form),
            "ready_to_check": form.to_request().is_ok(),
        })
        .to_string())
    }
}

fn form_json(form: &TicketForm) -> Value {
    json!({
        "province_code": form.province_code,
        "date": form.draw_date.map(format_iso_date),
        "number": form.ticket_number,
    })
}
