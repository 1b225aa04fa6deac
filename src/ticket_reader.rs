//! Client for the image-recognition backend that reads a photographed ticket.
//!
//! The backend's answer is a guess. Nothing it returns is trusted until it has
//! been through [`crate::suggestion::validate_reading`].

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::TicketReaderError;
use crate::types::{TicketReaderRequest, TicketReaderResponse, TicketReading};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl TicketImage {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    pub fn from_base64(data: &str, mime_type: impl Into<String>) -> Result<Self, TicketReaderError> {
        let bytes = STANDARD
            .decode(data.trim())
            .map_err(|e| TicketReaderError::Decode(format!("image is not valid base64: {}", e)))?;
        Ok(Self::new(bytes, mime_type))
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

/// Guesses mime type from a file extension; JPEG when unknown.
pub fn mime_type_for_extension(extension: Option<&str>) -> &'static str {
    match extension.map(|e| e.to_ascii_lowercase()).as_deref() {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        Some("gif") => "image/gif",
        _ => "image/jpeg",
    }
}

pub trait TicketReader {
    fn read_ticket(
        &self,
        image: &TicketImage,
        province_names: &[String],
    ) -> impl Future<Output = Result<TicketReading, TicketReaderError>> + Send;
}

#[derive(Debug, Clone)]
pub struct TicketReaderClient {
    client: reqwest::Client,
    url: String,
}

impl TicketReaderClient {
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, TicketReaderError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TicketReaderError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, TicketReaderError> {
        Self::new(config.ticket_reader_url.clone(), config.fetch_timeout())
    }
}

impl TicketReader for TicketReaderClient {
    async fn read_ticket(
        &self,
        image: &TicketImage,
        province_names: &[String],
    ) -> Result<TicketReading, TicketReaderError> {
        let request_body = TicketReaderRequest {
            base64_image_data: image.to_base64(),
            mime_type: &image.mime_type,
            province_names,
        };
        debug!("POST {} ({} image bytes)", self.url, image.bytes.len());

        let response = self
            .client
            .post(&self.url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| TicketReaderError::Transport(e.to_string()))?;

        // the backend reports its own failures as JSON with an `error` field and a 4xx/5xx status
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TicketReaderError::Transport(e.to_string()))?;

        reading_from_body(&body).map_err(|e| match e {
            TicketReaderError::Decode(_) if !status.is_success() => {
                TicketReaderError::Transport(format!("HTTP {}", status.as_u16()))
            }
            other => other,
        })
    }
}

fn reading_from_body(body: &str) -> Result<TicketReading, TicketReaderError> {
    let response: TicketReaderResponse =
        serde_json::from_str(body).map_err(|e| TicketReaderError::Decode(e.to_string()))?;

    if let Some(error) = response
        .error
        .as_ref()
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|e| !e.is_empty())
    {
        warn!("ticket reader reported an error: {}", error);
        return Err(TicketReaderError::Rejected(error.to_string()));
    }

    Ok(TicketReading {
        lottery_number: response.lottery_number,
        province_name: response.province_name,
        draw_date: response.draw_date,
        raw_text: response.raw_text,
    })
}
