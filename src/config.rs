use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://xoso188.net/api/front/open/lottery/history/list/5/";
pub const DEFAULT_TICKET_READER_URL: &str = "https://ocr-backend-jdbq.onrender.com/api/ocr";

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Province code is appended directly to this URL.
    pub api_base_url: String,
    pub ticket_reader_url: String,
    /// Optional deadline applied to each outbound HTTP request.
    pub fetch_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            ticket_reader_url: DEFAULT_TICKET_READER_URL.to_string(),
            fetch_timeout_secs: None,
        }
    }
}

impl Config {
    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_secs.map(Duration::from_secs)
    }
}

pub fn load() -> Result<Config> {
    from_lookup(|key| env::var(key).ok())
}

fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Config> {
    let defaults = Config::default();

    let api_base_url = var("XOSO_API_BASE_URL").unwrap_or(defaults.api_base_url);
    let ticket_reader_url = var("XOSO_TICKET_READER_URL").unwrap_or(defaults.ticket_reader_url);
    let fetch_timeout_secs = var("XOSO_FETCH_TIMEOUT_SECS")
        .map(|raw| {
            raw.trim()
                .parse::<u64>()
                .with_context(|| format!("XOSO_FETCH_TIMEOUT_SECS must be whole seconds, got {:?}", raw))
        })
        .transpose()?;

    Ok(Config {
        api_base_url,
        ticket_reader_url,
        fetch_timeout_secs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load_from(&[]).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.fetch_timeout(), None);
    }

    #[test]
    fn test_overrides() {
        let config = load_from(&[
            ("XOSO_API_BASE_URL", "http://localhost:9000/history/"),
            ("XOSO_FETCH_TIMEOUT_SECS", "15"),
        ])
        .unwrap();
        assert_eq!(config.api_base_url, "http://localhost:9000/history/");
        assert_eq!(config.fetch_timeout(), Some(Duration::from_secs(15)));
        assert_eq!(config.ticket_reader_url, DEFAULT_TICKET_READER_URL);
    }

    #[test]
    fn test_bad_timeout() {
        assert!(load_from(&[("XOSO_FETCH_TIMEOUT_SECS", "soon")]).is_err());
    }
}
