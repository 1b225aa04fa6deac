//! Drives one ticket check from raw user input to a verdict.
//!
//! ```text
//! Idle -> Validating -> Fetching -> Normalizing -> LocatingDraw -> Parsing -> Matching -> Done | Failed
//! ```

use chrono::NaiveDate;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, error, info};

use crate::api::DrawSource;
use crate::error::LookupError;
use crate::matcher::match_ticket;
use crate::normalizer::normalize_body;
use crate::parser::parse_detail;
use crate::provinces::{self, Province};
use crate::types::{ParsedPrizeDetail, WinningResult};
use crate::utils::{format_turn_num, is_ticket_number, parse_iso_date};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStage {
    Idle,
    Validating,
    Fetching,
    Normalizing,
    LocatingDraw,
    Parsing,
    Matching,
    Done,
    Failed,
}

/// Raw user selection, exactly as typed or picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub province_code: String,
    /// `YYYY-MM-DD`
    pub draw_date: String,
    pub ticket_number: String,
}

impl LookupRequest {
    pub fn new(
        province_code: impl Into<String>,
        draw_date: impl Into<String>,
        ticket_number: impl Into<String>,
    ) -> Self {
        Self {
            province_code: province_code.into(),
            draw_date: draw_date.into(),
            ticket_number: ticket_number.into(),
        }
    }

    pub fn validate(&self) -> Result<ValidatedRequest, LookupError> {
        let province_code = self.province_code.trim();
        let draw_date = self.draw_date.trim();
        let ticket_number = self.ticket_number.as_str();

        if province_code.is_empty() || draw_date.is_empty() || ticket_number.is_empty() {
            return Err(LookupError::InvalidInput(
                "please choose a province and a date and enter a ticket number".to_string(),
            ));
        }

        let province = provinces::find_by_code(province_code).ok_or_else(|| {
            LookupError::InvalidInput(format!("unknown province code: {}", province_code))
        })?;

        let draw_date = parse_iso_date(draw_date).ok_or_else(|| {
            LookupError::InvalidInput(format!("draw date must be a YYYY-MM-DD date, got {}", draw_date))
        })?;

        if !is_ticket_number(ticket_number) {
            return Err(LookupError::InvalidInput(
                "ticket number must be 2 to 6 digits".to_string(),
            ));
        }

        Ok(ValidatedRequest {
            province,
            draw_date,
            ticket_number: ticket_number.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub province: &'static Province,
    pub draw_date: NaiveDate,
    pub ticket_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Verdict {
    Won(WinningResult),
    NotWon,
}

/// A completed lookup. The prize table is always present so callers can show
/// the draw whatever the verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupOutcome {
    pub province_name: String,
    pub province_code: String,
    /// `DD/MM/YYYY`
    pub turn_num: String,
    pub ticket_number: String,
    pub prizes: Vec<ParsedPrizeDetail>,
    pub verdict: Verdict,
}

impl LookupOutcome {
    pub fn winning_result(&self) -> Option<&WinningResult> {
        match &self.verdict {
            Verdict::Won(result) => Some(result),
            Verdict::NotWon => None,
        }
    }

    pub fn status_label(&self) -> &'static str {
        match self.verdict {
            Verdict::Won(_) => "won",
            Verdict::NotWon => "not_won",
        }
    }
}

pub struct Lookup<S> {
    source: S,
}

impl<S: DrawSource> Lookup<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn run(&self, request: &LookupRequest) -> Result<LookupOutcome, LookupError> {
        debug!(stage = ?LookupStage::Validating, "validating {:?}", request);
        let validated = request.validate()?;
        let result = self.run_validated(&validated).await;

        match &result {
            Ok(outcome) => info!(
                "lookup {} {} finished: {}",
                outcome.province_code,
                outcome.turn_num,
                outcome.status_label()
            ),
            Err(e @ LookupError::NoDrawFound { .. }) => info!("{}", e),
            Err(e) => error!(stage = ?e.stage(), "lookup failed: {}", e),
        }
        result
    }

    async fn run_validated(&self, request: &ValidatedRequest) -> Result<LookupOutcome, LookupError> {
        let province = request.province;
        let turn_num = format_turn_num(request.draw_date);
        let url = self.source.history_url(province.code);
        let upstream_failure = |source| LookupError::Upstream {
            source,
            province: province.name.to_string(),
            date: turn_num.clone(),
            url: url.clone(),
        };

        debug!(stage = ?LookupStage::Fetching, "fetching {}", url);
        let body = self
            .source
            .fetch_history(province.code)
            .await
            .map_err(upstream_failure)?;

        debug!(stage = ?LookupStage::Normalizing, "normalizing {} bytes", body.len());
        let payload = normalize_body(&body, province.code).map_err(upstream_failure)?;

        debug!(
            stage = ?LookupStage::LocatingDraw,
            "searching {} draws for {}",
            payload.issue_list().len(),
            turn_num
        );
        let draw = payload
            .find_draw(&turn_num)
            .ok_or_else(|| LookupError::NoDrawFound {
                province: province.name.to_string(),
                date: turn_num.clone(),
            })?;

        debug!(stage = ?LookupStage::Parsing, "parsing draw {}", draw.turn_num);
        let prizes = parse_detail(draw.detail.as_deref().unwrap_or_default()).map_err(|source| {
            LookupError::DataFormat {
                province: province.name.to_string(),
                date: turn_num.clone(),
                source,
            }
        })?;

        debug!(stage = ?LookupStage::Matching, "matching ticket {}", request.ticket_number);
        let verdict = match match_ticket(&request.ticket_number, &prizes) {
            Some(result) => Verdict::Won(result),
            None => Verdict::NotWon,
        };

        Ok(LookupOutcome {
            province_name: province.name.to_string(),
            province_code: province.code.to_string(),
            turn_num,
            ticket_number: request.ticket_number.clone(),
            prizes,
            verdict,
        })
    }
}

/// Identifies one lookup started through a [`LookupSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupTicket(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum SessionUpdate {
    Applied(Result<LookupOutcome, LookupError>),
    /// A newer lookup started (or the session was reset) before this one finished.
    Stale,
}

#[derive(Debug, Default)]
struct SessionState {
    stage: Option<LookupStage>,
    current: Option<Result<LookupOutcome, LookupError>>,
}

/// Holds the result of the most recent lookup. Results of lookups superseded
/// while in flight are discarded.
#[derive(Debug, Default)]
pub struct LookupSession {
    latest: AtomicU64,
    state: Mutex<SessionState>,
}

impl LookupSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a lookup, superseding any in flight, and clears the previous result.
    pub fn begin(&self) -> LookupTicket {
        let ticket = LookupTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1);
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.stage = Some(LookupStage::Validating);
        state.current = None;
        ticket
    }

    pub fn commit(
        &self,
        ticket: LookupTicket,
        result: Result<LookupOutcome, LookupError>,
    ) -> SessionUpdate {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if self.latest.load(Ordering::SeqCst) != ticket.0 {
            debug!("discarding stale lookup #{}", ticket.0);
            return SessionUpdate::Stale;
        }

        state.stage = Some(match result {
            Ok(_) => LookupStage::Done,
            Err(_) => LookupStage::Failed,
        });
        state.current = Some(result.clone());
        SessionUpdate::Applied(result)
    }

    pub async fn run<S: DrawSource>(&self, lookup: &Lookup<S>, request: &LookupRequest) -> SessionUpdate {
        let ticket = self.begin();
        let result = lookup.run(request).await;
        self.commit(ticket, result)
    }

    /// Forgets the current result and invalidates anything in flight.
    pub fn reset(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        *state = SessionState::default();
    }

    pub fn current(&self) -> Option<Result<LookupOutcome, LookupError>> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .current
            .clone()
    }

    pub fn stage(&self) -> LookupStage {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .stage
            .unwrap_or(LookupStage::Idle)
    }
}
