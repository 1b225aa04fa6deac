//! Re-validation of ticket-reader guesses and merging them into the form.

use chrono::{Datelike, NaiveDate};

use crate::error::LookupError;
use crate::lookup::LookupRequest;
use crate::provinces::{self, Province};
use crate::types::TicketReading;
use crate::utils::{format_iso_date, is_ticket_number, parse_iso_date};

/// Accepted draw dates lie within this many years of the current year.
pub const DATE_WINDOW_YEARS: i32 = 5;

/// The part of a [`TicketReading`] that passed the same checks as manual entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Suggestion {
    pub ticket_number: Option<String>,
    pub province: Option<&'static Province>,
    pub draw_date: Option<NaiveDate>,
    /// One line per field the reader returned, accepted or not.
    pub notes: Vec<String>,
}

impl Suggestion {
    /// True when the reader recognised nothing at all, valid or not.
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn has_accepted_fields(&self) -> bool {
        self.ticket_number.is_some() || self.province.is_some() || self.draw_date.is_some()
    }
}

pub fn validate_reading(reading: &TicketReading, today: NaiveDate) -> Suggestion {
    let mut suggestion = Suggestion::default();

    if let Some(number) = non_blank(&reading.lottery_number) {
        if is_ticket_number(number) {
            suggestion.ticket_number = Some(number.to_string());
            suggestion.notes.push(format!("ticket number: {}", number));
        } else {
            suggestion
                .notes
                .push(format!("ticket number needs checking: {}", number));
        }
    }

    if let Some(name) = non_blank(&reading.province_name) {
        match provinces::find_by_name(name) {
            Some(province) => {
                suggestion.province = Some(province);
                suggestion.notes.push(format!("province: {}", province.name));
            }
            None => suggestion
                .notes
                .push(format!("province needs checking: {}", name)),
        }
    }

    if let Some(raw_date) = non_blank(&reading.draw_date) {
        match parse_iso_date(raw_date) {
            Some(date) if within_window(date, today) => {
                suggestion.draw_date = Some(date);
                suggestion.notes.push(format!("draw date: {}", format_iso_date(date)));
            }
            Some(_) => suggestion
                .notes
                .push(format!("draw date out of range: {}", raw_date)),
            None => suggestion
                .notes
                .push(format!("draw date needs format checking: {}", raw_date)),
        }
    }

    suggestion
}

fn within_window(date: NaiveDate, today: NaiveDate) -> bool {
    (date.year() - today.year()).abs() <= DATE_WINDOW_YEARS
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// The user's current selection. Suggestions only ever fill in or replace
/// fields they validated; everything else is left as it was.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketForm {
    pub province_code: Option<String>,
    pub draw_date: Option<NaiveDate>,
    pub ticket_number: Option<String>,
}

impl TicketForm {
    pub fn merge(&mut self, suggestion: &Suggestion) {
        if let Some(number) = &suggestion.ticket_number {
            self.ticket_number = Some(number.clone());
        }
        if let Some(province) = suggestion.province {
            self.province_code = Some(province.code.to_string());
        }
        if let Some(date) = suggestion.draw_date {
            self.draw_date = Some(date);
        }
    }

    pub fn to_request(&self) -> Result<LookupRequest, LookupError> {
        match (&self.province_code, self.draw_date, &self.ticket_number) {
            (Some(province), Some(date), Some(number)) => Ok(LookupRequest::new(
                province.clone(),
                format_iso_date(date),
                number.clone(),
            )),
            _ => Err(LookupError::InvalidInput(
                "please choose a province and a date and enter a ticket number".to_string(),
            )),
        }
    }
}
