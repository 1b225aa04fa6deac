use chrono::{NaiveDate, Weekday};
use regex::Regex;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

pub const MIN_TICKET_DIGITS: usize = 2;

fn ticket_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{2,6}$").expect("ticket regex must compile"))
}

fn iso_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date regex must compile"))
}

/// A checkable ticket number is 2 to 6 ASCII digits.
pub fn is_ticket_number(value: &str) -> bool {
    ticket_re().is_match(value)
}

/// Parses a strict `YYYY-MM-DD` calendar date.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if !iso_date_re().is_match(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Date key used by the provider's `turnNum` field.
pub fn format_turn_num(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

pub fn format_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Lowercases, strips combining marks and maps `đ` to `d`.
pub fn fold_diacritics(value: &str) -> String {
    value
        .to_lowercase()
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .map(|c| if c == 'đ' { 'd' } else { c })
        .collect()
}

pub fn weekday_label_vi(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "Chủ Nhật",
        Weekday::Mon => "Thứ Hai",
        Weekday::Tue => "Thứ Ba",
        Weekday::Wed => "Thứ Tư",
        Weekday::Thu => "Thứ Năm",
        Weekday::Fri => "Thứ Sáu",
        Weekday::Sat => "Thứ Bảy",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_ticket_number() {
        assert!(is_ticket_number("45"));
        assert!(is_ticket_number("123456"));
        assert!(!is_ticket_number("4"));
        assert!(!is_ticket_number("1234567"));
        assert!(!is_ticket_number("12a4"));
        assert!(!is_ticket_number(" 45"));
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(
            parse_iso_date("2024-07-15"),
            NaiveDate::from_ymd_opt(2024, 7, 15)
        );
        assert!(parse_iso_date("2024-7-15").is_none());
        assert!(parse_iso_date("2024-02-30").is_none());
        assert!(parse_iso_date("15/07/2024").is_none());
    }

    #[test]
    fn test_format_turn_num_pads() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        assert_eq!(format_turn_num(date), "04/03/2024");
    }

    #[test]
    fn test_fold_diacritics() {
        assert_eq!(fold_diacritics("Đồng Tháp"), "dong thap");
        assert_eq!(fold_diacritics("Bạc Liêu"), "bac lieu");
        assert_eq!(fold_diacritics("TP. HCM"), "tp. hcm");
    }
}
