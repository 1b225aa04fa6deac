use crate::provinces::PRIZE_CATEGORIES;
use crate::types::{ParsedPrizeDetail, WinningResult};
use crate::utils::MIN_TICKET_DIGITS;

/// Checks a ticket against a draw using suffix matching.
///
/// Tiers are visited in rank order and the first matching winning number wins,
/// so a ticket can only ever win once, at its highest tier.
pub fn match_ticket(user_number: &str, prizes: &[ParsedPrizeDetail]) -> Option<WinningResult> {
    if user_number.len() < MIN_TICKET_DIGITS {
        return None;
    }

    for category in PRIZE_CATEGORIES.iter() {
        let digits = category.required_digits;
        if digits > user_number.len() {
            continue;
        }

        let Some(detail) = prizes.iter().find(|p| p.prize_name == category.name) else {
            continue;
        };
        let Some(user_suffix) = suffix(user_number, digits) else {
            continue;
        };

        // first listed number wins if the provider ever lists duplicates
        let matched = detail
            .numbers
            .iter()
            .find(|winning| suffix(winning, digits) == Some(user_suffix));

        if let Some(winning) = matched {
            return Some(WinningResult {
                prize_name: category.name.to_string(),
                matched_number: winning.clone(),
                user_number: user_number.to_string(),
                prize_value: category.value.to_string(),
            });
        }
    }

    None
}

/// Last `digits` bytes of `number`, or `None` if it is too short.
fn suffix(number: &str, digits: usize) -> Option<&str> {
    number
        .len()
        .checked_sub(digits)
        .and_then(|start| number.get(start..))
}
