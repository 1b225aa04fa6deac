use crate::error::DetailParseError;
use crate::provinces::PRIZE_CATEGORIES;
use crate::types::ParsedPrizeDetail;

/// Canonical encoding of a draw with no published numbers.
pub const EMPTY_DETAIL: &str = "[]";

/// Decodes a draw's `detail` blob into one entry per prize tier, in rank order.
///
/// Slot *i* of the JSON array holds the comma-joined numbers of the tier whose
/// `payload_index` is *i*. Missing or null slots give an empty list.
pub fn parse_detail(raw_detail: &str) -> Result<Vec<ParsedPrizeDetail>, DetailParseError> {
    let slots: Vec<Option<String>> = if raw_detail.trim() == EMPTY_DETAIL {
        Vec::new()
    } else {
        serde_json::from_str(raw_detail).map_err(|e| DetailParseError::Decode(e.to_string()))?
    };

    Ok(PRIZE_CATEGORIES
        .iter()
        .map(|category| ParsedPrizeDetail {
            prize_name: category.name.to_string(),
            numbers: slots
                .get(category.payload_index)
                .and_then(|slot| slot.as_deref())
                .map(split_numbers)
                .unwrap_or_default(),
        })
        .collect())
}

fn split_numbers(joined: &str) -> Vec<String> {
    joined
        .split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_encoding_gives_nine_empty_tiers() {
        let prizes = parse_detail(EMPTY_DETAIL).unwrap();
        assert_eq!(prizes.len(), 9);
        assert!(prizes.iter().all(|p| p.numbers.is_empty()));
        assert_eq!(prizes[0].prize_name, "Special Prize");
        assert_eq!(prizes[8].prize_name, "Eighth Prize");
    }

    #[test]
    fn test_full_detail() {
        let raw = r#"["123456","12345","54321","11111, 22222","33333,44444,55555,66666,77777,88888,99999","1234","1111,2222,3333","123","45"]"#;
        let prizes = parse_detail(raw).unwrap();
        assert_eq!(prizes[0].numbers, vec!["123456"]);
        assert_eq!(prizes[3].numbers, vec!["11111", "22222"]);
        assert_eq!(prizes[4].numbers.len(), 7);
        assert_eq!(prizes[8].numbers, vec!["45"]);
    }

    #[test]
    fn test_short_and_null_slots_are_empty() {
        let prizes = parse_detail(r#"["123456", null, " , ,"]"#).unwrap();
        assert_eq!(prizes.len(), 9);
        assert_eq!(prizes[0].numbers, vec!["123456"]);
        assert!(prizes[1].numbers.is_empty());
        assert!(prizes[2].numbers.is_empty());
        assert!(prizes[8].numbers.is_empty());
    }

    #[test]
    fn test_undecodable_detail_is_an_error() {
        assert!(parse_detail("").is_err());
        assert!(parse_detail("not json").is_err());
        assert!(parse_detail(r#"{"0": "123456"}"#).is_err());
        assert!(parse_detail("[123456]").is_err());
    }
}
