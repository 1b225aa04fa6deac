//! Static lottery configuration: southern provinces and the prize ladder.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::utils::fold_diacritics;

/// One tier of the 9-tier prize structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrizeCategory {
    pub name: &'static str,
    pub local_name: &'static str,
    /// Trailing digits a ticket must share with a winning number.
    pub required_digits: usize,
    /// Position of this tier inside a draw's `detail` array.
    pub payload_index: usize,
    pub value: &'static str,
}

// Prize values are placeholders and have not been checked against an official source.
pub const PRIZE_CATEGORIES: [PrizeCategory; 9] = [
    PrizeCategory {
        name: "Special Prize",
        local_name: "Giải Đặc Biệt",
        required_digits: 6,
        payload_index: 0,
        value: "2.000.000.000 VNĐ",
    },
    PrizeCategory {
        name: "First Prize",
        local_name: "Giải Nhất",
        required_digits: 5,
        payload_index: 1,
        value: "30.000.000 VNĐ",
    },
    PrizeCategory {
        name: "Second Prize",
        local_name: "Giải Nhì",
        required_digits: 5,
        payload_index: 2,
        value: "15.000.000 VNĐ",
    },
    PrizeCategory {
        name: "Third Prize",
        local_name: "Giải Ba",
        required_digits: 5,
        payload_index: 3,
        value: "10.000.000 VNĐ",
    },
    PrizeCategory {
        name: "Fourth Prize",
        local_name: "Giải Tư",
        required_digits: 5,
        payload_index: 4,
        value: "3.000.000 VNĐ",
    },
    PrizeCategory {
        name: "Fifth Prize",
        local_name: "Giải Năm",
        required_digits: 4,
        payload_index: 5,
        value: "1.000.000 VNĐ",
    },
    PrizeCategory {
        name: "Sixth Prize",
        local_name: "Giải Sáu",
        required_digits: 4,
        payload_index: 6,
        value: "400.000 VNĐ",
    },
    PrizeCategory {
        name: "Seventh Prize",
        local_name: "Giải Bảy",
        required_digits: 3,
        payload_index: 7,
        value: "200.000 VNĐ",
    },
    PrizeCategory {
        name: "Eighth Prize",
        local_name: "Giải Tám",
        required_digits: 2,
        payload_index: 8,
        value: "100.000 VNĐ",
    },
];

pub fn find_category(name: &str) -> Option<&'static PrizeCategory> {
    PRIZE_CATEGORIES.iter().find(|c| c.name == name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Province {
    pub name: &'static str,
    /// Key used in the provider's history URL.
    pub code: &'static str,
    pub days: &'static [Weekday],
}

impl Province {
    pub fn draws_on(&self, weekday: Weekday) -> bool {
        self.days.contains(&weekday)
    }
}

const fn province(name: &'static str, code: &'static str, days: &'static [Weekday]) -> Province {
    Province { name, code, days }
}

pub const PROVINCES: [Province; 21] = [
    province("TP. HCM", "tphc", &[Weekday::Mon, Weekday::Sat]),
    province("Đồng Tháp", "doth", &[Weekday::Mon]),
    province("Cà Mau", "cama", &[Weekday::Mon]),
    province("Bến Tre", "betr", &[Weekday::Tue]),
    province("Vũng Tàu", "vuta", &[Weekday::Tue]),
    province("Bạc Liêu", "bali", &[Weekday::Tue]),
    province("Đồng Nai", "dona", &[Weekday::Wed]),
    province("Cần Thơ", "cath", &[Weekday::Wed]),
    province("Sóc Trăng", "sotr", &[Weekday::Wed]),
    province("Tây Ninh", "tani", &[Weekday::Thu]),
    province("An Giang", "angi", &[Weekday::Thu]),
    province("Bình Thuận", "bith", &[Weekday::Thu]),
    province("Vĩnh Long", "vilo", &[Weekday::Fri]),
    province("Bình Dương", "bidu", &[Weekday::Fri]),
    province("Trà Vinh", "trav", &[Weekday::Fri]),
    province("Long An", "loan", &[Weekday::Sat]),
    province("Bình Phước", "biph", &[Weekday::Sat]),
    province("Hậu Giang", "hagi", &[Weekday::Sat]),
    province("Tiền Giang", "tigi", &[Weekday::Sun]),
    province("Kiên Giang", "kigi", &[Weekday::Sun]),
    province("Đà Lạt (Lâm Đồng)", "dala", &[Weekday::Sun]),
];

pub fn find_by_code(code: &str) -> Option<&'static Province> {
    PROVINCES.iter().find(|p| p.code == code)
}

/// Exact name match first, then a case- and diacritic-insensitive one.
pub fn find_by_name(name: &str) -> Option<&'static Province> {
    let name = name.trim();
    if let Some(found) = PROVINCES.iter().find(|p| p.name == name) {
        return Some(found);
    }

    let folded = fold_diacritics(name);
    PROVINCES.iter().find(|p| fold_diacritics(p.name) == folded)
}

pub fn provinces_drawing_on(date: NaiveDate) -> Vec<&'static Province> {
    let weekday = date.weekday();
    PROVINCES.iter().filter(|p| p.draws_on(weekday)).collect()
}

pub fn province_names() -> Vec<String> {
    PROVINCES.iter().map(|p| p.name.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_are_rank_ordered() {
        let indexes: Vec<usize> = PRIZE_CATEGORIES.iter().map(|c| c.payload_index).collect();
        assert_eq!(indexes, (0..9).collect::<Vec<_>>());
        assert_eq!(PRIZE_CATEGORIES[0].name, "Special Prize");
        assert_eq!(PRIZE_CATEGORIES[8].name, "Eighth Prize");
        for category in PRIZE_CATEGORIES.iter() {
            assert!((2..=6).contains(&category.required_digits));
        }
    }

    #[test]
    fn test_find_by_code() {
        assert_eq!(find_by_code("cama").map(|p| p.name), Some("Cà Mau"));
        assert!(find_by_code("hanoi").is_none());
    }

    #[test]
    fn test_find_by_name_ignores_diacritics_and_case() {
        assert_eq!(find_by_name("Cà Mau").map(|p| p.code), Some("cama"));
        assert_eq!(find_by_name("ca mau").map(|p| p.code), Some("cama"));
        assert_eq!(find_by_name("DONG THAP").map(|p| p.code), Some("doth"));
        assert_eq!(find_by_name("Da Lat (Lam Dong)").map(|p| p.code), Some("dala"));
        assert!(find_by_name("Hà Nội").is_none());
    }

    #[test]
    fn test_provinces_drawing_on_monday() {
        // 2024-07-15 is a Monday
        let date = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
        let codes: Vec<&str> = provinces_drawing_on(date).iter().map(|p| p.code).collect();
        assert_eq!(codes, vec!["tphc", "doth", "cama"]);
    }
}
