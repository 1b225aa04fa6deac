use serde::Serialize;

/// A winning number split into the part that trails-matches the user's input
/// and the part that does not. Display only; it says nothing about winning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Highlight<'a> {
    pub unmatched_prefix: &'a str,
    pub matched_suffix: &'a str,
}

impl Highlight<'_> {
    pub fn trailing_matches(&self) -> usize {
        self.matched_suffix.chars().count()
    }
}

/// Counts equal characters from the right of both strings, stopping at the
/// first mismatch.
pub fn highlight_suffix<'a>(winning_number: &'a str, user_number: &str) -> Highlight<'a> {
    let matched_len: usize = winning_number
        .chars()
        .rev()
        .zip(user_number.chars().rev())
        .take_while(|(w, u)| w == u)
        .map(|(w, _)| w.len_utf8())
        .sum();

    let (unmatched_prefix, matched_suffix) =
        winning_number.split_at(winning_number.len() - matched_len);

    Highlight {
        unmatched_prefix,
        matched_suffix,
    }
}
