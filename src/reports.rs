use crate::highlight::highlight_suffix;
use crate::lookup::{LookupOutcome, Verdict};
use crate::provinces::find_category;
use crate::types::ParsedPrizeDetail;

pub fn get_category_display_name(prize_name: &str) -> String {
    match find_category(prize_name) {
        Some(category) => format!("{} ({})", category.local_name, category.name),
        None => prize_name.to_string(),
    }
}

/// `12[345]` style marking of the trailing digits shared with `user_number`.
pub fn format_highlighted(number: &str, user_number: &str) -> String {
    let highlight = highlight_suffix(number, user_number);
    if highlight.matched_suffix.is_empty() {
        number.to_string()
    } else {
        format!("{}[{}]", highlight.unmatched_prefix, highlight.matched_suffix)
    }
}

pub fn render_text_table(prizes: &[ParsedPrizeDetail], user_number: &str) -> String {
    let labels: Vec<String> = prizes
        .iter()
        .map(|p| get_category_display_name(&p.prize_name))
        .collect();
    let width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    let mut table = String::new();
    for (label, prize) in labels.iter().zip(prizes) {
        let numbers = if prize.numbers.is_empty() {
            "-".to_string()
        } else {
            prize
                .numbers
                .iter()
                .map(|n| format_highlighted(n, user_number))
                .collect::<Vec<_>>()
                .join(", ")
        };
        let padding = width - label.chars().count();
        table.push_str(&format!("{}{}  {}\n", label, " ".repeat(padding), numbers));
    }
    table
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Self-contained HTML fragment with the verdict and the full prize table.
pub fn generate_html_report(outcome: &LookupOutcome) -> String {
    let mut html = String::new();

    html.push_str(&format!(
        r#"<section class="xoso-result">
  <h2>{} - {}</h2>
"#,
        escape_html(&outcome.province_name),
        escape_html(&outcome.turn_num)
    ));

    match &outcome.verdict {
        Verdict::Won(result) => html.push_str(&format!(
            r#"  <p class="verdict won">Ticket {} won the {} ({}) with {}.</p>
"#,
            escape_html(&result.user_number),
            escape_html(&get_category_display_name(&result.prize_name)),
            escape_html(&result.prize_value),
            escape_html(&result.matched_number)
        )),
        Verdict::NotWon => html.push_str(&format!(
            r#"  <p class="verdict not-won">Ticket {} did not win.</p>
"#,
            escape_html(&outcome.ticket_number)
        )),
    }

    html.push_str("  <table>\n    <thead><tr><th>Prize</th><th>Numbers</th></tr></thead>\n    <tbody>\n");
    for prize in &outcome.prizes {
        let cells: Vec<String> = prize
            .numbers
            .iter()
            .map(|number| {
                let highlight = highlight_suffix(number, &outcome.ticket_number);
                if highlight.matched_suffix.is_empty() {
                    escape_html(number)
                } else {
                    format!(
                        r#"{}<span class="match">{}</span>"#,
                        escape_html(highlight.unmatched_prefix),
                        escape_html(highlight.matched_suffix)
                    )
                }
            })
            .collect();

        html.push_str(&format!(
            "      <tr><td>{}</td><td>{}</td></tr>\n",
            escape_html(&get_category_display_name(&prize.prize_name)),
            if cells.is_empty() { "-".to_string() } else { cells.join(" ") }
        ));
    }
    html.push_str("    </tbody>\n  </table>\n</section>\n");

    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_detail;
    use crate::types::WinningResult;

    fn outcome(verdict: Verdict) -> LookupOutcome {
        LookupOutcome {
            province_name: "TP. HCM".to_string(),
            province_code: "tphc".to_string(),
            turn_num: "15/07/2024".to_string(),
            ticket_number: "45".to_string(),
            prizes: parse_detail(r#"["123456","","","","","","","","12,45"]"#).unwrap(),
            verdict,
        }
    }

    #[test]
    fn test_display_name() {
        assert_eq!(get_category_display_name("Eighth Prize"), "Giải Tám (Eighth Prize)");
        assert_eq!(get_category_display_name("Bonus"), "Bonus");
    }

    #[test]
    fn test_format_highlighted() {
        assert_eq!(format_highlighted("123456", "456"), "123[456]");
        assert_eq!(format_highlighted("123456", "999"), "123456");
    }

    #[test]
    fn test_text_table_lists_every_tier() {
        let prizes = outcome(Verdict::NotWon).prizes;
        let table = render_text_table(&prizes, "45");
        assert_eq!(table.lines().count(), 9);
        assert!(table.lines().last().unwrap().ends_with("12, [45]"));
        assert!(table.lines().nth(1).unwrap().ends_with("-"));
    }

    #[test]
    fn test_html_report_won() {
        let html = generate_html_report(&outcome(Verdict::Won(WinningResult {
            prize_name: "Eighth Prize".to_string(),
            matched_number: "45".to_string(),
            user_number: "45".to_string(),
            prize_value: "100.000 VNĐ".to_string(),
        })));
        assert!(html.contains("TP. HCM - 15/07/2024"));
        assert!(html.contains("verdict won"));
        assert!(html.contains(r#"<span class="match">45</span>"#));
        assert_eq!(html.matches("<tr><td>").count(), 9);
    }

    #[test]
    fn test_html_report_not_won() {
        let html = generate_html_report(&outcome(Verdict::NotWon));
        assert!(html.contains("did not win"));
    }
}
