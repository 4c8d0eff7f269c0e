//! Brazilian-style number and date formatting for labels and KPI cards.

use chrono::NaiveDateTime;

/// Format a value as Brazilian reais: `R$ 1.234,56`.  NaN renders as zero.
pub fn format_brl(value: f64) -> String {
    let value = if value.is_nan() { 0.0 } else { value };
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("R$ {sign}{},{frac_part}", group_thousands(int_part))
}

/// Format a count with `.` as the thousands separator.
pub fn format_count(n: usize) -> String {
    group_thousands(&n.to_string())
}

/// Footer line: `Data updated at 05/03/2024 09:07`.
pub fn updated_at(at: NaiveDateTime) -> String {
    format!("Data updated at {}", at.format("%d/%m/%Y %H:%M"))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_reais() {
        assert_eq!(format_brl(0.0), "R$ 0,00");
        assert_eq!(format_brl(999.5), "R$ 999,50");
        assert_eq!(format_brl(1234.567), "R$ 1.234,57");
        assert_eq!(format_brl(1_000_000.0), "R$ 1.000.000,00");
        assert_eq!(format_brl(-1.0), "R$ -1,00");
        assert_eq!(format_brl(f64::NAN), "R$ 0,00");
    }

    #[test]
    fn formats_footer_timestamp() {
        let at = chrono::NaiveDate::from_ymd_opt(2024, 3, 5)
            .and_then(|d| d.and_hms_opt(9, 7, 42))
            .unwrap();
        assert_eq!(updated_at(at), "Data updated at 05/03/2024 09:07");
    }

    #[test]
    fn formats_counts() {
        assert_eq!(format_count(7), "7");
        assert_eq!(format_count(1234), "1.234");
        assert_eq!(format_count(1_234_567), "1.234.567");
    }
}
